mod common;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use codebook::annotate::references::link_references;
use codebook::runtime::config::SiteConfig;
use codebook::server::{
    handle_render, handle_section, handle_table, load_state, AppState, RenderParams,
};
use codebook::types::Segment;
use common::fixtures_dir;
use std::sync::Arc;

fn fixture_state() -> Arc<AppState> {
    let config = SiteConfig {
        data_dir: fixtures_dir().into(),
        tables_file: Some(std::path::Path::new(fixtures_dir()).join("tables.json")),
        ..SiteConfig::default()
    };
    Arc::new(load_state(&config).expect("fixture state should load"))
}

#[tokio::test]
async fn table_link_href_is_served() {
    let segments = link_references("Refer to Table 9.10.14.1.-A.", "9");
    let href = segments
        .iter()
        .find_map(|segment| match segment {
            Segment::TableRef { href, .. } => Some(href.clone()),
            _ => None,
        })
        .expect("a table link");
    let encoded = href.strip_prefix("/api/table/").expect("table route prefix");
    let id = urlencoding::decode(encoded).expect("valid encoding").into_owned();

    let (status, body) = handle_table(State(fixture_state()), Path(id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.0["id"], "Table 9.10.14.1.-A");
    assert_eq!(body.0["table"]["title"], "Maximum Area of Unprotected Openings");
    assert_eq!(body.0["table"]["page"], 151);
}

#[tokio::test]
async fn table_lookup_accepts_bare_ids() {
    let (status, body) =
        handle_table(State(fixture_state()), Path("9.23.4.2.".to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.0["table"]["title"], "Spans for Joists");
}

#[tokio::test]
async fn missing_table_is_not_found() {
    let (status, body) =
        handle_table(State(fixture_state()), Path("Table 1.2.3.4.".to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.0["error"], "Table not found");
}

#[tokio::test]
async fn unknown_section_is_not_found() {
    let state = fixture_state();
    let (status, _) = handle_section(State(state.clone()), Path("9.99".to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = handle_section(State(state), Path("9.10.14".to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.0["node"]["id"], "9.10.14");
}

#[tokio::test]
async fn render_returns_blocks_for_a_subsection() {
    let (status, body) = handle_render(
        State(fixture_state()),
        Path("9.10.14".to_string()),
        Query(RenderParams { highlight: None }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let blocks = body.0["blocks"].as_array().expect("blocks array");
    assert!(!blocks.is_empty());
    assert!(body.0["blocks"].to_string().contains("Table 9.10.14.1.-A"));
}
