//! HTTP surface over the store, the parser and the search index.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::annotate::references::ReferenceRecognizer;
use crate::annotate::terms::Glossary;
use crate::parser::{parse_content, ParseOptions, RenderContext};
use crate::runtime::config::{SiteConfig, StoreKind};
use crate::search::{build_search_index, search_code, snippet, DEFAULT_LIMIT, DEFAULT_SNIPPET_LEN};
use crate::store::{
    assemble_content, breadcrumb, normalize_table_id, ContentStore, JsonScanStore, MemoryStore,
    TableRegistry, TableResolver,
};
use crate::types::SearchItem;

pub struct AppState {
    pub store: Box<dyn ContentStore>,
    pub tables: TableRegistry,
    pub glossary: Glossary,
    pub references: ReferenceRecognizer,
    pub search_index: Vec<SearchItem>,
    pub rejoin_soft_wraps: bool,
}

#[derive(Debug, Deserialize)]
pub struct RenderParams {
    pub highlight: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

fn not_found(message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message })))
}

pub async fn handle_section(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    let Some(node) = state.store.get_node(&id) else {
        return not_found("Section not found");
    };
    let children = state.store.get_children(&id);
    let trail = breadcrumb(state.store.as_ref(), &id);
    (
        StatusCode::OK,
        Json(json!({ "node": node, "children": children, "breadcrumb": trail })),
    )
}

pub async fn handle_render(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<RenderParams>,
) -> (StatusCode, Json<serde_json::Value>) {
    let Some(node) = state.store.get_node(&id) else {
        return not_found("Section not found");
    };
    let Some(assembled) = assemble_content(state.store.as_ref(), &id) else {
        return not_found("Section not found");
    };

    let options = ParseOptions {
        dialect: assembled.dialect,
        current_id: Some(node.id.as_str()),
        highlight: params.highlight.as_deref(),
        rejoin_soft_wraps: state.rejoin_soft_wraps,
        ..ParseOptions::default()
    };
    let context = RenderContext {
        tables: &state.tables,
        glossary: &state.glossary,
        references: &state.references,
    };
    let blocks = parse_content(&assembled.text, &options, &context);

    (
        StatusCode::OK,
        Json(json!({ "node": node, "dialect": assembled.dialect, "blocks": blocks })),
    )
}

/// Table popup content, looked up by any spelling of the table id.
pub async fn handle_table(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    let table_id = normalize_table_id(&id);
    match state.tables.resolve(&table_id) {
        Some(entry) => (
            StatusCode::OK,
            Json(json!({ "id": table_id, "table": entry })),
        ),
        None => {
            tracing::debug!("[Server] Table lookup missed: {}", table_id);
            not_found("Table not found")
        }
    }
}

pub async fn handle_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> (StatusCode, Json<serde_json::Value>) {
    let query = params.q.unwrap_or_default();
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let results: Vec<serde_json::Value> = search_code(&state.search_index, &query, limit)
        .into_iter()
        .map(|scored| {
            json!({
                "id": scored.item.id,
                "title": scored.item.title,
                "section": scored.item.section,
                "sectionId": scored.item.section_id,
                "page": scored.item.page,
                "path": scored.item.path,
                "snippet": snippet(&scored.item.content, &query, DEFAULT_SNIPPET_LEN),
                "score": scored.score,
            })
        })
        .collect();
    let total = results.len();
    (
        StatusCode::OK,
        Json(json!({ "results": results, "query": query, "total": total })),
    )
}

async fn handle_health() -> &'static str {
    "ok"
}

pub fn load_state(config: &SiteConfig) -> Result<AppState, String> {
    let store: Box<dyn ContentStore> = match config.store {
        StoreKind::Memory => Box::new(MemoryStore::load_from_dir(&config.data_dir)?),
        StoreKind::JsonScan => Box::new(JsonScanStore::load_from_dir(&config.data_dir)?),
    };
    let tables = match &config.tables_file {
        Some(path) => TableRegistry::load_from_file(path)?,
        None => TableRegistry::default(),
    };
    let glossary = match &config.glossary_file {
        Some(path) => Glossary::load_from_file(path)?,
        None => Glossary::builtin(),
    };
    let search_index = build_search_index(store.as_ref());

    Ok(AppState {
        store,
        tables,
        glossary,
        references: ReferenceRecognizer::new(&config.root_part),
        search_index,
        rejoin_soft_wraps: config.rejoin_soft_wraps,
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/section/{id}", get(handle_section))
        .route("/api/render/{id}", get(handle_render))
        .route("/api/table/{id}", get(handle_table))
        .route("/api/search", get(handle_search))
        .fallback(handle_health)
        .with_state(state)
}
