use codebook::runtime::config::SiteConfig;
use codebook::runtime::logging::{log_event, LogLevel};
use codebook::server::{load_state, router};
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = SiteConfig::load_default().expect("Failed to load site config");
    let state = match load_state(&config) {
        Ok(state) => Arc::new(state),
        Err(err) => {
            log_event(
                LogLevel::Error,
                "startup_failed",
                Some(json!({ "error": err, "data_dir": config.data_dir })),
            );
            std::process::exit(1);
        }
    };
    log_event(
        LogLevel::Info,
        "content_loaded",
        Some(json!({
            "tables": state.tables.len(),
            "terms": state.glossary.len(),
            "indexed": state.search_index.len(),
        })),
    );

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {}: {e}", config.bind_addr));

    tracing::info!("[Server] Listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server failed");
}
