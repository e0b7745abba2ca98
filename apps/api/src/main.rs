mod assist;
mod config;
mod errors;
mod evaluation;
mod llm_client;
mod report;
mod routes;
mod rubric;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assist::LlmAssistService;
use crate::config::Config;
use crate::llm_client::{LlmClient, LlmSettings};
use crate::report::{PageConfig, TextReportRenderer};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::EvaluationStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; malformed values abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Practicum API v{}", env!("CARGO_PKG_VERSION"));

    // Open the evaluations file. A corrupt file is reported but does not stop the server;
    // writes are refused until it is fixed.
    let mut store = EvaluationStore::new(&config.evaluations_file);
    let path = store.path().display().to_string();
    match store.reload() {
        Ok(records) => info!("Evaluations store at {path} ({} record(s))", records.len()),
        Err(e) => warn!("Evaluations store unreadable, writes will be refused: {e}"),
    }

    // Initialize LLM client
    let llm = LlmClient::new(LlmSettings {
        api_key: config.anthropic_api_key.clone(),
        model: config.llm_model.clone(),
        timeout: Duration::from_secs(config.llm_timeout_secs),
        max_attempts: config.llm_max_attempts,
    });
    if llm.is_configured() {
        info!("LLM client initialized (model: {})", llm.model());
    } else {
        warn!("ANTHROPIC_API_KEY not set; AI assist endpoints will return 503");
    }

    let page_config = PageConfig::new(config.report_line_width, config.report_lines_per_page);
    info!(
        "Report layout: {} columns, {} lines per page",
        page_config.line_width, page_config.lines_per_page
    );

    // Build app state
    let state = AppState {
        store: Arc::new(Mutex::new(store)),
        assist: Arc::new(LlmAssistService(llm)),
        renderer: Arc::new(TextReportRenderer::new(page_config)),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
