use std::sync::Arc;

use todo_server::{
    app_state::{AppState, SharedState},
    data_access::task_store::TaskStore,
    map_routes,
    settings::Settings,
    suggestions::{completion::HttpCompletionProvider, suggestion_service::SuggestionService},
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; the real environment still applies.
    dotenvy::dotenv().ok();
    init_tracing();

    // ── Configuration ──────────────────────────────────────────
    let settings = Settings::from_env()?;

    // ── Store ──────────────────────────────────────────────────
    let task_store = TaskStore::open(&settings.db_path)?;
    info!(
        path = %settings.db_path,
        tasks = task_store.count()?,
        "task store opened"
    );

    // ── Suggestions ────────────────────────────────────────────
    if settings.llm_api_key.is_none() {
        warn!("GROQ_API_KEY is not set; suggestion requests will fail");
    }
    let provider = HttpCompletionProvider::new(settings.completion_config())?;
    let suggestion_service = SuggestionService::new(Arc::new(provider), settings.llm_model.clone());

    // ── Shared state ───────────────────────────────────────────
    let state: SharedState = Arc::new(AppState {
        task_store,
        suggestion_service,
    });

    // ── Start ──────────────────────────────────────────────────
    let app = map_routes(state);
    let addr = settings.socket_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server running on http://{addr}");
    info!("  Tasks:       http://{addr}/api/tasks");
    info!("  Suggestions: POST http://{addr}/api/suggestions");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("todo_server=debug,tower_http=debug,info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
