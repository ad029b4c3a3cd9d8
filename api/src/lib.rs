//! HTTP layer for the airline policy assistant.

use std::sync::Arc;

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

pub use crate::core::app_state::{AppState, IngestDefaults};
pub use crate::error_handler::{AppError, AppResult};

use crate::middleware_layer::json_extractor::json_error_mapper;
use crate::routes::{
    ask::ask_question_route::ask_question,
    health_route::health,
    ingest::ingest_route::ingest_policies,
    sessions::session_route::{clear_session, session_history},
};

/// Full route table with the JSON-rejection middleware applied.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask_question))
        .route("/ingest", post(ingest_policies))
        .route("/sessions/{session_id}/history", get(session_history))
        .route("/sessions/{session_id}", delete(clear_session))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Binds `address` and serves until Ctrl+C.
pub async fn start(state: AppState, address: &str) -> AppResult<()> {
    let app = router(Arc::new(state));

    let listener = TcpListener::bind(address).await.map_err(AppError::Bind)?;
    info!(%address, "API listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("API stopped");
    Ok(())
}

/// Resolves on Ctrl+C. If the handler cannot be installed the server keeps
/// running until the process is killed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
