//! POST /ingest: indexes policy folders for the requested airlines.

use std::sync::Arc;

use axum::{Json, extract::State};
use rag_pipeline::IngestReport;
use tracing::info;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::ingest::ingest_request::IngestRequest,
};

/// Handler: POST /ingest
///
/// Runs on its own task so a client disconnect does not cut a batch in half.
/// Per-document failures are part of the reports, not an error status.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/ingest \
///   -H 'content-type: application/json' \
///   -d '{"airlines":["Delta"],"policy_version":"2025-10-01"}'
/// ```
pub async fn ingest_policies(
    State(state): State<Arc<AppState>>,
    body: Option<Json<IngestRequest>>,
) -> AppResult<Json<Vec<IngestReport>>> {
    let job = body
        .map(|Json(req)| req)
        .unwrap_or_default()
        .resolve(&state.ingest)?;

    let base = state.ingest.policies_dir.clone();
    if !tokio::fs::try_exists(&base).await.unwrap_or(false) {
        return Err(AppError::NotFound(format!(
            "policies directory {}",
            base.display()
        )));
    }

    info!(airlines = ?job.airlines, locale = %job.locale, version = %job.policy_version, "ingestion requested");

    let ingestor = state.ingestor.clone();
    let reports = tokio::spawn(async move {
        ingestor
            .ingest_all(&base, &job.airlines, &job.locale, &job.policy_version)
            .await
    })
    .await
    .map_err(|e| AppError::Ingestion(e.to_string()))?;

    Ok(Json(reports))
}
