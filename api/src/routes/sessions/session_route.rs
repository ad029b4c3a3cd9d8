//! Conversation session inspection and reset.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::sessions::session_request::{ClearResponse, HistoryQuery, HistoryResponse},
};

/// Handler: GET /sessions/{session_id}/history
///
/// Unknown sessions return an empty list.
pub async fn session_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> AppResult<Json<HistoryResponse>> {
    let Query(query) = query?;
    let turns = state
        .assistant
        .memory()
        .get(&session_id, query.limit)
        .await;
    Ok(Json(HistoryResponse { session_id, turns }))
}

/// Handler: DELETE /sessions/{session_id}
pub async fn clear_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Json<ClearResponse> {
    let cleared = state.assistant.memory().clear(&session_id).await;
    Json(ClearResponse {
        session_id,
        cleared,
    })
}
