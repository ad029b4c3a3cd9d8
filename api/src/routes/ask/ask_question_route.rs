//! POST /ask: answers a policy question with retrieved context.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::ask::ask_request::{AskRequest, AskResponse},
};

/// Handler: POST /ask
///
/// A generation outage still answers 200 with the fallback text; only
/// retrieval failures surface as 500.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"Can I bring my cat?","airline":"Delta","locale":"en-US","session_id":"abc"}'
/// ```
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AskRequest>,
) -> AppResult<Json<AskResponse>> {
    let input = body.into_input()?;
    let answer = state.assistant.ask(input).await?;
    Ok(Json(answer.into()))
}
