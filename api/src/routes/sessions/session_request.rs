use rag_pipeline::ConversationTurn;
use serde::{Deserialize, Serialize};

/// Query for GET /sessions/{session_id}/history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Keep only the most recent `limit` turns.
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    /// Oldest first.
    pub turns: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub session_id: String,
    pub cleared: bool,
}
