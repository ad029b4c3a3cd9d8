use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rag_pipeline::RetrievalError;
use thiserror::Error;
use tracing::error;

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    // --- Pipeline ---
    #[error("Error processing question: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("ingestion failed: {0}")]
    Ingestion(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Retrieval(_)
            | AppError::Ingestion(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Retrieval(_) => "RETRIEVAL_FAILED",
            AppError::Ingestion(_) => "INGESTION_FAILED",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), error = %self, "request failed");
        }
        ApiResponse::<()>::error(self.error_code(), self.to_string(), Vec::new())
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(err: axum::extract::rejection::QueryRejection) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
