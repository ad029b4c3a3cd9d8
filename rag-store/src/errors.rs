//! Unified error types for the crate.

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid or unsupported store configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Embedding provider is misconfigured (missing key, unsupported model).
    #[error("embedding configuration error: {0}")]
    EmbeddingConfig(AiLlmError),

    /// Embedding provider call failed.
    #[error("embedding provider error: {0}")]
    EmbeddingProvider(AiLlmError),

    /// Vector dimensionality differs from the collection's.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// Payload could not be converted to/from JSON.
    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

impl From<AiLlmError> for RagError {
    fn from(e: AiLlmError) -> Self {
        if e.is_config() {
            RagError::EmbeddingConfig(e)
        } else {
            RagError::EmbeddingProvider(e)
        }
    }
}

impl From<qdrant_client::QdrantError> for RagError {
    fn from(e: qdrant_client::QdrantError) -> Self {
        RagError::Qdrant(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::ConfigError;

    #[test]
    fn provider_errors_keep_their_kind() {
        let cfg: RagError = AiLlmError::from(ConfigError::MissingApiKey("openai")).into();
        assert!(matches!(cfg, RagError::EmbeddingConfig(_)));

        let call: RagError = AiLlmError::EmptyResponse.into();
        assert!(matches!(call, RagError::EmbeddingProvider(_)));
    }
}
