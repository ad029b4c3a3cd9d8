//! Embedding gateway contract.

use futures::future::BoxFuture;

use crate::errors::RagError;

/// Provider interface for embedding generation.
///
/// Async because every real backend performs HTTP requests. Implementations
/// return [`RagError::EmbeddingConfig`] for misconfiguration and
/// [`RagError::EmbeddingProvider`] when the call itself fails.
pub trait EmbeddingsProvider: Send + Sync {
    /// Embeds a batch in one provider call; output order follows `texts`.
    fn embed_texts<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, RagError>>;

    /// Embeds a single query string.
    fn embed_query<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>>;
}

pub mod service;
