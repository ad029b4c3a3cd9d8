//! Embedding provider backed by the shared [`LlmServiceProfiles`].

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::{EmbeddingsProvider, RagError};

/// Embeds through the `embedding` profile and enforces the collection dimension.
#[derive(Clone)]
pub struct ServiceEmbedder {
    svc: Arc<LlmServiceProfiles>,
    dim: usize,
}

impl ServiceEmbedder {
    /// `dim` is the vector size of the target collection.
    pub fn new(svc: Arc<LlmServiceProfiles>, dim: usize) -> Self {
        Self { svc, dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

/// Fails on the first vector whose length is not `want`.
pub fn check_dimensions(vectors: &[Vec<f32>], want: usize) -> Result<(), RagError> {
    match vectors.iter().find(|v| v.len() != want) {
        Some(v) => {
            warn!(got = v.len(), want, "embedding dimension mismatch");
            Err(RagError::VectorSizeMismatch { got: v.len(), want })
        }
        None => Ok(()),
    }
}

impl EmbeddingsProvider for ServiceEmbedder {
    fn embed_texts<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, RagError>> {
        Box::pin(async move {
            let vectors = self.svc.embed_batch(texts).await?;
            debug!(inputs = texts.len(), vectors = vectors.len(), "batch embedded");
            check_dimensions(&vectors, self.dim)?;
            Ok(vectors)
        })
    }

    fn embed_query<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
        Box::pin(async move {
            let vector = self.svc.embed(text).await?;
            check_dimensions(std::slice::from_ref(&vector), self.dim)?;
            Ok(vector)
        })
    }
}
