//! Embeds a question and returns ranked fragment texts.

use std::sync::Arc;

use rag_store::{EmbeddingsProvider, VectorRepository};
use tracing::{debug, instrument};

use crate::error::RetrievalError;
use crate::query::QueryFilter;

pub struct Retriever {
    store: Arc<dyn VectorRepository>,
    embedder: Arc<dyn EmbeddingsProvider>,
    top_k: u64,
}

impl Retriever {
    pub fn new(
        store: Arc<dyn VectorRepository>,
        embedder: Arc<dyn EmbeddingsProvider>,
        top_k: u64,
    ) -> Self {
        Self {
            store,
            embedder,
            top_k,
        }
    }

    pub fn top_k(&self) -> u64 {
        self.top_k
    }

    /// Fragments in store relevance order, at most `top_k`.
    ///
    /// No match is an empty vector. A point without `text` yields `""`.
    #[instrument(skip_all, fields(top_k = self.top_k))]
    pub async fn retrieve(
        &self,
        question: &str,
        query: &dyn QueryFilter,
    ) -> Result<Vec<String>, RetrievalError> {
        let vector = self
            .embedder
            .embed_query(question)
            .await
            .map_err(RetrievalError::Embedding)?;

        let filter = query.build();
        let hits = self
            .store
            .search(vector, self.top_k, Some(&filter))
            .await
            .map_err(RetrievalError::Search)?;

        debug!(hits = hits.len(), "search completed");
        Ok(hits
            .iter()
            .take(self.top_k as usize)
            .map(|h| h.text().to_string())
            .collect())
    }
}
