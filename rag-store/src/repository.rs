//! Narrow vector-store interface used by the pipeline.

use futures::future::BoxFuture;

use crate::errors::RagError;
use crate::record::{IndexPoint, MetadataFilter, ScoredPoint};

/// Collection lifecycle plus upsert/search primitives.
///
/// Implemented by [`crate::QdrantRepository`]; tests plug in in-memory stores.
pub trait VectorRepository: Send + Sync {
    /// Creates the collection if it is absent. Idempotent.
    fn ensure_collection(&self) -> BoxFuture<'_, Result<(), RagError>>;

    /// Inserts or overwrites `points` by id. Returns how many were written.
    fn upsert_points(&self, points: Vec<IndexPoint>) -> BoxFuture<'_, Result<usize, RagError>>;

    /// Similarity search, highest score first, at most `top_k` hits.
    fn search<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<&'a MetadataFilter>,
    ) -> BoxFuture<'a, Result<Vec<ScoredPoint>, RagError>>;
}
