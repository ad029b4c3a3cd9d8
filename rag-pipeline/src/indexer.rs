//! Turns chunks into content-addressed points and upserts them in one batch.
//!
//! Point ids are UUIDv5 of `doc_id:policy_version:chunk_id`, so re-indexing
//! the same chunk overwrites in place. The payload carries `sha256(text)` to
//! detect whether the text behind an id changed.

use std::sync::Arc;

use rag_store::{
    EmbeddingsProvider, IndexPoint, PointPayload, RagError, VectorRepository, check_dimensions,
};
use services::{hash::sha256_hex, uuid::chunk_point_id};
use tracing::{debug, info, instrument};

use crate::error::IndexingError;
use crate::splitter::Chunk;

pub struct Indexer {
    store: Arc<dyn VectorRepository>,
    embedder: Arc<dyn EmbeddingsProvider>,
    vector_size: usize,
}

impl Indexer {
    pub fn new(
        store: Arc<dyn VectorRepository>,
        embedder: Arc<dyn EmbeddingsProvider>,
        vector_size: usize,
    ) -> Self {
        Self {
            store,
            embedder,
            vector_size,
        }
    }

    /// Embeds and upserts `chunks`. All-or-nothing: any failure before the
    /// upsert leaves the store untouched.
    ///
    /// Returns the number of points written.
    #[instrument(skip_all, fields(chunks = chunks.len()))]
    pub async fn index(&self, chunks: &[Chunk]) -> Result<usize, IndexingError> {
        self.store.ensure_collection().await?;

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = if texts.is_empty() {
            Vec::new()
        } else {
            self.embedder
                .embed_texts(&texts)
                .await
                .map_err(dimension_error)?
        };

        if vectors.is_empty() {
            return Err(IndexingError::EmptyEmbeddings);
        }
        check_dimensions(&vectors, self.vector_size).map_err(dimension_error)?;
        if vectors.len() != chunks.len() {
            return Err(IndexingError::CountMismatch {
                chunks: chunks.len(),
                vectors: vectors.len(),
            });
        }

        let points: Vec<IndexPoint> = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| to_point(chunk, vector))
            .collect();
        debug!(points = points.len(), "points built");

        let written = self.store.upsert_points(points).await?;
        info!(written, "chunks indexed");
        Ok(written)
    }
}

/// Builds the point for one chunk. Pure; exposed for id/hash checks.
pub fn to_point(chunk: &Chunk, vector: Vec<f32>) -> IndexPoint {
    let id = chunk_point_id(&chunk.doc_id, &chunk.policy_version, chunk.chunk_id);
    IndexPoint {
        id: id.to_string(),
        vector,
        payload: PointPayload {
            text: chunk.text.clone(),
            airline: chunk.airline.clone(),
            locale: chunk.locale.clone(),
            policy_version: chunk.policy_version.clone(),
            doc_id: chunk.doc_id.clone(),
            chunk_id: chunk.chunk_id,
            source: chunk.source.clone(),
            sha256: sha256_hex(&chunk.text),
        },
    }
}

fn dimension_error(e: RagError) -> IndexingError {
    match e {
        RagError::VectorSizeMismatch { got, want } => IndexingError::DimensionMismatch { got, want },
        other => IndexingError::Store(other),
    }
}
