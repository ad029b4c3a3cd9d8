//! Typed errors for the pipeline stages.

use std::path::PathBuf;

use rag_store::RagError;
use thiserror::Error;

/// Ingestion-side failure for one `index` call. Nothing is upserted when it fires.
#[derive(Debug, Error)]
pub enum IndexingError {
    /// Embedding gateway or vector store failed.
    #[error("vector store error: {0}")]
    Store(#[from] RagError),

    /// Embedding provider returned no vectors.
    #[error("embedding provider returned an empty batch")]
    EmptyEmbeddings,

    /// A vector does not match the collection dimension.
    #[error("embedding dimension {got} does not match vector size {want}")]
    DimensionMismatch { got: usize, want: usize },

    /// Provider returned a different number of vectors than chunks sent.
    #[error("got {vectors} vectors for {chunks} chunks")]
    CountMismatch { chunks: usize, vectors: usize },
}

/// Query-side failure; aborts the current request.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("query embedding failed: {0}")]
    Embedding(RagError),

    #[error("vector search failed: {0}")]
    Search(RagError),
}

/// Document text could not be obtained.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("document not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("document has no text: {0}")]
    Empty(PathBuf),
}

/// Text-generation provider failure, reported at the provider boundary only.
#[derive(Debug, Error)]
#[error("generation failed: {0}")]
pub struct GenerationError(pub String);

/// Configuration and orchestration errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] RagError),

    #[error(transparent)]
    Indexing(#[from] IndexingError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Provider(#[from] ai_llm_service::AiLlmError),
}
