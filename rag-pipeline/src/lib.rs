//! Airline policy RAG core.
//!
//! Ingestion: [`Splitter`] → [`Indexer`] (embed + hash + upsert), driven per
//! airline folder by [`Ingestor`].
//!
//! Query: [`MetadataQuery`] → [`Retriever`] → [`ContextBuilder`] →
//! [`AnswerGenerator`], with [`ConversationMemory`] around it. [`PolicyAssistant`]
//! runs the whole request.

pub mod assistant;
pub mod config;
pub mod context_builder;
pub mod error;
pub mod generation;
pub mod indexer;
pub mod ingest;
pub mod memory;
pub mod progress;
pub mod prompt;
pub mod query;
pub mod retriever;
pub mod splitter;

pub use assistant::{AskInput, PolicyAssistant, QaAnswer};
pub use config::PipelineConfig;
pub use context_builder::{CONTEXT_LABEL, ContextBuilder};
pub use error::{ExtractionError, GenerationError, IndexingError, PipelineError, RetrievalError};
pub use generation::{AnswerGenerator, LlmGenerator, TextGenerator};
pub use indexer::Indexer;
pub use ingest::{IngestFailure, IngestReport, Ingestor, document_id, is_valid_airline, load_document};
pub use memory::{ConversationMemory, ConversationTurn, DEFAULT_MAX_SESSIONS, Role};
pub use progress::{IndicatifProgress, NoopProgress, Progress};
pub use prompt::{FALLBACK_ANSWER, SYSTEM_PROMPT, build_rag_prompt};
pub use query::{MetadataQuery, QueryFilter};
pub use retriever::Retriever;
pub use splitter::{Chunk, DocumentMeta, Splitter};
