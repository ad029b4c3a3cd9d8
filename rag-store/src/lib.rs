//! Vector-store layer for airline policy chunks.
//!
//! - [`VectorRepository`]: ensure-collection / upsert / filtered search
//! - [`QdrantRepository`]: the Qdrant implementation (with soft `should` preference)
//! - [`EmbeddingsProvider`]: batch + query embedding contract, and
//!   [`ServiceEmbedder`] on top of `ai-llm-service`

mod config;
mod embed;
mod errors;
mod filters;
mod qdrant_facade;
mod record;
mod repository;

pub use config::{DistanceKind, RagConfig};
pub use embed::EmbeddingsProvider;
pub use embed::service::{ServiceEmbedder, check_dimensions};
pub use errors::RagError;
pub use filters::merge_ranked;
pub use qdrant_facade::QdrantRepository;
pub use record::{FieldMatch, IndexPoint, MetadataFilter, PointPayload, ScoredPoint};
pub use repository::VectorRepository;
