use std::path::PathBuf;
use std::sync::Arc;

use rag_pipeline::{Ingestor, PipelineConfig, PolicyAssistant};

/// Values used by `POST /ingest` when the request omits them.
#[derive(Clone, Debug)]
pub struct IngestDefaults {
    pub policies_dir: PathBuf,
    pub airlines: Vec<String>,
    pub locale: String,
    pub policy_version: String,
}

impl From<&PipelineConfig> for IngestDefaults {
    fn from(cfg: &PipelineConfig) -> Self {
        Self {
            policies_dir: cfg.policies_dir.clone(),
            airlines: cfg.ingest_airlines.clone(),
            locale: cfg.ingest_locale.clone(),
            policy_version: cfg.ingest_policy_version.clone(),
        }
    }
}

/// Shared state for all HTTP handlers. Services are built once by the binary.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<PolicyAssistant>,
    pub ingestor: Arc<Ingestor>,
    pub ingest: IngestDefaults,
}

impl AppState {
    pub fn new(
        assistant: Arc<PolicyAssistant>,
        ingestor: Arc<Ingestor>,
        ingest: IngestDefaults,
    ) -> Self {
        Self {
            assistant,
            ingestor,
            ingest,
        }
    }
}
