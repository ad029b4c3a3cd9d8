//! Start-up wiring shared by the server and the ingestion binaries.

use std::sync::Arc;

use ai_llm_service::{LlmServiceProfiles, telemetry};
use anyhow::{Context, Result};
use rag_pipeline::{
    AnswerGenerator, ContextBuilder, ConversationMemory, Indexer, Ingestor, LlmGenerator,
    PipelineConfig, PolicyAssistant, Progress, Retriever, Splitter,
};
use rag_store::{EmbeddingsProvider, QdrantRepository, RagConfig, ServiceEmbedder, VectorRepository};
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber: `RUST_LOG` or `info` with workspace crates at `level`.
pub fn init_tracing(level: Level) -> Result<()> {
    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", level))
        .with(telemetry::layer())
        .try_init()
        .context("setting default subscriber failed")
}

/// Every long-lived service, constructed once.
pub struct Services {
    pub config: PipelineConfig,
    pub assistant: Arc<PolicyAssistant>,
    pub ingestor: Arc<Ingestor>,
}

/// Reads configuration from the environment and builds the whole pipeline.
///
/// Provider and vector store clients are created eagerly, so a bad model
/// name or URL fails here rather than on the first request.
pub fn build_services(progress: Arc<dyn Progress>) -> Result<Services> {
    let config = PipelineConfig::from_env().context("pipeline config")?;
    let rag_cfg = RagConfig::from_env().context("qdrant config")?;
    anyhow::ensure!(
        rag_cfg.vector_size == config.vector_size,
        "vector size mismatch between store ({}) and pipeline ({})",
        rag_cfg.vector_size,
        config.vector_size
    );

    let llm = Arc::new(LlmServiceProfiles::from_env().context("llm profiles")?);
    let (chat, embedding) = llm.profiles();
    info!(
        chat_model = %chat.model,
        embedding_model = %embedding.model,
        collection = %rag_cfg.collection,
        "providers configured"
    );

    let store: Arc<dyn VectorRepository> =
        Arc::new(QdrantRepository::new(&rag_cfg).context("qdrant client")?);
    let embedder: Arc<dyn EmbeddingsProvider> =
        Arc::new(ServiceEmbedder::new(llm.clone(), config.vector_size));

    let retriever = Arc::new(Retriever::new(store.clone(), embedder.clone(), config.top_k));
    let generator = Arc::new(AnswerGenerator::new(Arc::new(LlmGenerator::new(llm))));
    let memory = Arc::new(ConversationMemory::with_max_sessions(
        config.memory_window,
        config.memory_max_sessions,
    ));
    let assistant = Arc::new(PolicyAssistant::new(
        retriever,
        ContextBuilder::new(config.max_ctx_chars),
        generator,
        memory,
    ));

    let splitter = Splitter::new(config.chunk_size, config.chunk_overlap)?;
    let indexer = Arc::new(Indexer::new(store, embedder, config.vector_size));
    let ingestor = Arc::new(Ingestor::new(splitter, indexer, progress));

    Ok(Services {
        config,
        assistant,
        ingestor,
    })
}
