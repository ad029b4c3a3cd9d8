//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use crate::error::PipelineError;

/// Knobs for every pipeline stage. All fields have defaults via [`PipelineConfig::from_env`].
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    // Splitter
    pub chunk_size: usize,
    pub chunk_overlap: usize,

    // Retrieval + context
    pub top_k: u64,
    pub max_ctx_chars: usize,
    pub vector_size: usize,

    // Conversation memory: turns kept per session, sessions kept overall
    pub memory_window: usize,
    pub memory_max_sessions: usize,

    // Ingestion defaults
    pub policies_dir: PathBuf,
    pub ingest_airlines: Vec<String>,
    pub ingest_locale: String,
    pub ingest_policy_version: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 120,
            top_k: 5,
            max_ctx_chars: 3000,
            vector_size: 1536,
            memory_window: 5,
            memory_max_sessions: crate::memory::DEFAULT_MAX_SESSIONS,
            policies_dir: PathBuf::from("policies"),
            ingest_airlines: ["Delta", "AmericanAirlines", "United"]
                .into_iter()
                .map(String::from)
                .collect(),
            ingest_locale: "en-US".into(),
            ingest_policy_version: "2025-10-01".into(),
        }
    }
}

impl PipelineConfig {
    /// Build from environment variables with defaults, then validate.
    ///
    /// # Errors
    /// [`PipelineError::Config`] naming the variable on a bad number, or any
    /// violation reported by [`PipelineConfig::validate`].
    pub fn from_env() -> Result<Self, PipelineError> {
        let d = Self::default();
        let cfg = Self {
            chunk_size: parse("CHUNK_SIZE", d.chunk_size)?,
            chunk_overlap: parse("CHUNK_OVERLAP", d.chunk_overlap)?,
            top_k: parse("RAG_TOP_K", d.top_k)?,
            max_ctx_chars: parse("MAX_CTX_CHARS", d.max_ctx_chars)?,
            vector_size: parse("VECTOR_SIZE", d.vector_size)?,
            memory_window: parse("MEMORY_WINDOW", d.memory_window)?,
            memory_max_sessions: parse("MEMORY_MAX_SESSIONS", d.memory_max_sessions)?,
            policies_dir: env("POLICIES_DIR").map(PathBuf::from).unwrap_or(d.policies_dir),
            ingest_airlines: env("INGEST_AIRLINES")
                .map(|v| split_list(&v))
                .unwrap_or(d.ingest_airlines),
            ingest_locale: env("INGEST_LOCALE").unwrap_or(d.ingest_locale),
            ingest_policy_version: env("INGEST_POLICY_VERSION").unwrap_or(d.ingest_policy_version),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects values the algorithms cannot run with.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.chunk_size <= self.chunk_overlap {
            return Err(PipelineError::Config(format!(
                "CHUNK_SIZE ({}) must be greater than CHUNK_OVERLAP ({})",
                self.chunk_size, self.chunk_overlap
            )));
        }
        if self.top_k == 0 {
            return Err(PipelineError::Config("RAG_TOP_K must be >= 1".into()));
        }
        if self.vector_size == 0 {
            return Err(PipelineError::Config("VECTOR_SIZE must be >= 1".into()));
        }
        if self.memory_window == 0 {
            return Err(PipelineError::Config("MEMORY_WINDOW must be >= 1".into()));
        }
        if self.memory_max_sessions == 0 {
            return Err(PipelineError::Config("MEMORY_MAX_SESSIONS must be >= 1".into()));
        }
        Ok(())
    }
}

fn env(k: &str) -> Option<String> {
    std::env::var(k)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> Result<T, PipelineError> {
    match env(k) {
        Some(v) => v
            .parse()
            .map_err(|_| PipelineError::Config(format!("{k} is not a valid number: '{v}'"))),
        None => Ok(dflt),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
