//! Provider layer for text generation and embeddings.
//!
//! - [`config`]: model configs and env-driven defaults
//! - [`services`]: thin HTTP clients for Ollama and OpenAI-compatible APIs
//! - [`service_profiles`]: the `chat` + `embedding` pair shared by the app
//! - [`error_handler`]: unified [`AiLlmError`]
//! - [`telemetry`]: subscriber helpers used by the binaries

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError};
pub use service_profiles::LlmServiceProfiles;
