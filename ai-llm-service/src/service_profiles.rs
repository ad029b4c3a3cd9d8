//! Shared LLM service with two profiles: `chat` and `embedding`.
//!
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - HTTP clients are built eagerly so configuration problems surface at startup.
//! - Both profiles may point at different providers (e.g. Ollama embeddings
//!   with an OpenAI chat model).
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::from_env()?);
//! let answer = svc.generate("Question: can I bring a stroller?", None).await?;
//! let vector = svc.embed("stroller policy").await?;
//! println!("{answer} / dim={}", vector.len());
//! # Ok(()) }
//! ```

use std::sync::Arc;

use tracing::info;

use crate::{
    config::{
        default_config::{config_chat_from_env, config_embedding_from_env},
        llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::{AiLlmError, Result},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Provider-specific client behind a profile.
enum Backend {
    Ollama(Arc<OllamaService>),
    OpenAI(Arc<OpenAiService>),
}

impl Backend {
    fn build(cfg: &LlmModelConfig) -> Result<Self> {
        Ok(match cfg.provider {
            LlmProvider::Ollama => Backend::Ollama(Arc::new(OllamaService::new(cfg.clone())?)),
            LlmProvider::OpenAI => Backend::OpenAI(Arc::new(OpenAiService::new(cfg.clone())?)),
        })
    }
}

/// Chat + embedding profiles with their ready-to-use clients.
pub struct LlmServiceProfiles {
    chat: LlmModelConfig,
    embedding: LlmModelConfig,
    chat_backend: Backend,
    embedding_backend: Backend,
}

impl LlmServiceProfiles {
    /// Creates the service from explicit profiles.
    ///
    /// # Errors
    /// Any [`AiLlmError::Config`] from validating either profile, or a transport
    /// error if an HTTP client cannot be built.
    pub fn new(chat: LlmModelConfig, embedding: LlmModelConfig) -> Result<Self> {
        chat.validate()?;
        embedding.validate_for_embeddings()?;

        let chat_backend = Backend::build(&chat)?;
        let embedding_backend = Backend::build(&embedding)?;

        info!(
            chat_provider = chat.provider.as_str(),
            chat_model = %chat.model,
            embedding_provider = embedding.provider.as_str(),
            embedding_model = %embedding.model,
            "LLM profiles ready"
        );

        Ok(Self {
            chat,
            embedding,
            chat_backend,
            embedding_backend,
        })
    }

    /// Reads both profiles from the environment.
    ///
    /// # Errors
    /// See [`config_chat_from_env`] and [`config_embedding_from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(config_chat_from_env()?, config_embedding_from_env()?)
    }

    /// Generates text using the **chat** profile.
    ///
    /// `system` becomes the system message for OpenAI and the `system` field for Ollama.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let text = match &self.chat_backend {
            Backend::Ollama(cli) => cli.generate(prompt, system).await?,
            Backend::OpenAI(cli) => cli.generate(prompt, system).await?,
        };
        if text.trim().is_empty() {
            return Err(AiLlmError::EmptyResponse);
        }
        Ok(text)
    }

    /// Embeds one text with the **embedding** profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        match &self.embedding_backend {
            Backend::Ollama(cli) => cli.embeddings(input).await,
            Backend::OpenAI(cli) => cli.embeddings(input).await,
        }
    }

    /// Embeds many texts in a single provider call, preserving order.
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        match &self.embedding_backend {
            Backend::Ollama(cli) => cli.embed_batch(inputs).await,
            Backend::OpenAI(cli) => cli.embed_batch(inputs).await,
        }
    }

    /// Returns references to the current profiles `(chat, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.chat, &self.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ollama(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: model.into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn mixed_providers_are_allowed() {
        let chat = LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: "gpt-3.5-turbo".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: Some(0.1),
            top_p: None,
            timeout_secs: Some(60),
        };
        let svc = LlmServiceProfiles::new(chat, ollama("bge-m3")).unwrap();
        let (c, e) = svc.profiles();
        assert_eq!(c.provider, LlmProvider::OpenAI);
        assert_eq!(e.model, "bge-m3");
    }

    #[test]
    fn invalid_embedding_profile_fails_fast() {
        let err = LlmServiceProfiles::new(ollama("qwen3:8b"), ollama("  ")).err().unwrap();
        assert!(err.is_config());
    }
}
