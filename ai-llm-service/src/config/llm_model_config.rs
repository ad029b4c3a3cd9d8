use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{ConfigError, Result, validate_http_endpoint, validate_range_f32};

/// Configuration for an LLM model invocation.
///
/// # Fields
///
/// - `provider`: Which backend to use (Ollama or OpenAI-compatible).
/// - `model`: The model identifier (e.g., `"gpt-3.5-turbo"`, `"bge-m3"`).
/// - `endpoint`: Base URL of the inference server.
/// - `api_key`: Optional API key for providers that require authentication.
/// - `max_tokens`: Maximum number of tokens to generate (if supported).
/// - `temperature`: Controls randomness (0.0 = deterministic).
/// - `top_p`: Nucleus sampling cutoff.
/// - `timeout_secs`: Request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OpenAI,
///     model: "gpt-3.5-turbo".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-test".to_string()),
///     max_tokens: Some(512),
///     temperature: Some(0.1),
///     top_p: None,
///     timeout_secs: Some(60),
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// Inference endpoint (base URL, without the API path).
    pub endpoint: String,

    /// Optional API key for authentication (e.g., OpenAI).
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Checks the fields every provider relies on.
    ///
    /// # Errors
    /// - [`ConfigError::EmptyModel`] for an empty model name
    /// - [`ConfigError::InvalidFormat`] for a non-http(s) endpoint
    /// - [`ConfigError::MissingApiKey`] for OpenAI without a key
    /// - [`ConfigError::OutOfRange`] for temperature/top_p outside their ranges
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        validate_http_endpoint("endpoint", &self.endpoint)?;
        if self.provider == LlmProvider::OpenAI
            && self.api_key.as_deref().is_none_or(|k| k.trim().is_empty())
        {
            return Err(ConfigError::MissingApiKey("openai").into());
        }
        if let Some(t) = self.temperature {
            validate_range_f32("temperature", t, 0.0, 2.0)?;
        }
        if let Some(p) = self.top_p {
            validate_range_f32("top_p", p, 0.0, 1.0)?;
        }
        Ok(())
    }

    /// Extra checks for a config used as an embedding profile.
    ///
    /// OpenAI only serves embeddings from `text-embedding-*` models.
    ///
    /// # Errors
    /// Everything from [`LlmModelConfig::validate`] plus
    /// [`ConfigError::UnsupportedModel`].
    pub fn validate_for_embeddings(&self) -> Result<()> {
        self.validate()?;
        if self.provider == LlmProvider::OpenAI && !self.model.starts_with("text-embedding") {
            return Err(ConfigError::UnsupportedModel {
                model: self.model.clone(),
                role: "embeddings",
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AiLlmError;

    fn openai(model: &str, key: Option<&str>) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: model.into(),
            endpoint: "https://api.openai.com".into(),
            api_key: key.map(str::to_string),
            max_tokens: None,
            temperature: Some(0.1),
            top_p: None,
            timeout_secs: Some(30),
        }
    }

    #[test]
    fn openai_without_key_is_rejected() {
        let err = openai("gpt-3.5-turbo", None).validate().unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingApiKey("openai"))
        ));
    }

    #[test]
    fn openai_chat_model_cannot_embed() {
        let cfg = openai("gpt-3.5-turbo", Some("sk-test"));
        assert!(cfg.validate().is_ok());
        let err = cfg.validate_for_embeddings().unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::UnsupportedModel { .. })
        ));
        assert!(
            openai("text-embedding-3-small", Some("sk-test"))
                .validate_for_embeddings()
                .is_ok()
        );
    }

    #[test]
    fn ollama_needs_no_key_but_needs_model() {
        let mut cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "bge-m3".into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: None,
        };
        assert!(cfg.validate_for_embeddings().is_ok());
        cfg.model = "  ".into();
        assert!(matches!(
            cfg.validate().unwrap_err(),
            AiLlmError::Config(ConfigError::EmptyModel)
        ));
    }
}
