use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Represents the provider (backend) used for generation or embeddings.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// let p: LlmProvider = "ollama".parse().unwrap();
/// assert_eq!(p, LlmProvider::Ollama);
/// assert_eq!(p.as_str(), "ollama");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime.
    Ollama,
    /// OpenAI or any OpenAI-compatible gateway (e.g. LiteLLM).
    OpenAI,
}

impl LlmProvider {
    /// Lowercase identifier used in env variables and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Ollama => "ollama",
            LlmProvider::OpenAI => "openai",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "openai" | "chatgpt" | "litellm" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
