//! Default LLM configs loaded strictly from environment variables.
//!
//! Two roles are resolved:
//!
//! - **Chat**      → answers questions from the assembled RAG prompt
//! - **Embedding** → embeds policy chunks and user questions
//!
//! # Environment variables
//!
//! Chat:
//! - `LLM_PROVIDER`     = `openai` (default) or `ollama`
//! - `LLM_MODEL`        = chat model (default `gpt-3.5-turbo` / required for Ollama)
//! - `LLM_TEMPERATURE`  = optional f32 (default `0.1`)
//! - `LLM_MAX_TOKENS`   = optional u32
//! - `LLM_TIMEOUT_SECS` = optional u64 (default `60`)
//!
//! Embedding:
//! - `EMBEDDING_PROVIDER`     = defaults to `LLM_PROVIDER`
//! - `EMBEDDING_MODEL`        = embedding model (mandatory)
//! - `EMBEDDING_TIMEOUT_SECS` = optional u64 (default `30`)
//!
//! Provider endpoints:
//! - OpenAI: `OPENAI_API_KEY` (or `LITELLM_API_KEY`), `OPENAI_BASE_URL`
//! - Ollama: `OLLAMA_URL` or `OLLAMA_PORT`

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_f32, env_opt_u32, env_opt_u64, must_env, opt_env,
    },
};

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Some(url) = opt_env("OLLAMA_URL") {
        return Ok(url);
    }
    if let Some(port) = opt_env("OLLAMA_PORT") {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

/// Endpoint + key for a provider.
fn provider_access(provider: LlmProvider) -> Result<(String, Option<String>), AiLlmError> {
    match provider {
        LlmProvider::Ollama => Ok((ollama_endpoint()?, None)),
        LlmProvider::OpenAI => {
            let endpoint =
                opt_env("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string());
            let key = opt_env("OPENAI_API_KEY")
                .or_else(|| opt_env("LITELLM_API_KEY"))
                .ok_or(ConfigError::MissingApiKey("openai"))?;
            Ok((endpoint, Some(key)))
        }
    }
}

fn provider_from_env(var: &'static str) -> Result<Option<LlmProvider>, AiLlmError> {
    opt_env(var)
        .map(|raw| raw.parse::<LlmProvider>().map_err(AiLlmError::from))
        .transpose()
}

/// Constructs the **chat** profile used to answer questions.
///
/// # Defaults
/// - `provider = openai`, `model = gpt-3.5-turbo`
/// - `temperature = Some(0.1)`
/// - `timeout_secs = Some(60)`
///
/// # Errors
/// Any [`ConfigError`] raised while reading or validating the variables.
pub fn config_chat_from_env() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_from_env("LLM_PROVIDER")?.unwrap_or(LlmProvider::OpenAI);
    let (endpoint, api_key) = provider_access(provider)?;
    let model = match provider {
        LlmProvider::OpenAI => {
            opt_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string())
        }
        LlmProvider::Ollama => must_env("LLM_MODEL")?,
    };

    let cfg = LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(0.1)),
        top_p: None,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(60)),
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Constructs the **embedding** profile.
///
/// `EMBEDDING_PROVIDER` falls back to `LLM_PROVIDER`, then to OpenAI.
///
/// # Defaults
/// - `temperature = None` (embeddings are deterministic)
/// - `timeout_secs = Some(30)`
///
/// # Errors
/// Any [`ConfigError`], including [`ConfigError::UnsupportedModel`] when the
/// model cannot produce embeddings on the chosen provider.
pub fn config_embedding_from_env() -> Result<LlmModelConfig, AiLlmError> {
    let provider = match provider_from_env("EMBEDDING_PROVIDER")? {
        Some(p) => p,
        None => provider_from_env("LLM_PROVIDER")?.unwrap_or(LlmProvider::OpenAI),
    };
    let (endpoint, api_key) = provider_access(provider)?;

    let cfg = LlmModelConfig {
        provider,
        model: must_env("EMBEDDING_MODEL")?,
        endpoint,
        api_key,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(env_opt_u64("EMBEDDING_TIMEOUT_SECS")?.unwrap_or(30)),
    };
    cfg.validate_for_embeddings()?;
    Ok(cfg)
}
