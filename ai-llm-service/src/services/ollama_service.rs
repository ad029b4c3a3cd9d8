//! Lightweight Ollama service for text generation and embeddings.
//!
//! This module implements a thin client for the local Ollama API:
//! - `POST {endpoint}/api/generate`: synchronous text generation (`stream=false`)
//! - `POST {endpoint}/api/embed`: batch embeddings (`input` is an array)
//!
//! It uses the universal configuration [`LlmModelConfig`] and ensures
//! that the selected provider is [`LlmProvider::Ollama`].
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::{LlmModelConfig, LlmProvider};
//! use ai_llm_service::services::ollama_service::OllamaService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = LlmModelConfig {
//!     provider: LlmProvider::Ollama,
//!     model: "bge-m3".into(),
//!     endpoint: "http://localhost:11434".into(),
//!     api_key: None,
//!     max_tokens: None,
//!     temperature: None,
//!     top_p: None,
//!     timeout_secs: Some(30),
//! };
//!
//! let svc = OllamaService::new(cfg)?;
//! let vectors = svc.embed_batch(&["Checked bag fees".to_string()]).await?;
//! println!("Embeddings dimension = {}", vectors[0].len());
//! # Ok(()) }
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::{AiLlmError, ConfigError, Result, make_snippet};

/// Thin client for Ollama.
///
/// Initialized with a full [`LlmModelConfig`]. Reuses an HTTP client with
/// a configurable timeout.
#[derive(Debug)]
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
    url_embed: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::UnsupportedProvider`] if `cfg.provider` is not Ollama
    /// - any validation error from [`LlmModelConfig::validate`]
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(ConfigError::UnsupportedProvider(cfg.provider.as_str().into()).into());
        }
        cfg.validate()?;

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(60));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        let base = cfg.endpoint.trim().trim_end_matches('/').to_string();
        let url_generate = format!("{base}/api/generate");
        let url_embed = format!("{base}/api/embed");

        Ok(Self {
            client,
            cfg,
            url_generate,
            url_embed,
        })
    }

    /// Performs a **non-streaming** generation request via `/api/generate`.
    ///
    /// Mapped options:
    /// - `model`        ← `self.cfg.model`
    /// - `system`       ← `system` argument (if any)
    /// - `num_predict`  ← `self.cfg.max_tokens`
    /// - `temperature`  ← `self.cfg.temperature`
    /// - `top_p`        ← `self.cfg.top_p`
    ///
    /// # Errors
    /// - [`AiLlmError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client errors
    /// - [`AiLlmError::Decode`] if response cannot be parsed
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let started = Instant::now();
        let body = GenerateRequest::from_cfg(&self.cfg, prompt, system);

        debug!(prompt_len = prompt.len(), "POST {}", self.url_generate);
        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_generate.clone();
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            error!(%status, %url, %snippet, "Ollama /api/generate returned non-success status");
            return Err(AiLlmError::HttpStatus {
                status,
                url,
                snippet,
            });
        }

        let out: GenerateResponse = resp.json().await.map_err(|e| {
            AiLlmError::Decode(format!("serde error: {e}; ensure `stream=false` is used"))
        })?;

        debug!(
            latency_ms = started.elapsed().as_millis(),
            answer_len = out.response.len(),
            "generation completed"
        );
        Ok(out.response.trim().to_string())
    }

    /// Embeds all `inputs` in a single `/api/embed` call.
    ///
    /// The returned vectors follow the order of `inputs`.
    ///
    /// # Errors
    /// - [`AiLlmError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client errors
    /// - [`AiLlmError::Decode`] if response cannot be parsed
    #[instrument(skip_all, fields(model = %self.cfg.model, batch = inputs.len()))]
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let started = Instant::now();
        let body = EmbedRequest {
            model: &self.cfg.model,
            input: inputs,
        };

        debug!("POST {}", self.url_embed);
        let resp = self.client.post(&self.url_embed).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embed.clone();
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            error!(%status, %url, %snippet, "Ollama /api/embed returned non-success status");
            return Err(AiLlmError::HttpStatus {
                status,
                url,
                snippet,
            });
        }

        let out: EmbedResponse = resp.json().await.map_err(|e| {
            AiLlmError::Decode(format!(
                "serde error: {e}; expected `{{ embeddings: number[][] }}`"
            ))
        })?;

        debug!(
            latency_ms = started.elapsed().as_millis(),
            vectors = out.embeddings.len(),
            "embeddings completed"
        );
        Ok(out.embeddings)
    }

    /// Embeds a single text.
    ///
    /// # Errors
    /// Same as [`OllamaService::embed_batch`], plus [`AiLlmError::EmptyResponse`]
    /// when no vector comes back.
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[input.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(AiLlmError::EmptyResponse)
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/api/generate` (non-streaming).
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

impl<'a> GenerateRequest<'a> {
    /// Builds a request from config and prompt.
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str, system: Option<&'a str>) -> Self {
        let options = GenerateOptions {
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            num_predict: cfg.max_tokens,
        };

        Self {
            model: &cfg.model,
            prompt,
            system,
            stream: false,
            options: Some(options),
        }
    }
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Response body for `/api/generate`.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Request body for `/api/embed`.
#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

/// Response body for `/api/embed`.
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}
