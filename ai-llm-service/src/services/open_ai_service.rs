//! OpenAI-compatible service for chat completions and embeddings.
//!
//! Works against api.openai.com as well as LiteLLM-style proxies that mirror
//! the same REST surface. Endpoints are derived from `LlmModelConfig::endpoint`:
//! - POST {endpoint}/v1/chat/completions
//! - POST {endpoint}/v1/embeddings
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::OpenAI`
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError, Result, make_snippet},
};

/// Thin client for the OpenAI API.
///
/// Keeps a preconfigured `reqwest::Client` (timeout + bearer header).
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embeddings: String,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::UnsupportedProvider`] if `cfg.provider` is not OpenAI
    /// - [`ConfigError::MissingApiKey`] if `cfg.api_key` is `None`
    /// - [`ConfigError::InvalidFormat`] if the endpoint or key cannot be used
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::OpenAI {
            return Err(ConfigError::UnsupportedProvider(cfg.provider.as_str().into()).into());
        }
        cfg.validate()?;
        let api_key = cfg
            .api_key
            .clone()
            .ok_or(ConfigError::MissingApiKey("openai"))?;

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(60));

        let mut headers = header::HeaderMap::new();
        let bearer = header::HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
            ConfigError::InvalidFormat {
                var: "OPENAI_API_KEY",
                reason: "not a valid HTTP header value",
            }
        })?;
        headers.insert(header::AUTHORIZATION, bearer);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = cfg.endpoint.trim().trim_end_matches('/').to_string();
        let url_chat = format!("{base}/v1/chat/completions");
        let url_embeddings = format!("{base}/v1/embeddings");

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
            url_embeddings,
        })
    }

    /// Performs a **non-streaming** chat completion.
    ///
    /// Messages: optional system message, then the user `prompt`.
    ///
    /// # Errors
    /// - [`AiLlmError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`AiLlmError::Decode`] if the JSON cannot be parsed
    /// - [`AiLlmError::EmptyResponse`] if no choice carries content
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, prompt, system);

        debug!(
            prompt_len = prompt.len(),
            has_system = system.is_some(),
            "POST {}", self.url_chat
        );
        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "OpenAI /v1/chat/completions returned non-success status"
            );
            return Err(AiLlmError::HttpStatus {
                status,
                url,
                snippet,
            });
        }

        let out: ChatCompletionResponse = resp.json().await.map_err(|e| {
            AiLlmError::Decode(format!(
                "serde error: {e}; expected `choices[0].message.content`"
            ))
        })?;

        let content = first_content(out).ok_or(AiLlmError::EmptyResponse)?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            "chat completion completed"
        );
        Ok(content)
    }

    /// Embeds all `inputs` in one `/v1/embeddings` call.
    ///
    /// Items are re-ordered by their `index` field so the output lines up with
    /// `inputs`.
    ///
    /// # Errors
    /// - [`AiLlmError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`AiLlmError::Decode`] if the JSON cannot be parsed
    #[instrument(skip_all, fields(model = %self.cfg.model, batch = inputs.len()))]
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let started = Instant::now();
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input: inputs,
        };

        debug!("POST {}", self.url_embeddings);
        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embeddings.clone();
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "OpenAI /v1/embeddings returned non-success status"
            );
            return Err(AiLlmError::HttpStatus {
                status,
                url,
                snippet,
            });
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            AiLlmError::Decode(format!("serde error: {e}; expected `data[].embedding`"))
        })?;
        let vectors = ordered_vectors(out);

        debug!(
            latency_ms = started.elapsed().as_millis(),
            vectors = vectors.len(),
            "embeddings completed"
        );
        Ok(vectors)
    }

    /// Embeds a single text.
    ///
    /// # Errors
    /// Same as [`OpenAiService::embed_batch`], plus [`AiLlmError::EmptyResponse`].
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[input.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(AiLlmError::EmptyResponse)
    }
}

fn first_content(out: ChatCompletionResponse) -> Option<String> {
    out.choices
        .into_iter()
        .find_map(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn ordered_vectors(out: EmbeddingsResponse) -> Vec<Vec<f32>> {
    let mut data = out.data;
    data.sort_by_key(|item| item.index);
    data.into_iter().map(|item| item.embedding).collect()
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str, system: Option<&'a str>) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = system {
            messages.push(ChatMessage {
                role: "system",
                content: sys,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        Self {
            model: &cfg.model,
            messages,
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_tokens: cfg.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}
