//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library, with configuration problems grouped in [`ConfigError`]. Small helpers
//! for reading/validating environment variables return the unified [`Result<T>`].
//!
//! All messages include the suffix `[AI LLM Service]` to simplify attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
///
/// [`AiLlmError::Config`] is raised before any request leaves the process
/// (missing credential, unsupported model, bad endpoint). Every other variant
/// means the provider call itself failed.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup/readiness).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Underlying HTTP transport error (connect, timeout, TLS).
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Upstream returned a non-successful HTTP status.
    #[error("[AI LLM Service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("[AI LLM Service] decode error: {0}")]
    Decode(String),

    /// Provider answered successfully but returned nothing usable.
    #[error("[AI LLM Service] provider returned an empty response")]
    EmptyResponse,
}

impl AiLlmError {
    /// `true` when the error stems from configuration rather than a provider call.
    pub fn is_config(&self) -> bool {
        matches!(self, AiLlmError::Config(_))
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
///
/// Keep this focused: only errors that realistically happen at config
/// load/validation time.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[AI LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_MAX_TOKENS`, `OLLAMA_PORT`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Unsupported provider in `LLM_PROVIDER` / `EMBEDDING_PROVIDER`.
    #[error("[AI LLM Service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable or field name (e.g., `OLLAMA_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `temperature`).
        field: &'static str,
        /// Description of the expected range.
        detail: &'static str,
    },

    /// Model name was empty.
    #[error("[AI LLM Service] model name must not be empty")]
    EmptyModel,

    /// The provider requires an API key and none was configured.
    #[error("[AI LLM Service] missing API key for provider {0}")]
    MissingApiKey(&'static str),

    /// The model name is not usable for the requested role.
    #[error("[AI LLM Service] unsupported model '{model}' for {role}")]
    UnsupportedModel {
        /// Offending model identifier.
        model: String,
        /// Role the model was configured for (e.g., `embeddings`).
        role: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// Returns [`AiLlmError::Config`] with [`ConfigError::MissingVar`] if the
/// variable is absent or empty.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Reads an optional, non-empty environment variable.
pub fn opt_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a valid `u32`.
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    match opt_env(name) {
        Some(v) => v.trim().parse::<u32>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        None => Ok(None),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match opt_env(name) {
        Some(v) => v.trim().parse::<u64>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        None => Ok(None),
    }
}

/// Parses an optional `f32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a valid `f32`.
pub fn env_opt_f32(name: &'static str) -> Result<Option<f32>> {
    match opt_env(name) {
        Some(v) => v.trim().parse::<f32>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected f32",
            })
        }),
        None => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers (return unified `Result<T>`)                           */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start with
/// a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// # Errors
/// Returns [`ConfigError::OutOfRange`] if `value` is outside `[min, max]`.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}

/// Cuts an upstream body down to a log-friendly snippet.
pub fn make_snippet(body: &str) -> String {
    body.trim().chars().take(240).collect()
}
