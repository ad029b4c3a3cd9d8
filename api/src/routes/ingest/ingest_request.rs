use rag_pipeline::is_valid_airline;
use serde::Deserialize;

use crate::{core::app_state::IngestDefaults, error_handler::AppError};

/// Request payload for /ingest. Every field falls back to the server config.
#[derive(Debug, Default, Deserialize)]
pub struct IngestRequest {
    #[serde(default)]
    pub airlines: Option<Vec<String>>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub policy_version: Option<String>,
}

/// Resolved ingestion job.
#[derive(Debug, PartialEq, Eq)]
pub struct IngestJob {
    pub airlines: Vec<String>,
    pub locale: String,
    pub policy_version: String,
}

impl IngestRequest {
    /// Fills omitted fields from `defaults`. Airline names must be plain
    /// folder names inside the policies directory.
    pub fn resolve(self, defaults: &IngestDefaults) -> Result<IngestJob, AppError> {
        let airlines = self
            .airlines
            .map(|list| {
                list.into_iter()
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| defaults.airlines.clone());

        if let Some(bad) = airlines.iter().find(|a| !is_valid_airline(a)) {
            return Err(AppError::BadRequest(format!(
                "invalid airline name: {bad:?}"
            )));
        }

        Ok(IngestJob {
            airlines,
            locale: non_blank(self.locale).unwrap_or_else(|| defaults.locale.clone()),
            policy_version: non_blank(self.policy_version)
                .unwrap_or_else(|| defaults.policy_version.clone()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
