//! Generation orchestrator: prompt assembly plus fallback on provider failure.

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use futures::future::BoxFuture;
use tracing::{error, info};

use crate::error::GenerationError;
use crate::prompt::{FALLBACK_ANSWER, build_rag_prompt};

/// Text-generation provider seam.
pub trait TextGenerator: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, GenerationError>>;
}

/// [`TextGenerator`] over the `chat` profile of [`LlmServiceProfiles`].
pub struct LlmGenerator {
    svc: Arc<LlmServiceProfiles>,
}

impl LlmGenerator {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl TextGenerator for LlmGenerator {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, GenerationError>> {
        Box::pin(async move {
            self.svc
                .generate(prompt, None)
                .await
                .map_err(|e| GenerationError(e.to_string()))
        })
    }
}

pub struct AnswerGenerator {
    llm: Arc<dyn TextGenerator>,
}

impl AnswerGenerator {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    /// Never fails: provider errors are logged and replaced by [`FALLBACK_ANSWER`].
    pub async fn generate(&self, question: &str, context: &str, history: Option<&str>) -> String {
        let prompt = build_rag_prompt(question, context, history);
        match self.llm.generate(&prompt).await {
            Ok(answer) => {
                info!(answer_len = answer.len(), "answer generated");
                answer
            }
            Err(e) => {
                error!(error = %e, "generation failed, returning fallback answer");
                FALLBACK_ANSWER.to_string()
            }
        }
    }
}
