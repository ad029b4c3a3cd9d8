//! Per-request question answering: memory → retrieve → context → generate → memory.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::context_builder::ContextBuilder;
use crate::error::RetrievalError;
use crate::generation::AnswerGenerator;
use crate::memory::{ConversationMemory, ConversationTurn, format_history};
use crate::query::MetadataQuery;
use crate::retriever::Retriever;

#[derive(Clone, Debug, Deserialize)]
pub struct AskInput {
    pub question: String,
    pub airline: String,
    pub locale: String,
    #[serde(default)]
    pub policy_version: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QaAnswer {
    pub question: String,
    pub context: String,
    pub answer: String,
}

/// Services wired once at start-up and shared by every request.
pub struct PolicyAssistant {
    retriever: Arc<Retriever>,
    context: ContextBuilder,
    generator: Arc<AnswerGenerator>,
    memory: Arc<ConversationMemory>,
}

impl PolicyAssistant {
    pub fn new(
        retriever: Arc<Retriever>,
        context: ContextBuilder,
        generator: Arc<AnswerGenerator>,
        memory: Arc<ConversationMemory>,
    ) -> Self {
        Self {
            retriever,
            context,
            generator,
            memory,
        }
    }

    pub fn memory(&self) -> &Arc<ConversationMemory> {
        &self.memory
    }

    /// Answers one question.
    ///
    /// Only retrieval can fail; in that case the session is left untouched.
    /// Without a `session_id` memory is neither read nor written.
    #[instrument(skip_all, fields(airline = %input.airline, locale = %input.locale))]
    pub async fn ask(&self, input: AskInput) -> Result<QaAnswer, RetrievalError> {
        let session = input.session_id.as_deref().filter(|s| !s.trim().is_empty());

        let history = match session {
            Some(id) => format_history(&self.memory.get(id, None).await),
            None => String::new(),
        };

        let query = MetadataQuery::new(
            input.airline.clone(),
            input.locale.clone(),
            input.policy_version.clone(),
        );
        let fragments = self.retriever.retrieve(&input.question, &query).await?;
        info!(fragments = fragments.len(), "fragments retrieved");

        let context = self.context.build(&fragments);
        let answer = self
            .generator
            .generate(&input.question, &context, Some(history.as_str()))
            .await;

        if let Some(id) = session {
            self.memory
                .append(id, ConversationTurn::user(input.question.clone()))
                .await;
            self.memory
                .append(id, ConversationTurn::assistant(answer.clone()))
                .await;
        }

        Ok(QaAnswer {
            question: input.question,
            context,
            answer,
        })
    }
}
