use rag_pipeline::{AskInput, QaAnswer};
use serde::{Deserialize, Serialize};

use crate::error_handler::AppError;

/// Request payload for /ask.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question.
    pub question: String,
    /// Airline whose policies are searched, e.g. "Delta".
    pub airline: String,
    /// Document locale, e.g. "en-US".
    pub locale: String,
    /// Preferred policy version; other versions still match.
    #[serde(default)]
    pub policy_version: Option<String>,
    /// Conversation session. Without it the request is stateless.
    #[serde(default)]
    pub session_id: Option<String>,
}

impl AskRequest {
    /// Rejects blank required fields and trims everything.
    pub fn into_input(self) -> Result<AskInput, AppError> {
        let question = required("question", self.question)?;
        let airline = required("airline", self.airline)?;
        let locale = required("locale", self.locale)?;
        Ok(AskInput {
            question,
            airline,
            locale,
            policy_version: optional(self.policy_version),
            session_id: optional(self.session_id),
        })
    }
}

fn required(field: &str, value: String) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Response payload for /ask.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub question: String,
    /// Labelled context block the answer was generated from.
    pub context: String,
    pub answer: String,
}

impl From<QaAnswer> for AskResponse {
    fn from(qa: QaAnswer) -> Self {
        Self {
            question: qa.question,
            context: qa.context,
            answer: qa.answer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(question: &str, airline: &str, locale: &str) -> AskRequest {
        AskRequest {
            question: question.into(),
            airline: airline.into(),
            locale: locale.into(),
            policy_version: Some("  ".into()),
            session_id: Some(" s1 ".into()),
        }
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        for (q, a, l, field) in [
            ("  ", "Delta", "en-US", "question"),
            ("Bags?", "", "en-US", "airline"),
            ("Bags?", "Delta", "\t", "locale"),
        ] {
            match request(q, a, l).into_input() {
                Err(AppError::BadRequest(msg)) => assert_eq!(msg, format!("{field} must not be empty")),
                other => panic!("expected BadRequest, got {other:?}"),
            }
        }
    }

    #[test]
    fn optional_fields_are_trimmed_or_dropped() {
        let input = request(" Bags? ", "Delta", "en-US").into_input().unwrap();
        assert_eq!(input.question, "Bags?");
        assert_eq!(input.policy_version, None);
        assert_eq!(input.session_id.as_deref(), Some("s1"));
    }
}
