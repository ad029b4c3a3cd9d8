//! Prompt template for airline policy answers.
//!
//! Section order is fixed: system instructions, optional history, context,
//! question, answer cue.

use crate::context_builder::CONTEXT_LABEL;

pub const SYSTEM_PROMPT: &str = "You are a helpful airline travel assistant. Answer questions
about airline policies using only the provided context. Be clear, accurate,
and helpful. If conversation history is provided, consider it as context for
understanding follow-up questions.";

/// Returned to the user whenever the generation provider fails.
pub const FALLBACK_ANSWER: &str =
    "I apologize, but I'm unable to process your question right now. Please try again later.";

/// Builds the final prompt.
///
/// `context` is the labelled string from the context builder; an empty one is
/// rendered as the bare label. `history` is omitted when blank.
pub fn build_rag_prompt(question: &str, context: &str, history: Option<&str>) -> String {
    let mut out = String::with_capacity(SYSTEM_PROMPT.len() + context.len() + question.len() + 64);
    out.push_str(SYSTEM_PROMPT);
    out.push_str("\n\n");

    if let Some(h) = history.map(str::trim).filter(|h| !h.is_empty()) {
        out.push_str("Previous conversation:\n");
        out.push_str(h);
        out.push_str("\n\n");
    }

    if context.is_empty() {
        out.push_str(CONTEXT_LABEL);
    } else {
        out.push_str(context);
    }

    out.push_str("\n\nQuestion: ");
    out.push_str(question.trim());
    out.push_str("\n\nAnswer:");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_appear_in_fixed_order() {
        let p = build_rag_prompt(
            "And for infants?",
            "Context:\nInfants under 2 fly free on lap.",
            Some("User: Baggage for kids?\nAssistant: One bag."),
        );
        let sys = p.find("helpful airline travel assistant").unwrap();
        let hist = p.find("Previous conversation:\nUser: Baggage").unwrap();
        let ctx = p.find("Context:\nInfants").unwrap();
        let q = p.find("Question: And for infants?").unwrap();
        let a = p.rfind("Answer:").unwrap();
        assert!(sys < hist && hist < ctx && ctx < q && q < a);
        assert!(p.ends_with("Answer:"));
    }

    #[test]
    fn no_history_section_without_history() {
        let p = build_rag_prompt("q", "Context:\nc", None);
        assert!(!p.contains("Previous conversation"));
        let p = build_rag_prompt("q", "Context:\nc", Some("   "));
        assert!(!p.contains("Previous conversation"));
    }

    #[test]
    fn golden_prompt_without_context() {
        let p = build_rag_prompt("Can I bring a stroller?", "", None);
        let expected = format!(
            "{SYSTEM_PROMPT}\n\nContext:\n\n\nQuestion: Can I bring a stroller?\n\nAnswer:"
        );
        assert_eq!(p, expected);
    }
}
