//! Builds the bounded context block handed to the model.

use std::collections::HashSet;

use tracing::{debug, info, warn};

/// Literal label prefixed to every non-empty context.
pub const CONTEXT_LABEL: &str = "Context:\n";

#[derive(Clone, Copy, Debug)]
pub struct ContextBuilder {
    max_chars: usize,
}

impl ContextBuilder {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Trims and dedups fragments (first occurrence wins), joins them with a
    /// blank line and hard-cuts the result at `max_chars` chars.
    ///
    /// Empty input returns `""`.
    pub fn build(&self, fragments: &[String]) -> String {
        if fragments.is_empty() {
            warn!("no fragments provided to context builder");
            return String::new();
        }

        let mut seen = HashSet::new();
        let unique: Vec<&str> = fragments
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty() && seen.insert(*f))
            .collect();

        let mut context = unique.join("\n\n");
        if context.chars().count() > self.max_chars {
            info!(max_chars = self.max_chars, "context truncated");
            context = context.chars().take(self.max_chars).collect();
        }

        debug!(fragments = unique.len(), "context built");
        format!("{CONTEXT_LABEL}{context}")
    }
}
