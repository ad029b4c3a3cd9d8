//! Core data models exchanged with the vector store.

use serde::{Deserialize, Serialize};

/// Exact-match condition on a payload field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMatch {
    pub key: String,
    pub value: String,
}

impl FieldMatch {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Structured search predicate.
///
/// `must` conditions are hard constraints. `should` conditions are a
/// preference: matching points rank first, but the search still falls back
/// to points that satisfy `must` alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataFilter {
    pub must: Vec<FieldMatch>,
    pub should: Vec<FieldMatch>,
}

impl MetadataFilter {
    /// `true` when no condition at all is present.
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.should.is_empty()
    }

    /// `true` when `payload` satisfies every `must` condition.
    pub fn matches_required(&self, payload: &serde_json::Value) -> bool {
        self.must.iter().all(|c| field_equals(payload, c))
    }

    /// `true` when `payload` satisfies at least one `should` condition.
    pub fn matches_preferred(&self, payload: &serde_json::Value) -> bool {
        self.should.iter().any(|c| field_equals(payload, c))
    }
}

fn field_equals(payload: &serde_json::Value, cond: &FieldMatch) -> bool {
    payload.get(&cond.key).and_then(|v| v.as_str()) == Some(cond.value.as_str())
}

/// Metadata stored next to each chunk vector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointPayload {
    pub text: String,
    pub airline: String,
    pub locale: String,
    pub policy_version: String,
    pub doc_id: String,
    pub chunk_id: u32,
    pub source: String,
    /// Hex SHA-256 of `text`.
    pub sha256: String,
}

/// A point ready to be upserted.
#[derive(Clone, Debug)]
pub struct IndexPoint {
    /// Stable UUID string.
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: PointPayload,
}

/// A search hit, ordered by descending `score`.
#[derive(Clone, Debug)]
pub struct ScoredPoint {
    pub id: String,
    pub score: f32,
    pub payload: serde_json::Value,
}

impl ScoredPoint {
    /// Text stored in the payload, or `""` for malformed points.
    pub fn text(&self) -> &str {
        self.payload
            .get("text")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_and_preferred_are_checked_separately() {
        let filter = MetadataFilter {
            must: vec![FieldMatch::new("airline", "Delta")],
            should: vec![FieldMatch::new("policy_version", "2025-10-01")],
        };
        let old = json!({"airline": "Delta", "policy_version": "2024-01-01"});
        assert!(filter.matches_required(&old));
        assert!(!filter.matches_preferred(&old));

        let other = json!({"airline": "United", "policy_version": "2025-10-01"});
        assert!(!filter.matches_required(&other));
    }

    #[test]
    fn missing_text_reads_as_empty() {
        let hit = ScoredPoint {
            id: "x".into(),
            score: 0.4,
            payload: json!({"airline": "Delta"}),
        };
        assert_eq!(hit.text(), "");
    }
}
