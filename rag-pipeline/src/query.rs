//! Metadata query builder.

use rag_store::{FieldMatch, MetadataFilter};
use serde::{Deserialize, Serialize};

/// Anything that can produce a search filter.
pub trait QueryFilter: Send + Sync {
    fn build(&self) -> MetadataFilter;
}

/// `airline` + `locale` are required matches; `policy_version` is only a preference.
///
/// Values are not validated: an unknown airline simply matches nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataQuery {
    pub airline: String,
    pub locale: String,
    #[serde(default)]
    pub policy_version: Option<String>,
}

impl MetadataQuery {
    pub fn new(
        airline: impl Into<String>,
        locale: impl Into<String>,
        policy_version: Option<String>,
    ) -> Self {
        Self {
            airline: airline.into(),
            locale: locale.into(),
            policy_version,
        }
    }
}

impl QueryFilter for MetadataQuery {
    fn build(&self) -> MetadataFilter {
        let should = self
            .policy_version
            .iter()
            .map(|v| FieldMatch::new("policy_version", v.clone()))
            .collect();
        MetadataFilter {
            must: vec![
                FieldMatch::new("airline", self.airline.clone()),
                FieldMatch::new("locale", self.locale.clone()),
            ],
            should,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn airline_and_locale_are_always_required() {
        let f = MetadataQuery::new("Delta", "en-US", None).build();
        assert_eq!(
            f.must,
            vec![
                FieldMatch::new("airline", "Delta"),
                FieldMatch::new("locale", "en-US")
            ]
        );
        assert!(f.should.is_empty());
    }

    #[test]
    fn version_is_preferred_never_required() {
        let f = MetadataQuery::new("Delta", "en-US", Some("2025-10-01".into())).build();
        assert_eq!(f.should, vec![FieldMatch::new("policy_version", "2025-10-01")]);
        assert!(f.must.iter().all(|c| c.key != "policy_version"));
    }

    #[test]
    fn build_is_deterministic() {
        let q = MetadataQuery::new("United", "es-MX", Some("v2".into()));
        assert_eq!(q.build(), q.build());
    }
}
