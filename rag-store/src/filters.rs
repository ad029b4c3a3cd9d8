//! Filter conversion to Qdrant `Filter` and ranking merge for soft preferences.
//!
//! Qdrant reads a non-empty `should` list as "at least one must match", so a
//! preference is executed as two searches: preferred (must + should as
//! required) and fallback (must only). [`merge_ranked`] combines them.

use std::collections::HashSet;

use qdrant_client::qdrant::{Condition, Filter};
use tracing::trace;

use crate::record::{FieldMatch, MetadataFilter, ScoredPoint};

fn to_conditions(list: &[FieldMatch]) -> Vec<Condition> {
    list.iter()
        .map(|c| Condition::matches(c.key.clone(), c.value.clone()))
        .collect()
}

/// Hard constraints only (`must`).
pub fn required_filter(f: &MetadataFilter) -> Filter {
    Filter {
        must: to_conditions(&f.must),
        ..Default::default()
    }
}

/// `must` plus every `should` condition turned into a requirement.
///
/// Returns `None` when there is no preference to apply.
pub fn preferred_filter(f: &MetadataFilter) -> Option<Filter> {
    if f.should.is_empty() {
        return None;
    }
    trace!(must = f.must.len(), should = f.should.len(), "preferred filter");
    Some(Filter {
        must: to_conditions(&f.must),
        should: to_conditions(&f.should),
        ..Default::default()
    })
}

/// Appends `fallback` hits not already present in `preferred` until `top_k`.
///
/// Preferred hits always come first and keep their relative order.
pub fn merge_ranked(
    preferred: Vec<ScoredPoint>,
    fallback: Vec<ScoredPoint>,
    top_k: usize,
) -> Vec<ScoredPoint> {
    let mut seen: HashSet<String> = preferred.iter().map(|p| p.id.clone()).collect();
    let mut out = preferred;
    out.truncate(top_k);
    for hit in fallback {
        if out.len() >= top_k {
            break;
        }
        if seen.insert(hit.id.clone()) {
            out.push(hit);
        }
    }
    out
}
