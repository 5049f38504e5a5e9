//! Baseline diffing.
//!
//! The diff is a pure function of `(baseline, current)` and is positional:
//! - `created`: entries of `current` past the baseline length
//! - `updated`: baseline positions still present in `current` whose record
//!   is no longer the *same* record (identity, not content)
//! - `removed`: baseline entries whose position no longer exists in `current`

use crate::types::{Items, Record};
use serde::{Deserialize, Serialize};

/// The three derived change sets of a collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionDiff {
    pub created: Vec<Record>,
    pub updated: Vec<Record>,
    pub removed: Vec<Record>,
}

impl CollectionDiff {
    /// True if any of the change sets is non-empty.
    pub fn is_dirty(&self) -> bool {
        !self.created.is_empty() || !self.updated.is_empty() || !self.removed.is_empty()
    }
}

/// Compute the diff of `current` against `baseline`.
pub fn compute_diff(baseline: &Items, current: &Items) -> CollectionDiff {
    CollectionDiff {
        created: created_items(baseline, current),
        updated: updated_items(baseline, current),
        removed: removed_items(baseline, current),
    }
}

/// Entries of `current` beyond the baseline length, in order.
pub fn created_items(baseline: &Items, current: &Items) -> Vec<Record> {
    current.iter().skip(baseline.len()).cloned().collect()
}

/// Current entries at baseline positions that differ by identity.
pub fn updated_items(baseline: &Items, current: &Items) -> Vec<Record> {
    baseline
        .iter()
        .zip(current.iter())
        .filter(|(original, now)| !original.ptr_eq(now))
        .map(|(_, now)| now.clone())
        .collect()
}

/// Baseline entries whose position is past the end of `current`.
pub fn removed_items(baseline: &Items, current: &Items) -> Vec<Record> {
    baseline.iter().skip(current.len()).cloned().collect()
}
