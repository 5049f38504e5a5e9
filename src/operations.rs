//! Collection operation application.

use crate::error::{CollectionError, Result};
use crate::types::{Items, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A mutation of the current sequence.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CollectionOperation {
    /// Append records to the end, in order.
    Create { records: Vec<Record> },

    /// Remove the record at `index`; later records shift down by one.
    Remove { index: usize },

    /// Replace the record at `index` with a copy whose `field` is `value`.
    Update {
        index: usize,
        field: String,
        value: Value,
    },

    /// Discard all mutations and return to the baseline.
    Reset,
}

impl CollectionOperation {
    /// Short name used in logs and events.
    pub fn name(&self) -> &'static str {
        match self {
            CollectionOperation::Create { .. } => "create",
            CollectionOperation::Remove { .. } => "remove",
            CollectionOperation::Update { .. } => "update",
            CollectionOperation::Reset => "reset",
        }
    }
}

impl fmt::Display for CollectionOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionOperation::Create { records } => write!(f, "create({})", records.len()),
            CollectionOperation::Remove { index } => write!(f, "remove({index})"),
            CollectionOperation::Update { index, field, .. } => {
                write!(f, "update({index}, {field:?})")
            }
            CollectionOperation::Reset => write!(f, "reset"),
        }
    }
}

/// Apply an operation to the current sequence, producing the next one.
///
/// `current` is never modified. On error no new sequence is produced.
/// Records not touched by the operation keep their identity.
pub fn apply_operation(
    current: &Items,
    baseline: &Items,
    operation: CollectionOperation,
) -> Result<Items> {
    match operation {
        CollectionOperation::Create { records } => {
            let mut next = Vec::with_capacity(current.len() + records.len());
            next.extend_from_slice(current);
            next.extend(records);
            Ok(next.into())
        }

        CollectionOperation::Remove { index } => {
            check_index(current, index)?;

            let mut next = current.to_vec();
            next.remove(index);
            Ok(next.into())
        }

        CollectionOperation::Update {
            index,
            field,
            value,
        } => {
            check_index(current, index)?;

            let mut next = current.to_vec();
            next[index] = current[index].with_field(field, value);
            Ok(next.into())
        }

        // A fresh sequence holding the baseline's records, so the baseline
        // itself is never installed into the cell.
        CollectionOperation::Reset => Ok(Items::from(baseline.to_vec())),
    }
}

fn check_index(items: &Items, index: usize) -> Result<()> {
    if index >= items.len() {
        return Err(CollectionError::OutOfBounds {
            index,
            len: items.len(),
        });
    }
    Ok(())
}
