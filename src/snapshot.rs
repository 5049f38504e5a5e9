//! Serializable snapshots of a collection, for debugging and hand-off.

use crate::diff::CollectionDiff;
use crate::error::{CollectionError, Result};
use crate::types::{Items, Version};
use serde::{Deserialize, Serialize};

/// The full observable state of a manager at one version.
///
/// Decoding a snapshot yields fresh records, so record identity is not
/// preserved across encode/decode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    pub version: Version,
    pub baseline: Items,
    pub items: Items,
    pub diff: CollectionDiff,
    pub dirty: bool,
}

impl CollectionSnapshot {
    /// Encode as JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode from JSON.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| CollectionError::Deserialization(e.to_string()))
    }

    /// Encode as MessagePack (struct fields as map keys).
    pub fn to_msgpack(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// Decode from MessagePack.
    pub fn from_msgpack(bytes: &[u8]) -> Result<Self> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}
