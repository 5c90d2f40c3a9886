//! Serialized placement state
//!
//! A snapshot is an identifier-keyed map of `[x, y]` world positions.
//! No version field is carried here; callers needing forward compatibility
//! wrap the snapshot themselves.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::error::Result;
use crate::core::types::PlaceableId;

/// Identifier -> world position map for save/restore
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementSnapshot {
    pub positions: BTreeMap<PlaceableId, [f32; 2]>,
}

impl PlacementSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
