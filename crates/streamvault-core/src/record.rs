//! The decoded record: one element of an archive object.

use crate::types::ScalarValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A flattened change event: `{"timestamp": ..., "item": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedRecord {
    /// Event creation time (seconds since epoch) as it arrived
    pub timestamp: serde_json::Number,
    /// Attribute name → plain scalar, in the order the attributes arrived
    pub item: IndexMap<String, ScalarValue>,
}

impl DecodedRecord {
    /// Get an attribute by name.
    pub fn get(&self, name: &str) -> Option<&ScalarValue> {
        self.item.get(name)
    }

    /// Creation time as fractional seconds.
    pub fn timestamp_secs(&self) -> Option<f64> {
        self.timestamp.as_f64()
    }
}
