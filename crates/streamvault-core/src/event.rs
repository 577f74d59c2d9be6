//! Change-feed wire model.
//!
//! Field names follow the stream record JSON delivered to the function:
//! `{"Records": [{"eventName": "INSERT", "dynamodb": {...}}]}`. Fields the
//! archiver has no use for (`Keys`, `OldImage`, `eventSource`, ...) are
//! ignored on deserialization.

use crate::types::AttributeValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An attribute image: attribute name → encoded value, in arrival order.
pub type Image = IndexMap<String, AttributeValue>;

/// The invocation payload: one delivery of change records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamPayload {
    #[serde(rename = "Records", default)]
    pub records: Vec<ChangeEvent>,
}

/// Kind of change a record describes.
///
/// On the wire these are `INSERT` (create), `MODIFY` (update) and `REMOVE`
/// (delete). Anything else lands in `Unrecognized` instead of failing the
/// whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Insert,
    Modify,
    Remove,
    #[serde(other)]
    Unrecognized,
}

impl EventKind {
    /// Whether events of this kind are considered for archiving.
    pub fn is_archivable(&self) -> bool {
        matches!(self, EventKind::Insert | EventKind::Modify | EventKind::Remove)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::Insert => "INSERT",
            EventKind::Modify => "MODIFY",
            EventKind::Remove => "REMOVE",
            EventKind::Unrecognized => "UNRECOGNIZED",
        };
        f.write_str(s)
    }
}

/// A single change-feed notification.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "eventName")]
    pub kind: EventKind,
    /// Delivery id, only used for log context
    #[serde(rename = "eventID", default)]
    pub event_id: Option<String>,
    /// The change body. Required for archivable kinds.
    #[serde(default)]
    pub dynamodb: Option<StreamRecord>,
}

impl ChangeEvent {
    /// Build an event in code (tests, benches, replay tools).
    pub fn new(kind: EventKind, created_at: impl Into<serde_json::Number>, new_image: Option<Image>) -> Self {
        Self {
            kind,
            event_id: None,
            dynamodb: Some(StreamRecord {
                approximate_creation_date_time: Some(created_at.into()),
                sequence_number: None,
                new_image,
            }),
        }
    }

    /// The post-change image, if the record carries one.
    pub fn new_image(&self) -> Option<&Image> {
        self.dynamodb.as_ref().and_then(|d| d.new_image.as_ref())
    }

    /// Shard sequence number, only used for log context.
    pub fn sequence_number(&self) -> Option<&str> {
        self.dynamodb
            .as_ref()
            .and_then(|d| d.sequence_number.as_deref())
    }
}

/// The `dynamodb` body of a change record.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamRecord {
    /// Creation time, seconds since the epoch. Kept as the exact JSON number
    /// that arrived so archives reproduce it verbatim.
    #[serde(rename = "ApproximateCreationDateTime", default)]
    pub approximate_creation_date_time: Option<serde_json::Number>,
    #[serde(rename = "SequenceNumber", default)]
    pub sequence_number: Option<String>,
    #[serde(rename = "NewImage", default)]
    pub new_image: Option<Image>,
}
