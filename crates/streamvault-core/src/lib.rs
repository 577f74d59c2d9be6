//! # streamvault-core
//!
//! Core types shared across all streamvault crates: the change-feed wire
//! model, the tagged attribute-value encoding and its decoder, the decoded
//! record that ends up in an archive, and the error types of every stage.

pub mod decoder;
pub mod error;
pub mod event;
pub mod record;
pub mod types;

pub use decoder::{decode_event, decode_image};
pub use error::{ArchiveError, ConfigError, DecodeError, StorageError};
pub use event::{ChangeEvent, EventKind, Image, StreamPayload, StreamRecord};
pub use record::DecodedRecord;
pub use types::{AttributeValue, ScalarValue};
