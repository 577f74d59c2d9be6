//! Change event → decoded record.
//!
//! Decoding is a pure function of the event: the same event always yields
//! the same record. Events of unrecognized kinds and events without a new
//! image yield `None`; a record is only produced from a post-change image.

use crate::error::DecodeError;
use crate::event::{ChangeEvent, Image};
use crate::record::DecodedRecord;
use crate::types::ScalarValue;
use indexmap::IndexMap;
use tracing::debug;

/// Flatten an attribute image into plain scalars.
///
/// Attributes with unsupported tags are dropped.
pub fn decode_image(image: &Image) -> Result<IndexMap<String, ScalarValue>, DecodeError> {
    let mut item = IndexMap::with_capacity(image.len());
    for (name, value) in image {
        match value.decode(name)? {
            Some(scalar) => {
                item.insert(name.clone(), scalar);
            }
            None => debug!(attribute = %name, tag = value.tag(), "dropping unsupported attribute"),
        }
    }
    Ok(item)
}

/// Decode one change event.
///
/// Returns `Ok(None)` when the event contributes nothing to an archive:
/// its kind is unrecognized, or it carries no new image (e.g. a `REMOVE`
/// that only has the old image).
pub fn decode_event(event: &ChangeEvent) -> Result<Option<DecodedRecord>, DecodeError> {
    if !event.kind.is_archivable() {
        return Ok(None);
    }

    let body = event.dynamodb.as_ref().ok_or_else(|| DecodeError::MissingField {
        field: "dynamodb".into(),
    })?;

    let Some(image) = body.new_image.as_ref() else {
        return Ok(None);
    };

    let timestamp = body
        .approximate_creation_date_time
        .clone()
        .ok_or_else(|| DecodeError::MissingField {
            field: "dynamodb.ApproximateCreationDateTime".into(),
        })?;

    Ok(Some(DecodedRecord {
        timestamp,
        item: decode_image(image)?,
    }))
}
