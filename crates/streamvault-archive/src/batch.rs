//! Decoded records of one invocation, in arrival order.

use serde::Serialize;
use streamvault_core::{decode_event, ChangeEvent, DecodeError, DecodedRecord};
use tracing::debug;

/// Per-batch counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    /// Events handed to the batch
    pub events_seen: usize,
    /// Events of an archivable kind
    pub events_admitted: usize,
    /// Events skipped because their kind is not create / update / delete
    pub unrecognized: usize,
    /// Admitted events that carried no new image
    pub without_image: usize,
}

/// Decoded records accumulated within one invocation.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    records: Vec<DecodedRecord>,
    stats: BatchStats,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every event in order. The first malformed event aborts.
    pub fn from_events<'a>(
        events: impl IntoIterator<Item = &'a ChangeEvent>,
    ) -> Result<Self, DecodeError> {
        let mut batch = Self::new();
        for event in events {
            batch.push_event(event)?;
        }
        Ok(batch)
    }

    /// Decode one event and append its record, if it produces one.
    /// Returns whether a record was appended.
    pub fn push_event(&mut self, event: &ChangeEvent) -> Result<bool, DecodeError> {
        self.stats.events_seen += 1;

        if !event.kind.is_archivable() {
            self.stats.unrecognized += 1;
            debug!(
                event_id = ?event.event_id,
                sequence = ?event.sequence_number(),
                "skipping event of unrecognized kind"
            );
            return Ok(false);
        }
        self.stats.events_admitted += 1;

        match decode_event(event)? {
            Some(record) => {
                self.records.push(record);
                Ok(true)
            }
            None => {
                self.stats.without_image += 1;
                debug!(
                    event_id = ?event.event_id,
                    sequence = ?event.sequence_number(),
                    kind = %event.kind,
                    "event has no new image, nothing to archive"
                );
                Ok(false)
            }
        }
    }

    pub fn records(&self) -> &[DecodedRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DecodedRecord> {
        self.records
    }

    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamvault_core::StreamPayload;

    fn payload(json: &str) -> StreamPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn preserves_arrival_order_and_counts_skips() {
        let p = payload(
            r#"{"Records":[
                {"eventName":"INSERT","dynamodb":{"ApproximateCreationDateTime":1,"NewImage":{"seq":{"N":"1"}}}},
                {"eventName":"REMOVE","dynamodb":{"ApproximateCreationDateTime":2,"OldImage":{"seq":{"N":"0"}}}},
                {"eventName":"BOGUS"},
                {"eventName":"MODIFY","dynamodb":{"ApproximateCreationDateTime":3,"NewImage":{"seq":{"N":"2"}}}},
                {"eventName":"REMOVE","dynamodb":{"ApproximateCreationDateTime":4,"NewImage":{"seq":{"N":"3"}}}}
            ]}"#,
        );
        let batch = Batch::from_events(&p.records).unwrap();
        let seqs: Vec<_> = batch
            .records()
            .iter()
            .map(|r| r.get("seq").and_then(|v| v.as_i64()).unwrap())
            .collect();
        assert_eq!(seqs, [1, 2, 3]);
        assert_eq!(
            batch.stats(),
            &BatchStats {
                events_seen: 5,
                events_admitted: 4,
                unrecognized: 1,
                without_image: 1,
            }
        );
    }

    #[test]
    fn malformed_event_aborts_the_batch() {
        let p = payload(
            r#"{"Records":[
                {"eventName":"INSERT","dynamodb":{"ApproximateCreationDateTime":1,"NewImage":{"a":{"S":"ok"}}}},
                {"eventName":"INSERT"}
            ]}"#,
        );
        assert!(Batch::from_events(&p.records).is_err());
    }

    #[test]
    fn empty_input_is_empty_batch() {
        let batch = Batch::from_events(std::iter::empty::<&ChangeEvent>()).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.stats().events_seen, 0);
    }
}
