//! Turns one invocation's change events into at most one archive object.

use crate::batch::{Batch, BatchStats};
use crate::clock::Clock;
use crate::codec::{encode_archive, CONTENT_TYPE};
use crate::config::ArchiverConfig;
use crate::key::archive_key;
use crate::store::ObjectStore;
use bytes::Bytes;
use flate2::Compression;
use serde::Serialize;
use std::sync::Arc;
use streamvault_core::{ArchiveError, ChangeEvent};
use streamvault_observability::ArchiveMetrics;
use tracing::{info, warn};

/// What an `archive` call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveOutcome {
    /// Records written (0 if nothing was written)
    pub records: usize,
    /// Key of the written object, `None` when the batch was empty
    pub key: Option<String>,
    /// Compressed object size in bytes
    pub bytes: usize,
    pub stats: BatchStats,
}

impl ArchiveOutcome {
    pub fn wrote(&self) -> bool {
        self.key.is_some()
    }
}

/// The batch archiver.
///
/// Holds only shared, immutable handles; one instance serves every
/// invocation of a warm function.
pub struct Archiver {
    store: Arc<dyn ObjectStore>,
    clock: Arc<dyn Clock>,
    content_type: String,
    compression: Compression,
    metrics: Option<ArchiveMetrics>,
}

impl Archiver {
    /// An archiver with default content type and best gzip compression.
    pub fn new(store: Arc<dyn ObjectStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            content_type: CONTENT_TYPE.to_string(),
            compression: Compression::best(),
            metrics: None,
        }
    }

    pub fn from_config(
        config: &ArchiverConfig,
        store: Arc<dyn ObjectStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            content_type: config.content_type.clone(),
            compression: config.compression(),
            ..Self::new(store, clock)
        }
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_metrics(mut self, metrics: ArchiveMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Archive one delivery of change events.
    ///
    /// Writes at most one object. Any failure aborts the whole delivery and
    /// is returned unchanged so the invoker can retry it.
    pub async fn archive(&self, events: &[ChangeEvent]) -> Result<ArchiveOutcome, ArchiveError> {
        let result = self.run(events).await;
        if let Err(err) = &result {
            warn!(error = %err, kind = err.kind(), events = events.len(), "archive failed");
            if let Some(metrics) = &self.metrics {
                metrics.record_failure(err.kind());
            }
        }
        result
    }

    async fn run(&self, events: &[ChangeEvent]) -> Result<ArchiveOutcome, ArchiveError> {
        let batch = Batch::from_events(events)?;
        let stats = batch.stats().clone();

        if let Some(metrics) = &self.metrics {
            metrics.record_skipped(stats.unrecognized as u64, "unrecognized_kind");
            metrics.record_skipped(stats.without_image as u64, "no_new_image");
        }

        if batch.is_empty() {
            info!(events = stats.events_seen, "Successfully processed 0 records");
            return Ok(ArchiveOutcome {
                records: 0,
                key: None,
                bytes: 0,
                stats,
            });
        }

        let records = batch.len();
        let body = encode_archive(batch.records(), self.compression)?;
        let bytes = body.len();
        let key = archive_key(&self.clock.now());

        self.store
            .put(&key, Bytes::from(body), &self.content_type)
            .await?;

        let uri = self.store.uri(&key);
        info!(
            records,
            bytes,
            backend = self.store.backend(),
            %uri,
            "Uploaded {records} records to {uri}"
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_archived(records as u64, bytes as u64);
        }
        info!(events = stats.events_seen, "Successfully processed {records} records");

        Ok(ArchiveOutcome {
            records,
            key: Some(key),
            bytes,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::codec::decode_archive;
    use crate::store::InMemoryStore;
    use chrono::{TimeZone, Utc};
    use streamvault_core::StreamPayload;

    fn fixed() -> Arc<FixedClock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap()))
    }

    fn payload(json: &str) -> StreamPayload {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn single_create_is_archived() {
        let store = Arc::new(InMemoryStore::new());
        let archiver = Archiver::new(store.clone(), fixed());
        let p = payload(
            r#"{"Records":[{"eventName":"INSERT","dynamodb":{"ApproximateCreationDateTime":1700000000,
                "NewImage":{"name":{"S":"a"},"count":{"N":"3"},"flag":{"BOOL":true}}}}]}"#,
        );

        let outcome = archiver.archive(&p.records).await.unwrap();
        assert_eq!(outcome.records, 1);
        let key = "2024-03-05/batch_20240305_070809.json.gz";
        assert_eq!(outcome.key.as_deref(), Some(key));

        let object = store.object(key).unwrap();
        assert_eq!(object.content_type, "application/gzip");
        assert_eq!(object.body.len(), outcome.bytes);

        let records = decode_archive(&object.body).unwrap();
        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            serde_json::json!([{
                "timestamp": 1700000000,
                "item": {"name": "a", "count": 3, "flag": true}
            }])
        );
    }

    #[tokio::test]
    async fn delete_without_image_writes_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let archiver = Archiver::new(store.clone(), fixed());
        let p = payload(
            r#"{"Records":[{"eventName":"REMOVE","dynamodb":{"ApproximateCreationDateTime":1,
                "Keys":{"id":{"N":"1"}},"OldImage":{"id":{"N":"1"}}}}]}"#,
        );

        let outcome = archiver.archive(&p.records).await.unwrap();
        assert!(!outcome.wrote());
        assert_eq!(outcome.records, 0);
        assert_eq!(outcome.stats.without_image, 1);
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn empty_delivery_writes_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let archiver = Archiver::new(store.clone(), fixed());
        let outcome = archiver.archive(&[]).await.unwrap();
        assert_eq!(outcome.bytes, 0);
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn wide_integers_are_archived_exactly() {
        use std::io::Read;

        let store = Arc::new(InMemoryStore::new());
        let archiver = Archiver::new(store.clone(), fixed());
        let p = payload(
            r#"{"Records":[{"eventName":"INSERT","dynamodb":{"ApproximateCreationDateTime":1,
                "NewImage":{"id":{"N":"12345678901234567890"},
                            "serial":{"N":"12345678901234567890123456789012345678"}}}}]}"#,
        );

        let outcome = archiver.archive(&p.records).await.unwrap();
        assert_eq!(outcome.records, 1);

        let object = store.object(outcome.key.as_deref().unwrap()).unwrap();
        let mut json = String::new();
        flate2::read::GzDecoder::new(&object.body[..])
            .read_to_string(&mut json)
            .unwrap();
        assert_eq!(
            json,
            r#"[{"timestamp":1,"item":{"id":12345678901234567890,"serial":12345678901234567890123456789012345678}}]"#
        );
    }

    #[tokio::test]
    async fn compression_override_changes_the_object_not_the_records() {
        let p = payload(
            r#"{"Records":[{"eventName":"INSERT","dynamodb":{"ApproximateCreationDateTime":1,
                "NewImage":{"note":{"S":"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"}}}}]}"#,
        );
        let stored = Archiver::new(Arc::new(InMemoryStore::new()), fixed())
            .with_compression(Compression::none());
        let best = Archiver::new(Arc::new(InMemoryStore::new()), fixed());

        let stored_outcome = stored.archive(&p.records).await.unwrap();
        let best_outcome = best.archive(&p.records).await.unwrap();
        assert!(stored_outcome.bytes > best_outcome.bytes);

        let key = stored_outcome.key.unwrap();
        let body = stored.store().get(&key).await.unwrap().unwrap();
        assert_eq!(stored.store().backend(), "memory");
        assert_eq!(
            decode_archive(&body).unwrap(),
            decode_archive(&best.store().get(&key).await.unwrap().unwrap()).unwrap()
        );
    }

    #[tokio::test]
    async fn malformed_event_fails_without_writing() {
        let store = Arc::new(InMemoryStore::new());
        let archiver = Archiver::new(store.clone(), fixed()).with_metrics(ArchiveMetrics::global());
        let p = payload(
            r#"{"Records":[
                {"eventName":"INSERT","dynamodb":{"ApproximateCreationDateTime":1,"NewImage":{"a":{"S":"x"}}}},
                {"eventName":"MODIFY","dynamodb":{"ApproximateCreationDateTime":2,"NewImage":{"n":{"N":"NaN?"}}}}
            ]}"#,
        );
        let err = archiver.archive(&p.records).await.unwrap_err();
        assert_eq!(err.kind(), "decode");
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn config_controls_content_type() {
        let store = Arc::new(InMemoryStore::new());
        let mut config = ArchiverConfig::new("bucket");
        config.content_type = "application/x-gzip".into();
        config.compression_level = 1;
        let archiver = Archiver::from_config(&config, store.clone(), fixed());
        let p = payload(
            r#"{"Records":[{"eventName":"INSERT","dynamodb":{"ApproximateCreationDateTime":1,"NewImage":{"a":{"S":"x"}}}}]}"#,
        );
        let outcome = archiver.archive(&p.records).await.unwrap();
        let object = store.object(outcome.key.as_deref().unwrap()).unwrap();
        assert_eq!(object.content_type, "application/x-gzip");
    }
}
