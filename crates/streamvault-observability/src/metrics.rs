//! streamvault metrics definitions.
//!
//! All metrics use OpenTelemetry conventions. With no meter provider
//! installed the global meter is a no-op, so handles are always safe to use.

use opentelemetry::{
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Central metrics handle for the archiver.
#[derive(Clone)]
pub struct ArchiveMetrics {
    pub records_archived: Counter<u64>,
    pub events_skipped: Counter<u64>,
    pub archive_failures: Counter<u64>,
    pub archive_bytes: Histogram<u64>,
}

impl ArchiveMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            records_archived: meter
                .u64_counter("streamvault.records_archived")
                .with_description("Decoded records written to archive objects")
                .init(),
            events_skipped: meter
                .u64_counter("streamvault.events_skipped")
                .with_description("Change events that produced no archived record")
                .init(),
            archive_failures: meter
                .u64_counter("streamvault.archive_failures")
                .with_description("Invocations aborted by an error")
                .init(),
            archive_bytes: meter
                .u64_histogram("streamvault.archive_bytes")
                .with_description("Compressed size of each archive object in bytes")
                .init(),
        }
    }

    /// Handles on the process-global meter.
    pub fn global() -> Self {
        Self::new(&opentelemetry::global::meter("streamvault"))
    }

    pub fn record_archived(&self, records: u64, bytes: u64) {
        self.records_archived.add(records, &[]);
        self.archive_bytes.record(bytes, &[]);
    }

    pub fn record_skipped(&self, count: u64, reason: &'static str) {
        if count > 0 {
            self.events_skipped
                .add(count, &[KeyValue::new("reason", reason)]);
        }
    }

    pub fn record_failure(&self, error_kind: &'static str) {
        self.archive_failures
            .add(1, &[KeyValue::new("error_kind", error_kind)]);
    }
}
