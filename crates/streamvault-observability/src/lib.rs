//! # streamvault-observability
//!
//! Logging and metrics for streamvault.
//!
//! ## Built-in metrics
//! - `streamvault.records_archived`  — counter
//! - `streamvault.events_skipped`    — counter, tagged with reason
//! - `streamvault.archive_failures`  — counter, tagged with error kind
//! - `streamvault.archive_bytes`     — histogram of compressed object size
//!
//! ## Structured logging
//! JSON-structured logs (one object per line) for CloudWatch, or plain text
//! for local runs. Levels configurable per component.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::ArchiveMetrics;
pub use tracing_setup::{init_tracing, LogConfig};
