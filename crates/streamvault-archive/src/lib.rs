//! # streamvault-archive
//!
//! Turns one delivery of change events into at most one archive object.
//!
//! ## Pipeline
//! - filter to create / update / delete events
//! - decode each post-change image into a flat record ([`Batch`])
//! - serialize the batch as a JSON array and gzip it ([`codec`])
//! - write it under `{yyyy-mm-dd}/batch_{yyyymmdd_HHMMSS}.json.gz` ([`key`])
//!   through an [`ObjectStore`] backend
//!
//! An empty batch writes nothing.
//!
//! ## Usage
//! ```no_run
//! use std::sync::Arc;
//! use streamvault_archive::{Archiver, InMemoryStore, SystemClock};
//! use streamvault_core::StreamPayload;
//!
//! # async fn example(payload: StreamPayload) -> Result<(), streamvault_core::ArchiveError> {
//! let archiver = Archiver::new(Arc::new(InMemoryStore::new()), Arc::new(SystemClock));
//! let outcome = archiver.archive(&payload.records).await?;
//! println!("archived {} records", outcome.records);
//! # Ok(())
//! # }
//! ```

pub mod archiver;
pub mod batch;
pub mod clock;
pub mod codec;
pub mod config;
pub mod key;
pub mod store;

pub use archiver::{ArchiveOutcome, Archiver};
pub use batch::{Batch, BatchStats};
pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{decode_archive, encode_archive, CONTENT_TYPE};
pub use config::ArchiverConfig;
pub use key::{archive_key, archive_key_time};
pub use store::{InMemoryStore, LocalFsStore, ObjectStore};

pub use flate2::Compression;

#[cfg(feature = "s3")]
pub use store::S3Store;
