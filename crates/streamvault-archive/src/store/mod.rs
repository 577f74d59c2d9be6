//! Object-store backends archive objects are written to.
//!
//! Backends:
//! - [`memory`] — in-memory (tests, dry runs)
//! - [`local`] — a directory on the local filesystem
//! - `s3` — Amazon S3 via `aws-sdk-s3` (feature `s3`)

pub mod local;
pub mod memory;

#[cfg(feature = "s3")]
pub mod s3;

pub use local::LocalFsStore;
pub use memory::InMemoryStore;

#[cfg(feature = "s3")]
pub use s3::S3Store;

use async_trait::async_trait;
use bytes::Bytes;
use streamvault_core::StorageError;

/// Write-mostly object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Short backend name, e.g. `"s3"`.
    fn backend(&self) -> &'static str;

    /// Human-readable location of `key`, e.g. `s3://bucket/key`.
    fn uri(&self, key: &str) -> String;

    /// Store `body` under `key`, replacing any existing object.
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError>;

    /// Fetch the object under `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError>;
}

/// Reject keys that are empty, absolute, or escape their prefix.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let invalid = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if invalid {
        return Err(StorageError::InvalidKey { key: key.to_string() });
    }
    Ok(())
}
