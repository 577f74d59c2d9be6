//! Error types for the streamvault archive pipeline.

use thiserror::Error;

/// Errors that can occur while decoding a single change event.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Attribute '{attribute}': cannot parse number '{value}': {reason}")]
    InvalidNumber {
        attribute: String,
        value: String,
        reason: String,
    },

    #[error("Attribute '{attribute}': number '{value}' is not finite")]
    NonFiniteNumber { attribute: String, value: String },
}

/// Errors from an object-store backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{backend} backend error: {reason}")]
    Backend { backend: String, reason: String },

    #[error("Invalid object key '{key}'")]
    InvalidKey { key: String },
}

/// Errors that abort a whole archive invocation.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Archive encoding failed: {reason}")]
    Encode { reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ArchiveError {
    /// Short, stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Encode { .. } => "encode",
            Self::Storage(_) => "storage",
            Self::Io(_) => "io",
            Self::Serde(_) => "serde",
        }
    }
}

/// Errors while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {name}")]
    MissingVar { name: String },

    #[error("Invalid value for {name}: {reason}")]
    InvalidVar { name: String, reason: String },
}
