//! Archiver configuration.

use crate::codec::CONTENT_TYPE;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use streamvault_core::ConfigError;

/// Destination bucket.
pub const BUCKET_VAR: &str = "BACKUP_BUCKET";
/// Optional gzip level override, 0–9.
pub const GZIP_LEVEL_VAR: &str = "STREAMVAULT_GZIP_LEVEL";

/// Settings for an [`crate::Archiver`] and its storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiverConfig {
    /// Destination bucket name
    pub bucket: String,
    /// Content type archive objects are written with
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// gzip level, 0 (store) to 9 (best)
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

fn default_content_type() -> String {
    CONTENT_TYPE.to_string()
}

fn default_compression_level() -> u32 {
    9
}

impl ArchiverConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            content_type: default_content_type(),
            compression_level: default_compression_level(),
        }
    }

    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve through an explicit variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bucket = lookup(BUCKET_VAR)
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .ok_or_else(|| ConfigError::MissingVar {
                name: BUCKET_VAR.into(),
            })?;

        let mut config = Self::new(bucket);
        if let Some(raw) = lookup(GZIP_LEVEL_VAR) {
            config.compression_level = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidVar {
                    name: GZIP_LEVEL_VAR.into(),
                    reason: e.to_string(),
                }
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compression_level > 9 {
            return Err(ConfigError::InvalidVar {
                name: GZIP_LEVEL_VAR.into(),
                reason: format!("level {} out of range 0-9", self.compression_level),
            });
        }
        Ok(())
    }

    pub fn compression(&self) -> Compression {
        Compression::new(self.compression_level.min(9))
    }
}
