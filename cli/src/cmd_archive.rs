//! `streamvault archive`: run the archiver over a saved delivery.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use streamvault_archive::{Archiver, Compression, LocalFsStore, ObjectStore, S3Store, SystemClock};

/// Where the archive object goes.
pub enum Target {
    Dir(PathBuf),
    Bucket(String),
}

pub async fn run(input: &Path, target: Target, gzip_level: u32, as_json: bool) -> Result<()> {
    let payload = crate::read_payload(input)?;

    let store: Arc<dyn ObjectStore> = match target {
        Target::Dir(dir) => Arc::new(LocalFsStore::new(dir)),
        Target::Bucket(bucket) => {
            let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            Arc::new(S3Store::new(aws_sdk_s3::Client::new(&sdk_config), bucket))
        }
    };

    let archiver =
        Archiver::new(store, Arc::new(SystemClock)).with_compression(Compression::new(gzip_level));
    let outcome = archiver
        .archive(&payload.records)
        .await
        .context("archive failed")?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match &outcome.key {
        Some(key) => println!(
            "✓ Archived {} records ({} bytes) to {}",
            outcome.records,
            outcome.bytes,
            archiver.store().uri(key)
        ),
        None => println!("✓ Nothing to archive ({} events, 0 records)", outcome.stats.events_seen),
    }
    Ok(())
}
