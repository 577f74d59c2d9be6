//! `streamvault inspect`: read an archive object back.

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use streamvault_archive::{archive_key_time, decode_archive, ObjectStore, S3Store};

/// Where the archive object is read from.
pub enum Source {
    File(PathBuf),
    S3 { bucket: String, key: String },
}

pub async fn run(source: Source, as_json: bool) -> Result<()> {
    let (name, bytes) = match source {
        Source::File(path) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            (path.display().to_string(), bytes)
        }
        Source::S3 { bucket, key } => {
            let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let store = S3Store::new(aws_sdk_s3::Client::new(&sdk_config), bucket);
            let bytes = store
                .get(&key)
                .await?
                .ok_or_else(|| anyhow!("{} does not exist", store.uri(&key)))?;
            (store.uri(&key), bytes.to_vec())
        }
    };

    let records = decode_archive(&bytes).with_context(|| format!("{name} is not an archive"))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("Archive:  {name}");
    if let Some(written) = archive_key_time(&name) {
        println!("Written:  {}", written.to_rfc3339());
    }
    println!("Size:     {} bytes", bytes.len());
    println!("Records:  {}", records.len());
    for (i, record) in records.iter().enumerate() {
        let fields: Vec<_> = record
            .item
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        println!("  [{i}] t={} {}", record.timestamp, fields.join(" "));
    }
    Ok(())
}
