//! Lambda entry point: DynamoDB stream delivery → one gzip archive in S3.
//!
//! ENVIRONMENT VARIABLES:
//!   BACKUP_BUCKET            destination bucket (required)
//!   STREAMVAULT_GZIP_LEVEL   gzip level 0-9 (default 9)
//!   STREAMVAULT_LOG          log level (default info)
//!   STREAMVAULT_LOG_JSON     emit JSON log lines when 1/true

mod handler;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use std::sync::Arc;
use streamvault_archive::{Archiver, ArchiverConfig, S3Store, SystemClock};
use streamvault_core::StreamPayload;
use streamvault_observability::{init_tracing, ArchiveMetrics, LogConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let log = LogConfig::from_env()
        .with_component("aws-config", "warn")
        .with_component("aws-smithy-runtime", "warn");
    init_tracing(&log);

    let config = ArchiverConfig::from_env()?;
    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = S3Store::new(aws_sdk_s3::Client::new(&sdk_config), config.bucket.clone());

    let archiver = Archiver::from_config(&config, Arc::new(store), Arc::new(SystemClock))
        .with_metrics(ArchiveMetrics::global());
    info!(bucket = %config.bucket, gzip_level = config.compression_level, "archiver ready");

    let archiver = &archiver;
    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<StreamPayload>| async move {
            handler::handle(archiver, event).await
        },
    ))
    .await
}
