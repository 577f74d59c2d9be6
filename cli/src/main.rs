//! streamvault CLI: operate on stream deliveries and archive objects.
//!
//! # Commands
//! ```text
//! streamvault archive --input <payload.json> --out-dir <dir>
//! streamvault archive --input <payload.json> --bucket <name>
//! streamvault decode  --input <payload.json>
//! streamvault inspect --file <archive.json.gz>
//! streamvault inspect --bucket <name> --key <key>
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use streamvault_archive::{config::GZIP_LEVEL_VAR, Batch};
use streamvault_core::StreamPayload;
use streamvault_observability::{init_tracing, tracing_setup::LOG_LEVEL_VAR, LogConfig};

mod cmd_archive;
mod cmd_inspect;

#[derive(Parser)]
#[command(
    name = "streamvault",
    about = "Archive DynamoDB stream deliveries and inspect the archives",
    long_about = "
streamvault CLI: replay a saved stream delivery through the archiver, dry-run
the attribute decoding, or read an archive object back.

ENVIRONMENT VARIABLES:
  STREAMVAULT_LOG        log level (default: warn for the CLI)
  STREAMVAULT_LOG_JSON   emit JSON log lines when 1/true
  STREAMVAULT_GZIP_LEVEL default for archive --gzip-level
  AWS_PROFILE, AWS_REGION, ...   standard AWS credential chain for --bucket
",
    version
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Archive a saved stream delivery into a directory or an S3 bucket
    Archive {
        /// Stream delivery JSON ({"Records": [...]})
        #[arg(short, long)]
        input: PathBuf,
        /// Write the archive object under this directory
        #[arg(long, conflicts_with = "bucket", required_unless_present = "bucket")]
        out_dir: Option<PathBuf>,
        /// Write the archive object to this S3 bucket
        #[arg(long)]
        bucket: Option<String>,
        /// gzip level 0-9
        #[arg(
            long,
            env = GZIP_LEVEL_VAR,
            default_value_t = 9,
            value_parser = clap::value_parser!(u32).range(0..=9)
        )]
        gzip_level: u32,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a saved stream delivery and print the records, writing nothing
    Decode {
        /// Stream delivery JSON ({"Records": [...]})
        #[arg(short, long)]
        input: PathBuf,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Read an archive object back
    Inspect {
        /// Local archive file (.json.gz)
        #[arg(short, long, conflicts_with_all = ["bucket", "key"], required_unless_present = "bucket")]
        file: Option<PathBuf>,
        /// S3 bucket holding the archive
        #[arg(long, requires = "key")]
        bucket: Option<String>,
        /// S3 key of the archive
        #[arg(long, requires = "bucket")]
        key: Option<String>,
        /// Print all records as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log = LogConfig::from_env();
    if std::env::var_os(LOG_LEVEL_VAR).is_none() {
        log.level = "warn".into();
    }
    if cli.verbose {
        log.level = "debug".into();
    }
    init_tracing(&log);

    match cli.command {
        Commands::Archive { input, out_dir, bucket, gzip_level, json } => {
            let target = match (out_dir, bucket) {
                (Some(dir), _) => cmd_archive::Target::Dir(dir),
                (None, Some(bucket)) => cmd_archive::Target::Bucket(bucket),
                (None, None) => anyhow::bail!("one of --out-dir or --bucket is required"),
            };
            cmd_archive::run(&input, target, gzip_level, json).await
        }

        Commands::Decode { input, pretty } => cmd_decode(&input, pretty),

        Commands::Inspect { file, bucket, key, json } => {
            let source = match (file, bucket, key) {
                (Some(file), _, _) => cmd_inspect::Source::File(file),
                (None, Some(bucket), Some(key)) => cmd_inspect::Source::S3 { bucket, key },
                _ => anyhow::bail!("either --file or --bucket with --key is required"),
            };
            cmd_inspect::run(source, json).await
        }
    }
}

/// Load a saved stream delivery.
pub(crate) fn read_payload(path: &Path) -> Result<StreamPayload> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a stream delivery", path.display()))
}

// ─── Command implementations ─────────────────────────────────────────────────

fn cmd_decode(input: &Path, pretty: bool) -> Result<()> {
    let payload = read_payload(input)?;
    let batch = Batch::from_events(&payload.records)?;

    let out = if pretty {
        serde_json::to_string_pretty(batch.records())?
    } else {
        serde_json::to_string(batch.records())?
    };
    println!("{out}");

    let stats = batch.stats();
    eprintln!(
        "{} events, {} records, {} without new image, {} unrecognized",
        stats.events_seen,
        batch.len(),
        stats.without_image,
        stats.unrecognized
    );
    Ok(())
}
