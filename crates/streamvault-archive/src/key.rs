//! Archive object key naming.
//!
//! Keys are partitioned by the UTC processing date and carry the full
//! processing second: `2024-03-05/batch_20240305_070809.json.gz`. Event
//! timestamps play no part. Two writes within the same second share a key.

use chrono::{DateTime, NaiveDateTime, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const PREFIX: &str = "batch_";
const SUFFIX: &str = ".json.gz";

/// Key for an archive written at `at`.
pub fn archive_key(at: &DateTime<Utc>) -> String {
    format!(
        "{}/{PREFIX}{}{SUFFIX}",
        at.format(DATE_FORMAT),
        at.format(STAMP_FORMAT)
    )
}

/// Recover the processing instant from an archive key or file name.
///
/// Accepts a full key (`2024-03-05/batch_...json.gz`) or just its file name.
pub fn archive_key_time(key: &str) -> Option<DateTime<Utc>> {
    let file = key.rsplit(|c: char| c == '/' || c == '\\').next()?;
    let stamp = file.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;
    NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
