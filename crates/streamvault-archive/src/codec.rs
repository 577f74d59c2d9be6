//! Archive object codec: JSON array of records, gzip-compressed.

use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use std::io::{Read, Write};
use streamvault_core::{ArchiveError, DecodedRecord};

/// Content type archive objects are stored with.
pub const CONTENT_TYPE: &str = "application/gzip";

/// Serialize `records` as a UTF-8 JSON array and gzip it.
pub fn encode_archive(
    records: &[DecodedRecord],
    level: Compression,
) -> Result<Vec<u8>, ArchiveError> {
    let json = serde_json::to_vec(records)?;
    let mut encoder = GzEncoder::new(Vec::with_capacity(json.len() / 4 + 64), level);
    encoder.write_all(&json)?;
    encoder.finish().map_err(|e| ArchiveError::Encode {
        reason: format!("gzip finish failed: {e}"),
    })
}

/// Read an archive object back into records.
pub fn decode_archive(bytes: &[u8]) -> Result<Vec<DecodedRecord>, ArchiveError> {
    let mut json = Vec::with_capacity(bytes.len() * 4);
    GzDecoder::new(bytes).read_to_end(&mut json)?;
    Ok(serde_json::from_slice(&json)?)
}
