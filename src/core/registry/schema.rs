//! core::registry::schema
//!
//! On-disk index format for the patch registry.
//!
//! # Format
//!
//! The index is a JSON array of records, in display order:
//!
//! ```json
//! [
//!   {
//!     "message": "fix login bug",
//!     "blob": "2a6f1b0c4e8d3f5a7b9c1d2e3f4a5b6c7d8e9f0a",
//!     "timestamp": "2024-05-01T12:30:00.123Z"
//!   }
//! ]
//! ```
//!
//! # Compatibility
//!
//! - `blobDigest` is accepted in place of `blob` when reading
//! - Records written before blobs existed have no `blob` field at all
//! - Unknown fields are ignored, so newer writers can add fields

use serde::{Deserialize, Serialize};

use crate::core::types::{Digest, UtcTimestamp};

/// One patch in the registry.
///
/// Records are immutable once created: the registry only appends,
/// removes, or clears them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRecord {
    /// The text supplied by the caller.
    pub message: String,

    /// Digest of the blob holding the patch content.
    #[serde(
        rename = "blob",
        alias = "blobDigest",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub blob: Option<Digest>,

    /// When the record was created.
    pub timestamp: UtcTimestamp,
}

impl PatchRecord {
    /// Create a record stamped with the current time.
    pub fn new(message: impl Into<String>, blob: Digest) -> Self {
        Self {
            message: message.into(),
            blob: Some(blob),
            timestamp: UtcTimestamp::now(),
        }
    }
}

/// Parse the full index contents.
pub fn parse_index(bytes: &[u8]) -> Result<Vec<PatchRecord>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Serialize the full record sequence.
pub fn render_index(records: &[PatchRecord], pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(records)
    } else {
        serde_json::to_string(records)
    }
}
