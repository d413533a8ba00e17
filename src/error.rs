//! Error types for record persistence.

use std::path::PathBuf;

use thiserror::Error;

use aira_context_core::error::InvalidRecord;

/// Failures surfaced by [`RecordStore::upsert`](crate::records::RecordStore::upsert).
#[derive(Error, Debug)]
pub enum RecordError {
    /// The record was rejected before anything changed.
    #[error(transparent)]
    Invalid(#[from] InvalidRecord),

    #[error("Failed to serialize record `{id}`: {source}")]
    Serialize {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The record is visible in memory but was not durably saved.
    #[error("Failed to write record file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
