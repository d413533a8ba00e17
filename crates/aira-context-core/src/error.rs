//! Error types for aira-context-core.

use thiserror::Error;

/// Reasons a [`Record`](crate::models::Record) cannot be accepted by a store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidRecord {
    /// A required field is empty or whitespace-only.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The id cannot be used as a file stem (path separators, `.` or `..`).
    #[error("Record id `{0}` is not usable as a file name")]
    UnsafeId(String),
}
