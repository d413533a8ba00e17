//! Record lookup abstraction.
//!
//! The retriever reads records through [`RecordSource`] so it does not care
//! whether they live in memory, on disk, or somewhere else. Writes are not
//! part of the trait: each backend owns its own persistence story.
//!
//! Implementations must be `Send + Sync` to be shared across async tasks.

pub mod memory;

use crate::models::Record;

/// Read-only access to the record collection.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get_record`](RecordSource::get_record) | Fetch one record by id |
/// | [`list_records`](RecordSource::list_records) | All records, ordered by id |
pub trait RecordSource: Send + Sync {
    fn get_record(&self, id: &str) -> Option<Record>;

    /// All records in ascending id order.
    fn list_records(&self) -> Vec<Record>;
}
