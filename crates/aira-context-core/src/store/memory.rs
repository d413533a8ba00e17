//! In-memory [`RecordSource`] keyed by record id.
//!
//! Uses a `BTreeMap` behind `std::sync::RwLock` so listings come back in id
//! order. Inserting an existing id replaces the previous record.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::models::Record;

use super::RecordSource;

/// In-memory record collection.
#[derive(Debug, Default)]
pub struct InMemoryRecords {
    records: RwLock<BTreeMap<String, Record>>,
}

impl InMemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by id. Returns the record previously stored there.
    pub fn insert(&self, record: Record) -> Option<Record> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.id.clone(), record)
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Record> for InMemoryRecords {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let map = iter.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self {
            records: RwLock::new(map),
        }
    }
}

impl RecordSource for InMemoryRecords {
    fn get_record(&self, id: &str) -> Option<Record> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn list_records(&self) -> Vec<Record> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}
