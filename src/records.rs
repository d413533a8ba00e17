//! File-backed record store: one pretty-printed JSON document per record.
//!
//! Records are held in an [`InMemoryRecords`] collection and mirrored to
//! `<dir>/<id>.json`. Loading is best effort: an unreadable directory or a
//! malformed file is logged and skipped. Upserts update memory first and then
//! write the file; a failed write is reported to the caller while the new
//! record stays visible in memory.
//!
//! Upserts are not serialized against each other. Two concurrent upserts for
//! the same id resolve last-write-wins.

use std::path::{Path, PathBuf};

use aira_context_core::models::{Record, RecordSummary};
use aira_context_core::store::memory::InMemoryRecords;
use aira_context_core::store::RecordSource;

use crate::error::RecordError;

#[derive(Debug)]
pub struct RecordStore {
    dir: PathBuf,
    records: InMemoryRecords,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            records: InMemoryRecords::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `id`.
    pub fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Load every `*.json` file in the records directory, creating the
    /// directory if needed. Returns how many records were loaded.
    pub async fn load(&self) -> usize {
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            tracing::warn!(dir = %self.dir.display(), error = %e, "could not create records directory");
        }

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(dir = %self.dir.display(), error = %e, "could not read records directory");
                return 0;
            }
        };

        let mut paths = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let path = entry.path();
                    if path.extension().and_then(|e| e.to_str()) == Some("json") {
                        paths.push(path);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(dir = %self.dir.display(), error = %e, "stopped reading records directory");
                    break;
                }
            }
        }
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match read_record(&path).await {
                Ok(record) => {
                    tracing::debug!(id = %record.id, name = %record.name, "loaded record");
                    self.records.insert(record);
                    loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "skipping malformed record file");
                }
            }
        }

        tracing::info!(count = self.records.len(), dir = %self.dir.display(), "records loaded");
        loaded
    }

    /// Insert or replace a record and persist it to `<dir>/<id>.json`.
    pub async fn upsert(&self, record: Record) -> Result<(), RecordError> {
        record.validate()?;

        let json = serde_json::to_string_pretty(&record).map_err(|source| RecordError::Serialize {
            id: record.id.clone(),
            source,
        })?;
        let path = self.record_path(&record.id);
        let name = record.name.clone();

        self.records.insert(record);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| RecordError::Write {
                path: self.dir.clone(),
                source,
            })?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|source| RecordError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::info!(name = %name, file = %path.display(), "saved record");
        Ok(())
    }

    pub fn get_by_id(&self, id: &str) -> Option<Record> {
        self.records.get_record(id)
    }

    /// All records, ordered by id.
    pub fn list_all(&self) -> Vec<Record> {
        self.records.list_records()
    }

    pub fn summaries(&self) -> Vec<RecordSummary> {
        self.list_all().iter().map(Record::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for RecordStore {
    fn get_record(&self, id: &str) -> Option<Record> {
        self.get_by_id(id)
    }

    fn list_records(&self) -> Vec<Record> {
        self.list_all()
    }
}

async fn read_record(path: &Path) -> anyhow::Result<Record> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}
