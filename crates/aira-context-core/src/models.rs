//! Core data models: explicit knowledge [`Record`]s and derived [`Chunk`]s.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::InvalidRecord;

/// An explicitly authored knowledge entry (one company, product, or team).
///
/// Serialized as one JSON document per file, named `<id>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub metadata: RecordMetadata,
}

/// Open-ended record metadata.
///
/// `industry` and `website` are the well-known keys; anything else in the
/// JSON object is preserved in `extra` and written back on persist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(
        rename = "lastUpdated",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_last_updated"
    )]
    pub last_updated: Option<LastUpdated>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A record's last-updated stamp.
///
/// Hand-edited files carry whatever date format their author liked, so
/// values that are not RFC 3339 are kept verbatim instead of rejecting the
/// whole record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LastUpdated {
    At(DateTime<Utc>),
    Raw(String),
}

impl LastUpdated {
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            LastUpdated::At(at) => Some(at),
            LastUpdated::Raw(_) => None,
        }
    }
}

fn lenient_last_updated<'de, D>(deserializer: D) -> Result<Option<LastUpdated>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(match DateTime::parse_from_rfc3339(&s) {
            Ok(at) => LastUpdated::At(at.with_timezone(&Utc)),
            Err(_) => LastUpdated::Raw(s),
        }),
        Some(other) => Some(LastUpdated::Raw(other.to_string())),
    })
}

impl Record {
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: content.into(),
            metadata: RecordMetadata::default(),
        }
    }

    /// Check the fields a store needs before accepting the record.
    pub fn validate(&self) -> Result<(), InvalidRecord> {
        if self.id.trim().is_empty() {
            return Err(InvalidRecord::MissingField("id"));
        }
        if self.name.trim().is_empty() {
            return Err(InvalidRecord::MissingField("name"));
        }
        if self.content.trim().is_empty() {
            return Err(InvalidRecord::MissingField("content"));
        }
        if self.id == "." || self.id == ".." || self.id.contains(['/', '\\', '\0']) {
            return Err(InvalidRecord::UnsafeId(self.id.clone()));
        }
        Ok(())
    }

    /// Stamp `metadata.last_updated` with the current time.
    pub fn touch(&mut self) {
        self.metadata.last_updated = Some(LastUpdated::At(Utc::now()));
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            industry: self.metadata.industry.clone(),
            website: self.metadata.website.clone(),
        }
    }
}

/// Listing view of a record, without its content body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    pub id: String,
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
}

/// A bounded, paragraph-aligned slice of a corpus document.
///
/// Chunks are immutable once indexed; a re-index produces a new set.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// `<source>#<chunk_index>`.
    pub id: String,
    /// Relative path of the originating document, `/`-separated.
    pub source: String,
    pub chunk_index: usize,
    /// First non-blank line of the chunk, truncated.
    pub section: String,
    pub text: String,
    pub keywords: BTreeSet<String>,
}
