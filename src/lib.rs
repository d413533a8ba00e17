//! # Aira Context
//!
//! **Context retrieval for the Aira voice assistant.**
//!
//! Given a user query, Aira Context decides whether company knowledge should
//! be injected into the language-model prompt and, if so, returns a single
//! context string built from explicit company records and the best-matching
//! chunks of a document corpus.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Corpus dir  │──▶│ Chunk + keys │──▶│ CorpusIndex  │──┐
//! └─────────────┘   └──────────────┘   └──────────────┘  │
//! ┌─────────────┐                      ┌──────────────┐  ▼
//! │ Records dir │─────────────────────▶│ RecordStore  │─▶ ContextRetriever ─▶ context
//! └─────────────┘                      └──────────────┘
//! ```
//!
//! ## Data Flow
//!
//! 1. The **filesystem connector** ([`connector_fs`]) reads every text file
//!    under the corpus root, skipping hidden files and images.
//! 2. The **index** ([`index`]) normalizes and chunks each document and
//!    swaps the finished chunk set in atomically.
//! 3. The **record store** ([`records`]) loads one JSON file per company
//!    record and persists upserts back to disk.
//! 4. The **retriever** ([`retriever`]) gates the query by domain, matches
//!    records, ranks chunks and renders the context string.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`connector_fs`] | Corpus directory walker |
//! | [`index`] | Snapshot chunk index with readiness flag |
//! | [`records`] | File-backed record store |
//! | [`retriever`] | Context retrieval entry point |
//! | [`error`] | Record persistence errors |
//!
//! The text processing, domain matching, chunking and ranking algorithms live
//! in `aira-context-core`, re-exported here as [`aira_context_core`].

pub mod config;
pub mod connector_fs;
pub mod error;
pub mod index;
pub mod records;
pub mod retriever;

pub use aira_context_core;
pub use aira_context_core::models::{Chunk, LastUpdated, Record, RecordMetadata, RecordSummary};
pub use retriever::ContextRetriever;
