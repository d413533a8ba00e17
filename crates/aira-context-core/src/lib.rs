//! # Aira Context Core
//!
//! Pure, I/O-free retrieval logic for Aira Context: text normalization and
//! tokenization, fuzzy domain matching, paragraph chunking, the record model,
//! keyword scoring, and context assembly.
//!
//! This crate contains no tokio, filesystem access, or logging. Callers own
//! loading and persistence and hand this crate plain slices and lookups.

pub mod chunk;
pub mod domain;
pub mod error;
pub mod models;
pub mod prompt;
pub mod query;
pub mod retrieve;
pub mod safety;
pub mod scoring;
pub mod store;
pub mod text;
