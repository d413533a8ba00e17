//! Paragraph-boundary text chunker.
//!
//! Splits a corpus document into bounded [`Chunk`]s. The document is first
//! passed through [`normalize`], then split on blank lines, and paragraphs
//! are packed greedily so each chunk stays within `max_chars` characters.
//!
//! # Algorithm
//!
//! 1. Normalize the document and split on blank-line paragraph boundaries.
//! 2. Accumulate paragraphs (joined by `"\n\n"`) until adding the next one
//!    would exceed `max_chars`.
//! 3. When exceeded, flush the buffer as a chunk and start a new one.
//! 4. A single paragraph longer than `max_chars` is hard-split into
//!    consecutive `max_chars`-character slices.
//! 5. Empty or whitespace-only documents produce no chunks.
//!
//! # Example
//!
//! ```rust
//! use aira_context_core::chunk::split_into_chunks;
//!
//! let chunks = split_into_chunks("Hello world.\n\nSecond paragraph.", 900);
//! assert_eq!(chunks, vec!["Hello world.\n\nSecond paragraph.".to_string()]);
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Chunk;
use crate::text::{normalize, to_keywords};

/// Default soft bound on chunk length, in characters.
pub const DEFAULT_MAX_CHARS: usize = 900;

/// Default bound on [`Chunk::section`] length, in characters.
pub const DEFAULT_SECTION_MAX_CHARS: usize = 120;

const PARAGRAPH_JOIN: &str = "\n\n";

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n\s*").expect("paragraph pattern is valid"));

/// Split document content into chunk texts of at most `max_chars` characters.
///
/// # Guarantees
///
/// - Every chunk is non-empty and at most `max_chars` characters.
/// - Paragraph text appears in exactly one chunk, in document order.
/// - Hard-split slices of an oversized paragraph concatenate back to it.
pub fn split_into_chunks(content: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let normalized = normalize(content);

    let mut chunks = Vec::new();
    let mut buf = String::new();
    let mut buf_len = 0usize;

    for para in PARAGRAPH_BREAK.split(&normalized) {
        let para = para.trim();
        if para.is_empty() {
            continue;
        }
        let para_len = para.chars().count();

        if para_len > max_chars {
            if !buf.is_empty() {
                chunks.push(std::mem::take(&mut buf));
                buf_len = 0;
            }
            chunks.extend(hard_split(para, max_chars));
            continue;
        }

        let would_be = if buf.is_empty() {
            para_len
        } else {
            buf_len + PARAGRAPH_JOIN.len() + para_len
        };

        if would_be > max_chars {
            chunks.push(std::mem::take(&mut buf));
            buf_len = 0;
        }

        if !buf.is_empty() {
            buf.push_str(PARAGRAPH_JOIN);
            buf_len += PARAGRAPH_JOIN.len();
        }
        buf.push_str(para);
        buf_len += para_len;
    }

    if !buf.is_empty() {
        chunks.push(buf);
    }

    chunks
}

/// Slice `text` into consecutive pieces of `max_chars` characters.
fn hard_split(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|piece| piece.iter().collect())
        .collect()
}

/// First non-blank line of a chunk with heading markers removed, truncated
/// to `max_chars` characters.
pub fn section_label(text: &str, max_chars: usize) -> String {
    let line = text
        .lines()
        .map(|l| l.trim().trim_start_matches('#').trim())
        .find(|l| !l.is_empty())
        .unwrap_or_default();
    line.chars().take(max_chars).collect()
}

/// Chunk one document and derive section labels, keywords and ids.
///
/// `source` is the document's normalized relative path; it becomes part of
/// each chunk id (`<source>#<index>`) and of its keyword set.
pub fn build_chunks(
    source: &str,
    content: &str,
    max_chars: usize,
    section_max_chars: usize,
) -> Vec<Chunk> {
    let source_words = source.replace(['/', '\\', '.', '_', '-'], " ");
    split_into_chunks(content, max_chars)
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let section = section_label(&text, section_max_chars);
            let keywords = to_keywords(&format!("{} {} {}", source_words, section, text));
            Chunk {
                id: format!("{}#{}", source, index),
                source: source.to_string(),
                chunk_index: index,
                section,
                text,
                keywords,
            }
        })
        .collect()
}
