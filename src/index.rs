//! In-memory chunk index over the corpus.
//!
//! The index is a snapshot: `RwLock<Arc<Vec<Chunk>>>`. Readers clone the
//! `Arc` and score against it without holding the lock; a re-index builds a
//! complete new vector off to the side and swaps it in with one write, so no
//! reader ever sees a half-built index.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{Context, Result};

use aira_context_core::chunk::build_chunks;
use aira_context_core::models::Chunk;

use crate::config::{ChunkingConfig, CorpusConfig};
use crate::connector_fs::{scan_corpus, CorpusFile};

/// Counts from one indexing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub documents: usize,
    pub chunks: usize,
}

#[derive(Debug, Default)]
pub struct CorpusIndex {
    chunks: RwLock<Arc<Vec<Chunk>>>,
    ready: AtomicBool,
}

impl CorpusIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current chunk snapshot.
    pub fn snapshot(&self) -> Arc<Vec<Chunk>> {
        self.chunks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once the first indexing pass has completed.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Atomically replace the whole chunk collection and mark the index ready.
    pub fn replace(&self, chunks: Vec<Chunk>) {
        *self.chunks.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(chunks);
        self.ready.store(true, Ordering::Release);
    }

    /// Rebuild the index from `root` (or an empty corpus when `None`).
    ///
    /// Never fails: an unreadable root is logged and indexes zero documents.
    /// Filesystem work runs on the blocking pool.
    pub async fn index_corpus(
        &self,
        root: Option<&Path>,
        corpus: &CorpusConfig,
        chunking: &ChunkingConfig,
    ) -> IndexStats {
        let files = match root {
            Some(root) => match read_corpus(root.to_path_buf(), corpus.clone()).await {
                Ok(files) => files,
                Err(e) => {
                    tracing::warn!(root = %root.display(), error = %e, "corpus scan failed, indexing nothing");
                    Vec::new()
                }
            },
            None => {
                tracing::warn!("no corpus root found, indexing nothing");
                Vec::new()
            }
        };

        let chunks = chunk_files(&files, chunking);
        let stats = IndexStats {
            documents: files.len(),
            chunks: chunks.len(),
        };
        self.replace(chunks);
        tracing::info!(
            documents = stats.documents,
            chunks = stats.chunks,
            "corpus indexed"
        );
        stats
    }
}

async fn read_corpus(root: PathBuf, corpus: CorpusConfig) -> Result<Vec<CorpusFile>> {
    tokio::task::spawn_blocking(move || scan_corpus(&root, &corpus))
        .await
        .context("corpus scan task panicked")?
}

/// Chunk every file in order.
pub fn chunk_files(files: &[CorpusFile], chunking: &ChunkingConfig) -> Vec<Chunk> {
    files
        .iter()
        .flat_map(|f| {
            let chunks = build_chunks(
                &f.source,
                &f.body,
                chunking.max_chars,
                chunking.section_max_chars,
            );
            tracing::debug!(source = %f.source, chunks = chunks.len(), "chunked document");
            chunks
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_index_and_reindex_replaces() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "Alpha one.\n\nAlpha two.").unwrap();
        fs::write(tmp.path().join("b.md"), "Beta.").unwrap();

        let index = CorpusIndex::new();
        assert!(!index.is_ready());

        let stats = index
            .index_corpus(Some(tmp.path()), &CorpusConfig::default(), &ChunkingConfig::default())
            .await;
        assert_eq!(stats, IndexStats { documents: 2, chunks: 2 });
        assert!(index.is_ready());

        let before = index.snapshot();
        fs::remove_file(tmp.path().join("b.md")).unwrap();
        index
            .index_corpus(Some(tmp.path()), &CorpusConfig::default(), &ChunkingConfig::default())
            .await;

        // Old snapshot is untouched; new one has no trace of b.md.
        assert_eq!(before.len(), 2);
        let after = index.snapshot();
        assert_eq!(after.len(), 1);
        assert!(after.iter().all(|c| c.source == "a.md"));
    }

    #[tokio::test]
    async fn test_missing_root_indexes_nothing() {
        let tmp = TempDir::new().unwrap();
        let index = CorpusIndex::new();
        let stats = index
            .index_corpus(
                Some(&tmp.path().join("missing")),
                &CorpusConfig::default(),
                &ChunkingConfig::default(),
            )
            .await;
        assert_eq!(stats, IndexStats::default());
        assert!(index.is_ready());
        assert!(index.is_empty());
    }

    #[test]
    fn test_chunk_files_skips_empty_documents() {
        let files = vec![
            CorpusFile {
                source: "empty.md".to_string(),
                body: "  \n\n ".to_string(),
            },
            CorpusFile {
                source: "full.md".to_string(),
                body: "Content.".to_string(),
            },
        ];
        let chunks = chunk_files(&files, &ChunkingConfig::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, "full.md#0");
    }
}
