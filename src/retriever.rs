//! Application entry point for context retrieval.
//!
//! [`ContextRetriever`] owns the record store, the chunk index, the domain
//! matcher and the scorer. Construction does nothing on disk;
//! [`initialize`](ContextRetriever::initialize) loads records and indexes the
//! corpus, and only then does the retriever report ready. Queries that arrive
//! before that get an empty context rather than a partial one.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use aira_context_core::domain::DomainMatcher;
use aira_context_core::retrieve::{plan, Retrieval, RetrieveRequest};
use aira_context_core::scoring::{KeywordScorer, Scorer};

use crate::config::{ChunkingConfig, Config, CorpusConfig};
use crate::index::{CorpusIndex, IndexStats};
use crate::records::RecordStore;

pub struct ContextRetriever {
    records: Arc<RecordStore>,
    index: Arc<CorpusIndex>,
    matcher: DomainMatcher,
    scorer: Box<dyn Scorer>,
    corpus_root: Option<PathBuf>,
    corpus: CorpusConfig,
    chunking: ChunkingConfig,
    top_k: usize,
}

impl ContextRetriever {
    /// Build an uninitialized retriever from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            records: Arc::new(RecordStore::new(config.records_dir())),
            index: Arc::new(CorpusIndex::new()),
            matcher: config.domain.build_matcher()?,
            scorer: Box::new(KeywordScorer::default()),
            corpus_root: config.corpus_root(),
            corpus: config.corpus.clone(),
            chunking: config.chunking.clone(),
            top_k: config.retrieval.top_k,
        })
    }

    /// Swap the scoring strategy.
    pub fn with_scorer(mut self, scorer: Box<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Build and initialize in one step.
    pub async fn open(config: &Config) -> Result<Self> {
        let retriever = Self::from_config(config)?;
        retriever.initialize().await;
        Ok(retriever)
    }

    /// Load records and index the corpus. Safe to call again to reload.
    pub async fn initialize(&self) -> IndexStats {
        self.records.load().await;
        self.reindex().await
    }

    /// Rebuild the chunk index. Readers keep the previous snapshot until the
    /// new one is swapped in.
    pub async fn reindex(&self) -> IndexStats {
        self.index
            .index_corpus(self.corpus_root.as_deref(), &self.corpus, &self.chunking)
            .await
    }

    pub fn is_ready(&self) -> bool {
        self.index.is_ready()
    }

    pub fn records(&self) -> &Arc<RecordStore> {
        &self.records
    }

    pub fn index(&self) -> &Arc<CorpusIndex> {
        &self.index
    }

    pub fn matcher(&self) -> &DomainMatcher {
        &self.matcher
    }

    /// Structured retrieval result, for callers that want the breakdown.
    pub fn plan(&self, query: &str, record_id: Option<&str>) -> Retrieval {
        let chunks = self.index.snapshot();
        let req = RetrieveRequest::new(query)
            .with_record(record_id)
            .with_top_k(self.top_k);
        let retrieval = plan(
            self.records.as_ref(),
            &chunks,
            &self.matcher,
            self.scorer.as_ref(),
            &req,
        );
        tracing::debug!(
            in_domain = retrieval.in_domain,
            gated = retrieval.gated,
            corrected = ?retrieval.corrected,
            records = retrieval.records.len(),
            chunks = retrieval.chunks.len(),
            "retrieval planned"
        );
        retrieval
    }

    /// Context string for `query`. Empty means "answer without context".
    pub fn retrieve(&self, query: &str, record_id: Option<&str>) -> String {
        if !self.is_ready() {
            tracing::warn!("retrieve called before the corpus index was ready");
            return String::new();
        }
        self.plan(query, record_id).render()
    }
}
