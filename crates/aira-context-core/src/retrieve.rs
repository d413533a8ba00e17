//! Context assembly: domain gating, record matching, and chunk ranking.
//!
//! The retriever works entirely through a [`RecordSource`], a chunk slice,
//! a [`DomainMatcher`] and a [`Scorer`]. It never mutates any of them and
//! never fails: "no context" is an empty string.
//!
//! # Algorithm
//!
//! 1. Build a [`QueryProfile`] (corrected tokens, expanded query, keywords).
//! 2. Without an explicit record id, out-of-domain queries stop here.
//! 3. Explicit id: emit that record. Otherwise emit every record whose
//!    lowercased name or id occurs in the expanded query.
//! 4. Score every chunk, keep scores > 0, stable-sort descending, keep
//!    `top_k`.
//! 5. Render record blocks then chunk blocks joined by [`BLOCK_SEPARATOR`].

use serde::Serialize;

use crate::domain::DomainMatcher;
use crate::models::{Chunk, Record};
use crate::query::QueryProfile;
use crate::scoring::Scorer;
use crate::store::RecordSource;

/// Joins rendered blocks in the returned context.
pub const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// Default number of chunk blocks returned.
pub const DEFAULT_TOP_K: usize = 6;

/// Bundles the inputs for a single retrieval.
#[derive(Debug, Clone)]
pub struct RetrieveRequest<'a> {
    /// Free-text user query.
    pub query: &'a str,
    /// Explicit record to inject. Bypasses domain gating.
    pub record_id: Option<&'a str>,
    /// Maximum number of chunk blocks.
    pub top_k: usize,
}

impl<'a> RetrieveRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self {
            query,
            record_id: None,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_record(mut self, record_id: Option<&'a str>) -> Self {
        self.record_id = record_id;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

/// A chunk selected for the context, with its score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub chunk_id: String,
    pub source: String,
    pub section: String,
    pub text: String,
    pub score: f64,
}

/// The outcome of one retrieval, before rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Retrieval {
    pub in_domain: bool,
    /// Set when the query was dropped by domain gating.
    pub gated: bool,
    pub corrected: Vec<String>,
    pub keywords: Vec<String>,
    pub records: Vec<Record>,
    pub chunks: Vec<ScoredChunk>,
}

impl Retrieval {
    fn gated(profile: &QueryProfile) -> Self {
        Self {
            in_domain: false,
            gated: true,
            corrected: profile.corrected.iter().cloned().collect(),
            keywords: profile.keywords.iter().cloned().collect(),
            records: Vec::new(),
            chunks: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.chunks.is_empty()
    }

    /// Render the context string handed to the language model.
    pub fn render(&self) -> String {
        let record_blocks = self
            .records
            .iter()
            .map(|r| format!("Record: {}\n{}", r.name, r.content));
        let chunk_blocks = self
            .chunks
            .iter()
            .map(|c| format!("Source: {}\nSection: {}\n{}", c.source, c.section, c.text));
        record_blocks
            .chain(chunk_blocks)
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR)
    }
}

/// Run the full retrieval pipeline and return the structured result.
pub fn plan<R>(
    records: &R,
    chunks: &[Chunk],
    matcher: &DomainMatcher,
    scorer: &dyn Scorer,
    req: &RetrieveRequest<'_>,
) -> Retrieval
where
    R: RecordSource + ?Sized,
{
    let profile = QueryProfile::build(matcher, req.query);

    if req.record_id.is_none() && !profile.in_domain {
        return Retrieval::gated(&profile);
    }

    let matched_records = match req.record_id {
        Some(id) => records.get_record(id).into_iter().collect(),
        None => records
            .list_records()
            .into_iter()
            .filter(|r| mentions(&profile.expanded, &r.name) || mentions(&profile.expanded, &r.id))
            .collect(),
    };

    let mut scored: Vec<(f64, &Chunk)> = chunks
        .iter()
        .map(|c| (scorer.score(&profile, c), c))
        .filter(|(s, _)| *s > 0.0)
        .collect();
    // `sort_by` is stable: equal scores keep index order.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(req.top_k);

    Retrieval {
        in_domain: profile.in_domain,
        gated: false,
        corrected: profile.corrected.into_iter().collect(),
        keywords: profile.keywords.into_iter().collect(),
        records: matched_records,
        chunks: scored
            .into_iter()
            .map(|(score, c)| ScoredChunk {
                chunk_id: c.id.clone(),
                source: c.source.clone(),
                section: c.section.clone(),
                text: c.text.clone(),
                score,
            })
            .collect(),
    }
}

fn mentions(expanded: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    !needle.is_empty() && expanded.contains(&needle)
}

/// Retrieve the context string for a query. Empty means "no context".
pub fn retrieve<R>(
    records: &R,
    chunks: &[Chunk],
    matcher: &DomainMatcher,
    scorer: &dyn Scorer,
    req: &RetrieveRequest<'_>,
) -> String
where
    R: RecordSource + ?Sized,
{
    plan(records, chunks, matcher, scorer, req).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::build_chunks;
    use crate::scoring::KeywordScorer;
    use crate::store::memory::InMemoryRecords;

    fn fixture() -> (InMemoryRecords, Vec<Chunk>) {
        let records: InMemoryRecords = [
            Record::new(
                "gigalogy",
                "Gigalogy",
                "Gigalogy is an AI and machine learning company.",
            ),
            Record::new("acme", "Acme Robotics", "Acme builds warehouse robots."),
        ]
        .into_iter()
        .collect();

        let mut chunks = build_chunks(
            "companies/gigalogy.md",
            "# Gigalogy\n\nGigalogy builds G-Core and SmartAds.\n\n## Leadership\n\nMosleh Uddin serves as CEO.",
            40,
            120,
        );
        chunks.extend(build_chunks(
            "products/aira.md",
            "# Aira\n\nAira is a voice assistant built by Gigalogy.",
            900,
            120,
        ));
        chunks.extend(build_chunks(
            "misc/office.md",
            "Office hours are nine to five.",
            900,
            120,
        ));
        (records, chunks)
    }

    fn run(records: &InMemoryRecords, chunks: &[Chunk], req: &RetrieveRequest<'_>) -> String {
        retrieve(
            records,
            chunks,
            &DomainMatcher::default(),
            &KeywordScorer::default(),
            req,
        )
    }

    #[test]
    fn test_out_of_domain_returns_empty() {
        let (records, chunks) = fixture();
        let out = run(&records, &chunks, &RetrieveRequest::new("What's the weather today?"));
        assert_eq!(out, "");
    }

    #[test]
    fn test_explicit_record_bypasses_gate() {
        let (records, chunks) = fixture();
        let req = RetrieveRequest::new("What's the weather today?").with_record(Some("acme"));
        let out = run(&records, &chunks, &req);
        assert_eq!(out, "Record: Acme Robotics\nAcme builds warehouse robots.");
    }

    #[test]
    fn test_explicit_unknown_record() {
        let (records, chunks) = fixture();
        let req = RetrieveRequest::new("What's the weather today?").with_record(Some("nope"));
        assert_eq!(run(&records, &chunks, &req), "");
    }

    #[test]
    fn test_record_name_match_then_chunks() {
        let (records, chunks) = fixture();
        let out = run(&records, &chunks, &RetrieveRequest::new("Tell me about Gigalogy"));
        let blocks: Vec<&str> = out.split(BLOCK_SEPARATOR).collect();
        assert!(blocks[0].starts_with("Record: Gigalogy\n"));
        assert!(blocks[1].starts_with("Source: companies/gigalogy.md\nSection: "));
        assert!(!out.contains("Office hours"));
    }

    #[test]
    fn test_fuzzy_record_match_via_expanded_query() {
        let (records, chunks) = fixture();
        let out = run(&records, &chunks, &RetrieveRequest::new("what is gigaloji"));
        assert!(out.starts_with("Record: Gigalogy\n"));
    }

    #[test]
    fn test_leadership_chunk_ranks_first() {
        let (records, chunks) = fixture();
        let r = plan(
            &records,
            &chunks,
            &DomainMatcher::default(),
            &KeywordScorer::default(),
            &RetrieveRequest::new("Who is the founder of Gigalogy?"),
        );
        assert!(r.in_domain);
        assert!(!r.gated);
        assert!(r.chunks[0].text.contains("Mosleh Uddin"));
        for pair in r.chunks.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_deterministic() {
        let (records, chunks) = fixture();
        let req = RetrieveRequest::new("Aira and Gigalogy products");
        assert_eq!(run(&records, &chunks, &req), run(&records, &chunks, &req));
    }

    #[test]
    fn test_top_k_bound() {
        let records = InMemoryRecords::new();
        let chunks: Vec<Chunk> = (0..20)
            .flat_map(|i| {
                build_chunks(
                    &format!("docs/{}.md", i),
                    "Gigalogy builds Aira.",
                    900,
                    120,
                )
            })
            .collect();
        let r = plan(
            &records,
            &chunks,
            &DomainMatcher::default(),
            &KeywordScorer::default(),
            &RetrieveRequest::new("gigalogy"),
        );
        assert_eq!(r.chunks.len(), DEFAULT_TOP_K);
        // Equal scores keep index order.
        let ids: Vec<&str> = r.chunks.iter().map(|c| c.chunk_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["docs/0.md#0", "docs/1.md#0", "docs/2.md#0", "docs/3.md#0", "docs/4.md#0", "docs/5.md#0"]
        );

        let small = plan(
            &records,
            &chunks,
            &DomainMatcher::default(),
            &KeywordScorer::default(),
            &RetrieveRequest::new("gigalogy").with_top_k(2),
        );
        assert_eq!(small.chunks.len(), 2);
    }

    #[test]
    fn test_chunk_block_format() {
        let records = InMemoryRecords::new();
        let chunks = build_chunks("products/aira.md", "# Aira\n\nVoice first.", 900, 120);
        let out = run(&records, &chunks, &RetrieveRequest::new("aira"));
        assert_eq!(out, "Source: products/aira.md\nSection: Aira\nAira\n\nVoice first.");
    }

    #[test]
    fn test_gated_retrieval_is_empty() {
        let (records, chunks) = fixture();
        let r = plan(
            &records,
            &chunks,
            &DomainMatcher::default(),
            &KeywordScorer::default(),
            &RetrieveRequest::new("recipe for pancakes"),
        );
        assert!(r.gated);
        assert!(r.is_empty());
        assert_eq!(r.render(), "");
    }
}
