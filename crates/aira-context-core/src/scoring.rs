//! Chunk scoring strategies.
//!
//! [`Scorer`] is the seam between query analysis and ranking: the retriever
//! only asks a scorer for a number per chunk, so lexical scoring can be
//! replaced (for example by embedding similarity) without touching callers.
//!
//! [`KeywordScorer`] is the lexical strategy: one weight per query keyword
//! found in the chunk keyword set, plus bonuses for primary domain entities,
//! priority sources, and leadership vocabulary.

use std::collections::BTreeSet;

use crate::models::Chunk;
use crate::query::QueryProfile;

/// Entities whose co-occurrence in query and chunk earns a bonus.
pub const PRIMARY_ENTITIES: &[&str] = &["gigalogy", "aira"];

/// Source path fragments that rank first when the query names them.
pub const PRIORITY_SOURCES: &[&str] = &["gigalogy"];

/// Chunk keywords that describe people by role.
pub const ROLE_TERMS: &[&str] = &[
    "ceo",
    "cto",
    "coo",
    "cfo",
    "chief",
    "founder",
    "co-founder",
    "director",
    "president",
    "leadership",
    "executive",
    "management",
];

/// A strategy that assigns a relevance score to a chunk for a query.
///
/// Scores are compared only with each other; a score of zero or below means
/// the chunk is not relevant.
pub trait Scorer: Send + Sync {
    fn score(&self, query: &QueryProfile, chunk: &Chunk) -> f64;
}

/// Weights for [`KeywordScorer`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreWeights {
    /// Per query keyword present in the chunk.
    pub keyword: f64,
    /// Primary entity named by both query and chunk.
    pub primary_entity: f64,
    /// Chunk source matches a priority record the query references.
    pub priority_source: f64,
    /// Leadership question and the chunk carries role vocabulary.
    pub leadership: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            keyword: 1.0,
            primary_entity: 3.0,
            priority_source: 2.0,
            leadership: 2.0,
        }
    }
}

/// Lexical keyword-overlap scorer.
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    weights: ScoreWeights,
    primary_entities: Vec<String>,
    priority_sources: Vec<String>,
    role_terms: BTreeSet<String>,
}

impl KeywordScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self {
            weights,
            primary_entities: PRIMARY_ENTITIES.iter().map(|s| s.to_string()).collect(),
            priority_sources: PRIORITY_SOURCES.iter().map(|s| s.to_string()).collect(),
            role_terms: ROLE_TERMS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new(ScoreWeights::default())
    }
}

impl Scorer for KeywordScorer {
    fn score(&self, query: &QueryProfile, chunk: &Chunk) -> f64 {
        if query.keywords.is_empty() {
            return 0.0;
        }

        let hits = query
            .keywords
            .iter()
            .filter(|k| chunk.keywords.contains(*k))
            .count();
        let mut score = hits as f64 * self.weights.keyword;

        for entity in &self.primary_entities {
            if query.keywords.contains(entity) && chunk.keywords.contains(entity) {
                score += self.weights.primary_entity;
            }
        }

        let source = chunk.source.to_lowercase();
        for priority in &self.priority_sources {
            if query.keywords.contains(priority) && source.contains(priority.as_str()) {
                score += self.weights.priority_source;
            }
        }

        if query.asks_leadership && chunk.keywords.iter().any(|k| self.role_terms.contains(k)) {
            score += self.weights.leadership;
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::build_chunks;
    use crate::domain::DomainMatcher;

    fn chunk(source: &str, text: &str) -> Chunk {
        build_chunks(source, text, 900, 120).remove(0)
    }

    #[test]
    fn test_keyword_hits() {
        let m = DomainMatcher::default();
        let q = QueryProfile::build(&m, "smartads pricing");
        let c = chunk("products.md", "SmartAds pricing starts at a flat monthly fee.");
        assert_eq!(KeywordScorer::default().score(&q, &c), 2.0);
    }

    #[test]
    fn test_no_overlap_scores_zero() {
        let m = DomainMatcher::default();
        let q = QueryProfile::build(&m, "personalizer");
        let c = chunk("misc.md", "Office hours are nine to five.");
        assert_eq!(KeywordScorer::default().score(&q, &c), 0.0);
    }

    #[test]
    fn test_empty_keywords_force_zero() {
        let m = DomainMatcher::default();
        let q = QueryProfile::build(&m, "the of and");
        assert!(q.keywords.is_empty());
        let c = chunk("gigalogy.md", "Gigalogy leadership team.");
        assert_eq!(KeywordScorer::default().score(&q, &c), 0.0);
    }

    #[test]
    fn test_primary_entity_and_priority_source_bonus() {
        let m = DomainMatcher::default();
        let q = QueryProfile::build(&m, "gigalogy");
        let plain = chunk("notes.md", "Gigalogy is an AI company.");
        let priority = chunk("companies/gigalogy.md", "Gigalogy is an AI company.");
        let s = KeywordScorer::default();
        // 1 keyword + 3 entity
        assert_eq!(s.score(&q, &plain), 4.0);
        // + 2 priority source
        assert_eq!(s.score(&q, &priority), 6.0);
    }

    #[test]
    fn test_leadership_bonus() {
        let m = DomainMatcher::default();
        let q = QueryProfile::build(&m, "who founded maira");
        let leaders = chunk("team.md", "Our CEO leads product strategy.");
        let other = chunk("team.md", "Product strategy is reviewed quarterly.");
        let s = KeywordScorer::default();
        assert!(s.score(&q, &leaders) > s.score(&q, &other));
        // "ceo" keyword hit plus the leadership bonus
        assert_eq!(s.score(&q, &leaders), 3.0);
    }

    #[test]
    fn test_custom_weights() {
        let m = DomainMatcher::default();
        let q = QueryProfile::build(&m, "smartads pricing");
        let c = chunk("products.md", "SmartAds pricing.");
        let s = KeywordScorer::new(ScoreWeights {
            keyword: 0.5,
            ..ScoreWeights::default()
        });
        assert_eq!(s.weights().keyword, 0.5);
        assert_eq!(s.score(&q, &c), 1.0);
    }
}
