//! Fuzzy domain matching: decides whether a query is about Aira/Gigalogy.
//!
//! Voice transcription mangles proper nouns ("Gigalogi", "Giglaogy"), so
//! query tokens of length ≥ [`MIN_FUZZY_LEN`] are snapped to the nearest
//! canonical term when the Levenshtein distance is within
//! [`MAX_EDIT_DISTANCE`]. Shorter tokens only match exactly, which keeps
//! ordinary words from being corrected into product names.
//!
//! A query is in-domain when one of the direct-mention patterns matches the
//! raw text, or when a corrected token is a domain keyword trigger.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};

use crate::text::tokenize;

/// Proper nouns the fuzzy corrector snaps to.
pub const CANONICAL_TERMS: &[&str] = &[
    "aira",
    "maira",
    "gigalogy",
    "g-core",
    "smartads",
    "personalizer",
    "technopreneurship",
    "mosleh",
    "moin",
    "uddin",
];

/// Trigger vocabulary. Includes every canonical term plus topic words that
/// widen the keyword set when they appear in the expanded query.
pub const DOMAIN_KEYWORDS: &[&str] = &[
    "aira",
    "maira",
    "gigalogy",
    "g-core",
    "smartads",
    "personalizer",
    "technopreneurship",
    "mosleh",
    "moin",
    "uddin",
    "founder",
    "ceo",
    "cto",
    "leadership",
    "pilot",
    "go-to-market",
    "voice assistant",
    "recommendation engine",
];

/// Case-insensitive patterns for direct mentions in the raw query.
pub const MENTION_PATTERNS: &[&str] = &[
    r"\baira\b",
    r"\bmaira\b",
    r"\bgigalogy\b",
    r"\bg[\s-]?core\b",
    r"\bsmart\s?ads\b",
    r"\bpersonali[sz]er\b",
    r"\btechnopreneurship\b",
    r"\b(?:mosleh|moin)\s+uddin\b",
    r"\byour\s+(?:team|company|founders?|ceo|creators?)\b",
    r"\bwho\s+(?:made|built|created)\s+you\b",
];

/// Tokens shorter than this are never fuzzily corrected.
pub const MIN_FUZZY_LEN: usize = 4;

/// Largest edit distance accepted as a misspelling.
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Canonical-term corrector and in-domain classifier.
#[derive(Debug, Clone)]
pub struct DomainMatcher {
    canonical: Vec<String>,
    keywords: BTreeSet<String>,
    mentions: Vec<Regex>,
}

impl DomainMatcher {
    /// Build a matcher from explicit vocabularies.
    ///
    /// Terms and keywords are lowercased. Fails if a mention pattern does
    /// not compile.
    pub fn new<S: AsRef<str>>(
        canonical_terms: &[S],
        keywords: &[S],
        mention_patterns: &[S],
    ) -> Result<Self, regex::Error> {
        let mentions = mention_patterns
            .iter()
            .map(|p| RegexBuilder::new(p.as_ref()).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            canonical: canonical_terms
                .iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
            keywords: keywords
                .iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            mentions,
        })
    }

    pub fn canonical_terms(&self) -> &[String] {
        &self.canonical
    }

    pub fn domain_keywords(&self) -> &BTreeSet<String> {
        &self.keywords
    }

    /// Canonical terms recovered from the query, exact or fuzzy.
    pub fn correct_domain_tokens(&self, query: &str) -> BTreeSet<String> {
        let mut corrected = BTreeSet::new();
        for token in tokenize(query) {
            if self.canonical.iter().any(|c| *c == token) {
                corrected.insert(token);
                continue;
            }
            if token.chars().count() < MIN_FUZZY_LEN {
                continue;
            }
            if let Some(nearest) = self.nearest_canonical(&token) {
                corrected.insert(nearest.to_string());
            }
        }
        corrected
    }

    /// Nearest canonical term within [`MAX_EDIT_DISTANCE`]. Ties go to the
    /// term listed first.
    fn nearest_canonical(&self, token: &str) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for term in &self.canonical {
            let d = edit_distance(token, term);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((term.as_str(), d));
            }
        }
        best.filter(|(_, d)| *d <= MAX_EDIT_DISTANCE)
            .map(|(t, _)| t)
    }

    /// True when the raw query mentions the domain directly or a corrected
    /// token is a domain keyword.
    pub fn is_domain_query(&self, query: &str, corrected: &BTreeSet<String>) -> bool {
        self.mentions.iter().any(|re| re.is_match(query))
            || corrected.iter().any(|t| self.keywords.contains(t))
    }
}

impl Default for DomainMatcher {
    fn default() -> Self {
        Self::new(CANONICAL_TERMS, DOMAIN_KEYWORDS, MENTION_PATTERNS)
            .expect("built-in mention patterns are valid")
    }
}

/// Levenshtein distance with unit insert/delete/substitute costs, over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
