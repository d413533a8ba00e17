//! Query analysis: corrected domain tokens, the expanded query, and the
//! keyword set chunks are scored against.
//!
//! Knowledge files describe leadership by title ("CEO", "Managing
//! Director") while users ask about "founders", so founder-type queries pull
//! in role vocabulary and role queries pull in further synonyms.

use std::collections::BTreeSet;

use crate::domain::DomainMatcher;
use crate::text::tokenize;

/// Token prefixes that mark a founder question.
pub const FOUNDER_TERMS: &[&str] = &["founder", "cofounder", "co-founder", "founded", "owner"];

/// Tokens that mark a leadership-role question.
pub const LEADERSHIP_TERMS: &[&str] = &[
    "ceo",
    "cto",
    "coo",
    "cfo",
    "chief",
    "leadership",
    "leader",
    "leaders",
    "director",
    "president",
    "head",
    "executive",
    "management",
];

/// Added to the keyword set for founder questions.
pub const FOUNDER_EXPANSION: &[&str] = &[
    "ceo",
    "chief",
    "executive",
    "leadership",
    "director",
    "founder",
    "co-founder",
];

/// Added to the keyword set for leadership-role questions.
pub const LEADERSHIP_EXPANSION: &[&str] = &[
    "ceo",
    "cto",
    "leadership",
    "management",
    "director",
    "team",
    "role",
];

/// Everything the ranker needs to know about one query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryProfile {
    /// Lowercased raw query followed by the corrected tokens.
    pub expanded: String,
    /// Canonical domain terms recovered from the query.
    pub corrected: BTreeSet<String>,
    /// Keywords chunks are matched against.
    pub keywords: BTreeSet<String>,
    /// The query asks who founded or leads the company.
    pub asks_leadership: bool,
    /// The matcher judged the query in-domain.
    pub in_domain: bool,
}

impl QueryProfile {
    pub fn build(matcher: &DomainMatcher, query: &str) -> Self {
        let corrected = matcher.correct_domain_tokens(query);
        let in_domain = matcher.is_domain_query(query, &corrected);

        let mut expanded = query.to_lowercase();
        if !corrected.is_empty() {
            expanded.push(' ');
            expanded.push_str(&corrected.iter().cloned().collect::<Vec<_>>().join(" "));
        }

        let mut keywords: BTreeSet<String> = tokenize(query).into_iter().collect();
        keywords.extend(corrected.iter().cloned());
        for kw in matcher.domain_keywords() {
            if expanded.contains(kw.as_str()) {
                keywords.extend(tokenize(kw));
            }
        }

        let expanded_tokens = tokenize(&expanded);
        let asks_founder = expanded_tokens
            .iter()
            .any(|t| FOUNDER_TERMS.iter().any(|f| t.starts_with(f)));
        let asks_role = expanded_tokens
            .iter()
            .any(|t| LEADERSHIP_TERMS.contains(&t.as_str()));

        if asks_founder {
            keywords.extend(FOUNDER_EXPANSION.iter().map(|s| s.to_string()));
        }
        if asks_role {
            keywords.extend(LEADERSHIP_EXPANSION.iter().map(|s| s.to_string()));
        }

        Self {
            expanded,
            corrected,
            keywords,
            asks_leadership: asks_founder || asks_role,
            in_domain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expanded_query_appends_corrections() {
        let m = DomainMatcher::default();
        let p = QueryProfile::build(&m, "What is Gigaloji?");
        assert_eq!(p.expanded, "what is gigaloji? gigalogy");
        assert!(p.in_domain);
        assert!(p.keywords.contains("gigalogy"));
        assert!(p.keywords.contains("gigaloji"));
    }

    #[test]
    fn test_domain_keyword_substrings_added() {
        let m = DomainMatcher::default();
        let p = QueryProfile::build(&m, "Is Aira a voice assistant?");
        assert!(p.keywords.contains("voice"));
        assert!(p.keywords.contains("assistant"));
        assert!(p.keywords.contains("aira"));
    }

    #[test]
    fn test_founder_expansion() {
        let m = DomainMatcher::default();
        let p = QueryProfile::build(&m, "Who are the founders of Gigalogy?");
        assert!(p.asks_leadership);
        for kw in ["ceo", "leadership", "director", "founder"] {
            assert!(p.keywords.contains(kw), "missing {}", kw);
        }
    }

    #[test]
    fn test_leadership_expansion() {
        let m = DomainMatcher::default();
        let p = QueryProfile::build(&m, "Who is the CEO of Gigalogy?");
        assert!(p.asks_leadership);
        assert!(p.keywords.contains("management"));
        assert!(p.keywords.contains("team"));
    }

    #[test]
    fn test_out_of_domain_profile() {
        let m = DomainMatcher::default();
        let p = QueryProfile::build(&m, "What's the weather today?");
        assert!(!p.in_domain);
        assert!(!p.asks_leadership);
        assert!(p.corrected.is_empty());
        assert_eq!(p.expanded, "what's the weather today?");
    }

    #[test]
    fn test_empty_query() {
        let m = DomainMatcher::default();
        let p = QueryProfile::build(&m, "   ");
        assert!(p.keywords.is_empty());
        assert!(!p.in_domain);
    }
}
