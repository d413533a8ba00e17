//! Request screening applied before retrieval.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Word-boundary patterns for requests the assistant refuses.
pub const INAPPROPRIATE_PATTERNS: &[&str] = &[
    r"\b(?:sex|sexual|nude|porn|explicit|erotic)\b",
    r"\b(?:kill|murder|bomb|terror|assault)\b",
    r"\b(?:hate\s+speech|racist|sexist|slur)\b",
    r"\b(?:hack|malware|phishing|exploit)\b",
    r"\b(?:drugs?|meth|cocaine|heroin)\b",
];

const REFUSAL: &str = "I can’t help with that request. If you want, I can still help with Aira, Gigalogy, your team, or Technopreneurship information.";

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    INAPPROPRIATE_PATTERNS
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .expect("safety pattern is valid")
        })
        .collect()
});

/// True when the query matches one of [`INAPPROPRIATE_PATTERNS`].
/// Blank input is never inappropriate.
pub fn is_inappropriate_query(input: &str) -> bool {
    let text = input.trim();
    !text.is_empty() && PATTERNS.iter().any(|re| re.is_match(text))
}

pub fn refusal_message() -> &'static str {
    REFUSAL
}
