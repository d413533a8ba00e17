//! Text normalization and tokenization.
//!
//! [`normalize`] cleans corpus documents before chunking: it drops
//! conversational filler lines that leak into hand-written knowledge files
//! and strips markdown syntax down to the visible text, keeping blank lines
//! so paragraph boundaries survive.
//!
//! [`tokenize`] produces the lowercase word tokens used for keyword sets
//! and query matching. Its output is stable under re-tokenization.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Words that carry no retrieval signal.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "so", "of", "to", "in", "on", "at", "by", "for",
    "with", "from", "as", "into", "about", "is", "are", "was", "were", "be", "been", "being",
    "am", "do", "does", "did", "have", "has", "had", "will", "would", "can", "could", "should",
    "may", "might", "must", "it", "its", "this", "that", "these", "those", "there", "here",
    "what", "which", "who", "whom", "whose", "when", "where", "why", "how", "me", "my", "you",
    "your", "we", "our", "us", "they", "them", "their", "he", "him", "his", "she", "her",
    "tell", "please", "know", "some", "any", "all", "also", "just", "than", "then", "not",
];

/// Lines that are assistant chatter rather than knowledge.
static FILLER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(?:sure|certainly|absolutely|of course)[,!.]?\s+(?:here|i)\b|here(?:'s| is) (?:a|an|the|your) (?:summary|overview|draft|rewrite|version|breakdown)\b|as an ai\b|i hope (?:this|that) helps|let me know if (?:you|there(?:'s| is)|anything)\b|feel free to (?:ask|let me know)\b)",
    )
    .expect("filler pattern is valid")
});

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:```|~~~)[\w+-]*\s*$").expect("fence pattern is valid"));

static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#{1,6}\s+").expect("heading pattern is valid"));

static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*+]|\d{1,3}[.)])\s+").expect("list pattern is valid")
});

static QUOTE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*>\s?").expect("quote pattern is valid"));

static IMAGE_OR_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").expect("link pattern is valid")
});

static STRONG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\*\*|__)([^*_]+?)(\*\*|__)").expect("strong pattern is valid")
});

/// `*em*` anywhere, `_em_` only at word boundaries so `snake_case` survives.
/// Both boundaries are zero-width, so adjacent spans all match.
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*|\b_([^_\s](?:[^_]*[^_\s])?)_\b")
        .expect("emphasis pattern is valid")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").expect("whitespace pattern is valid"));

/// Strip markup noise from a document, line by line.
///
/// Filler lines are removed entirely. Every other line is kept (blank lines
/// included) with code fences, backticks, emphasis, link syntax, and
/// heading/list/quote markers removed and inner whitespace collapsed.
pub fn normalize(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    for line in text.lines() {
        if FILLER_LINE.is_match(line) {
            continue;
        }
        if FENCE.is_match(line) {
            out.push(String::new());
            continue;
        }
        out.push(clean_line(line));
    }
    out.join("\n")
}

fn clean_line(line: &str) -> String {
    let line = HEADING_MARKER.replace(line, "");
    let line = LIST_MARKER.replace(&line, "");
    let line = QUOTE_MARKER.replace(&line, "");
    let line = IMAGE_OR_LINK.replace_all(&line, "$1");
    let line = STRONG.replace_all(&line, "$2");
    let line = EMPHASIS.replace_all(&line, "$1$2");
    let line = line.replace('`', "");
    WHITESPACE_RUN.replace_all(&line, " ").trim().to_string()
}

/// Lowercase word tokens with punctuation, one-character tokens, and stop
/// words removed. Hyphens inside words are kept (`g-core`).
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|t| t.len() > 1 && !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// [`tokenize`] collected into a set.
pub fn to_keywords(text: &str) -> BTreeSet<String> {
    tokenize(text).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(
            tokenize("Who is the CEO of Gigalogy?"),
            vec!["ceo".to_string(), "gigalogy".to_string()]
        );
    }

    #[test]
    fn test_tokenize_keeps_hyphen_and_digits() {
        assert_eq!(
            tokenize("G-Core v2 launched in 2023!"),
            vec!["g-core", "v2", "launched", "2023"]
        );
    }

    #[test]
    fn test_tokenize_drops_short_and_non_ascii() {
        assert_eq!(tokenize("I a x café"), vec!["caf"]);
    }

    #[test]
    fn test_tokenize_idempotent() {
        let inputs = [
            "What's the weather today?",
            "**Aira** — voice AI by Gigalogy (Tokyo, 2017). CEO: Mosleh Uddin.",
            "multi\tline\n\ntext -- with -- dashes",
            "",
        ];
        for input in inputs {
            let once = tokenize(input);
            let twice = tokenize(&once.join(" "));
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_to_keywords_dedupes() {
        let kw = to_keywords("Aira aira AIRA team");
        assert_eq!(kw.len(), 2);
        assert!(kw.contains("aira"));
        assert!(kw.contains("team"));
    }

    #[test]
    fn test_normalize_strips_markdown() {
        let input = "# Heading\n- **Bold** item with [a link](https://x.y)\n1. `code` and *emph*";
        assert_eq!(
            normalize(input),
            "Heading\nBold item with a link\ncode and emph"
        );
    }

    #[test]
    fn test_normalize_drops_filler_keeps_blank_lines() {
        let input = "Sure, here is the overview you asked for:\n\nGigalogy builds AI.\n\nI hope this helps!";
        assert_eq!(normalize(input), "\nGigalogy builds AI.\n");
    }

    #[test]
    fn test_normalize_code_fences() {
        let input = "Intro\n```rust\nlet x = 1;\n```\nOutro";
        assert_eq!(normalize(input), "Intro\n\nlet x = 1;\n\nOutro");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  a \t  b   c  "), "a b c");
    }

    #[test]
    fn test_normalize_adjacent_emphasis() {
        let out = normalize("*fast* *cheap* and **bold** __x__ _one_ _two_");
        assert_eq!(out, "fast cheap and bold x one two");
        assert!(!out.contains('*'));
    }

    #[test]
    fn test_normalize_keeps_lone_asterisks() {
        assert_eq!(normalize("2 * 3 * 4"), "2 * 3 * 4");
    }

    #[test]
    fn test_normalize_keeps_knowledge_lines_that_open_like_filler() {
        let input = "Feel free to contact sales at sales@gigalogy.com.\nLet me know if you need anything else!\nFeel free to ask more questions.";
        assert_eq!(
            normalize(input),
            "Feel free to contact sales at sales@gigalogy.com."
        );
    }

    #[test]
    fn test_normalize_keeps_snake_case() {
        assert_eq!(normalize("use max_chunk_length here"), "use max_chunk_length here");
    }
}
