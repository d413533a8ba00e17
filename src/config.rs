//! TOML configuration parsing and validation.
//!
//! Every section is optional; a missing file means "all defaults". Corpus and
//! record locations are ordered candidate lists resolved to the first
//! directory that exists, so the same config works from the repository root
//! and from a `server/` subdirectory.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use aira_context_core::chunk::{DEFAULT_MAX_CHARS, DEFAULT_SECTION_MAX_CHARS};
use aira_context_core::domain::{DomainMatcher, CANONICAL_TERMS, DOMAIN_KEYWORDS, MENTION_PATTERNS};
use aira_context_core::retrieve::DEFAULT_TOP_K;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub records: RecordsConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub domain: DomainConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    #[serde(default = "default_corpus_roots")]
    pub roots: Vec<PathBuf>,
    /// Extra glob patterns (relative to the root) to skip.
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            roots: default_corpus_roots(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

fn default_corpus_roots() -> Vec<PathBuf> {
    vec![
        PathBuf::from("./data/knowledge"),
        PathBuf::from("../data/knowledge"),
    ]
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecordsConfig {
    #[serde(default = "default_record_dirs")]
    pub dirs: Vec<PathBuf>,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            dirs: default_record_dirs(),
        }
    }
}

fn default_record_dirs() -> Vec<PathBuf> {
    vec![
        PathBuf::from("./data/companies"),
        PathBuf::from("../data/companies"),
    ]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_section_max_chars")]
    pub section_max_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            section_max_chars: DEFAULT_SECTION_MAX_CHARS,
        }
    }
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}
fn default_section_max_chars() -> usize {
    DEFAULT_SECTION_MAX_CHARS
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Overrides for the built-in domain vocabularies. Empty lists keep the
/// defaults.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DomainConfig {
    #[serde(default)]
    pub canonical_terms: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub mention_patterns: Vec<String>,
}

impl DomainConfig {
    pub fn build_matcher(&self) -> Result<DomainMatcher> {
        let pick = |custom: &[String], builtin: &[&str]| -> Vec<String> {
            if custom.is_empty() {
                builtin.iter().map(|s| s.to_string()).collect()
            } else {
                custom.to_vec()
            }
        };
        let canonical = pick(&self.canonical_terms, CANONICAL_TERMS);
        let keywords = pick(&self.keywords, DOMAIN_KEYWORDS);
        let patterns = pick(&self.mention_patterns, MENTION_PATTERNS);
        DomainMatcher::new(&canonical[..], &keywords[..], &patterns[..])
            .context("Invalid domain.mention_patterns")
    }
}

impl Config {
    /// First existing corpus root, if any.
    pub fn corpus_root(&self) -> Option<PathBuf> {
        first_existing(&self.corpus.roots)
    }

    /// First existing records directory, falling back to the first
    /// candidate (it is created on load).
    pub fn records_dir(&self) -> PathBuf {
        first_existing(&self.records.dirs)
            .or_else(|| self.records.dirs.first().cloned())
            .unwrap_or_else(|| PathBuf::from("./data/companies"))
    }
}

/// First candidate that is an existing directory.
pub fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_dir()).cloned()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise use defaults.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::info!(path = %path.display(), "config file not found, using defaults");
        let config = Config::default();
        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &Config) -> Result<()> {
    // Validate chunking
    if config.chunking.max_chars == 0 {
        bail!("chunking.max_chars must be > 0");
    }
    if config.chunking.section_max_chars == 0 {
        bail!("chunking.section_max_chars must be > 0");
    }

    // Validate retrieval
    if config.retrieval.top_k < 1 {
        bail!("retrieval.top_k must be >= 1");
    }

    // Validate locations
    if config.corpus.roots.is_empty() {
        bail!("corpus.roots must list at least one directory");
    }
    if config.records.dirs.is_empty() {
        bail!("records.dirs must list at least one directory");
    }

    config.domain.build_matcher()?;

    Ok(())
}
