//! Filesystem connector: walks the corpus root and reads text documents.
//!
//! Hidden files and directories (any path component starting with `.`) and
//! image files are skipped. Files that are not valid UTF-8 or cannot be read
//! are logged and skipped; one bad file never aborts a scan.

use anyhow::{bail, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use crate::config::CorpusConfig;

/// Image extensions that are never indexed.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "svg", "ico", "tif", "tiff", "heic", "avif",
];

/// A corpus document read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusFile {
    /// Path relative to the corpus root, `/`-separated.
    pub source: String,
    pub body: String,
}

/// Read every indexable document under `root`, sorted by relative path.
pub fn scan_corpus(root: &Path, config: &CorpusConfig) -> Result<Vec<CorpusFile>> {
    if !root.is_dir() {
        bail!("Corpus root does not exist: {}", root.display());
    }

    let mut excludes: Vec<String> = IMAGE_EXTENSIONS
        .iter()
        .map(|ext| format!("**/*.{}", ext))
        .collect();
    excludes.extend(config.exclude_globs.iter().cloned());
    let exclude_set = build_globset(&excludes)?;

    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(config.follow_symlinks)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable corpus entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let source = normalize_source(relative);

        if exclude_set.is_match(&source) {
            continue;
        }

        match std::fs::read_to_string(path) {
            Ok(body) => files.push(CorpusFile { source, body }),
            Err(e) => tracing::warn!(file = %source, error = %e, "skipping unreadable corpus file"),
        }
    }

    // Sort for deterministic ordering
    files.sort_by(|a, b| a.source.cmp(&b.source));

    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Relative path with `/` separators regardless of platform.
fn normalize_source(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(GlobBuilder::new(pattern).case_insensitive(true).build()?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sources(files: &[CorpusFile]) -> Vec<&str> {
        files.iter().map(|f| f.source.as_str()).collect()
    }

    #[test]
    fn test_scan_skips_hidden_and_images() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("team")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("about.md"), "About Gigalogy").unwrap();
        fs::write(root.join("team/leaders.txt"), "CEO").unwrap();
        fs::write(root.join(".hidden.md"), "secret").unwrap();
        fs::write(root.join(".git/config"), "[core]").unwrap();
        fs::write(root.join("logo.PNG"), [0u8, 1, 2]).unwrap();
        fs::write(root.join("team/photo.jpg"), [0u8, 1, 2]).unwrap();

        let files = scan_corpus(root, &CorpusConfig::default()).unwrap();
        assert_eq!(sources(&files), vec!["about.md", "team/leaders.txt"]);
        assert_eq!(files[0].body, "About Gigalogy");
    }

    #[test]
    fn test_scan_skips_non_utf8() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("good.md"), "ok").unwrap();
        fs::write(tmp.path().join("blob.bin"), [0xffu8, 0xfe, 0x00, 0x80]).unwrap();
        let files = scan_corpus(tmp.path(), &CorpusConfig::default()).unwrap();
        assert_eq!(sources(&files), vec!["good.md"]);
    }

    #[test]
    fn test_scan_extra_excludes() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("drafts")).unwrap();
        fs::write(tmp.path().join("drafts/wip.md"), "draft").unwrap();
        fs::write(tmp.path().join("final.md"), "final").unwrap();
        let config = CorpusConfig {
            exclude_globs: vec!["drafts/**".to_string()],
            ..CorpusConfig::default()
        };
        let files = scan_corpus(tmp.path(), &config).unwrap();
        assert_eq!(sources(&files), vec!["final.md"]);
    }

    #[test]
    fn test_scan_missing_root() {
        let tmp = TempDir::new().unwrap();
        assert!(scan_corpus(&tmp.path().join("nope"), &CorpusConfig::default()).is_err());
    }
}
