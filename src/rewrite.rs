// Rewriter: replaces every mapped image path in the HTML files under a
// root directory with its blob URL. Markup is treated as opaque bytes, so
// pages in legacy encodings pass through untouched outside the matched
// keys. Each mapping key is matched literally, never as a pattern.

use crate::config::RewriteConfig;
use crate::mapping::UrlMapping;
use crate::report::Reporter;
use crate::walker::{self, Walker};
use anyhow::{Context, Result};
use regex::bytes::{NoExpand, Regex};
use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Order in which mapping keys are applied to a file.
///
/// When one key is a substring of another (`images/a.png` and
/// `images/a.png.bak`) the order decides which one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrder {
    /// Longer keys first; keys of equal length keep file order.
    #[default]
    LongestFirst,
    /// Exactly the order keys appear in the mapping file.
    Insertion,
}

impl FromStr for KeyOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "longest-first" => Ok(KeyOrder::LongestFirst),
            "insertion" => Ok(KeyOrder::Insertion),
            other => Err(format!("expected `longest-first` or `insertion`, got `{other}`")),
        }
    }
}

struct Rule {
    pattern: Regex,
    replacement: String,
}

/// Compiled set of literal replacements.
pub struct Rewriter {
    rules: Vec<Rule>,
}

impl Rewriter {
    pub fn new(mapping: &UrlMapping, order: KeyOrder) -> Result<Self, regex::Error> {
        let mut entries: Vec<(&str, &str)> = mapping.iter().collect();
        if order == KeyOrder::LongestFirst {
            entries.sort_by_key(|(key, _)| Reverse(key.len()));
        }

        let rules = entries
            .into_iter()
            .map(|(key, url)| -> Result<Rule, regex::Error> {
                Ok(Rule {
                    pattern: Regex::new(&regex::escape(key))?,
                    replacement: url.to_string(),
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Rewriter { rules })
    }

    /// Apply every rule in order; returns the new content and the number
    /// of replacements made.
    pub fn rewrite_bytes(&self, content: &[u8]) -> (Vec<u8>, usize) {
        let mut bytes = content.to_vec();
        let mut count = 0;
        for rule in &self.rules {
            let hits = rule.pattern.find_iter(&bytes).count();
            if hits > 0 {
                bytes = rule
                    .pattern
                    .replace_all(&bytes, NoExpand(rule.replacement.as_bytes()))
                    .into_owned();
                count += hits;
            }
        }
        (bytes, count)
    }

    /// [`Rewriter::rewrite_bytes`] for text already in memory.
    pub fn rewrite_text(&self, content: &str) -> (String, usize) {
        let (bytes, count) = self.rewrite_bytes(content.as_bytes());
        (String::from_utf8_lossy(&bytes).into_owned(), count)
    }

    /// Rewrite one file in place. The file is only written back when
    /// something changed.
    pub fn rewrite_file(&self, path: &Path) -> Result<usize> {
        let content = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let (updated, count) = self.rewrite_bytes(&content);
        if count > 0 {
            std::fs::write(path, updated).with_context(|| format!("Failed to write {}", path.display()))?;
        }
        debug!(path = %path.display(), count, "rewrote file");
        Ok(count)
    }
}

/// Replacement count for one markup file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub replacements: usize,
}

/// Outcome of a full rewriter run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteRun {
    pub files: Vec<FileReport>,
}

impl RewriteRun {
    pub fn total(&self) -> usize {
        self.files.iter().map(|f| f.replacements).sum()
    }

    pub fn files_changed(&self) -> usize {
        self.files.iter().filter(|f| f.replacements > 0).count()
    }
}

/// Rewrite every HTML file under `config.root` using an already loaded
/// mapping. The first read or write failure aborts the run.
pub fn run_rewrite(config: &RewriteConfig, mapping: &UrlMapping, reporter: &Reporter) -> Result<RewriteRun> {
    reporter.line(format!("Loaded {} image mappings", mapping.image_count()));

    let rewriter = Rewriter::new(mapping, config.key_order).context("Failed to compile url mapping")?;
    let files = Walker::new(&config.root)
        .files(walker::is_markup)
        .context("Failed to find HTML files")?;
    reporter.line(format!("Found {} HTML files", files.len()));

    let mut run = RewriteRun::default();
    for path in files {
        reporter.line(format!("Processing {}...", path.display()));
        let replacements = rewriter.rewrite_file(&path)?;
        if replacements > 0 {
            reporter.success(format!("   Updated {replacements} image references"));
        } else {
            reporter.line("   No changes needed");
        }
        run.files.push(FileReport { path, replacements });
    }
    Ok(run)
}
