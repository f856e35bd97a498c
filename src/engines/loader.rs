//! Bundled-catalog loading
//!
//! Shipped engine definitions live in per-locale directories. Loading walks
//! the locale fallback chain, parses every definition it finds, and unions
//! the results by engine id (first occurrence wins, which also fixes the
//! first-run ordering). Individual malformed definitions are skipped, never
//! fatal.

use super::engine::SearchEngine;
use crate::locales;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Resolves and parses bundled engine-definition files.
///
/// Implementations decide where catalogs live and what format definitions
/// use; the loader only consumes directory lists and parsed engines.
pub trait BundleSource: Send + Sync {
    /// Ordered catalog directories for a locale, most specific first.
    fn definition_dirs(&self, locale: &str) -> Vec<PathBuf>;

    /// Ordered engine-definition files within one catalog directory.
    fn definition_files(&self, dir: &Path) -> Vec<PathBuf>;

    /// Parse a single engine definition.
    fn parse_definition(&self, path: &Path) -> Result<SearchEngine>;
}

/// Load the bundled engine set for a locale.
///
/// Every directory in the fallback chain is consulted; duplicates by id keep
/// their first (most locale-specific) occurrence. A garbage locale degrades
/// to the fallback directory's list, so the result is non-empty whenever the
/// fallback catalog is.
pub fn load_bundled_engines(source: &dyn BundleSource, locale: &str) -> Vec<SearchEngine> {
    let mut engines: Vec<SearchEngine> = Vec::new();

    for dir in source.definition_dirs(locale) {
        for path in source.definition_files(&dir) {
            match source.parse_definition(&path) {
                Ok(engine) => {
                    if engines.iter().any(|e| e.id == engine.id) {
                        debug!(id = %engine.id, path = %path.display(), "duplicate engine id, keeping first");
                    } else {
                        engines.push(engine);
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping malformed engine definition");
                }
            }
        }
    }

    info!(locale, count = engines.len(), "loaded bundled engines");
    engines
}

/// Filesystem bundle layout: `<base>/<locale>/<id>.yaml`, with an optional
/// `list.txt` manifest per directory fixing the shipped order (one engine id
/// per line, `#` starts a comment). Files absent from the manifest are
/// appended in sorted-filename order.
pub struct FsBundleSource {
    base: PathBuf,
    fallback: String,
}

impl FsBundleSource {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            fallback: crate::FALLBACK_LOCALE.to_string(),
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    fn manifest_order(&self, dir: &Path) -> Option<Vec<String>> {
        let text = fs::read_to_string(dir.join("list.txt")).ok()?;
        Some(
            text.lines()
                .map(|line| line.split('#').next().unwrap_or_default().trim())
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect(),
        )
    }
}

impl BundleSource for FsBundleSource {
    fn definition_dirs(&self, locale: &str) -> Vec<PathBuf> {
        locales::fallback_directories(locale, &self.base, &self.fallback)
    }

    fn definition_files(&self, dir: &Path) -> Vec<PathBuf> {
        let mut unlisted: Vec<PathBuf> = match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| {
                    matches!(
                        path.extension().and_then(|ext| ext.to_str()),
                        Some("yaml") | Some("yml")
                    )
                })
                .collect(),
            // Missing locale directories are expected along the chain.
            Err(_) => return Vec::new(),
        };
        unlisted.sort();

        let mut files = Vec::new();
        for id in self.manifest_order(dir).unwrap_or_default() {
            let found = ["yaml", "yml"].iter().find_map(|ext| {
                let path = dir.join(format!("{id}.{ext}"));
                unlisted.iter().position(|p| *p == path)
            });
            if let Some(pos) = found {
                files.push(unlisted.remove(pos));
            } else {
                warn!(id, dir = %dir.display(), "manifest names a missing engine definition");
            }
        }
        files.extend(unlisted);
        files
    }

    fn parse_definition(&self, path: &Path) -> Result<SearchEngine> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let mut engine: SearchEngine = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        if engine.id.is_empty() || engine.short_name.is_empty() || engine.search_template.is_empty()
        {
            bail!("definition {} is missing required fields", path.display());
        }
        // Bundled definitions can never claim to be user-added.
        engine.is_custom = false;
        Ok(engine)
    }
}
