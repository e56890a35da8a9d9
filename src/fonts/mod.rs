//! Font resolution: maps a requested font name to a usable font file.
//!
//! Lookup order for a normalized name:
//! 1. the bundled font table (the file must exist in `font_dir`),
//! 2. the substitution table (bundled stand-in, file already in the cache
//!    directory, or a download through the [`FontFetcher`]),
//! 3. otherwise unresolved.
//!
//! Every outcome, including "unresolved", is remembered in the resolver's
//! [`FontCache`] so a name is looked up (and fetched) at most once per resolver.

mod error;
mod fetch;
pub mod tables;

pub use error::FontFetchError;
#[cfg(not(target_arch = "wasm32"))]
pub use fetch::HttpFontFetcher;
pub use fetch::{FontFetcher, NoFontFetcher};

use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use crate::config::FontConfig;
use tables::{find_bundled, find_substitute, normalize_font_name, Substitute};

/// Append-only map from normalized font name to the resolved path, or `None`
/// for a remembered miss.
#[derive(Debug, Default)]
pub struct FontCache {
    entries: RwLock<HashMap<String, Option<PathBuf>>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some(entry)` when the name was resolved before (the entry itself may be a miss).
    pub fn get(&self, normalized: &str) -> Option<Option<PathBuf>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(normalized).cloned()
    }

    pub fn insert(&self, normalized: String, resolved: Option<PathBuf>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.entry(normalized).or_insert(resolved);
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The family and file chosen to render a run.
#[derive(Debug, Clone, PartialEq)]
pub struct FontChoice {
    pub family: String,
    pub file: Option<PathBuf>,
}

/// Resolves font names to files; one instance is shared by all layout calls.
pub struct FontResolver {
    config: FontConfig,
    cache: FontCache,
    fetcher: Box<dyn FontFetcher>,
}

impl std::fmt::Debug for FontResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontResolver")
            .field("config", &self.config)
            .field("cached_entries", &self.cache.len())
            .finish()
    }
}

impl FontResolver {
    pub fn new(config: FontConfig, fetcher: Box<dyn FontFetcher>) -> Self {
        Self {
            config,
            cache: FontCache::new(),
            fetcher,
        }
    }

    /// A resolver that never downloads anything.
    pub fn offline(config: FontConfig) -> Self {
        Self::new(config, Box::new(NoFontFetcher))
    }

    /// A resolver backed by the HTTP fetcher; falls back to offline when the
    /// HTTP client cannot be built.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_http(config: FontConfig) -> Self {
        let timeout = std::time::Duration::from_secs(config.fetch_timeout_secs.max(1));
        match HttpFontFetcher::new(timeout) {
            Ok(fetcher) => Self::new(config, Box::new(fetcher)),
            Err(e) => {
                warn!("HTTP font fetcher unavailable, resolving offline: {}", e);
                Self::offline(config)
            }
        }
    }

    pub fn config(&self) -> &FontConfig {
        &self.config
    }

    pub fn cache(&self) -> &FontCache {
        &self.cache
    }

    /// Maps `font_name` to a font file path, or `None` when it cannot be resolved.
    /// Never fails: download problems are logged and remembered as a miss.
    pub fn get_font_path(&self, font_name: &str) -> Option<PathBuf> {
        let normalized = normalize_font_name(font_name);
        if normalized.is_empty() {
            return None;
        }
        if let Some(cached) = self.cache.get(&normalized) {
            return cached;
        }
        let resolved = self.resolve_uncached(&normalized);
        debug!("[get_font_path] '{}' -> {:?}", normalized, resolved);
        self.cache.insert(normalized, resolved.clone());
        resolved
    }

    /// Picks the font for a run: the `"<Family> Bold"` variant first when bold,
    /// then the family itself, then the configured default family.
    pub fn resolve_run_font(&self, family: &str, bold: bool) -> FontChoice {
        if let Some(file) = self.lookup_family(family, bold) {
            return FontChoice {
                family: family.to_string(),
                file: Some(file),
            };
        }
        let default_family = self.config.default_family.clone();
        if normalize_font_name(family) != normalize_font_name(&default_family) {
            debug!(
                "[resolve_run_font] '{}' unavailable, using default '{}'",
                family, default_family
            );
        }
        let file = self.lookup_family(&default_family, bold);
        FontChoice {
            family: default_family,
            file,
        }
    }

    fn lookup_family(&self, family: &str, bold: bool) -> Option<PathBuf> {
        if bold {
            if let Some(path) = self.get_font_path(&format!("{} Bold", family)) {
                return Some(path);
            }
        }
        self.get_font_path(family)
    }

    fn resolve_uncached(&self, normalized: &str) -> Option<PathBuf> {
        if let Some(bundled) = find_bundled(normalized) {
            return self.bundled_file(bundled.file_name);
        }
        match find_substitute(normalized) {
            Some(substitute) => self.resolve_substitute(substitute),
            None => {
                debug!("[resolve_uncached] no bundled font or substitute for '{}'", normalized);
                None
            }
        }
    }

    /// A file from the bundled font directory, if it is actually there.
    fn bundled_file(&self, file_name: &str) -> Option<PathBuf> {
        let path = self.config.font_dir.join(file_name);
        if path.is_file() {
            Some(path)
        } else {
            warn!(
                "Bundled font {} is missing from {}",
                file_name,
                self.config.font_dir.display()
            );
            None
        }
    }

    fn resolve_substitute(&self, substitute: &Substitute) -> Option<PathBuf> {
        if substitute.remote_path.is_empty() {
            return self.bundled_file(substitute.file_name);
        }
        let cached_file = self.config.cache_dir.join(substitute.file_name);
        if cached_file.is_file() {
            return Some(cached_file);
        }
        let url = format!(
            "{}/{}",
            self.config.remote_base_url.trim_end_matches('/'),
            substitute.remote_path
        );
        let downloaded = self.fetcher.fetch(&url).and_then(|bytes| {
            fs::create_dir_all(&self.config.cache_dir)?;
            fs::write(&cached_file, bytes)?;
            Ok(())
        });
        match downloaded {
            Ok(()) => {
                debug!(
                    "[resolve_substitute] cached '{}' as {}",
                    substitute.family,
                    cached_file.display()
                );
                Some(cached_file)
            }
            Err(e) => {
                warn!(
                    "Could not fetch substitute '{}' for '{}': {}",
                    substitute.family, substitute.requested, e
                );
                None
            }
        }
    }
}

/// Temporary font directories for tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::tables::{BUNDLED_FONTS, SUBSTITUTES};
    use std::fs;
    use tempfile::TempDir;

    /// A temp dir holding a placeholder file for every bundled font, removed on drop.
    pub fn provisioned_font_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let bundled = BUNDLED_FONTS.iter().map(|font| font.file_name);
        let stand_ins = SUBSTITUTES
            .iter()
            .filter(|s| s.remote_path.is_empty())
            .map(|s| s.file_name);
        for file_name in bundled.chain(stand_ins) {
            fs::write(dir.path().join(file_name), b"font").unwrap();
        }
        dir
    }
}
