//! Browser-Search: search-engine management for a mobile browser
//!
//! Owns the catalog of available search engines (bundled per locale plus
//! user-added custom engines), the persisted default engine, the
//! quick-search ordering and enabled state, and the search-suggestion
//! consent flags. UI chrome calls into [`SearchEngineRegistry`]; persistence
//! goes through the [`prefs::PrefStore`] abstraction.

pub mod engines;
pub mod error;
pub mod locales;
pub mod prefs;

pub use engines::{BundleSource, FsBundleSource, SearchEngine, SearchEngineRegistry};
pub use error::{PrefError, Result, SearchError};
pub use prefs::{JsonFilePrefs, MemoryPrefs, PrefStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Locale whose bundled catalog backs every other locale
pub const FALLBACK_LOCALE: &str = "en";
