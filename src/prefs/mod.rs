//! Persistent preference store
//!
//! The registry persists its state through this abstraction: typed,
//! synchronous get/set over string keys. Writes are durable before the call
//! returns. Two implementations ship: an in-memory store for tests and
//! previews, and a JSON-file-backed store for real profiles.

mod file;
mod memory;

pub use file::JsonFilePrefs;
pub use memory::MemoryPrefs;

use crate::error::PrefError;

/// Preference keys owned by the search subsystem.
pub mod keys {
    pub const ORDERED_ENGINE_IDS: &str = "search.orderedEngineIDs";
    pub const DEFAULT_ENGINE_ID: &str = "search.defaultEngineID";
    pub const DISABLED_ENGINE_IDS: &str = "search.disabledEngineIDs";
    pub const CUSTOM_ENGINES: &str = "search.customEngines";
    pub const SUGGESTIONS_ENABLED: &str = "search.suggestionsEnabled";
    pub const SUGGESTIONS_OPT_IN_SHOWN: &str = "search.suggestionsOptInShown";
}

/// A key-value store for scalar and list preferences, surviving process
/// restarts. Getters return `None` for unset keys so callers can supply
/// first-run defaults; setters must not return until the value is durable.
pub trait PrefStore: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn get_string_list(&self, key: &str) -> Option<Vec<String>>;

    fn set_string(&self, key: &str, value: &str) -> Result<(), PrefError>;
    fn set_bool(&self, key: &str, value: bool) -> Result<(), PrefError>;
    fn set_string_list(&self, key: &str, value: &[String]) -> Result<(), PrefError>;

    fn remove(&self, key: &str) -> Result<(), PrefError>;

    /// Get a boolean with a first-run default.
    fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }
}
