//! In-memory preference store

use super::PrefStore;
use crate::error::PrefError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// A preference store backed by a plain map. Values survive for the life of
/// the store object, which is what tests need to model "restart the app but
/// keep the profile": construct one store, hand it to several registries.
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PrefStore for MemoryPrefs {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values()
            .get(key)
            .and_then(|v| v.as_str().map(String::from))
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.values().get(key).and_then(|v| v.as_bool())
    }

    fn get_string_list(&self, key: &str) -> Option<Vec<String>> {
        self.values().get(key).and_then(|v| {
            v.as_array().map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(String::from))
                    .collect()
            })
        })
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), PrefError> {
        self.values().insert(key.to_string(), Value::from(value));
        Ok(())
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), PrefError> {
        self.values().insert(key.to_string(), Value::from(value));
        Ok(())
    }

    fn set_string_list(&self, key: &str, value: &[String]) -> Result<(), PrefError> {
        self.values().insert(key.to_string(), Value::from(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PrefError> {
        self.values().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let prefs = MemoryPrefs::new();
        prefs.set_string("a", "hello").unwrap();
        prefs.set_bool("b", true).unwrap();
        prefs
            .set_string_list("c", &["x".to_string(), "y".to_string()])
            .unwrap();

        assert_eq!(prefs.get_string("a").as_deref(), Some("hello"));
        assert_eq!(prefs.get_bool("b"), Some(true));
        assert_eq!(
            prefs.get_string_list("c"),
            Some(vec!["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn test_unset_and_removed_keys() {
        let prefs = MemoryPrefs::new();
        assert_eq!(prefs.get_string("missing"), None);
        assert!(prefs.bool_or("missing", true));

        prefs.set_bool("flag", false).unwrap();
        prefs.remove("flag").unwrap();
        assert_eq!(prefs.get_bool("flag"), None);
    }

    #[test]
    fn test_type_mismatch_reads_as_none() {
        let prefs = MemoryPrefs::new();
        prefs.set_string("a", "not a bool").unwrap();
        assert_eq!(prefs.get_bool("a"), None);
    }
}
