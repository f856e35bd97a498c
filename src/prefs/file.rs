//! JSON-file-backed preference store

use super::PrefStore;
use crate::error::PrefError;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// A preference store persisted as a single JSON object on disk.
///
/// Every setter rewrites the file before returning, so a crash after a
/// successful call never loses the write. The file is replaced via a rename
/// so readers never observe a half-written store.
#[derive(Debug)]
pub struct JsonFilePrefs {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonFilePrefs {
    /// Open (or create) a store at `path`. An unreadable or corrupt file is
    /// treated as first-run: the store starts empty and the file is replaced
    /// on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => map,
                Ok(_) | Err(_) => {
                    warn!(path = %path.display(), "corrupt preference file, starting empty");
                    Map::new()
                }
            },
            Err(_) => Map::new(),
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    /// Open the store at the platform's default profile location,
    /// e.g. `~/.config/browser-search/prefs.json` on Linux.
    pub fn open_default() -> Result<Self, PrefError> {
        let base = dirs::config_dir()
            .ok_or_else(|| PrefError::Store("no configuration directory".to_string()))?;
        Ok(Self::open(base.join("browser-search").join("prefs.json")))
    }

    /// The file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn values(&self) -> MutexGuard<'_, Map<String, Value>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), PrefError> {
        let mut values = self.values();
        values.insert(key.to_string(), value);
        self.flush(&values)
    }

    fn flush(&self, values: &Map<String, Value>) -> Result<(), PrefError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_vec_pretty(&Value::Object(values.clone()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PrefStore for JsonFilePrefs {
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
        self.set(key, Value::from(value))
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), PrefError> {
        self.set(key, Value::from(value))
    }

    fn set_string_list(&self, key: &str, value: &[String]) -> Result<(), PrefError> {
        self.set(key, Value::from(value))
    }

    fn remove(&self, key: &str) -> Result<(), PrefError> {
        let mut values = self.values();
        if values.remove(key).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let prefs = JsonFilePrefs::open(&path);
        prefs.set_string("engine", "ddg").unwrap();
        prefs.set_bool("suggest", true).unwrap();
        prefs
            .set_string_list("order", &["a".to_string(), "b".to_string()])
            .unwrap();
        drop(prefs);

        let prefs = JsonFilePrefs::open(&path);
        assert_eq!(prefs.get_string("engine").as_deref(), Some("ddg"));
        assert_eq!(prefs.get_bool("suggest"), Some(true));
        assert_eq!(
            prefs.get_string_list("order"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{ not json").unwrap();

        let prefs = JsonFilePrefs::open(&path);
        assert_eq!(prefs.get_string("engine"), None);

        // The next write replaces the corrupt file with a valid one.
        prefs.set_string("engine", "bing").unwrap();
        let prefs = JsonFilePrefs::open(&path);
        assert_eq!(prefs.get_string("engine").as_deref(), Some("bing"));
    }

    #[test]
    fn test_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let prefs = JsonFilePrefs::open(&path);
        prefs.set_bool("flag", true).unwrap();
        prefs.remove("flag").unwrap();
        drop(prefs);

        let prefs = JsonFilePrefs::open(&path);
        assert_eq!(prefs.get_bool("flag"), None);
    }
}
