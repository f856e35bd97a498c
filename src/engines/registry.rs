//! The search-engine registry
//!
//! Owns the merged catalog of bundled and user-added engines, the default
//! engine, the user-visible ordering, and the enabled/disabled state for the
//! quick-search surfaces. Every mutation is written through to the
//! preference store before the call returns, so a registry constructed
//! against the same store later reproduces the exact same state.
//!
//! Invariants maintained across every operation:
//! - the default engine is always at index 0 of the ordering;
//! - the default engine is never disabled;
//! - engine ids are unique within the ordering.

use super::engine::SearchEngine;
use super::loader::{load_bundled_engines, BundleSource};
use crate::error::{PrefError, Result, SearchError};
use crate::prefs::{keys, PrefStore};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

struct RegistryState {
    /// Unique by id; index 0 is the default engine.
    ordered: Vec<SearchEngine>,
    default_id: String,
    /// Never contains `default_id`.
    disabled: HashSet<String>,
}

impl RegistryState {
    fn position(&self, id: &str) -> Option<usize> {
        self.ordered.iter().position(|e| e.id == id)
    }
}

/// The catalog of available search engines and their user configuration.
///
/// All state lives behind an internal mutex, so a shared registry can be
/// called from any thread; individual operations are atomic, sequences of
/// operations are not.
pub struct SearchEngineRegistry {
    prefs: Arc<dyn PrefStore>,
    state: Mutex<RegistryState>,
}

impl SearchEngineRegistry {
    /// Build a registry for `locale`: load the bundled catalog, merge
    /// persisted custom engines, and apply the persisted ordering, default,
    /// and disabled set.
    ///
    /// On first run (nothing persisted) the ordering is the shipped catalog
    /// order and the first shipped engine is the default. Fails only if the
    /// catalog comes up completely empty.
    pub fn new(prefs: Arc<dyn PrefStore>, source: &dyn BundleSource, locale: &str) -> Result<Self> {
        let mut catalog = load_bundled_engines(source, locale);

        for custom in load_custom_engines(prefs.as_ref()) {
            if catalog.iter().any(|e| e.id == custom.id) {
                warn!(id = %custom.id, "custom engine id collides with bundled engine, dropping");
            } else {
                catalog.push(custom);
            }
        }

        if catalog.is_empty() {
            return Err(SearchError::InvalidOperation(format!(
                "no search engines available for locale {locale:?}"
            )));
        }

        // Persisted order first; anything unknown in the saved list is stale
        // and ignored. Engines the saved list does not mention are appended
        // alphabetically, except on first run where the shipped order stands.
        let saved = prefs.get_string_list(keys::ORDERED_ENGINE_IDS);
        let mut ordered: Vec<SearchEngine> = Vec::with_capacity(catalog.len());
        match saved {
            Some(ids) => {
                for id in ids {
                    if let Some(pos) = catalog.iter().position(|e| e.id == id) {
                        ordered.push(catalog.remove(pos));
                    }
                }
                catalog.sort_by(|a, b| {
                    a.short_name.cmp(&b.short_name).then_with(|| a.id.cmp(&b.id))
                });
                ordered.append(&mut catalog);
            }
            None => ordered = catalog,
        }

        let default_id = prefs
            .get_string(keys::DEFAULT_ENGINE_ID)
            .filter(|id| ordered.iter().any(|e| e.id == *id))
            .unwrap_or_else(|| ordered[0].id.clone());
        if let Some(pos) = ordered.iter().position(|e| e.id == default_id) {
            let engine = ordered.remove(pos);
            ordered.insert(0, engine);
        }

        let mut disabled: HashSet<String> = prefs
            .get_string_list(keys::DISABLED_ENGINE_IDS)
            .unwrap_or_default()
            .into_iter()
            .collect();
        disabled.remove(&default_id);

        info!(
            locale,
            engines = ordered.len(),
            default = %default_id,
            "search engine registry ready"
        );

        Ok(Self {
            prefs,
            state: Mutex::new(RegistryState {
                ordered,
                default_id,
                disabled,
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The full catalog in user order, default engine first.
    pub fn ordered_engines(&self) -> Vec<SearchEngine> {
        self.state().ordered.clone()
    }

    /// The current default engine.
    pub fn default_engine(&self) -> SearchEngine {
        let state = self.state();
        state.ordered[0].clone()
    }

    /// The engines offered as one-tap alternatives: everything except the
    /// default engine and anything the user disabled.
    pub fn quick_search_engines(&self) -> Vec<SearchEngine> {
        let state = self.state();
        state
            .ordered
            .iter()
            .filter(|e| e.id != state.default_id && !state.disabled.contains(&e.id))
            .cloned()
            .collect()
    }

    pub fn is_engine_default(&self, engine: &SearchEngine) -> bool {
        self.state().default_id == engine.id
    }

    pub fn is_engine_enabled(&self, engine: &SearchEngine) -> bool {
        !self.state().disabled.contains(&engine.id)
    }

    /// Make `engine` the default: moved to index 0, enabled, persisted.
    /// The engine must already be a member of the catalog.
    pub fn set_default_engine(&self, engine: &SearchEngine) -> Result<()> {
        let mut state = self.state();
        let pos = state.position(&engine.id).ok_or_else(|| {
            SearchError::InvalidArgument(format!("engine {:?} is not in the catalog", engine.id))
        })?;

        let promoted = state.ordered.remove(pos);
        state.ordered.insert(0, promoted);
        state.default_id = engine.id.clone();
        state.disabled.remove(&engine.id);

        self.persist_order(&state)?;
        self.persist_default(&state)?;
        self.persist_disabled(&state)?;
        Ok(())
    }

    /// Replace the user-visible ordering. `new_order` may be a partial list;
    /// members it omits are appended in alphabetical short-name order. If the
    /// head of the resulting order changed, that engine becomes the new
    /// default and is enabled.
    pub fn set_ordered_engines(&self, new_order: &[SearchEngine]) -> Result<()> {
        let mut state = self.state();

        for engine in new_order {
            if state.position(&engine.id).is_none() {
                return Err(SearchError::InvalidArgument(format!(
                    "engine {:?} is not in the catalog",
                    engine.id
                )));
            }
        }

        let mut remainder = std::mem::take(&mut state.ordered);
        let mut ordered = Vec::with_capacity(remainder.len());
        for engine in new_order {
            if let Some(pos) = remainder.iter().position(|e| e.id == engine.id) {
                ordered.push(remainder.remove(pos));
            }
        }
        remainder.sort_by(|a, b| a.short_name.cmp(&b.short_name).then_with(|| a.id.cmp(&b.id)));
        ordered.append(&mut remainder);
        state.ordered = ordered;

        let default_changed = state.ordered[0].id != state.default_id;
        if default_changed {
            state.default_id = state.ordered[0].id.clone();
            let id = state.default_id.clone();
            state.disabled.remove(&id);
        }

        self.persist_order(&state)?;
        if default_changed {
            self.persist_default(&state)?;
            self.persist_disabled(&state)?;
        }
        Ok(())
    }

    /// Re-include an engine in the quick-search set.
    pub fn enable_engine(&self, engine: &SearchEngine) -> Result<()> {
        let mut state = self.state();
        state.disabled.remove(&engine.id);
        self.persist_disabled(&state)
    }

    /// Exclude an engine from the quick-search set. Disabling the default
    /// engine is silently ignored; the default is always available.
    pub fn disable_engine(&self, engine: &SearchEngine) -> Result<()> {
        let mut state = self.state();
        if state.default_id == engine.id {
            return Ok(());
        }
        state.disabled.insert(engine.id.clone());
        self.persist_disabled(&state)
    }

    /// Add a user-defined engine. Its id must be unused; it is inserted
    /// right after the default engine.
    pub fn add_custom_engine(&self, engine: SearchEngine) -> Result<()> {
        let mut state = self.state();
        if state.position(&engine.id).is_some() {
            return Err(SearchError::InvalidArgument(format!(
                "engine id {:?} is already taken",
                engine.id
            )));
        }

        let engine = SearchEngine {
            is_custom: true,
            ..engine
        };
        let at = 1.min(state.ordered.len());
        state.ordered.insert(at, engine);

        self.persist_customs(&state)?;
        self.persist_order(&state)?;
        Ok(())
    }

    /// Remove a user-defined engine. Bundled engines and the last remaining
    /// engine cannot be deleted. If the deleted engine was the default, the
    /// next engine in the ordering is promoted (and enabled).
    pub fn delete_custom_engine(&self, engine: &SearchEngine) -> Result<()> {
        let mut state = self.state();
        let pos = state.position(&engine.id).ok_or_else(|| {
            SearchError::InvalidArgument(format!("engine {:?} is not in the catalog", engine.id))
        })?;
        if !state.ordered[pos].is_custom {
            return Err(SearchError::InvalidOperation(format!(
                "engine {:?} is bundled and cannot be deleted",
                engine.id
            )));
        }
        // An all-custom catalog (empty bundle, persisted customs) could
        // otherwise be emptied out, leaving no engine to promote to default.
        if state.ordered.len() == 1 {
            return Err(SearchError::InvalidOperation(format!(
                "engine {:?} is the last engine and cannot be deleted",
                engine.id
            )));
        }

        state.ordered.remove(pos);
        state.disabled.remove(&engine.id);

        let default_changed = state.default_id == engine.id;
        if default_changed {
            state.default_id = state.ordered[0].id.clone();
            let id = state.default_id.clone();
            state.disabled.remove(&id);
        }

        self.persist_customs(&state)?;
        self.persist_order(&state)?;
        self.persist_disabled(&state)?;
        if default_changed {
            self.persist_default(&state)?;
        }
        Ok(())
    }

    /// Whether remote search-suggestion queries are permitted. Off until the
    /// user opts in.
    pub fn suggestions_enabled(&self) -> bool {
        self.prefs.bool_or(keys::SUGGESTIONS_ENABLED, false)
    }

    pub fn set_suggestions_enabled(&self, enabled: bool) -> Result<()> {
        self.prefs.set_bool(keys::SUGGESTIONS_ENABLED, enabled)?;
        Ok(())
    }

    /// Whether the suggestion opt-in prompt has already been shown. `false`
    /// means the UI should still ask for consent.
    pub fn suggestions_opt_in_shown(&self) -> bool {
        self.prefs.bool_or(keys::SUGGESTIONS_OPT_IN_SHOWN, false)
    }

    pub fn set_suggestions_opt_in_shown(&self, shown: bool) -> Result<()> {
        self.prefs.set_bool(keys::SUGGESTIONS_OPT_IN_SHOWN, shown)?;
        Ok(())
    }

    fn persist_order(&self, state: &RegistryState) -> Result<()> {
        let ids: Vec<String> = state.ordered.iter().map(|e| e.id.clone()).collect();
        self.prefs.set_string_list(keys::ORDERED_ENGINE_IDS, &ids)?;
        Ok(())
    }

    fn persist_default(&self, state: &RegistryState) -> Result<()> {
        self.prefs
            .set_string(keys::DEFAULT_ENGINE_ID, &state.default_id)?;
        Ok(())
    }

    fn persist_disabled(&self, state: &RegistryState) -> Result<()> {
        let mut ids: Vec<String> = state.disabled.iter().cloned().collect();
        ids.sort();
        self.prefs.set_string_list(keys::DISABLED_ENGINE_IDS, &ids)?;
        Ok(())
    }

    fn persist_customs(&self, state: &RegistryState) -> Result<()> {
        let customs: Vec<&SearchEngine> =
            state.ordered.iter().filter(|e| e.is_custom).collect();
        let json = serde_json::to_string(&customs).map_err(PrefError::from)?;
        self.prefs.set_string(keys::CUSTOM_ENGINES, &json)?;
        Ok(())
    }
}

fn load_custom_engines(prefs: &dyn PrefStore) -> Vec<SearchEngine> {
    let Some(json) = prefs.get_string(keys::CUSTOM_ENGINES) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<SearchEngine>>(&json) {
        Ok(mut engines) => {
            for engine in &mut engines {
                engine.is_custom = true;
            }
            engines
        }
        Err(e) => {
            warn!(error = %e, "could not parse persisted custom engines, dropping them");
            Vec::new()
        }
    }
}
