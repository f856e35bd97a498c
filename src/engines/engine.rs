//! The search-engine record and query-URL template expansion

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use url::Url;

/// Placeholder substituted with the percent-encoded query when building a
/// search or suggestion URL. The plural OpenSearch spelling is accepted too.
pub const SEARCH_TERM_PLACEHOLDER: &str = "{searchTerm}";
const SEARCH_TERMS_PLACEHOLDER: &str = "{searchTerms}";

/// A configured search provider.
///
/// Immutable after construction. Two engines are equal iff their ids are
/// equal; display names and templates do not participate in identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEngine {
    /// Stable unique identifier.
    pub id: String,
    /// Display name, also used for legacy name-based lookups.
    pub short_name: String,
    /// Search URL template containing the search-term placeholder.
    pub search_template: String,
    /// Optional suggestion URL template.
    #[serde(default)]
    pub suggest_template: Option<String>,
    /// Optional icon reference (bundled asset name or URL).
    #[serde(default)]
    pub icon: Option<String>,
    /// Whether the engine was added by the user rather than shipped.
    #[serde(default)]
    pub is_custom: bool,
}

impl SearchEngine {
    /// Create a bundled engine.
    pub fn new(
        id: impl Into<String>,
        short_name: impl Into<String>,
        search_template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            short_name: short_name.into(),
            search_template: search_template.into(),
            suggest_template: None,
            icon: None,
            is_custom: false,
        }
    }

    /// Create a user-added engine.
    pub fn custom(
        id: impl Into<String>,
        short_name: impl Into<String>,
        search_template: impl Into<String>,
    ) -> Self {
        Self {
            is_custom: true,
            ..Self::new(id, short_name, search_template)
        }
    }

    /// Attach a suggestion URL template.
    pub fn with_suggest_template(mut self, template: impl Into<String>) -> Self {
        self.suggest_template = Some(template.into());
        self
    }

    /// Attach an icon reference.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Build the search URL for a query, or `None` if the template does not
    /// produce a valid URL.
    pub fn search_url_for_query(&self, query: &str) -> Option<Url> {
        expand_template(&self.search_template, query)
    }

    /// Build the suggestion URL for a query, if the engine has a suggestion
    /// template at all.
    pub fn suggest_url_for_query(&self, query: &str) -> Option<Url> {
        let template = self.suggest_template.as_deref()?;
        expand_template(template, query)
    }

    /// Whether the engine can serve remote search suggestions.
    pub fn supports_suggestions(&self) -> bool {
        self.suggest_template.is_some()
    }
}

impl PartialEq for SearchEngine {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SearchEngine {}

impl Hash for SearchEngine {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

fn expand_template(template: &str, query: &str) -> Option<Url> {
    let encoded = urlencoding::encode(query);
    let expanded = template
        .replace(SEARCH_TERMS_PLACEHOLDER, &encoded)
        .replace(SEARCH_TERM_PLACEHOLDER, &encoded);
    Url::parse(&expanded).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_for_query() {
        let engine = SearchEngine::new(
            "wikipedia",
            "Wikipedia",
            "https://wikipedia.org/search?q={searchTerm}",
        );
        let url = engine.search_url_for_query("foo bar").unwrap();
        assert_eq!(url.as_str(), "https://wikipedia.org/search?q=foo%20bar");
    }

    #[test]
    fn test_plural_placeholder() {
        let engine = SearchEngine::new("g", "Google", "https://g.example/?q={searchTerms}");
        let url = engine.search_url_for_query("rust").unwrap();
        assert_eq!(url.as_str(), "https://g.example/?q=rust");
    }

    #[test]
    fn test_suggest_url_requires_template() {
        let engine = SearchEngine::new("b", "Bing", "https://bing.example/?q={searchTerm}");
        assert!(!engine.supports_suggestions());
        assert!(engine.suggest_url_for_query("x").is_none());

        let engine = engine.with_suggest_template("https://bing.example/ac?q={searchTerm}");
        assert!(engine.supports_suggestions());
        assert!(engine.suggest_url_for_query("x").is_some());
    }

    #[test]
    fn test_invalid_template_yields_none() {
        let engine = SearchEngine::new("bad", "Bad", "not a url {searchTerm}");
        assert!(engine.search_url_for_query("x").is_none());
    }

    #[test]
    fn test_equality_is_by_id() {
        let a = SearchEngine::new("ddg", "DuckDuckGo", "https://a/?q={searchTerm}");
        let b = SearchEngine::new("ddg", "Duck Duck Go", "https://b/?q={searchTerm}");
        assert_eq!(a, b);
    }
}
