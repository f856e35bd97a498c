//! Search-engine catalog, loading, and registry

mod engine;
mod loader;
mod registry;

pub use engine::{SearchEngine, SEARCH_TERM_PLACEHOLDER};
pub use loader::{load_bundled_engines, BundleSource, FsBundleSource};
pub use registry::SearchEngineRegistry;

#[cfg(test)]
pub(crate) mod testutil {
    use super::FsBundleSource;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Route loader/registry tracing through the test harness's capture.
    /// Safe to call from every test; only the first call installs.
    pub fn init_test_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }

    pub fn write_engine(dir: &Path, id: &str, short_name: &str, template: &str) {
        fs::create_dir_all(dir).unwrap();
        let body = format!(
            "id: {id}\nshort_name: \"{short_name}\"\nsearch_template: \"{template}\"\nsuggest_template: \"{template}&suggest=1\"\nicon: \"{id}.png\"\n"
        );
        fs::write(dir.join(format!("{id}.yaml")), body).unwrap();
    }

    /// A bundle directory mirroring the shipped catalog layout: the `en`
    /// fallback carries seven engines with Yahoo listed first, `es` overrides
    /// google and adds a regional engine, `zh-CN` adds one of its own.
    pub fn seeded_catalog() -> (TempDir, FsBundleSource) {
        init_test_logging();
        let dir = TempDir::new().unwrap();

        let en = dir.path().join("en");
        for (id, name) in [
            ("yahoo", "Yahoo"),
            ("amazon", "Amazon.com"),
            ("bing", "Bing"),
            ("duckduckgo", "DuckDuckGo"),
            ("google", "Google"),
            ("twitter", "Twitter"),
            ("wikipedia", "Wikipedia"),
        ] {
            write_engine(
                &en,
                id,
                name,
                &format!("https://{id}.example/search?q={{searchTerm}}"),
            );
        }
        fs::write(
            en.join("list.txt"),
            "# shipped order, default first\nyahoo\namazon\nbing\nduckduckgo\ngoogle\ntwitter\nwikipedia\n",
        )
        .unwrap();

        let es = dir.path().join("es");
        write_engine(&es, "google", "Google", "https://google.es/search?q={searchTerm}");
        write_engine(
            &es,
            "mercadolibre",
            "MercadoLibre",
            "https://mercadolibre.example/?q={searchTerm}",
        );

        let zh = dir.path().join("zh-CN");
        write_engine(&zh, "baidu", "Baidu", "https://baidu.example/s?wd={searchTerm}");

        let source = FsBundleSource::new(dir.path());
        (dir, source)
    }
}
