//! Pluggable data sources addressed by URL scheme
//!
//! A [`Registry`] maps schemes to [`Source`] implementations. The host
//! populates it once at startup and hands it to the resolver, which only
//! reads from it afterwards.

use crate::data::Data;
use crate::error::BoxError;
use std::collections::HashMap;
use url::Url;

pub mod file;

pub use file::FileSource;

/// Loads [`Data`] for a label from a location addressed by URL.
pub trait Source {
    /// URL scheme handled by this source, e.g. `file`.
    fn scheme(&self) -> &str;

    /// Example URL for usage text.
    fn example_url(&self) -> &str;

    /// Load the data for `label`. `raw` is the source string as given, before
    /// URL normalization lowercased its host.
    fn load(&self, label: &str, url: &Url, raw: &str) -> Result<Data, BoxError>;
}

/// Scheme to source mapping.
#[derive(Default)]
pub struct Registry {
    sources: HashMap<String, Box<dyn Source>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in source registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(FileSource::new());
        registry
    }

    /// Register a source under its scheme, replacing any earlier one.
    pub fn register<S: Source + 'static>(&mut self, source: S) {
        let scheme = source.scheme().to_string();
        tracing::debug!("Registering source for scheme {}", scheme);
        self.sources.insert(scheme, Box::new(source));
    }

    pub fn lookup(&self, scheme: &str) -> Option<&dyn Source> {
        self.sources.get(scheme).map(|source| source.as_ref())
    }

    /// Registered schemes, sorted.
    pub fn schemes(&self) -> Vec<&str> {
        let mut schemes: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("schemes", &self.schemes()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        scheme: &'static str,
        value: &'static str,
    }

    impl Source for Fixed {
        fn scheme(&self) -> &str {
            self.scheme
        }

        fn example_url(&self) -> &str {
            "mem://"
        }

        fn load(&self, _label: &str, _url: &Url, _raw: &str) -> Result<Data, BoxError> {
            Ok([("value", [self.value])].into_iter().collect())
        }
    }

    #[test]
    fn lookup_finds_registered_scheme() {
        let mut registry = Registry::new();
        registry.register(Fixed { scheme: "mem", value: "1" });

        let source = registry.lookup("mem").expect("registered");
        let url = Url::parse("mem://x").expect("url");
        assert_eq!(source.load("", &url, "mem://x").expect("load").get("value"), "1");
        assert!(registry.lookup("other").is_none());
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut registry = Registry::new();
        registry.register(Fixed { scheme: "mem", value: "1" });
        registry.register(Fixed { scheme: "mem", value: "2" });

        let url = Url::parse("mem://x").expect("url");
        let source = registry.lookup("mem").expect("registered");
        let data = source.load("", &url, "mem://x").expect("load");
        assert_eq!(data.get("value"), "2");
        assert_eq!(registry.schemes(), vec!["mem"]);
    }

    #[test]
    fn defaults_include_file_scheme() {
        let registry = Registry::with_defaults();
        let file = registry.lookup("file").expect("file source");
        assert_eq!(file.example_url(), "file://config.yml");
    }
}
