//! Browser source abstraction and aggregation.
//!
//! A [`BrowserSource`] knows how to produce normalized bookmarks for one
//! browser. Sources are registered into an explicit [`BrowserRegistry`]
//! constructed by the process entry point — register once at startup,
//! enumerate on every query.

use std::collections::BTreeMap;

use crate::chromium::ChromiumBrowser;
use crate::error::Result;
use crate::models::Bookmark;

/// A browser that can be asked for its bookmarks.
pub trait BrowserSource: Send + Sync {
    /// Human-readable browser name (e.g. `"Brave"`), used as the key in
    /// aggregated results.
    fn name(&self) -> &str;

    /// Normalized bookmarks for the given profile identifier.
    fn bookmarks(&self, profile: &str) -> Result<Vec<Bookmark>>;
}

/// Append-only collection of browser sources.
pub struct BrowserRegistry {
    sources: Vec<Box<dyn BrowserSource>>,
}

impl BrowserRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Create a registry pre-loaded with the built-in Chromium-family
    /// browsers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ChromiumBrowser::brave()));
        registry.register(Box::new(ChromiumBrowser::chrome()));
        registry.register(Box::new(ChromiumBrowser::edge()));
        registry
    }

    /// Register a source. There is no deregistration.
    pub fn register(&mut self, source: Box<dyn BrowserSource>) {
        self.sources.push(source);
    }

    /// Get all registered sources, in registration order.
    pub fn sources(&self) -> &[Box<dyn BrowserSource>] {
        &self.sources
    }

    /// Collect bookmarks from every registered source.
    ///
    /// Best effort: a source that fails (e.g. its export file is missing
    /// for this profile) is logged and excluded from the result map so the
    /// remaining sources still report.
    pub fn all_bookmarks(&self, profile: &str) -> BTreeMap<String, Vec<Bookmark>> {
        let mut result = BTreeMap::new();

        for source in &self.sources {
            match source.bookmarks(profile) {
                Ok(bookmarks) => {
                    result.insert(source.name().to_string(), bookmarks);
                }
                Err(err) => {
                    tracing::debug!(browser = source.name(), %err, "skipping browser source");
                }
            }
        }

        result
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }
}

impl Default for BrowserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
