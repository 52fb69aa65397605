//! Retrieving bibliography text
//!
//! A render call awaits exactly one [`SourceFetcher::fetch_text`]; everything
//! after it runs synchronously.

use std::collections::HashMap;

use crate::error::FetchError;

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub mod http;

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub use http::HttpFetcher;

/// Source of bibliography text, addressed by location (path or URL)
#[allow(async_fn_in_trait)]
pub trait SourceFetcher {
    async fn fetch_text(&self, location: &str) -> Result<String, FetchError>;
}

impl<T: SourceFetcher> SourceFetcher for &T {
    async fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        (**self).fetch_text(location).await
    }
}

/// Sources held in memory, keyed by location
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    sources: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, location: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(location, text);
        self
    }

    pub fn insert(&mut self, location: impl Into<String>, text: impl Into<String>) {
        self.sources.insert(location.into(), text.into());
    }
}

impl SourceFetcher for StaticFetcher {
    async fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        self.sources
            .get(location)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                location: location.to_string(),
            })
    }
}

/// Reads sources from disk, resolving relative locations against a base
/// directory
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileFetcher {
    base_dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileFetcher {
    pub fn new(base_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SourceFetcher for FileFetcher {
    async fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        let path = self.base_dir.join(location);
        tracing::debug!(path = %path.display(), "Reading bibliography");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Io {
                location: location.to_string(),
                source,
            })
    }
}
