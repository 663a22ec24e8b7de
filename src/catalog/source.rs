//! Catalog sources for atlas.
//!
//! This module defines the [`CatalogSource`] trait for places a catalog can
//! be loaded from: a local file (including the fetch cache) or an HTTP
//! endpoint. Every source parses the body exactly once.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::config::{catalog_cache_path, Config};
use crate::error::{AtlasError, Result};
use crate::util::read_to_string_limited;

/// Trait for catalog sources.
///
/// A source performs one read and hands back a validated [`Catalog`].
/// Sources are never re-read for the lifetime of a typeahead.
pub trait CatalogSource {
    /// Load and parse the catalog.
    fn load(&self) -> Result<Catalog>;

    /// Get the source kind for logging.
    fn name(&self) -> &'static str;

    /// Get the source location (path or URL) for logging and output.
    fn location(&self) -> String;
}

/// A catalog stored in a local JSON file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a file source for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for FileSource {
    fn load(&self) -> Result<Catalog> {
        let body = read_to_string_limited(&self.path)?;
        Catalog::from_json_str(&body)
    }

    fn name(&self) -> &'static str {
        "file"
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// A catalog served over HTTP.
///
/// Issues a single blocking GET with the configured timeout. Connection
/// errors, timeouts, and non-success statuses all surface as fetch errors.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    /// Create an HTTP source for the given endpoint.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    /// Fetch the raw catalog body.
    ///
    /// Split out from [`CatalogSource::load`] so the fetch command can store
    /// the body it just validated without serializing it a second time.
    pub fn fetch_body(&self) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| AtlasError::fetch(&self.url, e.to_string()))?;

        let response = client
            .get(&self.url)
            .send()
            .map_err(|e| AtlasError::fetch(&self.url, e.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|e| AtlasError::fetch(&self.url, e.to_string()))?;

        response
            .text()
            .map_err(|e| AtlasError::fetch(&self.url, e.to_string()))
    }
}

impl CatalogSource for HttpSource {
    fn load(&self) -> Result<Catalog> {
        let body = self.fetch_body()?;
        Catalog::from_json_str(&body)
    }

    fn name(&self) -> &'static str {
        "http"
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Metadata sidecar written next to the fetch cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogMeta {
    /// Endpoint the cached catalog was fetched from.
    pub endpoint: String,
    /// When the catalog was fetched.
    pub fetched_at: DateTime<Utc>,
    /// Number of usable entries after validation.
    pub entries: usize,
}

impl CatalogMeta {
    /// Load cache metadata from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| AtlasError::storage(path, e))?;
        serde_json::from_str(&content).map_err(AtlasError::from)
    }

    /// Save cache metadata to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| AtlasError::storage(path, e))
    }
}

/// Pick the catalog source for read commands.
///
/// An explicit `--catalog <path>` wins. Otherwise the fetch cache is used
/// when it exists, falling back to the configured HTTP endpoint so the tool
/// works without a prior `atlas fetch`.
pub fn resolve_source(explicit: Option<&Path>, config: &Config) -> Box<dyn CatalogSource> {
    if let Some(path) = explicit {
        return Box::new(FileSource::new(path));
    }

    if let Some(cache) = catalog_cache_path() {
        if cache.exists() {
            return Box::new(FileSource::new(cache));
        }
    }

    Box::new(HttpSource::new(
        config.catalog.endpoint.clone(),
        Duration::from_secs(config.fetch.timeout_seconds),
    ))
}
