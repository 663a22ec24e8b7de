//! Fetch command for atlas.
//!
//! Downloads the catalog from the configured endpoint into the local cache
//! so search commands can run offline afterwards. The body is validated
//! before anything is written; a failed fetch never clobbers a good cache.

use std::fs;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogMeta, HttpSource};
use crate::config::{atlas_home, catalog_cache_path, catalog_meta_path, Config};
use crate::error::{AtlasError, Result};

/// Options for the fetch command.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Fetch from this endpoint instead of the configured one.
    pub endpoint: Option<String>,
}

/// Output format for the fetch command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchOutput {
    /// Whether the fetch succeeded.
    pub success: bool,
    /// Endpoint the catalog was fetched from.
    pub endpoint: String,
    /// Number of usable entries after validation.
    pub entries: usize,
    /// Where the catalog was cached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<String>,
    /// When the catalog was fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    /// Error message if the fetch failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FetchOutput {
    /// Create a successful output.
    pub fn success(
        endpoint: impl Into<String>,
        entries: usize,
        cache_path: String,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            success: true,
            endpoint: endpoint.into(),
            entries,
            cache_path: Some(cache_path),
            fetched_at: Some(fetched_at),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(endpoint: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            endpoint: endpoint.into(),
            entries: 0,
            cache_path: None,
            fetched_at: None,
            error: Some(error.into()),
        }
    }
}

/// The fetch command implementation.
pub struct FetchCommand {
    config: Config,
}

impl FetchCommand {
    /// Create a new fetch command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the fetch command.
    pub fn run(&self, options: &FetchOptions) -> FetchOutput {
        let endpoint = options
            .endpoint
            .clone()
            .unwrap_or_else(|| self.config.catalog.endpoint.clone());

        match self.fetch_and_cache(&endpoint) {
            Ok((meta, cache_path)) => {
                FetchOutput::success(endpoint, meta.entries, cache_path, meta.fetched_at)
            }
            Err(e) => FetchOutput::failure(endpoint, e.to_string()),
        }
    }

    /// Fetch, validate, then cache the catalog body and its metadata.
    fn fetch_and_cache(&self, endpoint: &str) -> Result<(CatalogMeta, String)> {
        let source = HttpSource::new(
            endpoint,
            Duration::from_secs(self.config.fetch.timeout_seconds),
        );

        let body = source.fetch_body()?;
        // One parse validates the body before it replaces the cache
        let catalog = Catalog::from_json_str(&body)?;
        if catalog.is_empty() {
            tracing::warn!(endpoint, "fetched catalog has no usable entries");
        }

        let home = atlas_home()
            .ok_or_else(|| AtlasError::config("could not determine atlas home directory"))?;
        fs::create_dir_all(&home).map_err(|e| AtlasError::storage(&home, e))?;

        let cache_path = catalog_cache_path()
            .ok_or_else(|| AtlasError::config("could not determine catalog cache path"))?;
        fs::write(&cache_path, &body).map_err(|e| AtlasError::storage(&cache_path, e))?;

        let meta = CatalogMeta {
            endpoint: endpoint.to_string(),
            fetched_at: Utc::now(),
            entries: catalog.len(),
        };
        let meta_path = catalog_meta_path()
            .ok_or_else(|| AtlasError::config("could not determine catalog meta path"))?;
        meta.save(&meta_path)?;

        Ok((meta, cache_path.display().to_string()))
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &FetchOutput, options: &FetchOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else if output.success {
            let when = output
                .fetched_at
                .map(|t| format!(" at {}", t.format("%Y-%m-%d %H:%M:%S UTC")))
                .unwrap_or_default();
            format!(
                "Fetched {} entries from {}{}\nCached at {}\n",
                output.entries,
                output.endpoint,
                when,
                output.cache_path.as_deref().unwrap_or_default()
            )
        } else {
            format!(
                "Fetch failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}
