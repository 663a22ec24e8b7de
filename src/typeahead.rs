//! The typeahead component.
//!
//! [`Typeahead::initialize`] is the search setup sequence: load the catalog
//! from a source, validate it, and build the suggestion index over it. The
//! result is either a ready component or an explicit error; callers that
//! want the original's silent degradation wrap the call in
//! [`crate::error::FailOpen`].
//!
//! Once initialized the component is read-only: the catalog is never
//! re-fetched and the index is never mutated. [`Typeahead::suggest`] answers
//! queries, [`Typeahead::select`] resolves a chosen suggestion to its
//! navigation target.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogSource};
use crate::config::SuggestConfig;
use crate::error::Result;
use crate::index::{tokenize, SuggestIndex};

/// A single suggestion proposed for a partial query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Suggestion {
    /// Entry name; also the display value.
    pub name: String,
    /// Entry description.
    pub description: String,
    /// Thumbnail URL, when the entry has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    /// Navigation target for this suggestion.
    pub filename: String,
}

impl Suggestion {
    /// The value shown for a selected or highlighted suggestion.
    pub fn display(&self) -> &str {
        &self.name
    }
}

/// An initialized search component over an immutable catalog.
pub struct Typeahead {
    catalog: Catalog,
    index: SuggestIndex,
    config: SuggestConfig,
}

impl Typeahead {
    /// Initialize the component: load the catalog and build the index.
    ///
    /// This is the only fallible step of the lifecycle. On success the
    /// component is ready; on failure nothing is retained and the caller
    /// decides whether to surface or swallow the error.
    pub fn initialize(source: &dyn CatalogSource, config: SuggestConfig) -> Result<Self> {
        let catalog = source.load()?;
        tracing::debug!(
            source = source.name(),
            location = %source.location(),
            entries = catalog.len(),
            "catalog loaded"
        );
        Ok(Self::from_catalog(catalog, config))
    }

    /// Build the component from an already-loaded catalog.
    pub fn from_catalog(catalog: Catalog, config: SuggestConfig) -> Self {
        let index = SuggestIndex::build(&catalog);
        tracing::debug!(
            entries = catalog.len(),
            tokens = index.token_count(),
            "suggestion index ready"
        );
        Self {
            catalog,
            index,
            config,
        }
    }

    /// Suggest entries for a partial query.
    ///
    /// Queries shorter than the configured minimum length (after trimming)
    /// yield nothing, and at most `max_suggestions` results are returned.
    /// Results are ranked by whole-query name prefix first, then token hit
    /// count, then name, so the ordering is stable across calls.
    pub fn suggest(&self, query: &str) -> Vec<Suggestion> {
        let trimmed = query.trim();
        if trimmed.chars().count() < self.config.min_query_len {
            return Vec::new();
        }

        let tokens = tokenize(trimmed);
        if tokens.is_empty() {
            return Vec::new();
        }

        let matches = self.index.query(&tokens);

        let query_lower = trimmed.to_lowercase();
        let mut ranked: Vec<_> = matches
            .iter()
            .filter_map(|m| self.catalog.entry(m.id as usize).map(|entry| (m, entry)))
            .map(|(m, entry)| {
                let name_prefix = entry.name.to_lowercase().starts_with(&query_lower);
                (name_prefix, m.hits, entry)
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then(b.1.cmp(&a.1))
                .then_with(|| a.2.name.cmp(&b.2.name))
        });

        ranked
            .into_iter()
            .take(self.config.max_suggestions)
            .map(|(_, _, entry)| Suggestion {
                name: entry.name.clone(),
                description: entry.description.clone(),
                img: entry.img.clone(),
                filename: entry.filename.clone(),
            })
            .collect()
    }

    /// Resolve a selected suggestion to its navigation target.
    ///
    /// Selection is by exact name, the catalog's identity key, so the
    /// returned URL is exactly the selected entry's `filename`.
    pub fn select(&self, name: &str) -> Option<&str> {
        self.catalog.get(name).map(|entry| entry.filename.as_str())
    }

    /// Number of catalog entries behind the component.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    /// Whether the catalog behind the component is empty.
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}
