//! Catalog types for atlas.
//!
//! A catalog is the list of searchable entries loaded from `objects.json`.
//! It is parsed exactly once at load time, validated at the boundary, and
//! immutable afterwards. Malformed entries are logged and dropped rather
//! than propagated into the suggestion layer.

pub mod source;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};

pub use source::{CatalogMeta, CatalogSource, FileSource, HttpSource};

/// A single searchable catalog entry.
///
/// `name` doubles as the identity key and the display value of a suggestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Unique identifier, also used for display.
    pub name: String,
    /// Free text searched alongside the name.
    #[serde(default)]
    pub description: String,
    /// Thumbnail URL shown next to a suggestion, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    /// Navigation target when the entry is selected.
    pub filename: String,
}

impl CatalogEntry {
    /// The text the suggestion index tokenizes for this entry.
    pub fn datum(&self) -> String {
        format!("{} {}", self.name, self.description)
    }
}

/// An immutable, validated collection of catalog entries.
///
/// Names are unique within a catalog. Duplicates in the source document keep
/// the first occurrence; later ones are logged and dropped.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Parse a catalog from a JSON document.
    ///
    /// The body is parsed once. The document must be a JSON array; elements
    /// that don't conform to the entry schema (missing or empty `name` or
    /// `filename`) are warned about and skipped, never fatal.
    pub fn from_json_str(body: &str) -> Result<Self> {
        let raw: Vec<serde_json::Value> = serde_json::from_str(body)
            .map_err(|e| AtlasError::serde(format!("catalog body is not a JSON array: {}", e)))?;

        let mut catalog = Catalog::default();
        for (position, value) in raw.into_iter().enumerate() {
            match serde_json::from_value::<CatalogEntry>(value) {
                Ok(entry) => catalog.insert(entry),
                Err(e) => {
                    tracing::warn!(position, "skipping malformed catalog entry: {}", e);
                }
            }
        }

        Ok(catalog)
    }

    /// Build a catalog from already-constructed entries.
    ///
    /// Applies the same boundary validation as [`Catalog::from_json_str`].
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Catalog::default();
        for entry in entries {
            catalog.insert(entry);
        }
        catalog
    }

    /// Insert one entry, enforcing the validation rules.
    fn insert(&mut self, entry: CatalogEntry) {
        if entry.name.is_empty() {
            tracing::warn!("skipping catalog entry with empty name");
            return;
        }
        if entry.filename.is_empty() {
            tracing::warn!(name = %entry.name, "skipping catalog entry with empty filename");
            return;
        }
        if self.by_name.contains_key(&entry.name) {
            tracing::warn!(name = %entry.name, "skipping duplicate catalog entry");
            return;
        }
        self.by_name.insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
    }

    /// Look up an entry by its name.
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.by_name.get(name).map(|&idx| &self.entries[idx])
    }

    /// Get an entry by its position in the catalog.
    ///
    /// Positions are stable for the lifetime of the catalog and are what the
    /// suggestion index stores in its postings.
    pub fn entry(&self, idx: usize) -> Option<&CatalogEntry> {
        self.entries.get(idx)
    }

    /// Iterate over all entries in load order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Number of entries in the catalog.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
