//! Atlas - searchable documentation catalogs for unpacked game asset trees.
//!
//! Atlas generates a catalog of documentation entries from an asset tree,
//! fetches it from a documentation site, and answers autocomplete queries
//! over it: type a few characters, get ranked suggestions, resolve a
//! selection to the page it documents.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod index;
pub mod typeahead;
pub mod util;

pub use catalog::{Catalog, CatalogEntry, CatalogMeta, CatalogSource, FileSource, HttpSource};
pub use config::{Config, SuggestConfig};
pub use error::{AtlasError, FailOpen, Result};
pub use generator::{CatalogGenerator, GeneratorReport};
pub use index::{SuggestIndex, tokenize};
pub use typeahead::{Suggestion, Typeahead};

// CLI commands
pub use cli::{FetchCommand, GenerateCommand, InitCommand, OpenCommand, SuggestCommand};
