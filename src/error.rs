//! Unified error types for atlas.
//!
//! Library code surfaces every failure as an explicit [`AtlasError`] so the
//! caller can decide what to do with it. The CLI layer deliberately degrades
//! on catalog failures: a catalog that cannot be fetched or parsed leaves the
//! suggester inert (no suggestions for any query) instead of crashing, which
//! is what the [`FailOpen`] helpers are for.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for atlas operations.
#[derive(Error, Debug)]
pub enum AtlasError {
    /// I/O errors reading or writing catalog and cache files.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// HTTP fetch errors (connection, timeout, non-success status).
    #[error("fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// JSON parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Catalog validation errors (no usable entries, schema violations).
    #[error("catalog error: {message}")]
    Catalog { message: String },

    /// Lookup of a suggestion name that is not in the catalog.
    #[error("entry not found: {name}")]
    EntryNotFound { name: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Catalog generation errors (unreadable asset tree, bad output path).
    #[error("generator error: {message}")]
    Generator { message: String },
}

/// A specialized Result type for atlas operations.
pub type Result<T> = std::result::Result<T, AtlasError>;

impl AtlasError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a fetch error.
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a catalog error.
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create an entry-not-found error.
    pub fn entry_not_found(name: impl Into<String>) -> Self {
        Self::EntryNotFound { name: name.into() }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a generator error.
    pub fn generator(message: impl Into<String>) -> Self {
        Self::Generator {
            message: message.into(),
        }
    }
}

impl From<io::Error> for AtlasError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AtlasError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for degraded error handling.
///
/// The original search box swallowed catalog failures and simply never showed
/// a suggestion. These helpers reproduce that end-user behavior at the CLI
/// boundary while still logging what went wrong.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (degrading to default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (degrading to fallback)", context, err);
                fallback
            }
        }
    }
}

/// Exit codes for the atlas CLI.
pub mod exit_codes {
    /// Exit code for successful commands.
    pub const SUCCESS: i32 = 0;

    /// Exit code for failed commands.
    pub const ERROR: i32 = 1;
}
