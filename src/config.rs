//! Configuration loading for atlas.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.atlas/config.toml`)
//! 3. User config (`~/.atlas/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The tool runs with sensible defaults
//! when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AtlasError, Result};

/// Main configuration struct for atlas.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Catalog location configuration.
    pub catalog: CatalogConfig,
    /// Suggestion behavior configuration.
    pub suggest: SuggestConfig,
    /// HTTP fetch configuration.
    pub fetch: FetchConfig,
    /// Catalog generator configuration.
    pub generator: GeneratorConfig,
}

/// Catalog location configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Endpoint serving the catalog JSON.
    pub endpoint: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/asset-doc/objects.json".to_string(),
        }
    }
}

/// Suggestion behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SuggestConfig {
    /// Minimum query length (in characters) before suggestions appear.
    pub min_query_len: usize,
    /// Maximum number of suggestions shown for a query.
    pub max_suggestions: usize,
    /// Whether to emphasize the entry name in text output.
    pub highlight: bool,
}

/// Minimum valid `min_query_len` value.
pub const MIN_QUERY_LEN_FLOOR: usize = 1;

/// Minimum valid `max_suggestions` value.
pub const MAX_SUGGESTIONS_FLOOR: usize = 1;

impl SuggestConfig {
    /// Check if a min_query_len value is valid (must be >= 1).
    ///
    /// A value of 0 would suggest the entire catalog for an empty query.
    pub fn is_valid_min_query_len(value: usize) -> bool {
        value >= MIN_QUERY_LEN_FLOOR
    }

    /// Check if a max_suggestions value is valid (must be >= 1).
    pub fn is_valid_max_suggestions(value: usize) -> bool {
        value >= MAX_SUGGESTIONS_FLOOR
    }
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            max_suggestions: 20,
            highlight: true,
        }
    }
}

/// HTTP fetch configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

/// Minimum valid fetch timeout.
pub const MIN_TIMEOUT_SECONDS: u64 = 1;

impl FetchConfig {
    /// Check if a timeout value is valid (must be >= 1).
    pub fn is_valid_timeout(value: u64) -> bool {
        value >= MIN_TIMEOUT_SECONDS
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_seconds: 10 }
    }
}

/// Catalog generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// URL prefix used for generated page links and the output directory name.
    pub doc_prefix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            doc_prefix: "/asset-doc".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Project config (`.atlas/config.toml` in cwd)
    /// 3. User config (`~/.atlas/config.toml`)
    /// 4. Defaults
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.atlas/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = atlas_home()?;
        let config_path = home.join("config.toml");
        Self::load_from_file(&config_path).ok()
    }

    /// Load project config from `.atlas/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        let config_path = cwd.join(".atlas").join("config.toml");
        Self::load_from_file(&config_path).ok()
    }

    /// Load config from a specific file path.
    fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| AtlasError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| AtlasError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // ATLAS_ENDPOINT
        if let Ok(val) = env::var("ATLAS_ENDPOINT") {
            if val.is_empty() {
                eprintln!(
                    "Warning: ATLAS_ENDPOINT is empty. Using default '{}'.",
                    self.catalog.endpoint
                );
            } else {
                self.catalog.endpoint = val;
            }
        }

        // ATLAS_MIN_QUERY_LEN
        if let Ok(val) = env::var("ATLAS_MIN_QUERY_LEN") {
            match val.parse::<usize>() {
                Ok(n) => {
                    if SuggestConfig::is_valid_min_query_len(n) {
                        self.suggest.min_query_len = n;
                    } else {
                        eprintln!(
                            "Warning: Invalid ATLAS_MIN_QUERY_LEN value '{}'. \
                            Must be >= {}. Using default '{}'.",
                            n, MIN_QUERY_LEN_FLOOR, self.suggest.min_query_len
                        );
                    }
                }
                Err(_) => eprintln!(
                    "Warning: Invalid ATLAS_MIN_QUERY_LEN value '{}'. \
                    Expected a positive integer. Using default '{}'.",
                    val, self.suggest.min_query_len
                ),
            }
        }

        // ATLAS_MAX_SUGGESTIONS
        if let Ok(val) = env::var("ATLAS_MAX_SUGGESTIONS") {
            match val.parse::<usize>() {
                Ok(n) => {
                    if SuggestConfig::is_valid_max_suggestions(n) {
                        self.suggest.max_suggestions = n;
                    } else {
                        eprintln!(
                            "Warning: Invalid ATLAS_MAX_SUGGESTIONS value '{}'. \
                            Must be >= {}. Using default '{}'.",
                            n, MAX_SUGGESTIONS_FLOOR, self.suggest.max_suggestions
                        );
                    }
                }
                Err(_) => eprintln!(
                    "Warning: Invalid ATLAS_MAX_SUGGESTIONS value '{}'. \
                    Expected a positive integer. Using default '{}'.",
                    val, self.suggest.max_suggestions
                ),
            }
        }

        // ATLAS_HIGHLIGHT
        if let Ok(val) = env::var("ATLAS_HIGHLIGHT") {
            self.suggest.highlight = val == "true" || val == "1";
        }

        // ATLAS_FETCH_TIMEOUT
        if let Ok(val) = env::var("ATLAS_FETCH_TIMEOUT") {
            match val.parse::<u64>() {
                Ok(n) => {
                    if FetchConfig::is_valid_timeout(n) {
                        self.fetch.timeout_seconds = n;
                    } else {
                        eprintln!(
                            "Warning: Invalid ATLAS_FETCH_TIMEOUT value '{}'. \
                            Must be >= {}. Using default '{}'.",
                            n, MIN_TIMEOUT_SECONDS, self.fetch.timeout_seconds
                        );
                    }
                }
                Err(_) => eprintln!(
                    "Warning: Invalid ATLAS_FETCH_TIMEOUT value '{}'. \
                    Expected a positive integer. Using default '{}'.",
                    val, self.fetch.timeout_seconds
                ),
            }
        }

        // ATLAS_DOC_PREFIX
        if let Ok(val) = env::var("ATLAS_DOC_PREFIX") {
            if val.starts_with('/') {
                self.generator.doc_prefix = val;
            } else {
                eprintln!(
                    "Warning: Invalid ATLAS_DOC_PREFIX value '{}'. \
                    Must start with '/'. Using default '{}'.",
                    val, self.generator.doc_prefix
                );
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// The `other` config takes precedence. All non-default fields from `other`
    /// are applied to `self`, enabling proper layering of the precedence chain.
    /// This is field-by-field merging, which ensures that explicit defaults in
    /// one config do not block overrides from another.
    ///
    /// # Limitation
    ///
    /// A config cannot explicitly set a value back to the default to override a
    /// non-default value from a lower-precedence config, because "not set in
    /// file" and "explicitly set to default" are indistinguishable without
    /// `Option<T>` fields. Each layer only needs to specify its customizations.
    fn merge(mut self, other: Config) -> Self {
        let default_catalog = CatalogConfig::default();
        if other.catalog.endpoint != default_catalog.endpoint {
            self.catalog.endpoint = other.catalog.endpoint;
        }

        let default_suggest = SuggestConfig::default();
        if other.suggest.min_query_len != default_suggest.min_query_len {
            self.suggest.min_query_len = other.suggest.min_query_len;
        }
        if other.suggest.max_suggestions != default_suggest.max_suggestions {
            self.suggest.max_suggestions = other.suggest.max_suggestions;
        }
        if other.suggest.highlight != default_suggest.highlight {
            self.suggest.highlight = other.suggest.highlight;
        }

        let default_fetch = FetchConfig::default();
        if other.fetch.timeout_seconds != default_fetch.timeout_seconds {
            self.fetch.timeout_seconds = other.fetch.timeout_seconds;
        }

        let default_generator = GeneratorConfig::default();
        if other.generator.doc_prefix != default_generator.doc_prefix {
            self.generator.doc_prefix = other.generator.doc_prefix;
        }

        self
    }

    /// Save configuration to the project config file.
    ///
    /// Writes to `.atlas/config.toml` in the given directory.
    /// Creates the `.atlas` directory if it doesn't exist.
    /// Uses atomic write (write to temp file, then rename) for safety.
    pub fn save_project(&self, cwd: &Path) -> Result<()> {
        let atlas_dir = cwd.join(".atlas");

        if !atlas_dir.exists() {
            fs::create_dir_all(&atlas_dir).map_err(|e| AtlasError::storage(&atlas_dir, e))?;
        }

        let config_path = atlas_dir.join("config.toml");

        let content =
            toml::to_string_pretty(self).map_err(|e| AtlasError::config(e.to_string()))?;

        // Atomic write: write to temp file, then rename
        let temp_path = atlas_dir.join(".config.toml.tmp");
        fs::write(&temp_path, &content).map_err(|e| AtlasError::storage(&temp_path, e))?;

        let file = fs::File::open(&temp_path).map_err(|e| AtlasError::storage(&temp_path, e))?;
        file.sync_all()
            .map_err(|e| AtlasError::storage(&temp_path, e))?;
        drop(file);

        fs::rename(&temp_path, &config_path).map_err(|e| AtlasError::storage(&config_path, e))?;

        Ok(())
    }
}

/// Get the atlas home directory.
///
/// Checks `ATLAS_HOME` environment variable first, then falls back to
/// `~/.atlas`.
///
/// # Validation
///
/// If `ATLAS_HOME` is set, it must be:
/// - Non-empty
/// - An absolute path (or we canonicalize it)
///
/// Invalid values are ignored and we fall back to the default.
pub fn atlas_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("ATLAS_HOME") {
        if home.is_empty() {
            tracing::warn!("ATLAS_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("ATLAS_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".atlas"));
    }

    // Fallback for containerized/minimal environments without HOME
    let fallback_path = fallback_atlas_home();
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback_path.display()
    );
    Some(fallback_path)
}

/// Get fallback atlas home path when HOME is unavailable.
#[cfg(unix)]
fn fallback_atlas_home() -> PathBuf {
    use std::os::unix::fs::MetadataExt;
    // Get UID for unique temp directory
    let uid = std::fs::metadata("/").map(|m| m.uid()).unwrap_or(0);
    PathBuf::from(format!("/tmp/atlas-{}", uid))
}

/// Get fallback atlas home path when HOME is unavailable.
#[cfg(not(unix))]
fn fallback_atlas_home() -> PathBuf {
    std::env::temp_dir().join("atlas")
}

/// Get the cached catalog path.
///
/// Returns `<atlas_home>/catalog.json`.
pub fn catalog_cache_path() -> Option<PathBuf> {
    atlas_home().map(|h| h.join("catalog.json"))
}

/// Get the cached catalog metadata path.
///
/// Returns `<atlas_home>/catalog.meta.json`.
pub fn catalog_meta_path() -> Option<PathBuf> {
    atlas_home().map(|h| h.join("catalog.meta.json"))
}

/// Find the project root for a given working directory.
///
/// Walks up the directory tree using the following precedence:
///
/// 1. **Existing `.atlas/` directory** - explicit placement wins.
/// 2. **Git repository root** - via `git rev-parse --show-toplevel`, which
///    handles worktrees and submodules.
/// 3. **Fallback to cwd** - not a git repo, or git not installed.
pub fn find_project_root(cwd: &Path) -> PathBuf {
    for ancestor in cwd.ancestors() {
        if ancestor.join(".atlas").is_dir() {
            return ancestor.to_path_buf();
        }
    }

    if let Ok(output) = std::process::Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(cwd)
        .output()
    {
        if output.status.success() {
            if let Ok(path) = String::from_utf8(output.stdout) {
                let trimmed = path.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
        }
    }

    cwd.to_path_buf()
}

/// Get the project atlas directory for a given working directory.
///
/// Finds the project root (see [`find_project_root`]) and returns its
/// `.atlas/` subdirectory.
pub fn project_atlas_dir(cwd: &Path) -> PathBuf {
    find_project_root(cwd).join(".atlas")
}
