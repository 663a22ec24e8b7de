//! Init command for atlas.
//!
//! Scaffolds the project configuration file with documented defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::project_atlas_dir;

/// Options for the init command.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Force overwrite existing files.
    pub force: bool,
}

/// Output format for the init command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitOutput {
    /// Whether initialization was successful.
    pub success: bool,
    /// Files and directories created.
    pub created: Vec<String>,
    /// Files that already existed (skipped).
    pub skipped: Vec<String>,
    /// Error message if initialization failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InitOutput {
    /// Create a successful output.
    pub fn success(created: Vec<String>, skipped: Vec<String>) -> Self {
        Self {
            success: true,
            created,
            skipped,
            error: None,
        }
    }

    /// Create a failed output with partial success information.
    ///
    /// This reports what was created before the failure occurred, so the user
    /// knows what partial state may have been left behind.
    pub fn failure(error: impl Into<String>, created: Vec<String>, skipped: Vec<String>) -> Self {
        Self {
            success: false,
            created,
            skipped,
            error: Some(error.into()),
        }
    }
}

/// Default config.toml content.
const DEFAULT_CONFIG: &str = r#"# Atlas Configuration
#
# This file configures the atlas catalog search tool.

# Where the catalog JSON is served
[catalog]
endpoint = "http://localhost:8000/asset-doc/objects.json"

# Suggestion behavior
# min_query_len: characters typed before suggestions appear
# max_suggestions: most suggestions shown for one query
[suggest]
min_query_len = 2
max_suggestions = 20
highlight = true

# HTTP fetch settings
[fetch]
timeout_seconds = 10

# Catalog generation settings
# doc_prefix: URL prefix of the generated documentation pages
[generator]
doc_prefix = "/asset-doc"
"#;

/// The init command implementation.
pub struct InitCommand {
    cwd: String,
}

impl InitCommand {
    /// Create a new init command for a working directory.
    pub fn new(cwd: String) -> Self {
        Self { cwd }
    }

    /// Run the init command.
    pub fn run(&self, options: &InitOptions) -> InitOutput {
        let mut created = Vec::new();
        let mut skipped = Vec::new();

        let atlas_dir = project_atlas_dir(Path::new(&self.cwd));

        if !atlas_dir.exists() {
            if let Err(e) = fs::create_dir_all(&atlas_dir) {
                return InitOutput::failure(
                    format!("could not create {}: {}", atlas_dir.display(), e),
                    created,
                    skipped,
                );
            }
            created.push(atlas_dir.display().to_string());
        }

        let config_path = atlas_dir.join("config.toml");
        if config_path.exists() && !options.force {
            skipped.push(config_path.display().to_string());
        } else {
            if let Err(e) = fs::write(&config_path, DEFAULT_CONFIG) {
                return InitOutput::failure(
                    format!("could not write {}: {}", config_path.display(), e),
                    created,
                    skipped,
                );
            }
            created.push(config_path.display().to_string());
        }

        InitOutput::success(created, skipped)
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &InitOutput, options: &InitOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        let mut lines = Vec::new();
        if output.success {
            for path in &output.created {
                lines.push(format!("Created {}", path));
            }
            for path in &output.skipped {
                lines.push(format!("Skipped {} (already exists)", path));
            }
            if output.created.is_empty() && output.skipped.is_empty() {
                lines.push("Nothing to do".to_string());
            }
        } else {
            lines.push(format!(
                "Init failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            ));
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_config() {
        let dir = TempDir::new().unwrap();
        let cmd = InitCommand::new(dir.path().to_string_lossy().to_string());

        let output = cmd.run(&InitOptions::default());

        assert!(output.success);
        assert!(dir.path().join(".atlas").join("config.toml").exists());
        assert_eq!(output.created.len(), 2); // directory + config
    }

    #[test]
    fn test_init_skips_existing_config() {
        let dir = TempDir::new().unwrap();
        let cmd = InitCommand::new(dir.path().to_string_lossy().to_string());

        cmd.run(&InitOptions::default());
        let output = cmd.run(&InitOptions::default());

        assert!(output.success);
        assert!(output.created.is_empty());
        assert_eq!(output.skipped.len(), 1);
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = TempDir::new().unwrap();
        let cmd = InitCommand::new(dir.path().to_string_lossy().to_string());

        cmd.run(&InitOptions::default());
        let config_path = dir.path().join(".atlas").join("config.toml");
        fs::write(&config_path, "# scribbled over").unwrap();

        let options = InitOptions {
            force: true,
            ..Default::default()
        };
        let output = cmd.run(&options);

        assert!(output.success);
        assert_eq!(output.skipped.len(), 0);
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("min_query_len"));
    }

    #[test]
    fn test_default_config_parses() {
        // The scaffold must stay in sync with the Config schema
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_format_output_lists_paths() {
        let dir = TempDir::new().unwrap();
        let cmd = InitCommand::new(dir.path().to_string_lossy().to_string());

        let output = cmd.run(&InitOptions::default());
        let formatted = cmd.format_output(&output, &InitOptions::default());

        assert!(formatted.contains("Created"));
        assert!(formatted.contains("config.toml"));
    }

    #[test]
    fn test_format_output_json() {
        let dir = TempDir::new().unwrap();
        let cmd = InitCommand::new(dir.path().to_string_lossy().to_string());

        let output = cmd.run(&InitOptions::default());
        let options = InitOptions {
            json: true,
            ..Default::default()
        };

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("\"success\": true"));
    }
}
