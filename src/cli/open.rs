//! Open command for atlas.
//!
//! Resolves a selected suggestion to its navigation target. Unlike
//! `suggest`, an unavailable catalog here is a hard error: the user named a
//! specific entry and silently printing nothing would be worse than failing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::source::resolve_source;
use crate::config::Config;
use crate::typeahead::Typeahead;

/// Options for the open command.
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Load the catalog from a local file instead of cache/endpoint.
    pub catalog: Option<PathBuf>,
}

/// Output format for the open command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOutput {
    /// Whether resolution succeeded.
    pub success: bool,
    /// The selected entry name.
    pub name: String,
    /// The navigation target, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Error message if resolution failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OpenOutput {
    /// Create a successful output.
    pub fn success(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            success: true,
            name: name.into(),
            target: Some(target.into()),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            name: name.into(),
            target: None,
            error: Some(error.into()),
        }
    }
}

/// The open command implementation.
pub struct OpenCommand {
    config: Config,
}

impl OpenCommand {
    /// Create a new open command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the open command for a selected entry name.
    pub fn run(&self, name: &str, options: &OpenOptions) -> OpenOutput {
        let name = name.trim();
        if name.is_empty() {
            return OpenOutput::failure("", "Entry name cannot be empty");
        }

        let source = resolve_source(options.catalog.as_deref(), &self.config);
        let typeahead = match Typeahead::initialize(source.as_ref(), self.config.suggest.clone())
        {
            Ok(typeahead) => typeahead,
            Err(e) => return OpenOutput::failure(name, e.to_string()),
        };

        match typeahead.select(name) {
            Some(target) => OpenOutput::success(name, target),
            None => OpenOutput::failure(name, format!("entry not found: {}", name)),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &OpenOutput, options: &OpenOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else if output.success {
            // Just the target, so the output can feed a browser or pipe
            format!("{}\n", output.target.as_deref().unwrap_or_default())
        } else {
            format!(
                "Could not open \"{}\": {}\n",
                output.name,
                output.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn options_with_catalog(dir: &TempDir) -> OpenOptions {
        let path = dir.path().join("objects.json");
        fs::write(
            &path,
            r#"[
                {"name": "campfire", "description": "warm",
                 "filename": "/asset-doc/object/campfire.html"},
                {"name": "burning", "description": "on fire",
                 "filename": "/asset-doc/statuseffect/burning.html"}
            ]"#,
        )
        .unwrap();
        OpenOptions {
            catalog: Some(path),
            ..Default::default()
        }
    }

    #[test]
    fn test_open_resolves_exact_target() {
        let dir = TempDir::new().unwrap();
        let options = options_with_catalog(&dir);
        let cmd = OpenCommand::new(Config::default());

        let output = cmd.run("campfire", &options);

        assert!(output.success);
        assert_eq!(
            output.target.as_deref(),
            Some("/asset-doc/object/campfire.html")
        );

        // A different selection resolves to that entry's URL, never another's
        let output = cmd.run("burning", &options);
        assert_eq!(
            output.target.as_deref(),
            Some("/asset-doc/statuseffect/burning.html")
        );
    }

    #[test]
    fn test_open_unknown_entry_fails() {
        let dir = TempDir::new().unwrap();
        let options = options_with_catalog(&dir);
        let cmd = OpenCommand::new(Config::default());

        let output = cmd.run("anvil", &options);

        assert!(!output.success);
        assert!(output.error.unwrap().contains("entry not found"));
    }

    #[test]
    fn test_open_empty_name_fails() {
        let dir = TempDir::new().unwrap();
        let options = options_with_catalog(&dir);
        let cmd = OpenCommand::new(Config::default());

        let output = cmd.run("  ", &options);

        assert!(!output.success);
    }

    #[test]
    fn test_open_missing_catalog_is_hard_error() {
        let options = OpenOptions {
            catalog: Some(std::path::PathBuf::from("/nonexistent/objects.json")),
            ..Default::default()
        };
        let cmd = OpenCommand::new(Config::default());

        let output = cmd.run("campfire", &options);

        assert!(!output.success);
        assert!(output.error.is_some());
    }

    #[test]
    fn test_format_output_plain_target() {
        let cmd = OpenCommand::new(Config::default());
        let output = OpenOutput::success("campfire", "/asset-doc/object/campfire.html");

        let formatted = cmd.format_output(&output, &OpenOptions::default());
        assert_eq!(formatted, "/asset-doc/object/campfire.html\n");
    }

    #[test]
    fn test_format_output_json() {
        let cmd = OpenCommand::new(Config::default());
        let output = OpenOutput::success("campfire", "/asset-doc/object/campfire.html");
        let options = OpenOptions {
            json: true,
            ..Default::default()
        };

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("\"success\": true"));
        assert!(formatted.contains("campfire.html"));
    }

    #[test]
    fn test_format_output_failure() {
        let cmd = OpenCommand::new(Config::default());
        let output = OpenOutput::failure("anvil", "entry not found: anvil");

        let formatted = cmd.format_output(&output, &OpenOptions::default());
        assert!(formatted.contains("Could not open"));
        assert!(formatted.contains("anvil"));
    }
}
