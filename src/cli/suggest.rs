//! Suggest command for atlas.
//!
//! Initializes a typeahead from the configured catalog source and prints
//! suggestions for a partial query. A catalog that cannot be loaded leaves
//! the suggester inert rather than failing the command, matching the
//! behavior of the search box this replaces.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::source::resolve_source;
use crate::config::Config;
use crate::error::FailOpen;
use crate::typeahead::{Suggestion, Typeahead};

/// Options for the suggest command.
#[derive(Debug, Clone, Default)]
pub struct SuggestOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Maximum number of suggestions (overrides config).
    pub limit: Option<usize>,
    /// Load the catalog from a local file instead of cache/endpoint.
    pub catalog: Option<PathBuf>,
}

/// Output format for the suggest command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestOutput {
    /// Whether the command ran (an unavailable catalog still counts as ran).
    pub success: bool,
    /// The query used.
    pub query: String,
    /// Number of suggestions.
    pub count: usize,
    /// The suggestions, ranked.
    pub suggestions: Vec<Suggestion>,
    /// True when the catalog was unavailable and the suggester stayed inert.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

impl SuggestOutput {
    /// Create an output carrying suggestions.
    pub fn with_suggestions(query: impl Into<String>, suggestions: Vec<Suggestion>) -> Self {
        let count = suggestions.len();
        Self {
            success: true,
            query: query.into(),
            count,
            suggestions,
            degraded: false,
        }
    }

    /// Create the inert output used when the catalog is unavailable.
    pub fn inert(query: impl Into<String>) -> Self {
        Self {
            success: true,
            query: query.into(),
            count: 0,
            suggestions: Vec::new(),
            degraded: true,
        }
    }
}

/// The suggest command implementation.
pub struct SuggestCommand {
    config: Config,
}

impl SuggestCommand {
    /// Create a new suggest command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the suggest command with the given query.
    pub fn run(&self, query: &str, options: &SuggestOptions) -> SuggestOutput {
        let mut suggest_config = self.config.suggest.clone();
        if let Some(limit) = options.limit {
            suggest_config.max_suggestions = limit;
        }

        let source = resolve_source(options.catalog.as_deref(), &self.config);

        // Catalog unavailable -> inert suggester, not a failed command
        let typeahead = Typeahead::initialize(source.as_ref(), suggest_config)
            .map(Some)
            .fail_open_with("initializing search", None);

        let Some(typeahead) = typeahead else {
            return SuggestOutput::inert(query.trim());
        };

        SuggestOutput::with_suggestions(query.trim(), typeahead.suggest(query))
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SuggestOutput, options: &SuggestOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    /// Format output as human-readable text.
    ///
    /// Mirrors the suggestion template of the search box: emphasized name,
    /// description below, thumbnail marker only when the entry has one.
    fn format_human_readable(&self, output: &SuggestOutput) -> String {
        if output.suggestions.is_empty() {
            return format!("No suggestions for \"{}\"\n", output.query);
        }

        let mut lines = Vec::new();
        lines.push(format!(
            "{} suggestion(s) for \"{}\"\n",
            output.count, output.query
        ));

        for (i, suggestion) in output.suggestions.iter().enumerate() {
            let name = if self.config.suggest.highlight {
                format!("*{}*", suggestion.display())
            } else {
                suggestion.display().to_string()
            };
            let thumb = match &suggestion.img {
                Some(img) => format!("  [img {}]", img),
                None => String::new(),
            };
            lines.push(format!("{}. {}{}", i + 1, name, thumb));
            if !suggestion.description.is_empty() {
                lines.push(format!("   {}", suggestion.description));
            }
            lines.push(format!("   -> {}", suggestion.filename));
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_catalog(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("objects.json");
        fs::write(
            &path,
            r#"[
                {"name": "campfire", "description": "A simple campfire.",
                 "img": "/objects/campfire.png", "filename": "/asset-doc/object/campfire.html"},
                {"name": "torch", "description": "A bright handheld light",
                 "filename": "/asset-doc/object/torch.html"}
            ]"#,
        )
        .unwrap();
        path
    }

    fn options_for(path: PathBuf) -> SuggestOptions {
        SuggestOptions {
            catalog: Some(path),
            ..Default::default()
        }
    }

    #[test]
    fn test_suggest_basic() {
        let dir = TempDir::new().unwrap();
        let options = options_for(write_catalog(&dir));
        let cmd = SuggestCommand::new(Config::default());

        let output = cmd.run("camp", &options);

        assert!(output.success);
        assert!(!output.degraded);
        assert_eq!(output.count, 1);
        assert_eq!(output.suggestions[0].name, "campfire");
    }

    #[test]
    fn test_suggest_short_query_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let options = options_for(write_catalog(&dir));
        let cmd = SuggestCommand::new(Config::default());

        let output = cmd.run("c", &options);

        assert!(output.success);
        assert_eq!(output.count, 0);
    }

    #[test]
    fn test_suggest_limit_override() {
        let dir = TempDir::new().unwrap();
        let options = SuggestOptions {
            limit: Some(1),
            catalog: Some(write_catalog(&dir)),
            ..Default::default()
        };
        let cmd = SuggestCommand::new(Config::default());

        let output = cmd.run("light", &options);
        assert!(output.count <= 1);
    }

    #[test]
    fn test_suggest_missing_catalog_is_inert() {
        let options = options_for(PathBuf::from("/nonexistent/objects.json"));
        let cmd = SuggestCommand::new(Config::default());

        let output = cmd.run("camp", &options);

        // The command does not fail; the suggester is simply inert
        assert!(output.success);
        assert!(output.degraded);
        assert_eq!(output.count, 0);
    }

    #[test]
    fn test_suggest_malformed_catalog_is_inert() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("objects.json");
        fs::write(&path, "not json").unwrap();

        let cmd = SuggestCommand::new(Config::default());
        let output = cmd.run("camp", &options_for(path));

        assert!(output.success);
        assert!(output.degraded);
        assert_eq!(output.count, 0);
    }

    #[test]
    fn test_format_output_json() {
        let dir = TempDir::new().unwrap();
        let options = SuggestOptions {
            json: true,
            catalog: Some(write_catalog(&dir)),
            ..Default::default()
        };
        let cmd = SuggestCommand::new(Config::default());

        let output = cmd.run("camp", &options);
        let formatted = cmd.format_output(&output, &options);

        assert!(formatted.contains("\"success\": true"));
        assert!(formatted.contains("\"campfire\""));
        // The degraded flag is omitted on the happy path
        assert!(!formatted.contains("degraded"));
    }

    #[test]
    fn test_format_output_quiet() {
        let cmd = SuggestCommand::new(Config::default());
        let output = SuggestOutput::with_suggestions("camp", vec![]);
        let options = SuggestOptions {
            quiet: true,
            ..Default::default()
        };

        assert!(cmd.format_output(&output, &options).is_empty());
    }

    #[test]
    fn test_format_thumbnail_marker_only_when_img_present() {
        let dir = TempDir::new().unwrap();
        let options = options_for(write_catalog(&dir));
        let cmd = SuggestCommand::new(Config::default());

        let campfire = cmd.run("campfire", &options);
        let formatted = cmd.format_output(&campfire, &options);
        assert!(formatted.contains("[img /objects/campfire.png]"));

        let torch = cmd.run("torch", &options);
        let formatted = cmd.format_output(&torch, &options);
        assert!(!formatted.contains("[img"));
    }

    #[test]
    fn test_format_highlight_toggle() {
        let dir = TempDir::new().unwrap();
        let options = options_for(write_catalog(&dir));

        let cmd = SuggestCommand::new(Config::default());
        let output = cmd.run("campfire", &options);
        assert!(cmd.format_output(&output, &options).contains("*campfire*"));

        let mut config = Config::default();
        config.suggest.highlight = false;
        let cmd = SuggestCommand::new(config);
        let output = cmd.run("campfire", &options);
        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("campfire"));
        assert!(!formatted.contains("*campfire*"));
    }

    #[test]
    fn test_format_no_suggestions() {
        let cmd = SuggestCommand::new(Config::default());
        let output = SuggestOutput::with_suggestions("xyzzy", vec![]);
        let options = SuggestOptions::default();

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("No suggestions"));
    }
}
