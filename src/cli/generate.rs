//! Generate command for atlas.
//!
//! Builds `objects.json` from an unpacked asset tree, writing it where the
//! documentation site expects it unless an explicit output path is given.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;
use crate::generator::{CatalogGenerator, GeneratorReport};

/// Options for the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Write the catalog here instead of `<asset-root>/<doc-prefix>/objects.json`.
    pub output: Option<PathBuf>,
}

/// Output format for the generate command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOutput {
    /// Whether generation succeeded.
    pub success: bool,
    /// Scan counts.
    pub report: GeneratorReport,
    /// Where the catalog was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error message if generation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateOutput {
    /// Create a successful output.
    pub fn success(report: GeneratorReport, output: String) -> Self {
        Self {
            success: true,
            report,
            output: Some(output),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            report: GeneratorReport::default(),
            output: None,
            error: Some(error.into()),
        }
    }
}

/// The generate command implementation.
pub struct GenerateCommand {
    config: Config,
}

impl GenerateCommand {
    /// Create a new generate command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the generate command for an asset tree.
    pub fn run(&self, asset_root: &Path, options: &GenerateOptions) -> GenerateOutput {
        match self.generate(asset_root, options) {
            Ok((report, output)) => GenerateOutput::success(report, output),
            Err(e) => GenerateOutput::failure(e.to_string()),
        }
    }

    fn generate(
        &self,
        asset_root: &Path,
        options: &GenerateOptions,
    ) -> Result<(GeneratorReport, String)> {
        let generator =
            CatalogGenerator::new(asset_root, self.config.generator.doc_prefix.clone());

        let (entries, report) = generator.generate()?;

        let output_path = options
            .output
            .clone()
            .unwrap_or_else(|| generator.default_output_path());
        generator.write_catalog(&output_path, &entries)?;

        tracing::debug!(
            objects = report.objects,
            effects = report.effects,
            skipped = report.skipped,
            output = %output_path.display(),
            "catalog generated"
        );

        Ok((report, output_path.display().to_string()))
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &GenerateOutput, options: &GenerateOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else if output.success {
            let mut text = format!(
                "Wrote {} entries ({} objects, {} effects) to {}\n",
                output.report.objects + output.report.effects,
                output.report.objects,
                output.report.effects,
                output.output.as_deref().unwrap_or_default()
            );
            if output.report.skipped > 0 {
                text.push_str(&format!(
                    "Skipped {} malformed definition(s)\n",
                    output.report.skipped
                ));
            }
            text
        } else {
            format!(
                "Generation failed: {}\n",
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

    fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let objects = dir.path().join("objects");
        fs::create_dir_all(&objects).unwrap();
        fs::write(
            objects.join("campfire.object"),
            r#"{"objectName": "campfire", "shortdescription": "warm"}"#,
        )
        .unwrap();
        fs::write(objects.join("broken.object"), "{").unwrap();
        dir
    }

    #[test]
    fn test_generate_writes_default_location() {
        let dir = sample_tree();
        let cmd = GenerateCommand::new(Config::default());

        let output = cmd.run(dir.path(), &GenerateOptions::default());

        assert!(output.success);
        assert_eq!(output.report.objects, 1);
        assert_eq!(output.report.skipped, 1);
        assert!(dir
            .path()
            .join("asset-doc")
            .join("objects.json")
            .exists());
    }

    #[test]
    fn test_generate_output_override() {
        let dir = sample_tree();
        let out = dir.path().join("elsewhere").join("catalog.json");
        let cmd = GenerateCommand::new(Config::default());

        let options = GenerateOptions {
            output: Some(out.clone()),
            ..Default::default()
        };
        let output = cmd.run(dir.path(), &options);

        assert!(output.success);
        assert!(out.exists());
    }

    #[test]
    fn test_generate_missing_root_fails() {
        let cmd = GenerateCommand::new(Config::default());
        let output = cmd.run(Path::new("/nonexistent/assets"), &GenerateOptions::default());

        assert!(!output.success);
        assert!(output.error.unwrap().contains("not a directory"));
    }

    #[test]
    fn test_format_output_mentions_skips() {
        let cmd = GenerateCommand::new(Config::default());
        let output = GenerateOutput::success(
            GeneratorReport {
                objects: 2,
                effects: 1,
                skipped: 1,
            },
            "/tmp/objects.json".to_string(),
        );

        let formatted = cmd.format_output(&output, &GenerateOptions::default());
        assert!(formatted.contains("3 entries"));
        assert!(formatted.contains("Skipped 1"));
    }

    #[test]
    fn test_format_output_json() {
        let cmd = GenerateCommand::new(Config::default());
        let output = GenerateOutput::success(GeneratorReport::default(), "/tmp/o.json".into());
        let options = GenerateOptions {
            json: true,
            ..Default::default()
        };

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("\"success\": true"));
    }
}
