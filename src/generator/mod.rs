//! Catalog generation from unpacked asset trees.
//!
//! An asset tree holds object definitions under `objects/**/*.object` and
//! status effects under `stats/effects/**/*.statuseffect`, both JSON with
//! comments. The generator scans the tree and distills one catalog entry
//! per definition, pointing at the documentation page that entry would be
//! rendered to.
//!
//! Individual files that fail to parse are warned about and skipped; a
//! handful of malformed definitions must not sink the whole catalog.

pub mod jsonc;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::error::{AtlasError, Result};
use crate::util::read_to_string_limited;

pub use jsonc::strip_comments;

/// Counts reported after a generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratorReport {
    /// Object entries produced.
    pub objects: usize,
    /// Status effect entries produced.
    pub effects: usize,
    /// Definition files skipped as malformed.
    pub skipped: usize,
}

/// Scans an asset tree and produces catalog entries.
pub struct CatalogGenerator {
    asset_root: PathBuf,
    doc_prefix: String,
}

impl CatalogGenerator {
    /// Create a generator rooted at an unpacked asset tree.
    pub fn new(asset_root: impl Into<PathBuf>, doc_prefix: impl Into<String>) -> Self {
        Self {
            asset_root: asset_root.into(),
            doc_prefix: doc_prefix.into(),
        }
    }

    /// The output path the original site layout expects:
    /// `<asset_root>/<doc_prefix>/objects.json`.
    pub fn default_output_path(&self) -> PathBuf {
        self.asset_root
            .join(self.doc_prefix.trim_start_matches('/'))
            .join("objects.json")
    }

    /// Scan the tree and build catalog entries.
    ///
    /// Objects come first, then status effects, each group ordered by name.
    pub fn generate(&self) -> Result<(Vec<CatalogEntry>, GeneratorReport)> {
        if !self.asset_root.is_dir() {
            return Err(AtlasError::generator(format!(
                "asset root {} is not a directory",
                self.asset_root.display()
            )));
        }

        let mut report = GeneratorReport::default();
        let mut entries = Vec::new();

        let objects = self.scan_objects(&mut report)?;
        report.objects = objects.len();
        entries.extend(objects);

        let effects = self.scan_effects(&mut report)?;
        report.effects = effects.len();
        entries.extend(effects);

        Ok((entries, report))
    }

    /// Write entries to a catalog file, atomically.
    pub fn write_catalog(&self, path: &Path, entries: &[CatalogEntry]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| AtlasError::storage(parent, e))?;
        }

        let body = serde_json::to_string(entries)?;

        // Atomic write: temp file in the same directory, then rename
        let temp_path = path.with_extension("json.tmp");
        let mut file =
            fs::File::create(&temp_path).map_err(|e| AtlasError::storage(&temp_path, e))?;
        file.write_all(body.as_bytes())
            .map_err(|e| AtlasError::storage(&temp_path, e))?;
        file.sync_all()
            .map_err(|e| AtlasError::storage(&temp_path, e))?;
        drop(file);

        fs::rename(&temp_path, path).map_err(|e| AtlasError::storage(path, e))?;

        Ok(())
    }

    /// Scan `objects/**/*.object`.
    fn scan_objects(&self, report: &mut GeneratorReport) -> Result<Vec<CatalogEntry>> {
        let objects_dir = self.asset_root.join("objects");
        let files = collect_files(&objects_dir, "object")?;
        tracing::debug!(count = files.len(), dir = %objects_dir.display(), "object definitions found");

        // Later definitions win on name collisions, so keyed collection
        let mut by_name: std::collections::BTreeMap<String, CatalogEntry> = Default::default();

        for path in files {
            let value = match self.parse_definition(&path) {
                Some(value) => value,
                None => {
                    report.skipped += 1;
                    continue;
                }
            };

            let name = value
                .get("objectName")
                .or_else(|| value.get("name"))
                .and_then(|v| v.as_str());
            let name = match name {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => {
                    tracing::warn!(path = %path.display(), "object definition has no name");
                    report.skipped += 1;
                    continue;
                }
            };

            let description = value
                .get("shortdescription")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();

            let rel_dir = self.relative_dir(&path);

            by_name.insert(
                name.clone(),
                CatalogEntry {
                    img: Some(format!("{}/{}.png", rel_dir, name)),
                    filename: format!("{}/object/{}.html", self.doc_prefix, name),
                    name,
                    description,
                },
            );
        }

        Ok(by_name.into_values().collect())
    }

    /// Scan `stats/effects/**/*.statuseffect`.
    fn scan_effects(&self, report: &mut GeneratorReport) -> Result<Vec<CatalogEntry>> {
        let effects_dir = self.asset_root.join("stats").join("effects");
        let files = collect_files(&effects_dir, "statuseffect")?;
        tracing::debug!(count = files.len(), dir = %effects_dir.display(), "effect definitions found");

        let mut by_name: std::collections::BTreeMap<String, CatalogEntry> = Default::default();

        for path in files {
            let value = match self.parse_definition(&path) {
                Some(value) => value,
                None => {
                    report.skipped += 1;
                    continue;
                }
            };

            // Effects are named after their file, not a field
            let name = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if !stem.is_empty() => stem.to_string(),
                _ => {
                    tracing::warn!(path = %path.display(), "effect file has no usable stem");
                    report.skipped += 1;
                    continue;
                }
            };

            let description = value
                .get("label")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();

            let img = value
                .get("icon")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());

            by_name.insert(
                name.clone(),
                CatalogEntry {
                    img,
                    filename: format!("{}/statuseffect/{}.html", self.doc_prefix, name),
                    name,
                    description,
                },
            );
        }

        Ok(by_name.into_values().collect())
    }

    /// Read, strip comments, and parse one definition file.
    ///
    /// Returns `None` (after logging) for anything unreadable or unparsable.
    fn parse_definition(&self, path: &Path) -> Option<serde_json::Value> {
        let raw = match read_to_string_limited(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), "skipping unreadable definition: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&strip_comments(&raw)) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(path = %path.display(), "skipping malformed definition: {}", e);
                None
            }
        }
    }

    /// Directory of a definition relative to the asset root, with a leading
    /// slash and forward separators, matching the generated image URLs.
    fn relative_dir(&self, path: &Path) -> String {
        let dir = path.parent().unwrap_or(&self.asset_root);
        let rel = dir.strip_prefix(&self.asset_root).unwrap_or(dir);
        let mut out = String::new();
        for component in rel.components() {
            out.push('/');
            out.push_str(&component.as_os_str().to_string_lossy());
        }
        out
    }
}

/// Recursively collect files with the given extension, sorted by path.
///
/// A missing directory yields an empty list; an asset tree without status
/// effects is still a valid tree.
fn collect_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    if dir.is_dir() {
        collect_into(dir, extension, &mut out)?;
    }
    out.sort();
    Ok(out)
}

fn collect_into(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| AtlasError::storage(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| AtlasError::storage(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            collect_into(&path, extension, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            out.push(path);
        }
    }
    Ok(())
}
