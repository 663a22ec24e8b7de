//! Utility functions for atlas.
//!
//! This module provides common utilities used across atlas modules.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{AtlasError, Result};

/// Maximum file size that can be read into memory (10 MB).
///
/// This limit prevents memory issues when reading very large catalog files
/// or asset definitions. A catalog of several thousand entries is well under
/// this limit.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10 MB

/// Read a file into a string with size limit protection.
///
/// Returns an error if the file exceeds [`MAX_FILE_SIZE`].
///
/// # Errors
///
/// Returns an error if:
/// * The file cannot be read (doesn't exist, permission denied, etc.)
/// * The file exceeds [`MAX_FILE_SIZE`]
pub fn read_to_string_limited(path: &Path) -> Result<String> {
    read_to_string_with_limit(path, MAX_FILE_SIZE)
}

/// Read a file into a string with a custom size limit.
///
/// This variant allows specifying a custom limit for files that may need
/// different constraints.
pub fn read_to_string_with_limit(path: &Path, max_size: u64) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| AtlasError::storage(path, e))?;

    let size = metadata.len();
    if size > max_size {
        return Err(AtlasError::storage(
            path,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("file is too large ({} bytes, max {} bytes)", size, max_size),
            ),
        ));
    }

    fs::read_to_string(path).map_err(|e| AtlasError::storage(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_small_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("small.json");
        fs::write(&path, "[]").unwrap();

        let content = read_to_string_limited(&path).unwrap();
        assert_eq!(content, "[]");
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_to_string_limited(Path::new("/nonexistent/objects.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_read_over_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.json");
        fs::write(&path, "x".repeat(128)).unwrap();

        let result = read_to_string_with_limit(&path, 64);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too large"));
    }

    #[test]
    fn test_read_at_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exact.json");
        fs::write(&path, "x".repeat(64)).unwrap();

        let content = read_to_string_with_limit(&path, 64).unwrap();
        assert_eq!(content.len(), 64);
    }
}
