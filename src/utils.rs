//! Utility functions and helpers

use crate::error::{PrefsError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// File system utilities
pub struct FileUtils;

impl FileUtils {
    /// Expand tilde (~) in file paths
    pub fn expand_path(path: &str) -> Result<PathBuf> {
        if path == "~" || path.starts_with("~/") || path.starts_with("~\\") {
            if let Some(home_dir) = dirs::home_dir() {
                let rest = path[1..].trim_start_matches(['/', '\\']);
                Ok(home_dir.join(rest))
            } else {
                Err(PrefsError::Config(
                    "Cannot determine home directory".to_string(),
                ))
            }
        } else {
            Ok(PathBuf::from(path))
        }
    }

    /// Check if file exists and is readable
    pub fn check_file_readable(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PrefsError::FileNotFound(format!(
                "File not found: {:?}",
                path
            )));
        }

        if !path.is_file() {
            return Err(PrefsError::Config(format!("Path is not a file: {:?}", path)));
        }

        File::open(path).map_err(|e| {
            PrefsError::PermissionDenied(format!("Cannot read file {:?}: {}", path, e))
        })?;

        Ok(())
    }

    /// Check that `path` is a directory we can create files in
    pub fn check_dir_writable(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PrefsError::FileNotFound(format!(
                "Directory not found: {:?}",
                path
            )));
        }

        if !path.is_dir() {
            return Err(PrefsError::Config(format!(
                "Path is not a directory: {:?}",
                path
            )));
        }

        // Creates and immediately drops an unnamed file.
        tempfile::tempfile_in(path).map_err(|e| {
            PrefsError::PermissionDenied(format!("Cannot write to {:?}: {}", path, e))
        })?;

        Ok(())
    }
}
