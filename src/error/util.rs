//! Utility functions for error handling
//!
//! Path checks and directory listing with errors that carry the offending path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// Check that a directory exists and is readable, with rich error information
///
/// # Arguments
/// * `path` - The directory to check
/// * `purpose` - What the directory holds (for error context)
pub fn validate_directory(path: &Path, purpose: &str) -> Result<()> {
    if !path.exists() {
        return Err(PipelineError::InvalidInputPath {
            path: path.to_path_buf(),
            reason: format!("could not find {purpose} directory"),
        });
    }

    if path.is_file() {
        return Err(PipelineError::InvalidInputPath {
            path: path.to_path_buf(),
            reason: format!("expected a {purpose} directory, found a file"),
        });
    }

    match fs::read_dir(path) {
        Ok(_) => Ok(()),
        Err(e) => {
            let reason = match e.kind() {
                io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading {purpose} directory")
                }
                _ => format!("failed to read {purpose} directory: {e}"),
            };
            Err(PipelineError::InvalidInputPath {
                path: path.to_path_buf(),
                reason,
            })
        }
    }
}

/// List the regular, non-hidden files in a directory sorted by file name
///
/// Sorting makes unions over a directory (and last-wins collisions) independent
/// of the order the filesystem happens to return entries in.
pub fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(dir, e))?;
        let path = entry.path();
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if path.is_file() && !hidden {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Create a directory and all of its parents
pub fn ensure_directory(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))
}
