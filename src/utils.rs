// ABOUTME: Utility functions for the slidedown application
// ABOUTME: Path validation helpers shared by the pipeline

use crate::errors::{Result, SlidedownError};
use std::path::Path;

/// Validate that a file exists
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(SlidedownError::PathNotFoundError(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(SlidedownError::ValidationError(format!(
            "Path is not a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a file's parent directory exists, creating it if necessary
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    let Some(parent) = file_path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.is_dir() {
        return Ok(());
    }
    if parent.exists() {
        return Err(SlidedownError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            parent
        )));
    }
    std::fs::create_dir_all(parent)?;
    Ok(())
}
