//! Utility functions for error handling
//!
//! File helpers that attach the path and the purpose of the operation to
//! any IO failure.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.is_file() {
        let kind = if path.exists() {
            io::ErrorKind::InvalidInput
        } else {
            io::ErrorKind::NotFound
        };
        return Err(Error::io(
            format!("Expected a file for: {purpose}"),
            path,
            io::Error::from(kind),
        ));
    }

    fs::File::open(path).map_err(|e| {
        let message = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "Permission denied - check file permissions".to_string()
            }
            _ => format!("Failed to open file for: {purpose}"),
        };
        Error::io(message, path, e)
    })
}

/// Create (or truncate) a file for writing, creating parent directories
pub fn safe_create_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            Error::io(format!("Failed to create directory for: {purpose}"), parent, e)
        })?;
    }

    fs::File::create(path)
        .map_err(|e| Error::io(format!("Failed to create file for: {purpose}"), path, e))
}

/// Safely read a file to string with rich error information
pub fn safe_read_to_string(path: &Path, purpose: &str) -> Result<String> {
    let mut file = safe_open_file(path, purpose)?;

    let mut content = String::new();
    io::Read::read_to_string(&mut file, &mut content).map_err(|e| {
        let message = match e.kind() {
            io::ErrorKind::InvalidData => {
                "File contains invalid UTF-8 data - cannot read as text".to_string()
            }
            _ => format!("Failed to read file content for: {purpose}"),
        };
        Error::io(message, path, e)
    })?;

    Ok(content)
}
