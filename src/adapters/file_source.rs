// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading configuration documents from disk.
//!
//! Every file the crate reads, input documents and settings alike, goes through
//! [`FileSource::from_file`], so size limits and error reporting are uniform.

use crate::domain::{ConvertError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum accepted size of a configuration file (10MB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// The text of one configuration file and where it came from.
///
/// # Examples
///
/// ```rust,no_run
/// use proxyconv::adapters::FileSource;
///
/// let source = FileSource::from_file("/etc/nginx/conf.d/site.conf").unwrap();
/// println!("{} bytes", source.content().len());
/// ```
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    content: String,
}

impl FileSource {
    /// Reads a file, rejecting anything larger than [`MAX_FILE_SIZE`].
    ///
    /// Every failure is a `ParseError` carrying the requested path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();

        let canonical_path = file_path.canonicalize().map_err(|e| ConvertError::ParseError {
            message: "Invalid or inaccessible path".to_string(),
            path: Some(file_path.clone()),
            source: Some(Box::new(e)),
        })?;

        let metadata = fs::metadata(&canonical_path).map_err(|e| ConvertError::ParseError {
            message: "Failed to read file metadata".to_string(),
            path: Some(file_path.clone()),
            source: Some(Box::new(e)),
        })?;

        if metadata.len() > MAX_FILE_SIZE {
            return Err(ConvertError::ParseError {
                message: format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_FILE_SIZE
                ),
                path: Some(file_path),
                source: None,
            });
        }

        let content = fs::read_to_string(&canonical_path).map_err(|e| ConvertError::ParseError {
            message: "Failed to read configuration file".to_string(),
            path: Some(file_path.clone()),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            path: file_path,
            content,
        })
    }

    /// The path the file was requested under.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Lowercased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}
