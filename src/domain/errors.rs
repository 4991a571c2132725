// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the conversion crate.
//!
//! This module defines the error types that can occur when reading, parsing, or
//! generating proxy configurations. All errors use `thiserror` for proper error
//! handling and conversion.

use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error type for conversion operations.
///
/// This enum represents all fatal errors of a conversion. Output validation problems
/// are not errors; they are reported as [`ValidationWarning`](crate::domain::ValidationWarning)
/// values attached to a successful result. It is marked as `#[non_exhaustive]` to allow
/// for future additions without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use proxyconv::domain::errors::ConvertError;
///
/// fn lookup_format(key: &str) -> Result<(), ConvertError> {
///     Err(ConvertError::UnsupportedFormat {
///         format: key.to_string(),
///     })
/// }
///
/// assert!(lookup_format("haproxy").is_err());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// The requested input or output format has no registered adapter.
    #[error("Unsupported format: {format}")]
    UnsupportedFormat {
        /// The format key that was requested
        format: String,
    },

    /// Failed to read or parse a configuration document.
    #[error("Failed to parse configuration{}: {message}", display_path(.path))]
    ParseError {
        /// The error message
        message: String,
        /// The file being parsed, when the input came from a file
        path: Option<PathBuf>,
        /// The underlying parsing or I/O error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to render a configuration document.
    #[error("Failed to generate {format} configuration: {message}")]
    GenerateError {
        /// The output format key
        format: String,
        /// The error message
        message: String,
        /// The underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while writing output.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" '{}'", p.display()),
        None => String::new(),
    }
}

impl ConvertError {
    /// Creates a `ParseError` with only a message.
    pub fn parse(message: impl Into<String>) -> Self {
        ConvertError::ParseError {
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Creates a `ParseError` from a YAML deserialization error.
    pub fn from_yaml_error(context: &str, err: serde_yaml::Error) -> Self {
        ConvertError::ParseError {
            message: format!("{}: {}", context, err),
            path: None,
            source: Some(Box::new(err)),
        }
    }

    /// Creates a `ParseError` from a `ParseIntError` on a named numeric field.
    pub fn from_parse_int_error(field: &str, value: &str, err: ParseIntError) -> Self {
        ConvertError::ParseError {
            message: format!("Invalid integer '{}' for '{}'", value, field),
            path: None,
            source: Some(Box::new(err)),
        }
    }

    /// Attaches a file path to a `ParseError` that does not carry one yet.
    ///
    /// Other variants are returned unchanged.
    pub fn with_path(self, file: &Path) -> Self {
        match self {
            ConvertError::ParseError {
                message,
                path: None,
                source,
            } => ConvertError::ParseError {
                message,
                path: Some(file.to_path_buf()),
                source,
            },
            other => other,
        }
    }
}

/// A specialized Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
