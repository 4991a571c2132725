// SPDX-License-Identifier: MIT OR Apache-2.0

//! Non-fatal findings reported alongside a conversion.
//!
//! Adapters never write to shared output. They record what they had to drop or
//! approximate in a [`Diagnostics`] value, and the orchestrator decides how to surface it.

use crate::domain::ConfigFormat;
use std::fmt;

/// Notes collected while parsing or generating one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    notes: Vec<String>,
}

impl Diagnostics {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a note.
    pub fn note(&mut self, message: impl Into<String>) {
        self.notes.push(message.into());
    }

    /// Recorded notes, in order.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Moves the notes out.
    pub fn into_notes(self) -> Vec<String> {
        self.notes
    }
}

/// Generated output failed a best-effort syntax check.
///
/// The conversion still succeeds and the output is still usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Format of the output that was checked
    pub format: ConfigFormat,
    /// What the check found
    pub message: String,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.format, self.message)
    }
}

/// Outcome of a structural check of a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// False when at least one error was found
    pub valid: bool,
    /// Problems that make the document unusable
    pub errors: Vec<String>,
    /// Suspicious but tolerated constructs
    pub warnings: Vec<String>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ValidationReport {
    /// Records an error and marks the report invalid.
    pub fn error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    /// Records a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}
