// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output validator trait definition.

use crate::domain::ValidationReport;

/// A trait for best-effort syntax checks of one external format.
///
/// Validation never blocks a conversion; findings only become warnings.
pub trait OutputValidator {
    /// Quick presence/parseability check of generated output.
    ///
    /// Returns `None` when the output looks well-formed, or a description of the
    /// first problem found.
    fn check_output(&self, content: &str) -> Option<String>;

    /// Structural check of a whole document, collecting every finding.
    fn validate_document(&self, content: &str) -> ValidationReport;
}
