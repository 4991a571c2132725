// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the conversion orchestrator.
//!
//! The [`Converter`] ties the format adapters together: it resolves format keys,
//! detects input formats, and runs parse, generate and output validation.

pub mod converter;

// Re-export commonly used types
pub use converter::{ConversionResult, Converter};
