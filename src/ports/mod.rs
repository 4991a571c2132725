// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the capability traits every format adapter implements:
//! parsing into the canonical model, generating from it, and checking generated
//! output. [`FormatAdapter`] bundles the three for registration.

pub mod generator;
pub mod parser;
pub mod validator;

// Re-export commonly used types
pub use generator::ConfigGenerator;
pub use parser::ConfigParser;
pub use validator::OutputValidator;

use crate::domain::ConfigFormat;

/// One external format, parse and generate sides together.
///
/// Implementations hold no state, so a single static instance serves every
/// conversion and concurrent use needs no synchronization.
pub trait FormatAdapter: ConfigParser + ConfigGenerator + OutputValidator + Send + Sync {
    /// The format this adapter handles.
    fn format(&self) -> ConfigFormat;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_adapter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn FormatAdapter>();
    }
}
