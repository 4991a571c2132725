// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration generator trait definition.

use crate::domain::{Diagnostics, ProxyConfig, Result};
use crate::settings::ConverterSettings;

/// A trait for rendering the canonical model into one external format.
///
/// Generation must be deterministic: the same configuration and settings always
/// produce byte-identical output. Fields the target format cannot express are
/// reported through `diagnostics`.
pub trait ConfigGenerator {
    /// Renders `config` as document text.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration to render, never modified
    /// * `settings` - Output tuning such as certificate directories
    /// * `diagnostics` - Collector for non-fatal notes
    fn generate(
        &self,
        config: &ProxyConfig,
        settings: &ConverterSettings,
        diagnostics: &mut Diagnostics,
    ) -> Result<String>;
}
