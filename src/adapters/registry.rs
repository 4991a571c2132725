// SPDX-License-Identifier: MIT OR Apache-2.0

//! Format key to adapter lookup.

use crate::adapters::{DockerComposeAdapter, NginxConfAdapter, TraefikDynamicAdapter};
use crate::domain::{ConfigFormat, Result};
use crate::ports::FormatAdapter;

static NGINX: NginxConfAdapter = NginxConfAdapter;
static TRAEFIK: TraefikDynamicAdapter = TraefikDynamicAdapter;
static COMPOSE: DockerComposeAdapter = DockerComposeAdapter;

/// Static table of the supported format adapters.
///
/// # Examples
///
/// ```rust
/// use proxyconv::adapters::AdapterRegistry;
/// use proxyconv::domain::ConfigFormat;
/// use proxyconv::ports::FormatAdapter;
///
/// let adapter = AdapterRegistry::get("traefik-dynamic").unwrap();
/// assert_eq!(adapter.format(), ConfigFormat::TraefikDynamic);
/// assert!(AdapterRegistry::get("haproxy").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AdapterRegistry;

impl AdapterRegistry {
    /// Looks up the adapter for a format key.
    ///
    /// Unknown keys fail with `UnsupportedFormat`.
    pub fn get(key: &str) -> Result<&'static dyn FormatAdapter> {
        let format: ConfigFormat = key.parse()?;
        Ok(Self::adapter(format))
    }

    /// The adapter for a known format.
    pub fn adapter(format: ConfigFormat) -> &'static dyn FormatAdapter {
        match format {
            ConfigFormat::NginxConf => &NGINX,
            ConfigFormat::TraefikDynamic => &TRAEFIK,
            ConfigFormat::DockerCompose => &COMPOSE,
        }
    }

    /// Registry keys of every supported format.
    pub fn keys() -> impl Iterator<Item = &'static str> {
        ConfigFormat::ALL.iter().map(|f| f.key())
    }
}
