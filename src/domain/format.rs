// SPDX-License-Identifier: MIT OR Apache-2.0

//! The closed set of supported configuration formats.

use crate::domain::{ConvertError, Result};
use std::fmt;
use std::str::FromStr;

/// An external configuration format.
///
/// # Examples
///
/// ```
/// use proxyconv::domain::ConfigFormat;
///
/// let format: ConfigFormat = "nginx-conf".parse().unwrap();
/// assert_eq!(format, ConfigFormat::NginxConf);
/// assert!("haproxy".parse::<ConfigFormat>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    /// nginx `upstream`/`server`/`location` text
    NginxConf,
    /// Traefik dynamic configuration document
    TraefikDynamic,
    /// docker-compose services annotated with Traefik labels
    DockerCompose,
}

impl ConfigFormat {
    /// All supported formats.
    pub const ALL: [ConfigFormat; 3] = [
        ConfigFormat::NginxConf,
        ConfigFormat::TraefikDynamic,
        ConfigFormat::DockerCompose,
    ];

    /// Returns the registry key of the format.
    pub fn key(&self) -> &'static str {
        match self {
            ConfigFormat::NginxConf => "nginx-conf",
            ConfigFormat::TraefikDynamic => "traefik-dynamic",
            ConfigFormat::DockerCompose => "docker-compose",
        }
    }

}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ConfigFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        ConfigFormat::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| ConvertError::UnsupportedFormat {
                format: s.to_string(),
            })
    }
}
