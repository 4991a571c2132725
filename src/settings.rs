// SPDX-License-Identifier: MIT OR Apache-2.0

//! Converter settings.
//!
//! Settings tune generated output (certificate locations, compose file version) and
//! orchestration (whether output is validated). They are read from a YAML file,
//! either an explicit path or `config.yaml` in the OS-appropriate configuration
//! directory. Every field has a default, so a partial file or no file at all is fine.
//!
//! ```yaml
//! validate_output: true
//! nginx:
//!   cert_dir: /etc/letsencrypt/live
//!   key_dir: /etc/letsencrypt/live
//!   proxy_timeout_secs: 30
//! compose:
//!   version: "3.8"
//!   image_tag: latest
//! ```

use crate::adapters::FileSource;
use crate::domain::{ConvertError, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings for nginx output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NginxSettings {
    /// Directory holding `<host>.crt` certificates
    pub cert_dir: PathBuf,
    /// Directory holding `<host>.key` private keys
    pub key_dir: PathBuf,
    /// Connect/send/read timeout applied to proxied requests
    pub proxy_timeout_secs: u32,
}

impl Default for NginxSettings {
    fn default() -> Self {
        Self {
            cert_dir: PathBuf::from("/etc/ssl/certs"),
            key_dir: PathBuf::from("/etc/ssl/private"),
            proxy_timeout_secs: 60,
        }
    }
}

/// Settings for docker-compose output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ComposeSettings {
    /// Value of the top-level `version` key
    pub version: String,
    /// Tag of the placeholder image emitted per service
    pub image_tag: String,
}

impl Default for ComposeSettings {
    fn default() -> Self {
        Self {
            version: "3.8".to_string(),
            image_tag: "latest".to_string(),
        }
    }
}

/// All converter settings.
///
/// # Examples
///
/// ```
/// use proxyconv::settings::ConverterSettings;
///
/// let settings = ConverterSettings::from_yaml_str("nginx:\n  proxy_timeout_secs: 5\n").unwrap();
/// assert_eq!(settings.nginx.proxy_timeout_secs, 5);
/// assert_eq!(settings.compose.version, "3.8");
/// assert!(settings.validate_output);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    /// Run the best-effort output check after generating
    pub validate_output: bool,
    /// nginx output settings
    pub nginx: NginxSettings,
    /// docker-compose output settings
    pub compose: ComposeSettings,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            validate_output: true,
            nginx: NginxSettings::default(),
            compose: ComposeSettings::default(),
        }
    }
}

impl ConverterSettings {
    /// Parses settings from YAML text. Empty text yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| ConvertError::from_yaml_error("Failed to parse settings", e))
    }

    /// Loads settings from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = FileSource::from_file(path.as_ref())?;
        let settings = Self::from_yaml_str(source.content()).map_err(|e| e.with_path(source.path()))?;
        tracing::debug!("Loaded converter settings from {}", source.path().display());
        Ok(settings)
    }

    /// Loads `config.yaml` from the OS-appropriate configuration directory.
    ///
    /// A missing file is not an error and yields the defaults; an unreadable or
    /// malformed one is.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "proxyconv")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        match Self::default_path(app_name, qualifier) {
            Some(path) if path.exists() => Self::from_file(path),
            Some(path) => {
                tracing::debug!(
                    "No settings file at {}, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Path of the default settings file, when the platform has a config directory.
    pub fn default_path(app_name: &str, qualifier: &str) -> Option<PathBuf> {
        ProjectDirs::from(qualifier, "", app_name).map(|dirs| dirs.config_dir().join("config.yaml"))
    }
}
