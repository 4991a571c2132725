// SPDX-License-Identifier: MIT OR Apache-2.0

//! nginx configuration adapter.
//!
//! Understands the `upstream`, `server` and `location` subset of nginx: upstreams map
//! to services, server blocks to routes. Request predicates are read from and written
//! as rejecting `if` guards inside the location, since nginx has no rule language.
//!
//! # Example
//!
//! ```rust
//! use proxyconv::adapters::NginxConfAdapter;
//! use proxyconv::domain::Diagnostics;
//! use proxyconv::ports::ConfigParser;
//!
//! let text = "server {\n    server_name a.com;\n    location /api {\n        proxy_pass http://api;\n    }\n}\n";
//! let config = NginxConfAdapter.parse(text, &mut Diagnostics::new()).unwrap();
//! assert_eq!(config.routes()[0].path_prefix, "/api");
//! ```

mod parse;
mod render;
pub mod scanner;

use crate::domain::{ConfigFormat, Diagnostics, ProxyConfig, Result, ValidationReport};
use crate::ports::{ConfigGenerator, ConfigParser, FormatAdapter, OutputValidator};
use crate::settings::ConverterSettings;
use once_cell::sync::Lazy;
use regex::Regex;

static SERVER_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)server\s*\{").expect("valid server regex"));
static LISTEN_PORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)listen\s+\d+").expect("valid listen regex"));
static LOCATION_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\blocation\s+[^{;]+\{").expect("valid location regex"));

/// Adapter for nginx `.conf` text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NginxConfAdapter;

impl ConfigParser for NginxConfAdapter {
    fn parse(&self, content: &str, diagnostics: &mut Diagnostics) -> Result<ProxyConfig> {
        Ok(parse::parse_document(content, diagnostics))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["conf"]
    }
}

impl ConfigGenerator for NginxConfAdapter {
    fn generate(
        &self,
        config: &ProxyConfig,
        settings: &ConverterSettings,
        diagnostics: &mut Diagnostics,
    ) -> Result<String> {
        Ok(render::render_document(config, &settings.nginx, diagnostics))
    }
}

impl OutputValidator for NginxConfAdapter {
    fn check_output(&self, content: &str) -> Option<String> {
        if !SERVER_OPEN.is_match(content) {
            return Some("missing 'server {' block".to_string());
        }
        if !LISTEN_PORT.is_match(content) {
            return Some("missing 'listen <port>' directive".to_string());
        }
        None
    }

    fn validate_document(&self, content: &str) -> ValidationReport {
        let mut report = ValidationReport::default();
        let text = scanner::strip_comments(content);

        if !scanner::braces_balanced(&text) {
            report.error("Unbalanced braces: a block is not closed");
        }
        if !SERVER_OPEN.is_match(&text) {
            report.warn("No server block found");
        } else if !LISTEN_PORT.is_match(&text) {
            report.warn("No listen directive found");
        }

        let locations = scanner::find_blocks(&text, &LOCATION_OPEN);
        let missing = locations
            .iter()
            .filter(|block| !block.body.contains("proxy_pass"))
            .count();
        if missing > 0 {
            report.warn(format!(
                "{missing} location block(s) without proxy_pass directive"
            ));
        }

        report
    }
}

impl FormatAdapter for NginxConfAdapter {
    fn format(&self) -> ConfigFormat {
        ConfigFormat::NginxConf
    }
}
