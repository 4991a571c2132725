// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal architecture reverse-proxy configuration converter.
//!
//! This crate converts proxy configurations between nginx server blocks, Traefik
//! dynamic configuration documents, and docker-compose files carrying Traefik
//! labels. Every conversion goes through one canonical model, so adding a format
//! means writing one adapter rather than one converter per format pair.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: The canonical model (`Route`, `Service`, `Middleware`,
//!   `ProxyConfig`), the Traefik rule parser, and errors
//! - **Ports**: Trait definitions every format implements (`ConfigParser`,
//!   `ConfigGenerator`, `OutputValidator`)
//! - **Adapters**: One implementation per external format, plus file reading
//! - **Service**: The `Converter` that detects formats and orchestrates conversions
//!
//! # Supported Formats
//!
//! | Key               | Format                                          |
//! |-------------------|-------------------------------------------------|
//! | `nginx-conf`      | nginx `upstream` / `server` / `location` subset |
//! | `traefik-dynamic` | Traefik dynamic configuration, YAML or JSON     |
//! | `docker-compose`  | compose services with `traefik.*` labels        |
//!
//! Conversions are lossy where formats differ in expressiveness. Dropped features
//! are reported as notes on the [`service::ConversionResult`] rather than silently
//! discarded.
//!
//! # Feature Flags
//!
//! - `cli`: Build the `proxyconv` command-line tool (default)
//!
//! # Quick Start
//!
//! ```rust
//! use proxyconv::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let nginx = r#"
//! upstream api {
//!     server 10.0.0.1:8080;
//! }
//!
//! server {
//!     listen 80;
//!     server_name api.example.com;
//!     location /v1 {
//!         proxy_pass http://api;
//!     }
//! }
//! "#;
//!
//! let result = Converter::new().convert_str(nginx, "nginx-conf", "traefik-dynamic")?;
//! assert!(result.output.contains("Host(`api.example.com`) && PathPrefix(`/v1`)"));
//! assert!(result.output.contains("http://10.0.0.1:8080"));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;
pub mod settings;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::AdapterRegistry;
    pub use crate::domain::{
        parse_complex_rule, parse_rule, ConfigFormat, ConvertError, Diagnostics, Middleware,
        ProxyConfig, Result, Route, Service, ValidationReport, ValidationWarning,
    };
    pub use crate::ports::{ConfigGenerator, ConfigParser, FormatAdapter, OutputValidator};
    pub use crate::service::{ConversionResult, Converter};
    pub use crate::settings::ConverterSettings;
}
