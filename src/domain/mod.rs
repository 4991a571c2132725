// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing the canonical proxy configuration model.
//!
//! This module contains the format-independent types every adapter parses into and
//! generates from, the rule expression parser shared by the Traefik-based adapters,
//! and the error types. It has no knowledge of any concrete file format.

pub mod diagnostics;
pub mod errors;
pub mod format;
pub mod middleware;
pub mod proxy_config;
pub mod route;
pub mod rule;
pub mod service;

// Re-export commonly used types
pub use diagnostics::{Diagnostics, ValidationReport, ValidationWarning};
pub use errors::{ConvertError, Result};
pub use format::ConfigFormat;
pub use middleware::Middleware;
pub use proxy_config::{ProxyConfig, ProxyConfigBuilder};
pub use route::Route;
pub use rule::{parse_complex_rule, parse_rule, RuleMatchers};
pub use service::{LoadBalancerStrategy, Protocol, Service};
