// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named request/response transforms.

use crate::domain::Protocol;
use serde_yaml::{Mapping, Value};

/// A named middleware with a free-form type tag and opaque configuration.
///
/// The shape of `config` depends on `kind` and is never validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Middleware {
    /// Middleware name, the key in the owning config's middleware map
    pub name: String,
    /// Type tag such as `headers`, `stripprefix` or `redirectregex`
    pub kind: String,
    /// Type-specific configuration
    pub config: Value,
    /// Router section the middleware is defined in, `Http` or `Tcp`
    pub protocol: Protocol,
}

impl Middleware {
    /// Creates a middleware with an empty configuration mapping.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            config: Value::Mapping(Mapping::new()),
            protocol: Protocol::Http,
        }
    }

    /// Sets the router section the middleware belongs to.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Sets the configuration value.
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    /// Renders the Traefik dynamic form `{kind: config}`.
    pub fn to_traefik_config(&self) -> Value {
        let mut map = Mapping::new();
        map.insert(Value::String(self.kind.clone()), self.config.clone());
        Value::Mapping(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_middleware_has_empty_mapping() {
        let mw = Middleware::new("strip", "stripPrefix");
        assert_eq!(mw.config, Value::Mapping(Mapping::new()));
        assert_eq!(mw.protocol, Protocol::Http);
    }

    #[test]
    fn test_to_traefik_config() {
        let config: Value = serde_yaml::from_str("prefixes: [/api]").unwrap();
        let mw = Middleware::new("strip", "stripPrefix").with_config(config.clone());
        let rendered = mw.to_traefik_config();
        assert_eq!(rendered.get("stripPrefix"), Some(&config));
    }
}
