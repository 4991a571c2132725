// SPDX-License-Identifier: MIT OR Apache-2.0

//! The canonical configuration model every adapter targets.
//!
//! A [`ProxyConfig`] is built once by a parser and then handed, read-only, to a
//! generator. Mutation is limited to the crate; callers assemble configurations
//! through [`ProxyConfigBuilder`].

use crate::domain::{Middleware, Route, Service};
use serde_yaml::Mapping;
use std::collections::BTreeMap;

/// Version tag of the canonical model.
pub const MODEL_VERSION: &str = "3.0";

/// Aggregate root of a proxy configuration.
///
/// Lookups by name are linear scans; configurations hold tens of entries.
///
/// # Examples
///
/// ```
/// use proxyconv::domain::{ProxyConfig, Route, Service};
///
/// let config = ProxyConfig::builder()
///     .route(Route { service: "web".to_string(), ..Route::named("web") })
///     .service(Service::new("web"))
///     .build();
///
/// assert_eq!(config.route_count(), 1);
/// assert!(config.service("web").is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyConfig {
    routes: Vec<Route>,
    services: Vec<Service>,
    middlewares: BTreeMap<String, Middleware>,
    tls_config: Mapping,
    entry_points: BTreeMap<String, String>,
    version: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            services: Vec::new(),
            middlewares: BTreeMap::new(),
            tls_config: Mapping::new(),
            entry_points: BTreeMap::new(),
            version: MODEL_VERSION.to_string(),
        }
    }

    /// Creates a new configuration builder.
    pub fn builder() -> ProxyConfigBuilder {
        ProxyConfigBuilder::new()
    }

    pub(crate) fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub(crate) fn add_service(&mut self, service: Service) {
        self.services.push(service);
    }

    pub(crate) fn add_middleware(&mut self, middleware: Middleware) {
        self.middlewares.insert(middleware.name.clone(), middleware);
    }

    pub(crate) fn set_tls_config(&mut self, tls: Mapping) {
        self.tls_config = tls;
    }

    pub(crate) fn add_entry_point(&mut self, name: impl Into<String>, address: impl Into<String>) {
        self.entry_points.insert(name.into(), address.into());
    }

    /// Routes in source order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Services in source order.
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Iterates middlewares ordered by name.
    pub fn middlewares(&self) -> impl Iterator<Item = &Middleware> {
        self.middlewares.values()
    }

    /// The opaque TLS section.
    pub fn tls_config(&self) -> &Mapping {
        &self.tls_config
    }

    /// Entry point name to listen address.
    pub fn entry_points(&self) -> &BTreeMap<String, String> {
        &self.entry_points
    }

    /// Model version tag.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Finds a route by name.
    pub fn route(&self, name: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|r| r.name.as_deref() == Some(name))
    }

    /// Finds a service by name.
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Finds a middleware by name.
    pub fn middleware(&self, name: &str) -> Option<&Middleware> {
        self.middlewares.get(name)
    }

    /// Number of routes.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Number of services.
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Number of middlewares.
    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    /// Whether the configuration holds no routes, services or middlewares.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.services.is_empty() && self.middlewares.is_empty()
    }
}

/// Builder for constructing a `ProxyConfig` outside of a parser.
#[derive(Debug, Default)]
pub struct ProxyConfigBuilder {
    config: ProxyConfig,
}

impl ProxyConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: ProxyConfig::new(),
        }
    }

    /// Appends a route.
    pub fn route(mut self, route: Route) -> Self {
        self.config.add_route(route);
        self
    }

    /// Appends a service.
    pub fn service(mut self, service: Service) -> Self {
        self.config.add_service(service);
        self
    }

    /// Adds a middleware, replacing any middleware of the same name.
    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.config.add_middleware(middleware);
        self
    }

    /// Sets the opaque TLS section.
    pub fn tls_config(mut self, tls: Mapping) -> Self {
        self.config.set_tls_config(tls);
        self
    }

    /// Adds an entry point.
    pub fn entry_point(mut self, name: impl Into<String>, address: impl Into<String>) -> Self {
        self.config.add_entry_point(name, address);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> ProxyConfig {
        self.config
    }
}
