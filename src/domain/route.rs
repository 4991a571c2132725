// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing decisions.
//!
//! A [`Route`] is one matching rule plus the service it targets. Every adapter maps its
//! own router/server-block notion onto this type.

use std::collections::BTreeMap;

/// Default exact path of a route that matches everything.
pub const DEFAULT_PATH: &str = "/";

/// Rule emitted for a route that carries no predicate at all.
pub const FALLBACK_RULE: &str = "Host(`localhost`)";

/// One routing decision of a proxy configuration.
///
/// Empty strings mean "not set". `path` defaults to `"/"`, which also means "not set"
/// for matching purposes.
///
/// # Examples
///
/// ```
/// use proxyconv::domain::Route;
///
/// let route = Route {
///     host: "example.com".to_string(),
///     path_prefix: "/api".to_string(),
///     ..Route::default()
/// };
/// assert_eq!(route.to_traefik_rule(), "Host(`example.com`) && PathPrefix(`/api`)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Router name, unique within a config when present
    pub name: Option<String>,
    /// Host predicate
    pub host: String,
    /// Exact path; a `~ <regex>` value denotes a regular-expression path
    pub path: String,
    /// Path-prefix predicate
    pub path_prefix: String,
    /// HTTP method, or a comma-joined list of methods
    pub method: String,
    /// Header name to expected value
    pub headers: BTreeMap<String, String>,
    /// Query parameter name to expected value
    pub query_params: BTreeMap<String, String>,
    /// Client IP or CIDR restriction
    pub client_ip: String,
    /// Router priority; higher wins by convention
    pub priority: i64,
    /// Middleware names applied in order
    pub middlewares: Vec<String>,
    /// Whether the route terminates TLS
    pub tls: bool,
    /// Certificate resolver name; only meaningful when `tls` is set
    pub cert_resolver: String,
    /// Target service name
    pub service: String,
    /// Entry point names the route is bound to
    pub entry_points: Vec<String>,
}

impl Default for Route {
    fn default() -> Self {
        Self {
            name: None,
            host: String::new(),
            path: DEFAULT_PATH.to_string(),
            path_prefix: String::new(),
            method: String::new(),
            headers: BTreeMap::new(),
            query_params: BTreeMap::new(),
            client_ip: String::new(),
            priority: 0,
            middlewares: Vec::new(),
            tls: false,
            cert_resolver: String::new(),
            service: String::new(),
            entry_points: Vec::new(),
        }
    }
}

impl Route {
    /// Creates an empty route with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Returns the route name, or an empty string for unnamed routes.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Returns the exact path when it is set to something other than `"/"`.
    pub fn exact_path(&self) -> Option<&str> {
        if self.path.is_empty() || self.path == DEFAULT_PATH {
            None
        } else {
            Some(&self.path)
        }
    }

    /// Returns the regular expression of a `~ <regex>` path.
    pub fn path_regex(&self) -> Option<&str> {
        self.path
            .strip_prefix('~')
            .map(|rest| rest.trim_start_matches('*').trim())
    }

    /// Whether the route has a host, an exact path, or a path prefix.
    pub fn has_matcher(&self) -> bool {
        !self.host.is_empty() || !self.path_prefix.is_empty() || self.exact_path().is_some()
    }

    /// Serializes the route predicates into a Traefik rule expression.
    ///
    /// Every non-empty field becomes exactly one predicate call, joined with `&&`.
    /// A route without predicates yields ``Host(`localhost`)``.
    pub fn to_traefik_rule(&self) -> String {
        let mut conditions = Vec::new();

        if !self.host.is_empty() {
            conditions.push(format!("Host(`{}`)", self.host));
        }

        if !self.path_prefix.is_empty() {
            conditions.push(format!("PathPrefix(`{}`)", self.path_prefix));
        } else if let Some(regex) = self.path_regex() {
            conditions.push(format!("PathRegexp(`{}`)", regex));
        } else if let Some(path) = self.exact_path() {
            conditions.push(format!("Path(`{}`)", path));
        }

        if !self.method.is_empty() {
            conditions.push(format!("Method(`{}`)", self.method));
        }

        for (name, value) in &self.headers {
            conditions.push(format!("Header(`{}`, `{}`)", name, value));
        }

        for (name, value) in &self.query_params {
            conditions.push(format!("Query(`{}`, `{}`)", name, value));
        }

        if !self.client_ip.is_empty() {
            conditions.push(format!("ClientIP(`{}`)", self.client_ip));
        }

        if conditions.is_empty() {
            FALLBACK_RULE.to_string()
        } else {
            conditions.join(" && ")
        }
    }

    /// Renders the nginx `location` header matching this route's path.
    pub fn to_nginx_location(&self) -> String {
        if !self.path_prefix.is_empty() {
            return format!("location {}", self.path_prefix);
        }
        match self.exact_path() {
            Some(path) if path.starts_with('~') => format!("location {}", path),
            Some(path) => format!("location = {}", path),
            None => "location /".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_route() {
        let route = Route::default();
        assert_eq!(route.path, "/");
        assert!(route.name.is_none());
        assert!(!route.has_matcher());
        assert!(!route.tls);
        assert!(route.cert_resolver.is_empty());
    }

    #[test]
    fn test_named_route() {
        let route = Route::named("web");
        assert_eq!(route.name_or_empty(), "web");
        assert_eq!(Route::default().name_or_empty(), "");
    }

    #[test]
    fn test_rule_full() {
        let mut route = Route {
            host: "a.com".to_string(),
            path_prefix: "/api".to_string(),
            method: "GET".to_string(),
            client_ip: "10.0.0.0/8".to_string(),
            ..Route::default()
        };
        route.headers.insert("X-Key".to_string(), "k".to_string());
        route.query_params.insert("v".to_string(), "2".to_string());

        assert_eq!(
            route.to_traefik_rule(),
            "Host(`a.com`) && PathPrefix(`/api`) && Method(`GET`) && Header(`X-Key`, `k`) \
             && Query(`v`, `2`) && ClientIP(`10.0.0.0/8`)"
        );
    }

    #[test]
    fn test_rule_exact_and_regex_path() {
        let exact = Route {
            path: "/health".to_string(),
            ..Route::default()
        };
        assert_eq!(exact.to_traefik_rule(), "Path(`/health`)");

        let regex = Route {
            path: "~ ^/v[0-9]+/".to_string(),
            ..Route::default()
        };
        assert_eq!(regex.to_traefik_rule(), "PathRegexp(`^/v[0-9]+/`)");
    }

    #[test]
    fn test_rule_fallback() {
        assert_eq!(Route::default().to_traefik_rule(), FALLBACK_RULE);
    }

    #[test]
    fn test_nginx_location() {
        let prefix = Route {
            path_prefix: "/api".to_string(),
            ..Route::default()
        };
        assert_eq!(prefix.to_nginx_location(), "location /api");

        let exact = Route {
            path: "/login".to_string(),
            ..Route::default()
        };
        assert_eq!(exact.to_nginx_location(), "location = /login");

        let regex = Route {
            path: "~ \\.php$".to_string(),
            ..Route::default()
        };
        assert_eq!(regex.to_nginx_location(), "location ~ \\.php$");

        assert_eq!(Route::default().to_nginx_location(), "location /");
    }

    #[test]
    fn test_path_regex_case_insensitive_marker() {
        let route = Route {
            path: "~* \\.jpg$".to_string(),
            ..Route::default()
        };
        assert_eq!(route.path_regex(), Some("\\.jpg$"));
    }
}
