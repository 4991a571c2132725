// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend services.
//!
//! A [`Service`] is a named backend with one or more server addresses and a
//! load-balancing strategy. Addresses either embed a port or are combined with
//! [`Service::port`] when rendered.

use std::fmt;

/// Port assumed when neither the address nor the source format names one.
pub const DEFAULT_PORT: u16 = 80;

/// Transport protocol of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Protocol {
    /// Plain HTTP
    #[default]
    Http,
    /// HTTP over TLS
    Https,
    /// Raw TCP
    Tcp,
    /// Raw UDP
    Udp,
}

impl Protocol {
    /// Returns the lowercase protocol name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }

    /// Returns the URL scheme used when rendering server URLs.
    pub fn scheme(&self) -> &'static str {
        match self {
            Protocol::Https => "https",
            Protocol::Http | Protocol::Tcp | Protocol::Udp => "http",
        }
    }

    /// Whether the protocol is layer 4 (no HTTP routing).
    pub fn is_layer4(&self) -> bool {
        matches!(self, Protocol::Tcp | Protocol::Udp)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load-balancing strategy of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadBalancerStrategy {
    /// Rotate through servers
    #[default]
    RoundRobin,
    /// Pick the server with the fewest active connections
    LeastConn,
    /// Pin clients to servers by address hash
    IpHash,
    /// Rotate proportionally to server weights
    Weighted,
}

impl LoadBalancerStrategy {
    /// Returns the snake_case strategy name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadBalancerStrategy::RoundRobin => "round_robin",
            LoadBalancerStrategy::LeastConn => "least_conn",
            LoadBalancerStrategy::IpHash => "ip_hash",
            LoadBalancerStrategy::Weighted => "weighted",
        }
    }
}

impl fmt::Display for LoadBalancerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One backend target of a proxy configuration.
///
/// # Examples
///
/// ```
/// use proxyconv::domain::Service;
///
/// let mut service = Service::new("api");
/// service.port = 8080;
/// service.servers = vec!["10.0.0.1".to_string(), "10.0.0.2:9000".to_string()];
///
/// assert_eq!(service.server_address("10.0.0.1"), "10.0.0.1:8080");
/// assert_eq!(service.server_address("10.0.0.2:9000"), "10.0.0.2:9000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    /// Service name, unique within a config
    pub name: String,
    /// Server addresses, `host` or `host:port`
    pub servers: Vec<String>,
    /// Port applied to addresses that do not carry one
    pub port: u16,
    /// Backend protocol
    pub protocol: Protocol,
    /// Opaque health-check specification
    pub health_check: String,
    /// Load-balancing strategy
    pub load_balancer: LoadBalancerStrategy,
    /// Relative weight
    pub weight: u32,
    /// Whether the backend speaks TLS
    pub tls: bool,
    /// Whether backend certificates are left unverified
    pub tls_insecure: bool,
}

impl Service {
    /// Creates a service with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            servers: Vec::new(),
            port: DEFAULT_PORT,
            protocol: Protocol::Http,
            health_check: String::new(),
            load_balancer: LoadBalancerStrategy::RoundRobin,
            weight: 1,
            tls: false,
            tls_insecure: false,
        }
    }

    /// Returns `server` with the service port appended when it carries none.
    pub fn server_address(&self, server: &str) -> String {
        match split_host_port(server) {
            (_, Some(_)) => server.to_string(),
            (host, None) => format!("{}:{}", host, self.port),
        }
    }

    /// Returns all server addresses with ports applied.
    pub fn server_addresses(&self) -> Vec<String> {
        self.servers
            .iter()
            .map(|s| self.server_address(s))
            .collect()
    }
}

/// Splits an address into host and optional port.
///
/// Handles `host`, `host:port`, `[v6]` and `[v6]:port`. A bare IPv6 address without
/// brackets is treated as a host without port.
///
/// # Examples
///
/// ```
/// use proxyconv::domain::service::split_host_port;
///
/// assert_eq!(split_host_port("web:8080"), ("web", Some(8080)));
/// assert_eq!(split_host_port("web"), ("web", None));
/// assert_eq!(split_host_port("[::1]:443"), ("[::1]", Some(443)));
/// ```
pub fn split_host_port(address: &str) -> (&str, Option<u16>) {
    if address.starts_with('[') {
        if let Some(end) = address.find(']') {
            let host = &address[..=end];
            let port = address[end + 1..]
                .strip_prefix(':')
                .and_then(|p| p.parse().ok());
            return (host, port);
        }
        return (address, None);
    }

    match address.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => match port.parse() {
            Ok(port) => (host, Some(port)),
            Err(_) => (address, None),
        },
        _ => (address, None),
    }
}
