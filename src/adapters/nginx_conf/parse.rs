// SPDX-License-Identifier: MIT OR Apache-2.0

//! nginx text to canonical model.

use super::scanner::{self, Block};
use crate::domain::service::split_host_port;
use crate::domain::{Diagnostics, LoadBalancerStrategy, ProxyConfig, Route, Service};
use once_cell::sync::Lazy;
use regex::Regex;

static UPSTREAM_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bupstream\s+([\w.\-]+)\s*\{").expect("valid upstream regex"));
static SERVER_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bserver\s*\{").expect("valid server regex"));
static LOCATION_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\blocation\s+([^{;]+?)\s*\{").expect("valid location regex"));

static UPSTREAM_SERVER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bserver\s+([^;{]+);").expect("valid upstream server regex"));
static SERVER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bserver_name\s+([^;]+);").expect("valid server_name regex"));
static LISTEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\blisten\s+([^;]+);").expect("valid listen regex"));
static ALLOW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\ballow\s+([^;]+);").expect("valid allow regex"));
static PROXY_PASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bproxy_pass\s+([^;]+);").expect("valid proxy_pass regex"));
static METHOD_GUARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"if\s*\(\s*\$request_method\s*!~\*?\s*\^?\(([^)]+)\)").expect("valid method regex")
});
static HEADER_GUARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"if\s*\(\s*\$http_(\w+)\s*!=\s*"([^"]+)""#).expect("valid header regex")
});
static QUERY_GUARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"if\s*\(\s*\$arg_(\w+)\s*!=\s*"([^"]+)""#).expect("valid query regex")
});

/// Builds a configuration from nginx text. Never fails on content.
pub(super) fn parse_document(content: &str, diagnostics: &mut Diagnostics) -> ProxyConfig {
    let text = scanner::strip_comments(content);
    let mut config = ProxyConfig::new();

    for block in scanner::find_blocks(&text, &UPSTREAM_BLOCK) {
        config.add_service(parse_upstream(&block));
    }

    for block in scanner::find_blocks(&text, &SERVER_BLOCK) {
        if let Some(route) = parse_server(block.body, diagnostics) {
            config.add_route(route);
        }
    }

    config
}

fn parse_upstream(block: &Block<'_>) -> Service {
    let mut service = Service::new(block.arg());
    let mut weighted = false;

    for caps in UPSTREAM_SERVER.captures_iter(block.body) {
        let mut tokens = caps[1].split_whitespace();
        let Some(address) = tokens.next() else {
            continue;
        };

        match split_host_port(address) {
            (host, Some(port)) => {
                service.servers.push(host.to_string());
                service.port = port;
            }
            (host, None) => service.servers.push(host.to_string()),
        }

        for param in tokens {
            if let Some(weight) = param.strip_prefix("weight=").and_then(|w| w.parse().ok()) {
                service.weight = weight;
                weighted = true;
            }
        }
    }

    service.load_balancer = if block.body.contains("least_conn") {
        LoadBalancerStrategy::LeastConn
    } else if block.body.contains("ip_hash") {
        LoadBalancerStrategy::IpHash
    } else if weighted {
        LoadBalancerStrategy::Weighted
    } else {
        LoadBalancerStrategy::RoundRobin
    };

    service
}

fn parse_server(body: &str, diagnostics: &mut Diagnostics) -> Option<Route> {
    let locations = scanner::find_blocks(body, &LOCATION_BLOCK);

    if locations.is_empty() && LISTEN.captures_iter(body).any(|c| c[1].contains("default_server")) {
        return None;
    }

    let mut route = Route::default();

    if let Some(caps) = SERVER_NAME.captures(body) {
        if let Some(name) = caps[1].split_whitespace().next() {
            route.host = name.to_string();
        }
    }

    route.tls = LISTEN
        .captures_iter(body)
        .any(|c| c[1].split_whitespace().any(|token| token == "ssl"));

    if let Some(caps) = ALLOW.captures(body) {
        let ip = caps[1].trim();
        if ip != "all" {
            route.client_ip = ip.to_string();
        }
    }

    if let Some(location) = locations.first() {
        apply_location(&mut route, location);
    }
    if locations.len() > 1 {
        diagnostics.note(format!(
            "server block for '{}' has {} location blocks; only the first is kept",
            route.host,
            locations.len()
        ));
    }

    Some(route)
}

fn apply_location(route: &mut Route, location: &Block<'_>) {
    let spec = location.arg();

    if spec.starts_with('~') {
        route.path = spec.to_string();
    } else if let Some(exact) = spec.strip_prefix('=') {
        route.path = exact.trim().to_string();
    } else if let Some(prefix) = spec.strip_prefix("^~") {
        route.path_prefix = prefix.trim().to_string();
    } else {
        route.path_prefix = spec.to_string();
    }

    if let Some(caps) = PROXY_PASS.captures(location.body) {
        let target = caps[1].trim();
        let rest = if let Some(rest) = target.strip_prefix("https://") {
            route.tls = true;
            rest
        } else {
            target.strip_prefix("http://").unwrap_or(target)
        };
        let authority = rest.split('/').next().unwrap_or(rest);
        route.service = split_host_port(authority).0.to_string();
    }

    if let Some(caps) = METHOD_GUARD.captures(location.body) {
        route.method = caps[1]
            .split('|')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join(",");
    }

    for caps in HEADER_GUARD.captures_iter(location.body) {
        route
            .headers
            .insert(caps[1].replace('_', "-"), caps[2].to_string());
    }

    for caps in QUERY_GUARD.captures_iter(location.body) {
        route
            .query_params
            .insert(caps[1].to_string(), caps[2].to_string());
    }
}
