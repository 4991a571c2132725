// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical model to nginx text.

use crate::domain::{Diagnostics, LoadBalancerStrategy, Protocol, ProxyConfig, Route, Service};
use crate::settings::NginxSettings;
use std::fmt::Write;

/// `proxy_pass` target of routes without a host.
pub(super) const FALLBACK_UPSTREAM: &str = "backend";

const INDENT: &str = "    ";

/// Renders the whole document. Output depends only on the inputs.
pub(super) fn render_document(
    config: &ProxyConfig,
    settings: &NginxSettings,
    diagnostics: &mut Diagnostics,
) -> String {
    let mut out = String::new();

    for service in config.services() {
        render_upstream(&mut out, service);
        out.push('\n');
    }

    for route in config.routes() {
        note_dropped_features(route, diagnostics);
        render_server(&mut out, route, config, settings);
        out.push('\n');
    }

    if config.middleware_count() > 0 {
        diagnostics.note(format!(
            "{} middleware definitions have no nginx equivalent and were dropped",
            config.middleware_count()
        ));
    }
    if !config.entry_points().is_empty() {
        diagnostics.note("entry points have no nginx equivalent and were dropped");
    }

    out.push_str("server {\n");
    out.push_str("    listen 80 default_server;\n");
    out.push_str("    server_name _;\n");
    out.push_str("    return 301 https://$host$request_uri;\n");
    out.push_str("}\n");

    out
}

fn render_upstream(out: &mut String, service: &Service) {
    let _ = writeln!(out, "upstream {} {{", service.name);

    match service.load_balancer {
        LoadBalancerStrategy::LeastConn => {
            let _ = writeln!(out, "{INDENT}least_conn;");
        }
        LoadBalancerStrategy::IpHash => {
            let _ = writeln!(out, "{INDENT}ip_hash;");
        }
        LoadBalancerStrategy::RoundRobin | LoadBalancerStrategy::Weighted => {}
    }

    let weight = match service.load_balancer {
        LoadBalancerStrategy::Weighted if service.weight != 1 => {
            format!(" weight={}", service.weight)
        }
        _ => String::new(),
    };

    for address in service.server_addresses() {
        let _ = writeln!(out, "{INDENT}server {address}{weight};");
    }

    out.push_str("}\n");
}

fn render_server(out: &mut String, route: &Route, config: &ProxyConfig, settings: &NginxSettings) {
    out.push_str("server {\n");

    if route.tls {
        let _ = writeln!(out, "{INDENT}listen 443 ssl http2;");
    } else {
        let _ = writeln!(out, "{INDENT}listen 80;");
    }

    if !route.host.is_empty() {
        let _ = writeln!(out, "{INDENT}server_name {};", route.host);
    }

    if route.tls && !route.cert_resolver.is_empty() {
        let cert_name = if route.host.is_empty() {
            "default"
        } else {
            route.host.as_str()
        };
        out.push('\n');
        let _ = writeln!(
            out,
            "{INDENT}ssl_certificate {};",
            settings.cert_dir.join(format!("{cert_name}.crt")).display()
        );
        let _ = writeln!(
            out,
            "{INDENT}ssl_certificate_key {};",
            settings.key_dir.join(format!("{cert_name}.key")).display()
        );
    }

    if !route.client_ip.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "{INDENT}allow {};", route.client_ip);
        let _ = writeln!(out, "{INDENT}deny all;");
    }

    out.push('\n');
    let _ = writeln!(out, "{INDENT}{} {{", route.to_nginx_location());
    render_guards(out, route);
    render_proxy(out, route, config, settings);
    let _ = writeln!(out, "{INDENT}}}");

    out.push_str("}\n");
}

fn render_guards(out: &mut String, route: &Route) {
    let inner = INDENT.repeat(2);
    let body = INDENT.repeat(3);

    if !route.method.is_empty() {
        let methods = route
            .method
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join("|");
        let _ = writeln!(out, "{inner}if ($request_method !~ ^({methods})$) {{");
        let _ = writeln!(out, "{body}return 405;");
        let _ = writeln!(out, "{inner}}}");
    }

    for (name, value) in &route.headers {
        let variable = name.to_ascii_lowercase().replace('-', "_");
        let _ = writeln!(out, "{inner}if ($http_{variable} != \"{value}\") {{");
        let _ = writeln!(out, "{body}return 403;");
        let _ = writeln!(out, "{inner}}}");
    }

    for (name, value) in &route.query_params {
        let _ = writeln!(out, "{inner}if ($arg_{name} != \"{value}\") {{");
        let _ = writeln!(out, "{body}return 403;");
        let _ = writeln!(out, "{inner}}}");
    }
}

fn render_proxy(out: &mut String, route: &Route, config: &ProxyConfig, settings: &NginxSettings) {
    let inner = INDENT.repeat(2);
    let target = if route.host.is_empty() {
        FALLBACK_UPSTREAM
    } else {
        route.host.as_str()
    };
    let scheme = config
        .service(&route.service)
        .map(|s| s.protocol.scheme())
        .unwrap_or(Protocol::Http.scheme());
    let timeout = settings.proxy_timeout_secs;

    let _ = writeln!(out, "{inner}proxy_pass {scheme}://{target};");
    let _ = writeln!(out, "{inner}proxy_set_header Host $host;");
    let _ = writeln!(out, "{inner}proxy_set_header X-Real-IP $remote_addr;");
    let _ = writeln!(
        out,
        "{inner}proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;"
    );
    let _ = writeln!(out, "{inner}proxy_set_header X-Forwarded-Proto $scheme;");
    let _ = writeln!(out, "{inner}proxy_connect_timeout {timeout}s;");
    let _ = writeln!(out, "{inner}proxy_send_timeout {timeout}s;");
    let _ = writeln!(out, "{inner}proxy_read_timeout {timeout}s;");
}

fn note_dropped_features(route: &Route, diagnostics: &mut Diagnostics) {
    let label = route.name.as_deref().unwrap_or(route.host.as_str());

    if !route.middlewares.is_empty() {
        diagnostics.note(format!(
            "route '{label}': middlewares [{}] not rendered",
            route.middlewares.join(", ")
        ));
    }
    if route.priority != 0 {
        diagnostics.note(format!("route '{label}': priority {} not rendered", route.priority));
    }
    if !route.entry_points.is_empty() {
        diagnostics.note(format!(
            "route '{label}': entry points [{}] not rendered",
            route.entry_points.join(", ")
        ));
    }
    if !route.cert_resolver.is_empty() {
        diagnostics.note(format!(
            "route '{label}': certificate resolver '{}' rendered as certificate files named after the host",
            route.cert_resolver
        ));
    }
}
