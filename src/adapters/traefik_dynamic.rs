// SPDX-License-Identifier: MIT OR Apache-2.0

//! Traefik dynamic configuration adapter.
//!
//! Handles the `http`, `tcp`, `udp` and `tls` sections of a dynamic configuration
//! document, written in YAML or JSON. Router rules go through the rule parser; the
//! `tls` section is carried verbatim.
//!
//! # Example
//!
//! ```rust
//! use proxyconv::adapters::TraefikDynamicAdapter;
//! use proxyconv::domain::Diagnostics;
//! use proxyconv::ports::ConfigParser;
//!
//! let doc = r#"
//! http:
//!   routers:
//!     api:
//!       rule: "Host(`api.example.com`) && PathPrefix(`/v1`)"
//!       service: api
//!   services:
//!     api:
//!       loadBalancer:
//!         servers:
//!           - url: "http://10.0.0.1:8080"
//! "#;
//! let config = TraefikDynamicAdapter.parse(doc, &mut Diagnostics::new()).unwrap();
//! assert_eq!(config.route("api").unwrap().path_prefix, "/v1");
//! assert_eq!(config.service("api").unwrap().servers, vec!["10.0.0.1"]);
//! ```

use crate::adapters::yaml_doc;
use crate::domain::service::split_host_port;
use crate::domain::{
    parse_rule, ConfigFormat, ConvertError, Diagnostics, Middleware, Protocol, ProxyConfig,
    Result, Route, RuleMatchers, Service, ValidationReport,
};
use crate::ports::{ConfigGenerator, ConfigParser, FormatAdapter, OutputValidator};
use crate::settings::ConverterSettings;
use serde_yaml::{Mapping, Value};

const DOCUMENT: &str = "traefik dynamic";

/// Adapter for Traefik dynamic configuration files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraefikDynamicAdapter;

impl ConfigParser for TraefikDynamicAdapter {
    fn parse(&self, content: &str, diagnostics: &mut Diagnostics) -> Result<ProxyConfig> {
        let root = yaml_doc::parse_root(content, DOCUMENT)?;
        let mut config = ProxyConfig::new();

        if let Some(http) = yaml_doc::get_mapping(&root, "http", "document")? {
            for (name, router) in entries(http, "routers", "http")? {
                config.add_route(parse_http_router(&name, router)?);
            }
            for (name, service) in entries(http, "services", "http")? {
                config.add_service(parse_service(&name, service, Protocol::Http, diagnostics)?);
            }
            parse_middlewares(http, Protocol::Http, &mut config, diagnostics)?;
        }

        if let Some(tcp) = yaml_doc::get_mapping(&root, "tcp", "document")? {
            for (name, router) in entries(tcp, "routers", "tcp")? {
                config.add_route(parse_tcp_router(&name, router)?);
            }
            for (name, service) in entries(tcp, "services", "tcp")? {
                config.add_service(parse_service(&name, service, Protocol::Tcp, diagnostics)?);
            }
            parse_middlewares(tcp, Protocol::Tcp, &mut config, diagnostics)?;
        }

        if let Some(udp) = yaml_doc::get_mapping(&root, "udp", "document")? {
            for (name, router) in entries(udp, "routers", "udp")? {
                config.add_route(parse_udp_router(&name, router)?);
            }
            for (name, service) in entries(udp, "services", "udp")? {
                config.add_service(parse_service(&name, service, Protocol::Udp, diagnostics)?);
            }
        }

        if let Some(tls) = yaml_doc::get_mapping(&root, "tls", "document")? {
            config.set_tls_config(tls.clone());
        }

        Ok(config)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yml", "yaml", "json", "toml"]
    }
}

/// Named child mappings of `section.key`, each of which must itself be a mapping.
fn entries<'a>(section: &'a Mapping, key: &str, context: &str) -> Result<Vec<(String, &'a Mapping)>> {
    let Some(children) = yaml_doc::get_mapping(section, key, context)? else {
        return Ok(Vec::new());
    };

    let mut result = Vec::with_capacity(children.len());
    for (name, child) in children {
        let Some(name) = yaml_doc::scalar_to_string(name) else {
            continue;
        };
        match child {
            Value::Mapping(map) => result.push((name, map)),
            _ => {
                return Err(ConvertError::parse(format!(
                    "{}.{}.{} must be a mapping",
                    context, key, name
                )))
            }
        }
    }
    Ok(result)
}

fn parse_http_router(name: &str, router: &Mapping) -> Result<Route> {
    let mut route = match router.get("rule").and_then(yaml_doc::scalar_to_string) {
        Some(rule) => parse_rule(&rule),
        None => Route::default(),
    };
    route.name = Some(name.to_string());

    apply_common_router_fields(&mut route, router);

    if let Some(middlewares) = router.get("middlewares") {
        route.middlewares = yaml_doc::string_or_list(middlewares);
    }

    if let Some(priority) = router.get("priority") {
        route.priority = parse_priority(name, priority)?;
    }

    Ok(route)
}

fn parse_tcp_router(name: &str, router: &Mapping) -> Result<Route> {
    let mut route = Route::named(name);

    if let Some(rule) = router.get("rule").and_then(yaml_doc::scalar_to_string) {
        let matchers = RuleMatchers::extract(&rule);
        if let Some(host) = matchers.tcp_host() {
            route.host = host.to_string();
        }
        if let Some(client_ip) = matchers.client_ip {
            route.client_ip = client_ip;
        }
    }

    apply_common_router_fields(&mut route, router);

    if let Some(middlewares) = router.get("middlewares") {
        route.middlewares = yaml_doc::string_or_list(middlewares);
    }

    Ok(route)
}

fn parse_udp_router(name: &str, router: &Mapping) -> Result<Route> {
    let mut route = Route::named(name);
    apply_common_router_fields(&mut route, router);
    Ok(route)
}

/// `service`, `tls` and `entryPoints`, shared by every router kind.
fn apply_common_router_fields(route: &mut Route, router: &Mapping) {
    if let Some(service) = router.get("service").and_then(yaml_doc::scalar_to_string) {
        route.service = service;
    }

    // any `tls` key turns TLS on, whatever its value
    if let Some(tls) = router.get("tls") {
        route.tls = true;
        if let Some(resolver) = tls.get("certResolver").and_then(yaml_doc::scalar_to_string) {
            route.cert_resolver = resolver;
        }
    }

    if let Some(entry_points) = router.get("entryPoints") {
        route.entry_points = yaml_doc::string_or_list(entry_points);
    }
}

fn parse_priority(router: &str, value: &Value) -> Result<i64> {
    let field = format!("routers.{}.priority", router);
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| {
            ConvertError::parse(format!("Invalid integer '{}' for '{}'", n, field))
        }),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| ConvertError::from_parse_int_error(&field, s, e)),
        _ => Err(ConvertError::parse(format!(
            "'{}' must be an integer",
            field
        ))),
    }
}

fn parse_service(
    name: &str,
    definition: &Mapping,
    protocol: Protocol,
    diagnostics: &mut Diagnostics,
) -> Result<Service> {
    let mut service = Service::new(name);
    service.protocol = protocol;

    let Some(load_balancer) = definition.get("loadBalancer") else {
        if !definition.is_empty() {
            diagnostics.note(format!(
                "service '{}' has no loadBalancer; weighted and mirroring services are not converted",
                name
            ));
        }
        return Ok(service);
    };
    let Value::Mapping(load_balancer) = load_balancer else {
        return Err(ConvertError::parse(format!(
            "loadBalancer of service '{}' must be a mapping",
            name
        )));
    };

    let address_key = if protocol.is_layer4() { "address" } else { "url" };
    let mut port: Option<u16> = None;

    if let Some(Value::Sequence(servers)) = load_balancer.get("servers") {
        for server in servers {
            let raw = match server {
                Value::Mapping(map) => map.get(address_key).and_then(yaml_doc::scalar_to_string),
                other => yaml_doc::scalar_to_string(other),
            };
            let Some(raw) = raw else {
                continue;
            };

            let address = strip_scheme(&raw, &mut service);
            match (split_host_port(address), port) {
                ((host, Some(p)), None) => {
                    port = Some(p);
                    service.port = p;
                    service.servers.push(host.to_string());
                }
                ((host, Some(p)), Some(first)) if p == first => {
                    service.servers.push(host.to_string());
                }
                _ => service.servers.push(address.to_string()),
            }
        }
    }

    if let Some(Value::Mapping(health)) = load_balancer.get("healthCheck") {
        if let Some(path) = health.get("path").and_then(yaml_doc::scalar_to_string) {
            service.health_check = path;
        }
    }

    Ok(service)
}

/// Strips an `http(s)://` scheme and any trailing path. `https` marks the service TLS.
fn strip_scheme<'a>(raw: &'a str, service: &mut Service) -> &'a str {
    let rest = if let Some(rest) = raw.strip_prefix("https://") {
        service.protocol = Protocol::Https;
        service.tls = true;
        rest
    } else if let Some(rest) = raw.strip_prefix("http://") {
        rest
    } else {
        raw
    };
    rest.split('/').next().unwrap_or(rest)
}

fn parse_middlewares(
    section: &Mapping,
    protocol: Protocol,
    config: &mut ProxyConfig,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    for (name, definition) in entries(section, "middlewares", protocol.as_str())? {
        let Some((kind, settings)) = definition.iter().next() else {
            diagnostics.note(format!("middleware '{}' has no type and was skipped", name));
            continue;
        };
        let Some(kind) = yaml_doc::scalar_to_string(kind) else {
            continue;
        };
        config.add_middleware(
            Middleware::new(name, kind)
                .with_config(settings.clone())
                .with_protocol(protocol),
        );
    }
    Ok(())
}

impl ConfigGenerator for TraefikDynamicAdapter {
    fn generate(
        &self,
        config: &ProxyConfig,
        _settings: &ConverterSettings,
        diagnostics: &mut Diagnostics,
    ) -> Result<String> {
        let mut http = Section::default();
        let mut tcp = Section::default();
        let mut udp = Section::default();

        for route in config.routes() {
            if !route.has_matcher() {
                diagnostics.note(format!(
                    "route '{}' has no host or path matcher",
                    route.name_or_empty()
                ));
            }
            let protocol = config
                .service(&route.service)
                .map(|s| s.protocol)
                .unwrap_or(Protocol::Http);
            match protocol {
                Protocol::Http | Protocol::Https => http.add_router(route, http_router(route)),
                Protocol::Tcp => tcp.add_router(route, tcp_router(route)),
                Protocol::Udp => udp.add_router(route, udp_router(route)),
            }
        }

        for service in config.services() {
            let definition = service_definition(service);
            let section = match service.protocol {
                Protocol::Http | Protocol::Https => &mut http,
                Protocol::Tcp => &mut tcp,
                Protocol::Udp => &mut udp,
            };
            section
                .services
                .insert(service.name.clone().into(), Value::Mapping(definition));
        }

        for middleware in config.middlewares() {
            let section = match middleware.protocol {
                Protocol::Tcp => &mut tcp,
                _ => &mut http,
            };
            section
                .middlewares
                .insert(middleware.name.clone().into(), middleware.to_traefik_config());
        }

        if !config.entry_points().is_empty() {
            diagnostics.note("entry point definitions belong to static configuration and were dropped");
        }

        let mut document = Mapping::new();
        document.insert("http".into(), Value::Mapping(http.into_mapping(true)));
        if !tcp.is_empty() {
            document.insert("tcp".into(), Value::Mapping(tcp.into_mapping(false)));
        }
        if !udp.is_empty() {
            document.insert("udp".into(), Value::Mapping(udp.into_mapping(false)));
        }
        if !config.tls_config().is_empty() {
            document.insert("tls".into(), Value::Mapping(config.tls_config().clone()));
        }

        yaml_doc::to_yaml_string(&document, ConfigFormat::TraefikDynamic.key())
    }
}

/// One protocol section under construction.
#[derive(Debug, Default)]
struct Section {
    routers: Mapping,
    services: Mapping,
    middlewares: Mapping,
}

impl Section {
    fn add_router(&mut self, route: &Route, definition: Mapping) {
        let name = match &route.name {
            Some(name) => name.clone(),
            None => format!("router-{}", self.routers.len()),
        };
        self.routers.insert(name.into(), Value::Mapping(definition));
    }

    fn is_empty(&self) -> bool {
        self.routers.is_empty() && self.services.is_empty() && self.middlewares.is_empty()
    }

    fn into_mapping(self, with_middlewares: bool) -> Mapping {
        let mut section = Mapping::new();
        section.insert("routers".into(), Value::Mapping(self.routers));
        section.insert("services".into(), Value::Mapping(self.services));
        if with_middlewares || !self.middlewares.is_empty() {
            section.insert("middlewares".into(), Value::Mapping(self.middlewares));
        }
        section
    }
}

fn http_router(route: &Route) -> Mapping {
    let mut router = Mapping::new();
    router.insert("rule".into(), route.to_traefik_rule().into());
    insert_common_router_fields(&mut router, route);
    if !route.middlewares.is_empty() {
        router.insert("middlewares".into(), string_list(&route.middlewares));
    }
    if route.priority > 0 {
        router.insert("priority".into(), route.priority.into());
    }
    router
}

fn tcp_router(route: &Route) -> Mapping {
    let host = if route.host.is_empty() { "*" } else { route.host.as_str() };
    let mut rule = format!("HostSNI(`{}`)", host);
    if !route.client_ip.is_empty() {
        rule.push_str(&format!(" && ClientIP(`{}`)", route.client_ip));
    }

    let mut router = Mapping::new();
    router.insert("rule".into(), rule.into());
    insert_common_router_fields(&mut router, route);
    if !route.middlewares.is_empty() {
        router.insert("middlewares".into(), string_list(&route.middlewares));
    }
    router
}

fn udp_router(route: &Route) -> Mapping {
    let mut router = Mapping::new();
    if !route.entry_points.is_empty() {
        router.insert("entryPoints".into(), string_list(&route.entry_points));
    }
    if !route.service.is_empty() {
        router.insert("service".into(), route.service.clone().into());
    }
    router
}

fn insert_common_router_fields(router: &mut Mapping, route: &Route) {
    if !route.service.is_empty() {
        router.insert("service".into(), route.service.clone().into());
    }
    if route.tls {
        let mut tls = Mapping::new();
        if !route.cert_resolver.is_empty() {
            tls.insert("certResolver".into(), route.cert_resolver.clone().into());
        }
        router.insert("tls".into(), Value::Mapping(tls));
    }
    if !route.entry_points.is_empty() {
        router.insert("entryPoints".into(), string_list(&route.entry_points));
    }
}

fn service_definition(service: &Service) -> Mapping {
    let servers = service
        .server_addresses()
        .into_iter()
        .map(|address| {
            let mut server = Mapping::new();
            if service.protocol.is_layer4() {
                server.insert("address".into(), address.into());
            } else {
                server.insert(
                    "url".into(),
                    format!("{}://{}", service.protocol.scheme(), address).into(),
                );
            }
            Value::Mapping(server)
        })
        .collect();

    let mut load_balancer = Mapping::new();
    load_balancer.insert("servers".into(), Value::Sequence(servers));
    if !service.protocol.is_layer4() {
        load_balancer.insert("passHostHeader".into(), true.into());
        if !service.health_check.is_empty() {
            let mut health = Mapping::new();
            health.insert("path".into(), service.health_check.clone().into());
            load_balancer.insert("healthCheck".into(), Value::Mapping(health));
        }
    }

    let mut definition = Mapping::new();
    definition.insert("loadBalancer".into(), Value::Mapping(load_balancer));
    definition
}

fn string_list(items: &[String]) -> Value {
    Value::Sequence(items.iter().cloned().map(Value::String).collect())
}

impl OutputValidator for TraefikDynamicAdapter {
    fn check_output(&self, content: &str) -> Option<String> {
        serde_yaml::from_str::<Value>(content)
            .err()
            .map(|e| format!("output is not valid YAML: {}", e))
    }

    fn validate_document(&self, content: &str) -> ValidationReport {
        let mut report = ValidationReport::default();

        let root = match yaml_doc::parse_root(content, DOCUMENT) {
            Ok(root) => root,
            Err(e) => {
                report.error(e.to_string());
                return report;
            }
        };

        if !["http", "tcp", "udp", "tls"].iter().any(|key| root.contains_key(*key)) {
            report.warn("No http, tcp, udp or tls section found");
        }

        for section_name in ["http", "tcp", "udp"] {
            let section = match yaml_doc::get_mapping(&root, section_name, "document") {
                Ok(Some(section)) => section,
                Ok(None) => continue,
                Err(e) => {
                    report.error(e.to_string());
                    continue;
                }
            };

            match yaml_doc::get_mapping(section, "routers", section_name) {
                Ok(Some(routers)) => {
                    for (name, router) in routers {
                        let name = yaml_doc::scalar_to_string(name).unwrap_or_default();
                        if section_name != "udp" && router.get("rule").is_none() {
                            report.warn(format!("Router '{}' has no rule", name));
                        }
                        if router.get("service").is_none() {
                            report.warn(format!("Router '{}' has no service", name));
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => report.error(e.to_string()),
            }

            match yaml_doc::get_mapping(section, "services", section_name) {
                Ok(Some(services)) => {
                    for (name, service) in services {
                        if service.get("loadBalancer").is_none() {
                            let name = yaml_doc::scalar_to_string(name).unwrap_or_default();
                            report.warn(format!("Service '{}' has no loadBalancer", name));
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => report.error(e.to_string()),
            }
        }

        if let Err(e) = yaml_doc::get_mapping(&root, "tls", "document") {
            report.error(e.to_string());
        }

        report
    }
}

impl FormatAdapter for TraefikDynamicAdapter {
    fn format(&self) -> ConfigFormat {
        ConfigFormat::TraefikDynamic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ProxyConfig> {
        TraefikDynamicAdapter.parse(content, &mut Diagnostics::new())
    }

    fn generate(config: &ProxyConfig) -> String {
        TraefikDynamicAdapter
            .generate(config, &ConverterSettings::default(), &mut Diagnostics::new())
            .unwrap()
    }

    const DYNAMIC: &str = r#"
http:
  routers:
    api:
      rule: "Host(`api.example.com`) && PathPrefix(`/v1`) && Method(`GET`)"
      service: api
      middlewares:
        - strip
      priority: 20
      entryPoints: websecure
      tls:
        certResolver: le
  services:
    api:
      loadBalancer:
        servers:
          - url: "https://10.0.0.1:8443"
          - url: "https://10.0.0.2:8443/"
          - "https://10.0.0.3:9443"
        passHostHeader: false
        healthCheck:
          path: /health
  middlewares:
    strip:
      stripPrefix:
        prefixes: ["/v1"]
tcp:
  routers:
    db:
      rule: "HostSNI(`db.example.com`)"
      service: db
      tls: {}
  services:
    db:
      loadBalancer:
        servers:
          - address: "10.0.0.5:5432"
tls:
  options:
    default:
      minVersion: VersionTLS12
"#;

    #[test]
    fn test_parse_http_section() {
        let config = parse(DYNAMIC).unwrap();

        let route = config.route("api").unwrap();
        assert_eq!(route.host, "api.example.com");
        assert_eq!(route.path_prefix, "/v1");
        assert_eq!(route.method, "GET");
        assert_eq!(route.middlewares, vec!["strip"]);
        assert_eq!(route.priority, 20);
        assert_eq!(route.entry_points, vec!["websecure"]);
        assert!(route.tls);
        assert_eq!(route.cert_resolver, "le");

        let service = config.service("api").unwrap();
        assert_eq!(service.protocol, Protocol::Https);
        assert_eq!(service.port, 8443);
        assert_eq!(service.servers, vec!["10.0.0.1", "10.0.0.2", "10.0.0.3:9443"]);
        assert_eq!(service.health_check, "/health");

        let strip = config.middleware("strip").unwrap();
        assert_eq!(strip.kind, "stripPrefix");
    }

    #[test]
    fn test_parse_tcp_and_tls_sections() {
        let config = parse(DYNAMIC).unwrap();

        let route = config.route("db").unwrap();
        assert_eq!(route.host, "db.example.com");
        assert!(route.tls);
        let service = config.service("db").unwrap();
        assert_eq!(service.protocol, Protocol::Tcp);
        assert_eq!(service.servers, vec!["10.0.0.5"]);
        assert_eq!(service.port, 5432);

        assert!(config.tls_config().contains_key("options"));
    }

    #[test]
    fn test_parse_json() {
        let config = parse(
            r#"{"http": {"routers": {"r": {"rule": "Host(`j.com`)", "service": "s", "priority": "7"}}}}"#,
        )
        .unwrap();
        let route = config.route("r").unwrap();
        assert_eq!(route.host, "j.com");
        assert_eq!(route.priority, 7);
    }

    #[test]
    fn test_tcp_wildcard_sni() {
        let config = parse("tcp:\n  routers:\n    any:\n      rule: \"HostSNI(`*`)\"\n").unwrap();
        assert!(config.route("any").unwrap().host.is_empty());
    }

    #[test]
    fn test_invalid_priority() {
        let result = parse("http:\n  routers:\n    r:\n      rule: \"Host(`a`)\"\n      priority: high\n");
        assert!(matches!(result, Err(ConvertError::ParseError { .. })));
    }

    #[test]
    fn test_structural_errors() {
        assert!(parse("http:\n  routers: [a]\n").is_err());
        assert!(parse("http:\n  routers:\n    r: 1\n").is_err());
        assert!(parse("tls: [a]\n").is_err());
        assert!(parse("[1, 2]").is_err());
    }

    #[test]
    fn test_generate_http_section() {
        let mut service = Service::new("web");
        service.servers = vec!["10.0.0.1".to_string()];
        service.port = 8080;
        let route = Route {
            host: "a.com".to_string(),
            service: "web".to_string(),
            ..Route::default()
        };
        let out = generate(&ProxyConfig::builder().service(service).route(route).build());
        let doc: Value = serde_yaml::from_str(&out).unwrap();

        assert_eq!(
            doc["http"]["routers"]["router-0"]["rule"],
            Value::from("Host(`a.com`)")
        );
        let lb = &doc["http"]["services"]["web"]["loadBalancer"];
        assert_eq!(lb["servers"][0]["url"], Value::from("http://10.0.0.1:8080"));
        assert_eq!(lb["passHostHeader"], Value::from(true));
        assert!(doc.get("tcp").is_none());
        assert!(doc.get("tls").is_none());
    }

    #[test]
    fn test_generate_fallback_rule() {
        let out = generate(&ProxyConfig::builder().route(Route::named("any")).build());
        let doc: Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(
            doc["http"]["routers"]["any"]["rule"],
            Value::from("Host(`localhost`)")
        );
    }

    #[test]
    fn test_generate_tcp_section() {
        let mut service = Service::new("db");
        service.protocol = Protocol::Tcp;
        service.servers = vec!["10.0.0.5".to_string()];
        service.port = 5432;
        let route = Route {
            client_ip: "10.0.0.0/8".to_string(),
            service: "db".to_string(),
            ..Route::named("db")
        };
        let out = generate(&ProxyConfig::builder().service(service).route(route).build());
        let doc: Value = serde_yaml::from_str(&out).unwrap();

        assert_eq!(
            doc["tcp"]["routers"]["db"]["rule"],
            Value::from("HostSNI(`*`) && ClientIP(`10.0.0.0/8`)")
        );
        assert_eq!(
            doc["tcp"]["services"]["db"]["loadBalancer"]["servers"][0]["address"],
            Value::from("10.0.0.5:5432")
        );
        assert!(doc["http"]["routers"].as_mapping().unwrap().is_empty());
    }

    #[test]
    fn test_generation_is_idempotent() {
        let first = generate(&parse(DYNAMIC).unwrap());
        let second = generate(&parse(&first).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_any_tls_key_enables_tls() {
        for tls in ["false", "{}", "\"\"", "{certResolver: le}"] {
            let doc = format!("http:\n  routers:\n    r:\n      rule: \"Host(`a.com`)\"\n      tls: {}\n", tls);
            let route = parse(&doc).unwrap().route("r").unwrap().clone();
            assert!(route.tls, "tls: {}", tls);
        }

        let config = parse("http:\n  routers:\n    r:\n      tls:\n        certResolver: le\n").unwrap();
        assert_eq!(config.route("r").unwrap().cert_resolver, "le");
    }

    #[test]
    fn test_single_string_middlewares_stay_whole() {
        let config = parse("http:\n  routers:\n    r:\n      middlewares: \"a,b\"\n").unwrap();
        assert_eq!(config.route("r").unwrap().middlewares, vec!["a,b"]);
    }

    #[test]
    fn test_tcp_middlewares_stay_in_tcp_section() {
        let doc = r#"
tcp:
  routers:
    db:
      rule: "HostSNI(`db.example.com`)"
      service: db
      middlewares: [allow]
  services:
    db:
      loadBalancer:
        servers:
          - address: "10.0.0.5:5432"
  middlewares:
    allow:
      ipAllowList:
        sourceRange: ["10.0.0.0/8"]
"#;
        let config = parse(doc).unwrap();
        assert_eq!(config.middleware("allow").unwrap().protocol, Protocol::Tcp);
        assert_eq!(config.route("db").unwrap().middlewares, vec!["allow"]);

        let out = generate(&config);
        let generated: Value = serde_yaml::from_str(&out).unwrap();
        assert!(generated["tcp"]["middlewares"]["allow"]["ipAllowList"].is_mapping());
        assert_eq!(generated["tcp"]["routers"]["db"]["middlewares"][0], Value::from("allow"));
        assert!(generated["http"]["middlewares"].as_mapping().unwrap().is_empty());

        assert_eq!(parse(&out).unwrap(), config);
    }

    #[test]
    fn test_route_without_matcher_is_noted() {
        let config = ProxyConfig::builder()
            .route(Route::named("any"))
            .route(Route {
                host: "a.com".to_string(),
                ..Route::named("hosted")
            })
            .build();
        let mut diagnostics = Diagnostics::new();
        TraefikDynamicAdapter
            .generate(&config, &ConverterSettings::default(), &mut diagnostics)
            .unwrap();

        let notes = diagnostics.into_notes();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("'any'"));
    }

    #[test]
    fn test_validate_document() {
        let report = TraefikDynamicAdapter.validate_document(
            "http:\n  routers:\n    r:\n      service: s\n  services:\n    s:\n      weighted: {}\n",
        );
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 2);

        let report = TraefikDynamicAdapter.validate_document("http:\n  routers: [1]\n");
        assert!(!report.valid);

        let report = TraefikDynamicAdapter.validate_document("tls: yes-please\n");
        assert!(!report.valid);
    }
}
