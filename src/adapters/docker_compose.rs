// SPDX-License-Identifier: MIT OR Apache-2.0

//! docker-compose adapter.
//!
//! Reads and writes compose files whose containers carry `traefik.*` labels. Every
//! container becomes one service named after it; every
//! `traefik.http.routers.<name>.*` label group becomes one route targeting that
//! container.
//!
//! Label keys are case-folded before interpretation, values are kept verbatim.
//!
//! # Example
//!
//! ```rust
//! use proxyconv::adapters::DockerComposeAdapter;
//! use proxyconv::domain::Diagnostics;
//! use proxyconv::ports::ConfigParser;
//!
//! let compose = r#"
//! services:
//!   web:
//!     labels:
//!       - "traefik.http.routers.web.rule=Host(`example.com`)"
//!       - "traefik.http.services.web.loadbalancer.server.port=8080"
//! "#;
//! let config = DockerComposeAdapter.parse(compose, &mut Diagnostics::new()).unwrap();
//! assert_eq!(config.routes()[0].host, "example.com");
//! assert_eq!(config.service("web").unwrap().port, 8080);
//! ```

use crate::adapters::yaml_doc;
use crate::domain::service::DEFAULT_PORT;
use crate::domain::{
    parse_rule, ConfigFormat, ConvertError, Diagnostics, Middleware, Protocol, ProxyConfig,
    Result, Route, Service, ValidationReport,
};
use crate::ports::{ConfigGenerator, ConfigParser, FormatAdapter, OutputValidator};
use crate::settings::ConverterSettings;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

const LABEL_PREFIX: &str = "traefik.";
const ROUTER_PREFIX: &str = "traefik.http.routers.";
const SERVICE_PREFIX: &str = "traefik.http.services.";
const MIDDLEWARE_PREFIX: &str = "traefik.http.middlewares.";

/// Middleware properties whose `k=v,k2=v2` values are header maps.
const HEADER_MAP_KEYS: [&str; 2] = ["customrequestheaders", "customresponseheaders"];

/// Adapter for docker-compose files with Traefik labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct DockerComposeAdapter;

impl ConfigParser for DockerComposeAdapter {
    fn parse(&self, content: &str, diagnostics: &mut Diagnostics) -> Result<ProxyConfig> {
        let root = yaml_doc::parse_root(content, "docker-compose")?;
        let mut config = ProxyConfig::new();

        let Some(containers) = yaml_doc::get_mapping(&root, "services", "docker-compose document")?
        else {
            return Ok(config);
        };

        let empty = Mapping::new();
        for (key, container) in containers {
            let Some(name) = yaml_doc::scalar_to_string(key) else {
                continue;
            };
            let container = match container {
                Value::Mapping(map) => map,
                Value::Null => &empty,
                _ => {
                    return Err(ConvertError::parse(format!(
                        "service '{}' must be a mapping",
                        name
                    )))
                }
            };
            parse_container(&name, container, &mut config, diagnostics)?;
        }

        Ok(config)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yml", "yaml", "json"]
    }
}

/// Interpreted `traefik.*` labels of one container.
#[derive(Debug, Default)]
struct ContainerLabels {
    routers: BTreeMap<String, BTreeMap<String, String>>,
    services: BTreeMap<String, String>,
    middlewares: Vec<(String, String, String)>,
}

impl ContainerLabels {
    fn collect(labels: &[(String, String)]) -> Self {
        let mut collected = Self::default();

        for (key, value) in labels {
            if let Some(rest) = key.strip_prefix(ROUTER_PREFIX) {
                if let Some((router, property)) = rest.split_once('.') {
                    collected
                        .routers
                        .entry(router.to_string())
                        .or_default()
                        .insert(property.to_string(), value.clone());
                }
            } else if let Some(rest) = key.strip_prefix(SERVICE_PREFIX) {
                if let Some((_, property)) = rest.split_once('.') {
                    collected.services.insert(property.to_string(), value.clone());
                }
            } else if let Some(rest) = key.strip_prefix(MIDDLEWARE_PREFIX) {
                if let Some((middleware, property)) = rest.split_once('.') {
                    collected.middlewares.push((
                        middleware.to_string(),
                        property.to_string(),
                        value.clone(),
                    ));
                }
            }
        }

        collected
    }
}

fn parse_container(
    name: &str,
    container: &Mapping,
    config: &mut ProxyConfig,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let labels = ContainerLabels::collect(&read_labels(container));

    for (router, properties) in &labels.routers {
        config.add_route(parse_router(name, router, properties)?);
    }

    let mut service = Service::new(name);
    service.servers = vec![name.to_string()];
    service.port = match labels.services.get("loadbalancer.server.port") {
        Some(port) => port.trim().parse::<u16>().map_err(|e| {
            ConvertError::from_parse_int_error("loadbalancer.server.port", port, e)
        })?,
        None => first_published_port(container)?.unwrap_or(DEFAULT_PORT),
    };
    if labels
        .services
        .get("loadbalancer.server.scheme")
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https"))
    {
        service.protocol = Protocol::Https;
        service.tls = true;
    }
    config.add_service(service);

    for middleware in build_middlewares(&labels.middlewares, diagnostics) {
        if config.middleware(&middleware.name).is_some() {
            diagnostics.note(format!(
                "middleware '{}' defined on several containers; the last definition wins",
                middleware.name
            ));
        }
        config.add_middleware(middleware);
    }

    Ok(())
}

/// Reads `labels` as `(case-folded key, trimmed value)` pairs, keeping only
/// `traefik.` keys.
fn read_labels(container: &Mapping) -> Vec<(String, String)> {
    let pairs: Vec<(String, String)> = match container.get("labels") {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(yaml_doc::scalar_to_string)
            .filter_map(|item| {
                item.split_once('=')
                    .map(|(k, v)| (k.to_string(), v.to_string()))
            })
            .collect(),
        Some(Value::Mapping(map)) => map
            .iter()
            .filter_map(|(k, v)| {
                let key = yaml_doc::scalar_to_string(k)?;
                Some((key, yaml_doc::scalar_to_string(v).unwrap_or_default()))
            })
            .collect(),
        _ => Vec::new(),
    };

    pairs
        .into_iter()
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
        .filter(|(k, _)| k.starts_with(LABEL_PREFIX))
        .collect()
}

fn parse_router(
    container: &str,
    router: &str,
    properties: &BTreeMap<String, String>,
) -> Result<Route> {
    let mut route = Route::named(router);
    route.service = container.to_string();

    if let Some(rule) = properties.get("rule") {
        let parsed = parse_rule(rule);
        route.host = parsed.host;
        route.path = parsed.path;
        route.path_prefix = parsed.path_prefix;
        route.method = parsed.method;
        route.headers = parsed.headers;
        route.query_params = parsed.query_params;
        route.client_ip = parsed.client_ip;
    }

    if let Some(priority) = properties.get("priority") {
        route.priority = priority.trim().parse::<i64>().map_err(|e| {
            ConvertError::from_parse_int_error(
                &format!("{}{}.priority", ROUTER_PREFIX, router),
                priority,
                e,
            )
        })?;
    }

    // any `tls` label turns TLS on, whatever its value
    if properties.contains_key("tls") {
        route.tls = true;
    }
    if let Some(resolver) = properties.get("tls.certresolver") {
        route.tls = true;
        route.cert_resolver = resolver.clone();
    }

    if let Some(middlewares) = properties.get("middlewares") {
        route.middlewares = middlewares.split(',').map(str::to_string).collect();
    }

    if let Some(entry_points) = properties.get("entrypoints") {
        route.entry_points = entry_points
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();
    }

    Ok(route)
}

/// Container port of the first `ports` entry.
fn first_published_port(container: &Mapping) -> Result<Option<u16>> {
    let Some(Value::Sequence(ports)) = container.get("ports") else {
        return Ok(None);
    };
    let Some(first) = ports.first() else {
        return Ok(None);
    };

    let text = match first {
        Value::Mapping(map) => map
            .get("target")
            .or_else(|| map.get("published"))
            .and_then(yaml_doc::scalar_to_string),
        other => yaml_doc::scalar_to_string(other),
    };
    let Some(text) = text else {
        return Ok(None);
    };

    let container_port = text.rsplit(':').next().unwrap_or(&text);
    let container_port = container_port
        .split('/')
        .next()
        .unwrap_or(container_port)
        .trim();

    container_port
        .parse::<u16>()
        .map(Some)
        .map_err(|e| ConvertError::from_parse_int_error("ports", &text, e))
}

fn build_middlewares(
    entries: &[(String, String, String)],
    diagnostics: &mut Diagnostics,
) -> Vec<Middleware> {
    let mut built: Vec<(Middleware, Mapping)> = Vec::new();

    for (name, property, value) in entries {
        let (kind, rest) = match property.split_once('.') {
            Some((kind, rest)) => (kind, Some(rest)),
            None => (property.as_str(), None),
        };

        let index = match built.iter().position(|(mw, _)| &mw.name == name) {
            Some(index) => index,
            None => {
                built.push((Middleware::new(name.as_str(), kind), Mapping::new()));
                built.len() - 1
            }
        };
        let (middleware, settings) = &mut built[index];

        if middleware.kind != kind {
            diagnostics.note(format!(
                "middleware '{}': label for type '{}' ignored, already typed '{}'",
                name, kind, middleware.kind
            ));
            continue;
        }

        if let Some(rest) = rest {
            let path: Vec<&str> = rest.split('.').collect();
            yaml_doc::insert_path(settings, &path, middleware_value(&path, value));
        }
    }

    built
        .into_iter()
        .map(|(middleware, settings)| middleware.with_config(Value::Mapping(settings)))
        .collect()
}

fn middleware_value(path: &[&str], value: &str) -> Value {
    let leaf = path.last().copied().unwrap_or("");

    if leaf == "prefixes" {
        return Value::Sequence(
            value
                .split(',')
                .map(|p| Value::String(p.trim().to_string()))
                .collect(),
        );
    }

    if HEADER_MAP_KEYS.contains(&leaf) {
        let mut headers = Mapping::new();
        for pair in value.split(',') {
            if let Some((k, v)) = pair.split_once('=') {
                headers.insert(
                    Value::String(k.trim().to_string()),
                    Value::String(v.trim().to_string()),
                );
            }
        }
        return Value::Mapping(headers);
    }

    Value::String(value.to_string())
}

impl ConfigGenerator for DockerComposeAdapter {
    fn generate(
        &self,
        config: &ProxyConfig,
        settings: &ConverterSettings,
        diagnostics: &mut Diagnostics,
    ) -> Result<String> {
        let mut labels: Vec<Vec<String>> = vec![Vec::new(); config.service_count()];
        let mut router_names: Vec<Vec<String>> = vec![Vec::new(); config.service_count()];
        let mut middleware_home: BTreeMap<&str, usize> = BTreeMap::new();

        for route in config.routes() {
            let Some(index) = config
                .services()
                .iter()
                .position(|s| !route.service.is_empty() && s.name == route.service)
            else {
                diagnostics.note(format!(
                    "route '{}' targets unknown service '{}' and was not rendered",
                    route.name_or_empty(),
                    route.service
                ));
                continue;
            };
            let service = &config.services()[index];

            let router = unique_router_name(route, service, &router_names[index]);
            router_names[index].push(router.clone());
            route_labels(&mut labels[index], &router, route, service);

            for name in &route.middlewares {
                middleware_home.entry(name.as_str()).or_insert(index);
            }
        }

        for middleware in config.middlewares() {
            match middleware_home.get(middleware.name.as_str()) {
                Some(&index) => middleware_labels(&mut labels[index], middleware),
                None => diagnostics.note(format!(
                    "middleware '{}' is referenced by no rendered route and was dropped",
                    middleware.name
                )),
            }
        }

        if !config.tls_config().is_empty() {
            diagnostics.note("tls section has no docker-compose label form and was dropped");
        }
        if !config.entry_points().is_empty() {
            diagnostics.note("entry point definitions have no docker-compose label form and were dropped");
        }

        let mut containers = Mapping::new();
        for (service, labels) in config.services().iter().zip(labels) {
            let mut container = Mapping::new();
            container.insert(
                "image".into(),
                format!("{}:{}", service.name, settings.compose.image_tag).into(),
            );
            if !labels.is_empty() {
                container.insert(
                    "labels".into(),
                    Value::Sequence(labels.into_iter().map(Value::String).collect()),
                );
            }
            container.insert(
                "ports".into(),
                Value::Sequence(vec![format!("{0}:{0}", service.port).into()]),
            );
            containers.insert(service.name.clone().into(), Value::Mapping(container));
        }

        let mut document = Mapping::new();
        document.insert("version".into(), settings.compose.version.clone().into());
        document.insert("services".into(), Value::Mapping(containers));

        yaml_doc::to_yaml_string(&document, ConfigFormat::DockerCompose.key())
    }
}

fn unique_router_name(route: &Route, service: &Service, taken: &[String]) -> String {
    let base = match &route.name {
        Some(name) => name.clone(),
        None => format!("{}-router", service.name),
    };
    let mut candidate = base.clone();
    let mut n = 2;
    while taken.contains(&candidate) {
        candidate = format!("{}-{}", base, n);
        n += 1;
    }
    candidate
}

fn route_labels(labels: &mut Vec<String>, router: &str, route: &Route, service: &Service) {
    let prefix = format!("{}{}", ROUTER_PREFIX, router);
    let first_route = labels.is_empty();

    if first_route {
        labels.push("traefik.enable=true".to_string());
    }
    labels.push(format!("{}.rule={}", prefix, route.to_traefik_rule()));
    if first_route {
        labels.push(format!(
            "{}{}.loadbalancer.server.port={}",
            SERVICE_PREFIX, service.name, service.port
        ));
        if service.protocol == Protocol::Https {
            labels.push(format!(
                "{}{}.loadbalancer.server.scheme=https",
                SERVICE_PREFIX, service.name
            ));
        }
    }
    if route.tls {
        labels.push(format!("{}.tls=true", prefix));
        if !route.cert_resolver.is_empty() {
            labels.push(format!("{}.tls.certresolver={}", prefix, route.cert_resolver));
        }
    }
    if !route.middlewares.is_empty() {
        labels.push(format!("{}.middlewares={}", prefix, route.middlewares.join(",")));
    }
    if route.priority > 0 {
        labels.push(format!("{}.priority={}", prefix, route.priority));
    }
    if !route.entry_points.is_empty() {
        labels.push(format!("{}.entrypoints={}", prefix, route.entry_points.join(",")));
    }
}

fn middleware_labels(labels: &mut Vec<String>, middleware: &Middleware) {
    let prefix = format!("{}{}.{}", MIDDLEWARE_PREFIX, middleware.name, middleware.kind);
    let mut pairs = Vec::new();

    if let Value::Mapping(settings) = &middleware.config {
        for (key, value) in settings {
            let Some(key) = yaml_doc::scalar_to_string(key) else {
                continue;
            };
            match value {
                Value::Mapping(headers) if HEADER_MAP_KEYS.contains(&key.to_lowercase().as_str()) => {
                    let joined = headers
                        .iter()
                        .filter_map(|(k, v)| {
                            Some(format!(
                                "{}={}",
                                yaml_doc::scalar_to_string(k)?,
                                yaml_doc::scalar_to_string(v).unwrap_or_default()
                            ))
                        })
                        .collect::<Vec<_>>()
                        .join(",");
                    pairs.push((format!("{}.{}", prefix, key), joined));
                }
                other => yaml_doc::flatten(other, &format!("{}.{}", prefix, key), &mut pairs),
            }
        }
    }

    if pairs.is_empty() {
        labels.push(format!("{}=", prefix));
    }
    labels.extend(pairs.into_iter().map(|(k, v)| format!("{}={}", k, v)));
}

impl OutputValidator for DockerComposeAdapter {
    fn check_output(&self, content: &str) -> Option<String> {
        serde_yaml::from_str::<Value>(content)
            .err()
            .map(|e| format!("output is not valid YAML: {}", e))
    }

    fn validate_document(&self, content: &str) -> ValidationReport {
        let mut report = ValidationReport::default();

        let root = match yaml_doc::parse_root(content, "docker-compose") {
            Ok(root) => root,
            Err(e) => {
                report.error(e.to_string());
                return report;
            }
        };

        let containers = match root.get("services") {
            None => {
                report.error("No services section found");
                return report;
            }
            Some(Value::Mapping(containers)) => containers,
            Some(_) => {
                report.error("'services' must be a mapping");
                return report;
            }
        };

        for (key, container) in containers {
            let name = yaml_doc::scalar_to_string(key).unwrap_or_default();
            let Some(Value::Sequence(labels)) = container.get("labels") else {
                continue;
            };
            for label in labels.iter().filter_map(yaml_doc::scalar_to_string) {
                if label.trim_start().starts_with(LABEL_PREFIX) && !label.contains('=') {
                    report.warn(format!(
                        "service '{}': malformed label '{}' (expected key=value)",
                        name, label
                    ));
                }
            }
        }

        report
    }
}

impl FormatAdapter for DockerComposeAdapter {
    fn format(&self) -> ConfigFormat {
        ConfigFormat::DockerCompose
    }
}
