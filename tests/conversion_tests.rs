// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for conversions through the orchestrator.

mod common;

use common::{sample_config, write_temp, COMPOSE, NGINX_SITE, TRAEFIK_DYNAMIC};
use proxyconv::domain::{parse_complex_rule, parse_rule, ConfigFormat, ConvertError, Route};
use proxyconv::prelude::*;

#[test]
fn test_compose_labels_to_model() {
    let compose = r#"
services:
  web:
    labels:
      - "traefik.enable=true"
      - "traefik.http.routers.web.rule=Host(`example.com`) && PathPrefix(`/api`)"
      - "traefik.http.services.web.loadbalancer.server.port=80"
"#;
    let config = Converter::new().parse_str(compose, "docker-compose").unwrap();

    assert_eq!(config.route_count(), 1);
    let route = &config.routes()[0];
    assert_eq!(route.host, "example.com");
    assert_eq!(route.path_prefix, "/api");
    assert_eq!(route.service, "web");

    assert_eq!(config.service_count(), 1);
    let service = &config.services()[0];
    assert_eq!(service.name, "web");
    assert_eq!(service.port, 80);
    assert_eq!(service.servers, vec!["web"]);
}

#[test]
fn test_nginx_upstream_to_model() {
    let config = Converter::new()
        .parse_str(
            "upstream api { server 10.0.0.1:8080; server 10.0.0.2:8080; }",
            "nginx-conf",
        )
        .unwrap();

    let service = config.service("api").unwrap();
    assert_eq!(service.servers, vec!["10.0.0.1", "10.0.0.2"]);
    assert_eq!(service.port, 8080);
}

#[test]
fn test_dynamic_router_with_empty_tls() {
    let doc = "http:\n  routers:\n    foo:\n      rule: \"PathPrefix(`/x`)\"\n      service: bar\n      tls: {}\n";
    let config = Converter::new().parse_str(doc, "traefik-dynamic").unwrap();

    let route = config.route("foo").unwrap();
    assert_eq!(route.path_prefix, "/x");
    assert_eq!(route.service, "bar");
    assert!(route.tls);
    assert!(route.cert_resolver.is_empty());
}

#[test]
fn test_nginx_tls_server_block() {
    let route = Route {
        host: "a.com".to_string(),
        tls: true,
        client_ip: "10.0.0.0/8".to_string(),
        ..Route::default()
    };
    let config = ProxyConfig::builder().route(route).build();
    let output = Converter::new().generate(&config, "nginx-conf").unwrap();

    assert!(output.contains("listen 443 ssl http2;"));
    assert!(output.contains("server_name a.com;"));
    assert!(output.contains("allow 10.0.0.0/8;"));
    assert!(output.contains("deny all;"));
    assert!(output.contains("proxy_pass http://a.com;"));
    assert!(!output.contains("ssl_certificate"));
}

#[test]
fn test_empty_rule() {
    let route = parse_rule("");
    assert_eq!(route.host, "");
    assert_eq!(route.path, "/");
    assert!(route.headers.is_empty());
    assert!(route.query_params.is_empty());
    assert!(parse_complex_rule("").is_empty());
}

#[test]
fn test_rule_entry_points_disagree_on_or() {
    let rule = "Host(`a.com`) || Host(`b.com`) && PathPrefix(`/b`)";

    let single = parse_rule(rule);
    assert_eq!(single.host, "a.com");
    assert_eq!(single.path_prefix, "/b");

    let branches = parse_complex_rule(rule);
    assert_eq!(branches.len(), 2);
    assert_eq!(branches[0].host, "a.com");
    assert!(branches[0].path_prefix.is_empty());
    assert_eq!(branches[1].host, "b.com");
    assert_eq!(branches[1].path_prefix, "/b");
}

#[test]
fn test_label_keys_are_case_folded_values_are_not() {
    let upper = "services:\n  svc:\n    labels:\n      - \"TRAEFIK.HTTP.ROUTERS.X.RULE=Host(`Example.COM`)\"\n";
    let lower = "services:\n  svc:\n    labels:\n      - \"traefik.http.routers.x.rule=Host(`Example.COM`)\"\n";

    let converter = Converter::new();
    let from_upper = converter.parse_str(upper, "docker-compose").unwrap();
    let from_lower = converter.parse_str(lower, "docker-compose").unwrap();

    assert_eq!(from_upper, from_lower);
    assert_eq!(from_upper.route("x").unwrap().host, "Example.COM");
}

#[test]
fn test_non_numeric_priority_fails_conversion() {
    let compose = "services:\n  web:\n    labels:\n      - traefik.http.routers.web.priority=urgent\n";
    let result = Converter::new().convert_str(compose, "docker-compose", "nginx-conf");

    match result {
        Err(ConvertError::ParseError { message, .. }) => assert!(message.contains("urgent")),
        other => panic!("expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_unsupported_format_keys() {
    let converter = Converter::new();

    match converter.convert_str(COMPOSE, "kubernetes", "nginx-conf") {
        Err(ConvertError::UnsupportedFormat { format }) => assert_eq!(format, "kubernetes"),
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
    assert!(matches!(
        converter.generate(&sample_config(), "caddyfile"),
        Err(ConvertError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_nginx_to_dynamic() {
    let result = Converter::new()
        .convert_str(NGINX_SITE, "nginx-conf", "traefik-dynamic")
        .unwrap();
    assert!(result.is_clean());

    let doc: serde_yaml::Value = serde_yaml::from_str(&result.output).unwrap();
    let routers = &doc["http"]["routers"];
    assert_eq!(
        routers["router-0"]["rule"],
        serde_yaml::Value::from("Host(`api.example.com`) && PathPrefix(`/v1`) && Method(`GET,POST`)")
    );
    assert!(routers["router-0"]["tls"].is_mapping());
    assert_eq!(routers["router-1"]["service"], serde_yaml::Value::from("web"));

    let api_servers = &doc["http"]["services"]["api"]["loadBalancer"]["servers"];
    assert_eq!(api_servers[0]["url"], serde_yaml::Value::from("http://10.0.0.1:8080"));
    assert_eq!(
        doc["http"]["services"]["web"]["loadBalancer"]["servers"][0]["url"],
        serde_yaml::Value::from("http://10.0.1.1:80")
    );
}

#[test]
fn test_dynamic_to_compose() {
    let result = Converter::new()
        .convert_str(TRAEFIK_DYNAMIC, "traefik-dynamic", "docker-compose")
        .unwrap();
    let output = &result.output;

    assert!(output.contains(
        "traefik.http.routers.api.rule=Host(`api.example.com`) && PathPrefix(`/v1`) && Header(`X-Tenant`, `acme`)"
    ));
    assert!(output.contains("traefik.http.routers.api.tls.certresolver=letsencrypt"));
    assert!(output.contains("traefik.http.routers.api.middlewares=strip"));
    assert!(output.contains("traefik.http.middlewares.strip.stripPrefix.prefixes=/v1"));
    assert!(output.contains("traefik.http.services.api.loadbalancer.server.port=8080"));
    assert!(output.contains("traefik.http.routers.web.priority=5"));

    assert!(result
        .notes
        .iter()
        .any(|note| note.contains("tls section")));
}

#[test]
fn test_compose_to_nginx() {
    let result = Converter::new()
        .convert_str(COMPOSE, "docker-compose", "nginx-conf")
        .unwrap();
    let output = &result.output;

    assert!(output.contains("upstream web {\n    server web:80;\n}"));
    assert!(output.contains("upstream app {\n    server app:3000;\n}"));
    assert!(output.contains("upstream db {\n    server db:80;\n}"));
    assert!(output.contains("server_name app.example.com;"));
    assert!(output.contains("ssl_certificate /etc/ssl/certs/app.example.com.crt;"));
    assert!(output.contains("location /api {"));

    assert!(result.notes.iter().any(|note| note.contains("secure")));
    assert!(result.is_clean());
}

#[test]
fn test_convert_file_with_detection() {
    let input = write_temp(NGINX_SITE, ".conf");

    let result = Converter::new()
        .convert_file(input.path(), None, "docker-compose")
        .unwrap();

    assert_eq!(result.format, ConfigFormat::DockerCompose);
    let reparsed = Converter::new()
        .parse_str(&result.output, "docker-compose")
        .unwrap();
    assert_eq!(reparsed.route("api-router").unwrap().host, "api.example.com");
    assert_eq!(reparsed.service("api").unwrap().port, 8080);
}

#[test]
fn test_convert_file_with_explicit_format() {
    let input = write_temp(TRAEFIK_DYNAMIC, ".txt");

    let result = Converter::new()
        .convert_file(input.path(), Some("traefik-dynamic"), "nginx-conf")
        .unwrap();
    assert!(result.output.contains("server_name www.example.com;"));
}

#[test]
fn test_parse_error_reports_path() {
    let input = write_temp("http:\n  routers: [broken]\n", ".yml");

    match Converter::new().parse_file(input.path(), None) {
        Err(err @ ConvertError::ParseError { .. }) => {
            assert!(err.to_string().contains(&input.path().display().to_string()));
        }
        other => panic!("expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_settings_flow_into_output() {
    let settings = ConverterSettings::from_yaml_str(
        "nginx:\n  cert_dir: /etc/letsencrypt/certs\n  proxy_timeout_secs: 15\ncompose:\n  image_tag: stable\n",
    )
    .unwrap();
    let converter = Converter::with_settings(settings);
    let config = sample_config();

    let nginx = converter.generate(&config, "nginx-conf").unwrap();
    assert!(nginx.contains("ssl_certificate /etc/letsencrypt/certs/secure.example.com.crt;"));
    assert!(nginx.contains("proxy_read_timeout 15s;"));

    let compose = converter.generate(&config, "docker-compose").unwrap();
    assert!(compose.contains("api:stable"));
}

#[test]
fn test_validate_file_reports() {
    let converter = Converter::new();

    let good = write_temp(TRAEFIK_DYNAMIC, ".yml");
    let report = converter.validate_file(good.path(), None).unwrap();
    assert!(report.valid);
    assert!(report.warnings.is_empty());

    let bad = write_temp("version: '3'\nnetworks: {}\n", ".txt");
    let report = converter
        .validate_file(bad.path(), Some("docker-compose"))
        .unwrap();
    assert!(!report.valid);
    assert!(report.errors[0].contains("services"));
}
