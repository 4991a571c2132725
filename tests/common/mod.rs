// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for the integration tests.

use proxyconv::domain::{LoadBalancerStrategy, Middleware, Protocol, ProxyConfig, Route, Service};
use std::io::Write;
use tempfile::NamedTempFile;

/// nginx site with two upstreams and two server blocks.
#[allow(dead_code)]
pub const NGINX_SITE: &str = r#"
upstream api {
    least_conn;
    server 10.0.0.1:8080;
    server 10.0.0.2:8080;
}

upstream web {
    server 10.0.1.1;
}

server {
    listen 443 ssl http2;
    server_name api.example.com;
    ssl_certificate /etc/ssl/certs/api.example.com.crt;
    ssl_certificate_key /etc/ssl/private/api.example.com.key;

    location /v1 {
        if ($request_method !~ ^(GET|POST)$) {
            return 405;
        }
        proxy_pass http://api;
    }
}

server {
    listen 80;
    server_name www.example.com;

    location / {
        proxy_pass http://web;
    }
}
"#;

/// Traefik dynamic document covering routers, services, middlewares and tls.
#[allow(dead_code)]
pub const TRAEFIK_DYNAMIC: &str = r#"
http:
  routers:
    api:
      rule: "Host(`api.example.com`) && PathPrefix(`/v1`) && Header(`X-Tenant`, `acme`)"
      service: api
      middlewares:
        - strip
      tls:
        certResolver: letsencrypt
    web:
      rule: "Host(`www.example.com`)"
      service: web
      priority: 5
  services:
    api:
      loadBalancer:
        servers:
          - url: "http://10.0.0.1:8080"
          - url: "http://10.0.0.2:8080"
    web:
      loadBalancer:
        servers:
          - url: "http://10.0.1.1:80"
  middlewares:
    strip:
      stripPrefix:
        prefixes:
          - /v1
tls:
  options:
    default:
      minVersion: VersionTLS12
"#;

/// docker-compose file with labelled and unlabelled containers.
#[allow(dead_code)]
pub const COMPOSE: &str = r#"
version: "3.8"
services:
  web:
    image: nginx:alpine
    labels:
      - "traefik.enable=true"
      - "traefik.http.routers.web.rule=Host(`example.com`) && PathPrefix(`/api`)"
      - "traefik.http.services.web.loadbalancer.server.port=80"
  app:
    image: app:1.0
    ports:
      - "3000:3000"
    labels:
      traefik.enable: "true"
      traefik.http.routers.app.rule: "Host(`app.example.com`)"
      traefik.http.routers.app.tls.certresolver: letsencrypt
      traefik.http.routers.app.middlewares: secure
      traefik.http.middlewares.secure.headers.stsseconds: "31536000"
  db:
    image: postgres:16
"#;

/// A model exercising every field the three formats share.
#[allow(dead_code)]
pub fn sample_config() -> ProxyConfig {
    let mut api = Service::new("api");
    api.servers = vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()];
    api.port = 8080;
    api.load_balancer = LoadBalancerStrategy::LeastConn;

    let mut secure = Service::new("secure");
    secure.servers = vec!["10.0.2.1:8443".to_string()];
    secure.protocol = Protocol::Https;

    let mut api_route = Route {
        host: "api.example.com".to_string(),
        path_prefix: "/v1".to_string(),
        method: "GET".to_string(),
        service: "api".to_string(),
        middlewares: vec!["strip".to_string()],
        ..Route::named("api")
    };
    api_route.headers.insert("X-Tenant".to_string(), "acme".to_string());

    let secure_route = Route {
        host: "secure.example.com".to_string(),
        tls: true,
        cert_resolver: "letsencrypt".to_string(),
        client_ip: "10.0.0.0/8".to_string(),
        service: "secure".to_string(),
        ..Route::named("secure")
    };

    let strip = Middleware::new("strip", "stripPrefix")
        .with_config(serde_yaml::from_str("prefixes: [/v1]").unwrap_or_default());

    ProxyConfig::builder()
        .service(api)
        .service(secure)
        .route(api_route)
        .route(secure_route)
        .middleware(strip)
        .build()
}

/// Writes `content` to a temporary file with the given suffix.
#[allow(dead_code)]
pub fn write_temp(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}
