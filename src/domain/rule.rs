// SPDX-License-Identifier: MIT OR Apache-2.0

//! Traefik rule expression parsing.
//!
//! A rule is a boolean expression of predicate calls such as
//! ``Host(`example.com`) && PathPrefix(`/api`)``. Function names are matched
//! case-insensitively and arguments are backtick-quoted.
//!
//! Each predicate kind is searched independently over the whole expression, so the
//! first occurrence of a singular predicate (host, path, method, client IP) wins,
//! while `Header` and `Query` calls are all collected. Operator precedence is not
//! modeled: [`parse_rule`] treats the expression as one conjunction, and
//! [`parse_complex_rule`] additionally splits on `||` into one route per branch.
//! Unknown predicates are ignored and nothing here ever fails.

use crate::domain::Route;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

fn unary(function: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{}\(\s*`([^`]+)`\s*\)", function))
        .expect("rule predicate regex compilation failed")
}

fn binary(function: &str) -> Regex {
    Regex::new(&format!(
        r"(?i)\b{}\(\s*`([^`]+)`\s*,\s*`([^`]+)`\s*\)",
        function
    ))
    .expect("rule predicate regex compilation failed")
}

static HOST: Lazy<Regex> = Lazy::new(|| unary("Host"));
static HOST_REGEXP: Lazy<Regex> = Lazy::new(|| unary("HostRegexp"));
static PATH: Lazy<Regex> = Lazy::new(|| unary("Path"));
static PATH_PREFIX: Lazy<Regex> = Lazy::new(|| unary("PathPrefix"));
static PATH_REGEXP: Lazy<Regex> = Lazy::new(|| unary("PathRegexp"));
static METHOD: Lazy<Regex> = Lazy::new(|| unary("Method"));
static HEADER: Lazy<Regex> = Lazy::new(|| binary("Header"));
static HEADER_REGEXP: Lazy<Regex> = Lazy::new(|| binary("HeaderRegexp"));
static QUERY: Lazy<Regex> = Lazy::new(|| binary("Query"));
static QUERY_REGEXP: Lazy<Regex> = Lazy::new(|| binary("QueryRegexp"));
static CLIENT_IP: Lazy<Regex> = Lazy::new(|| unary("ClientIP"));
static HOST_SNI: Lazy<Regex> = Lazy::new(|| unary("HostSNI"));
static HOST_SNI_REGEXP: Lazy<Regex> = Lazy::new(|| unary("HostSNIRegexp"));
static ALPN: Lazy<Regex> = Lazy::new(|| unary("ALPN"));

/// Every predicate recognized in a rule expression.
///
/// # Examples
///
/// ```
/// use proxyconv::domain::rule::RuleMatchers;
///
/// let m = RuleMatchers::extract("Host(`a.com`) && Host(`b.com`) && Header(`X`, `1`)");
/// assert_eq!(m.host.as_deref(), Some("a.com"));
/// assert_eq!(m.headers.get("X").map(String::as_str), Some("1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleMatchers {
    /// First `Host` argument
    pub host: Option<String>,
    /// First `HostRegexp` argument
    pub host_regexp: Option<String>,
    /// First `Path` argument
    pub path: Option<String>,
    /// First `PathPrefix` argument
    pub path_prefix: Option<String>,
    /// First `PathRegexp` argument
    pub path_regexp: Option<String>,
    /// First `Method` argument
    pub method: Option<String>,
    /// All `Header` pairs
    pub headers: BTreeMap<String, String>,
    /// All `HeaderRegexp` pairs
    pub header_regexps: BTreeMap<String, String>,
    /// All `Query` pairs
    pub queries: BTreeMap<String, String>,
    /// All `QueryRegexp` pairs
    pub query_regexps: BTreeMap<String, String>,
    /// First `ClientIP` argument
    pub client_ip: Option<String>,
    /// First `HostSNI` argument (TCP)
    pub host_sni: Option<String>,
    /// First `HostSNIRegexp` argument (TCP)
    pub host_sni_regexp: Option<String>,
    /// First `ALPN` argument (TCP)
    pub alpn: Option<String>,
}

impl RuleMatchers {
    /// Extracts all recognized predicates from a rule expression.
    pub fn extract(rule: &str) -> Self {
        Self {
            host: first(&HOST, rule),
            host_regexp: first(&HOST_REGEXP, rule),
            path: first(&PATH, rule),
            path_prefix: first(&PATH_PREFIX, rule),
            path_regexp: first(&PATH_REGEXP, rule),
            method: first(&METHOD, rule),
            headers: pairs(&HEADER, rule),
            header_regexps: pairs(&HEADER_REGEXP, rule),
            queries: pairs(&QUERY, rule),
            query_regexps: pairs(&QUERY_REGEXP, rule),
            client_ip: first(&CLIENT_IP, rule),
            host_sni: first(&HOST_SNI, rule),
            host_sni_regexp: first(&HOST_SNI_REGEXP, rule),
            alpn: first(&ALPN, rule),
        }
    }

    /// Whether a host, path, path prefix or path regexp was found.
    pub fn has_matcher(&self) -> bool {
        self.host.is_some()
            || self.host_regexp.is_some()
            || self.path.is_some()
            || self.path_prefix.is_some()
            || self.path_regexp.is_some()
    }

    /// Host for a TCP router: `Host`, else `HostSNI` unless it is the `*` wildcard.
    pub fn tcp_host(&self) -> Option<&str> {
        self.host
            .as_deref()
            .or(self.host_regexp.as_deref())
            .or_else(|| self.host_sni.as_deref().filter(|h| *h != "*"))
    }

    /// Builds a route from the matched predicates.
    pub fn to_route(&self) -> Route {
        let mut route = Route::default();

        if let Some(host) = self.host.as_ref().or(self.host_regexp.as_ref()) {
            route.host = host.clone();
        }

        if let Some(path) = &self.path {
            route.path = path.clone();
        } else if let Some(prefix) = &self.path_prefix {
            route.path_prefix = prefix.clone();
        } else if let Some(regex) = &self.path_regexp {
            route.path = format!("~ {}", regex);
        }

        if let Some(method) = &self.method {
            route.method = method.clone();
        }
        route.headers = self.headers.clone();
        route.query_params = self.queries.clone();
        if let Some(ip) = &self.client_ip {
            route.client_ip = ip.clone();
        }

        route
    }
}

fn first(re: &Regex, rule: &str) -> Option<String> {
    re.captures(rule).map(|caps| caps[1].to_string())
}

fn pairs(re: &Regex, rule: &str) -> BTreeMap<String, String> {
    re.captures_iter(rule)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Parses a rule expression into a single route.
///
/// The whole expression is treated as one conjunction. Empty or unrecognized input
/// yields `Route::default()`.
///
/// # Examples
///
/// ```
/// use proxyconv::domain::rule::parse_rule;
///
/// let route = parse_rule("Host(`example.com`) && PathPrefix(`/api`)");
/// assert_eq!(route.host, "example.com");
/// assert_eq!(route.path_prefix, "/api");
/// ```
pub fn parse_rule(rule: &str) -> Route {
    RuleMatchers::extract(rule).to_route()
}

/// Parses a rule expression into one route per `||` branch.
///
/// Each branch is an `&&` conjunction parsed like [`parse_rule`]. Branches without a
/// host, path, or path prefix are dropped.
///
/// # Examples
///
/// ```
/// use proxyconv::domain::rule::parse_complex_rule;
///
/// let routes = parse_complex_rule("Host(`a.com`) || Host(`b.com`) && PathPrefix(`/b`)");
/// assert_eq!(routes.len(), 2);
/// assert_eq!(routes[1].path_prefix, "/b");
/// ```
pub fn parse_complex_rule(rule: &str) -> Vec<Route> {
    split_top_level(rule, "||")
        .into_iter()
        .map(|branch| {
            let conjunction = split_top_level(branch, "&&").join(" && ");
            RuleMatchers::extract(&conjunction)
        })
        .filter(RuleMatchers::has_matcher)
        .map(|m| m.to_route())
        .collect()
}

/// Splits on an operator that appears outside backtick-quoted arguments.
fn split_top_level<'a>(rule: &'a str, operator: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut in_quote = false;
    let mut start = 0;
    let mut i = 0;
    let bytes = rule.as_bytes();

    while i < bytes.len() {
        if bytes[i] == b'`' {
            in_quote = !in_quote;
        } else if !in_quote && bytes[i..].starts_with(operator.as_bytes()) {
            parts.push(rule[start..i].trim());
            i += operator.len();
            start = i;
            continue;
        }
        i += 1;
    }
    parts.push(rule[start..].trim());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rule_yields_default_route() {
        let route = parse_rule("");
        assert_eq!(route, Route::default());
        assert_eq!(route.host, "");
        assert_eq!(route.path, "/");
        assert!(route.headers.is_empty());
        assert!(route.query_params.is_empty());
    }

    #[test]
    fn test_garbage_rule_is_ignored() {
        assert_eq!(parse_rule("Foo(`bar`) && !!"), Route::default());
    }

    #[test]
    fn test_host_and_prefix() {
        let route = parse_rule("Host(`example.com`) && PathPrefix(`/api`)");
        assert_eq!(route.host, "example.com");
        assert_eq!(route.path_prefix, "/api");
        assert_eq!(route.path, "/");
    }

    #[test]
    fn test_first_host_wins() {
        let route = parse_rule("Host(`first.com`) && Host(`second.com`)");
        assert_eq!(route.host, "first.com");
    }

    #[test]
    fn test_case_insensitive_function_names() {
        let route = parse_rule("HOST(`a.com`) && pathprefix(`/x`) && method(`POST`)");
        assert_eq!(route.host, "a.com");
        assert_eq!(route.path_prefix, "/x");
        assert_eq!(route.method, "POST");
    }

    #[test]
    fn test_path_takes_precedence_over_prefix() {
        let route = parse_rule("PathPrefix(`/p`) && Path(`/exact`)");
        assert_eq!(route.path, "/exact");
        assert_eq!(route.path_prefix, "");
    }

    #[test]
    fn test_path_regexp() {
        let route = parse_rule("PathRegexp(`^/v[0-9]+`)");
        assert_eq!(route.path, "~ ^/v[0-9]+");
        assert_eq!(route.path_regex(), Some("^/v[0-9]+"));
    }

    #[test]
    fn test_host_regexp_fallback() {
        let route = parse_rule("HostRegexp(`^.+\\.example\\.com$`)");
        assert_eq!(route.host, "^.+\\.example\\.com$");
    }

    #[test]
    fn test_headers_and_queries_collected() {
        let route = parse_rule(
            "Header(`X-A`, `1`) && Header(`X-B`,`2`) && Query(`q`, `x`) && Query(`p`, `y`)",
        );
        assert_eq!(route.headers.len(), 2);
        assert_eq!(route.headers["X-B"], "2");
        assert_eq!(route.query_params.len(), 2);
        assert_eq!(route.query_params["p"], "y");
    }

    #[test]
    fn test_header_regexp_not_mistaken_for_header() {
        let m = RuleMatchers::extract("HeaderRegexp(`X`, `^a`)");
        assert!(m.headers.is_empty());
        assert_eq!(m.header_regexps["X"], "^a");
    }

    #[test]
    fn test_tcp_predicates() {
        let m = RuleMatchers::extract("HostSNI(`db.local`) && ALPN(`h2`) && ClientIP(`10.0.0.1`)");
        assert!(m.host.is_none());
        assert_eq!(m.tcp_host(), Some("db.local"));
        assert_eq!(m.alpn.as_deref(), Some("h2"));
        assert_eq!(m.client_ip.as_deref(), Some("10.0.0.1"));

        let wildcard = RuleMatchers::extract("HostSNI(`*`)");
        assert_eq!(wildcard.tcp_host(), None);
    }

    #[test]
    fn test_single_entry_point_ignores_or() {
        let route = parse_rule("Host(`a.com`) || Host(`b.com`)");
        assert_eq!(route.host, "a.com");
    }

    #[test]
    fn test_complex_rule_splits_branches() {
        let routes = parse_complex_rule(
            "Host(`a.com`) && PathPrefix(`/a`) || Host(`b.com`) && Method(`GET`)",
        );
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].host, "a.com");
        assert_eq!(routes[0].path_prefix, "/a");
        assert_eq!(routes[1].host, "b.com");
        assert_eq!(routes[1].method, "GET");
    }

    #[test]
    fn test_complex_rule_first_match_within_branch() {
        let routes = parse_complex_rule("Host(`a.com`) && Host(`c.com`) || Path(`/x`)");
        assert_eq!(routes[0].host, "a.com");
        assert_eq!(routes[1].path, "/x");
    }

    #[test]
    fn test_complex_rule_discards_branch_without_matcher() {
        let routes = parse_complex_rule("Method(`GET`) || Host(`a.com`)");
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].host, "a.com");
        assert!(parse_complex_rule("").is_empty());
    }

    #[test]
    fn test_split_ignores_operators_in_quotes() {
        let routes = parse_complex_rule("PathRegexp(`^/(a||b)`) || Host(`x.com`)");
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].path, "~ ^/(a||b)");
    }
}
