// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which provides an interface for
//! parsing proxy configuration documents of one external format into the canonical
//! [`ProxyConfig`] model.

use crate::domain::{Diagnostics, ProxyConfig, Result};

/// A trait for parsing configuration documents.
///
/// Parsing is all-or-nothing: an implementation either returns a fully populated
/// configuration or an error, never a partially filled one. Constructs the model
/// cannot represent are reported through `diagnostics` rather than logged.
///
/// # Examples
///
/// ```rust
/// use proxyconv::domain::{Diagnostics, ProxyConfig, Result};
/// use proxyconv::ports::ConfigParser;
///
/// struct EmptyParser;
///
/// impl ConfigParser for EmptyParser {
///     fn parse(&self, _content: &str, _diagnostics: &mut Diagnostics) -> Result<ProxyConfig> {
///         Ok(ProxyConfig::new())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["empty"]
///     }
/// }
///
/// let config = EmptyParser.parse("", &mut Diagnostics::new()).unwrap();
/// assert!(config.is_empty());
/// ```
pub trait ConfigParser {
    /// Parses document content into a configuration.
    ///
    /// # Arguments
    ///
    /// * `content` - The raw document text
    /// * `diagnostics` - Collector for non-fatal notes
    ///
    /// # Returns
    ///
    /// * `Ok(ProxyConfig)` - The parsed configuration
    /// * `Err(ConvertError::ParseError)` - The document is structurally malformed
    fn parse(&self, content: &str, diagnostics: &mut Diagnostics) -> Result<ProxyConfig>;

    /// Returns the file extensions (without the leading dot) this parser reads.
    fn supported_extensions(&self) -> &[&str];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConvertError, Route};

    struct SingleRouteParser;

    impl ConfigParser for SingleRouteParser {
        fn parse(&self, content: &str, diagnostics: &mut Diagnostics) -> Result<ProxyConfig> {
            if content.is_empty() {
                return Err(ConvertError::parse("empty input"));
            }
            diagnostics.note("parsed one route");
            Ok(ProxyConfig::builder().route(Route::named(content)).build())
        }

        fn supported_extensions(&self) -> &[&str] {
            &["test", "tst"]
        }
    }

    #[test]
    fn test_parser_parse() {
        let mut diag = Diagnostics::new();
        let config = SingleRouteParser.parse("web", &mut diag).unwrap();
        assert_eq!(config.route_count(), 1);
        assert!(config.route("web").is_some());
        assert_eq!(diag.notes().len(), 1);
    }

    #[test]
    fn test_parser_error() {
        let result = SingleRouteParser.parse("", &mut Diagnostics::new());
        assert!(matches!(result, Err(ConvertError::ParseError { .. })));
    }

    #[test]
    fn test_parser_supported_extensions() {
        let extensions = SingleRouteParser.supported_extensions();
        assert_eq!(extensions, &["test", "tst"]);
    }
}
