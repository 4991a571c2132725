// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion orchestration.
//!
//! The [`Converter`] resolves format keys through the [`AdapterRegistry`], runs
//! parse, generate and validate, and is the only place that logs. Adapter notes
//! are logged at debug level and returned with the result.

use crate::adapters::{AdapterRegistry, FileSource};
use crate::domain::{
    ConfigFormat, ConvertError, Diagnostics, ProxyConfig, Result, ValidationReport,
    ValidationWarning,
};
use crate::ports::FormatAdapter;
use crate::settings::ConverterSettings;
use serde_yaml::Value;
use std::path::Path;

/// Outcome of one conversion.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// The intermediate model
    pub config: ProxyConfig,
    /// Generated text in the target format
    pub output: String,
    /// Target format
    pub format: ConfigFormat,
    /// Findings of the output check; empty when it passed or was disabled
    pub warnings: Vec<ValidationWarning>,
    /// Features dropped or approximated by the adapters
    pub notes: Vec<String>,
}

impl ConversionResult {
    /// Whether the output check passed (or was disabled).
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Converts proxy configurations between formats.
///
/// # Examples
///
/// ```rust
/// use proxyconv::service::Converter;
///
/// let compose = r#"
/// services:
///   web:
///     labels:
///       - "traefik.http.routers.web.rule=Host(`example.com`)"
///       - "traefik.http.services.web.loadbalancer.server.port=8080"
/// "#;
///
/// let result = Converter::new()
///     .convert_str(compose, "docker-compose", "nginx-conf")
///     .unwrap();
/// assert!(result.output.contains("server_name example.com;"));
/// assert!(result.output.contains("server web:8080;"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter {
    settings: ConverterSettings,
}

impl Converter {
    /// Creates a converter with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a converter with the given settings.
    pub fn with_settings(settings: ConverterSettings) -> Self {
        Self { settings }
    }

    /// The settings in use.
    pub fn settings(&self) -> &ConverterSettings {
        &self.settings
    }

    /// Guesses the format of a document from its path and content.
    ///
    /// Candidates are the formats whose adapter claims the file extension. A
    /// single candidate wins outright, and no candidate means docker-compose.
    /// Several candidates are settled by peeking at the document: a top-level
    /// `services` key means docker-compose, `http`, `tcp` or `udp` means Traefik
    /// dynamic. Undecided JSON is Traefik dynamic and undecided YAML is an
    /// `UnsupportedFormat` error.
    pub fn detect_format(path: &Path, content: &str) -> Result<ConfigFormat> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let candidates: Vec<ConfigFormat> = ConfigFormat::ALL
            .into_iter()
            .filter(|f| {
                AdapterRegistry::adapter(*f)
                    .supported_extensions()
                    .contains(&extension.as_str())
            })
            .collect();

        let format = match candidates.as_slice() {
            [] => ConfigFormat::DockerCompose,
            [only] => *only,
            _ => match peek_structured(content).filter(|f| candidates.contains(f)) {
                Some(format) => format,
                None if extension == "json" => ConfigFormat::TraefikDynamic,
                None => {
                    return Err(ConvertError::UnsupportedFormat {
                        format: "yaml".to_string(),
                    })
                }
            },
        };

        tracing::debug!("Detected format '{}' for {}", format, path.display());
        Ok(format)
    }

    /// Parses text in the named format into the canonical model.
    pub fn parse_str(&self, content: &str, format: &str) -> Result<ProxyConfig> {
        let adapter = AdapterRegistry::get(format)?;
        let mut diagnostics = Diagnostics::new();
        let config = parse_with(adapter, content, &mut diagnostics)?;
        log_notes(&diagnostics);
        Ok(config)
    }

    /// Reads and parses a file. The format is detected when not given.
    ///
    /// Parse errors carry the file path.
    pub fn parse_file(&self, path: &Path, format: Option<&str>) -> Result<ProxyConfig> {
        let source = FileSource::from_file(path)?;
        let adapter = resolve(&source, format)?;
        let mut diagnostics = Diagnostics::new();
        let config = parse_with(adapter, source.content(), &mut diagnostics)
            .map_err(|e| e.with_path(source.path()))?;
        log_notes(&diagnostics);
        Ok(config)
    }

    /// Generates text in the named format.
    pub fn generate(&self, config: &ProxyConfig, format: &str) -> Result<String> {
        let adapter = AdapterRegistry::get(format)?;
        let mut diagnostics = Diagnostics::new();
        let output = adapter.generate(config, &self.settings, &mut diagnostics)?;
        log_notes(&diagnostics);
        Ok(output)
    }

    /// Runs the best-effort output check for the named format.
    ///
    /// Returns the warning to attach, if any. The check itself never fails the
    /// conversion; only an unknown format key is an error.
    pub fn validate(&self, content: &str, format: &str) -> Result<Option<ValidationWarning>> {
        let adapter = AdapterRegistry::get(format)?;
        Ok(check_with(adapter, content))
    }

    /// Converts text from one format to another.
    pub fn convert_str(
        &self,
        content: &str,
        input_format: &str,
        output_format: &str,
    ) -> Result<ConversionResult> {
        let input = AdapterRegistry::get(input_format)?;
        let output = AdapterRegistry::get(output_format)?;
        self.convert_with(input, output, content)
    }

    /// Reads a file and converts it. The input format is detected when not given.
    pub fn convert_file(
        &self,
        path: &Path,
        input_format: Option<&str>,
        output_format: &str,
    ) -> Result<ConversionResult> {
        let output = AdapterRegistry::get(output_format)?;
        let source = FileSource::from_file(path)?;
        let input = resolve(&source, input_format)?;
        tracing::info!("Converting {}", source.path().display());
        self.convert_with(input, output, source.content())
            .map_err(|e| e.with_path(source.path()))
    }

    /// Structurally checks a file. The format is detected when not given.
    pub fn validate_file(&self, path: &Path, format: Option<&str>) -> Result<ValidationReport> {
        let source = FileSource::from_file(path)?;
        let adapter = resolve(&source, format)?;
        let report = adapter.validate_document(source.content());

        tracing::info!(
            "Validated {} as {}: {} error(s), {} warning(s)",
            source.path().display(),
            adapter.format(),
            report.errors.len(),
            report.warnings.len()
        );
        Ok(report)
    }

    fn convert_with(
        &self,
        input: &dyn FormatAdapter,
        output: &dyn FormatAdapter,
        content: &str,
    ) -> Result<ConversionResult> {
        tracing::info!("Converting {} -> {}", input.format(), output.format());

        let mut diagnostics = Diagnostics::new();
        let config = parse_with(input, content, &mut diagnostics)?;
        let generated = output.generate(&config, &self.settings, &mut diagnostics)?;
        log_notes(&diagnostics);

        let warnings = if self.settings.validate_output {
            check_with(output, &generated).into_iter().collect()
        } else {
            Vec::new()
        };

        Ok(ConversionResult {
            config,
            output: generated,
            format: output.format(),
            warnings,
            notes: diagnostics.into_notes(),
        })
    }
}

fn parse_with(
    adapter: &dyn FormatAdapter,
    content: &str,
    diagnostics: &mut Diagnostics,
) -> Result<ProxyConfig> {
    let config = adapter.parse(content, diagnostics)?;
    tracing::debug!(
        "Parsed {} document: {} route(s), {} service(s), {} middleware(s)",
        adapter.format(),
        config.route_count(),
        config.service_count(),
        config.middleware_count()
    );
    Ok(config)
}

fn check_with(adapter: &dyn FormatAdapter, content: &str) -> Option<ValidationWarning> {
    let problem = adapter.check_output(content)?;
    let warning = ValidationWarning {
        format: adapter.format(),
        message: format!("Generated configuration may have syntax errors: {}", problem),
    };
    tracing::warn!("{}", warning);
    Some(warning)
}

fn resolve(source: &FileSource, format: Option<&str>) -> Result<&'static dyn FormatAdapter> {
    match format {
        Some(key) => AdapterRegistry::get(key),
        None => Converter::detect_format(source.path(), source.content())
            .map(AdapterRegistry::adapter),
    }
}

/// Format suggested by the top-level keys of a YAML/JSON document.
fn peek_structured(content: &str) -> Option<ConfigFormat> {
    let Ok(Value::Mapping(root)) = serde_yaml::from_str::<Value>(content) else {
        return None;
    };
    if root.contains_key("services") {
        Some(ConfigFormat::DockerCompose)
    } else if ["http", "tcp", "udp"].iter().any(|key| root.contains_key(*key)) {
        Some(ConfigFormat::TraefikDynamic)
    } else {
        None
    }
}

fn log_notes(diagnostics: &Diagnostics) {
    for note in diagnostics.notes() {
        tracing::debug!("{}", note);
    }
}
