// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line front end for the proxy configuration converter.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use proxyconv::domain::{ConvertError, Result};
use proxyconv::service::Converter;
use proxyconv::settings::ConverterSettings;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const APP_NAME: &str = "proxyconv";
const QUALIFIER: &str = "org.cryptidtech";

#[derive(Parser)]
#[command(name = "proxyconv")]
#[command(about = "Convert reverse-proxy configuration between nginx, Traefik and docker-compose")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Settings file (defaults to config.yaml in the user config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a configuration file to another format
    Convert {
        /// Input file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Input format (nginx-conf, traefik-dynamic, docker-compose); detected when omitted
        #[arg(short = 'i', long = "from")]
        from: Option<String>,
        /// Output format; detected from the output path when omitted
        #[arg(short = 'o', long = "to")]
        to: Option<String>,
        /// Skip the syntax check of the generated output
        #[arg(long)]
        no_validate: bool,
        /// Print the result instead of writing it
        #[arg(long)]
        dry_run: bool,
        /// Overwrite the output file if it exists
        #[arg(long)]
        force: bool,
    },
    /// Check a configuration file for structural problems
    Validate {
        /// File to check
        file: PathBuf,
        /// Format; detected when omitted
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Print the detected format of a file
    Detect {
        /// File to inspect
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    initialise_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn initialise_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .finish(),
    )
    .is_err()
    {
        // Subscriber already installed.
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let settings = match &cli.settings {
        Some(path) => ConverterSettings::from_file(path)?,
        None => ConverterSettings::from_default_location(APP_NAME, QUALIFIER)?,
    };

    match cli.command {
        Commands::Convert {
            input,
            output,
            from,
            to,
            no_validate,
            dry_run,
            force,
        } => {
            let settings = ConverterSettings {
                validate_output: settings.validate_output && !no_validate,
                ..settings
            };
            let converter = Converter::with_settings(settings);

            let output_format = match to.or_else(|| output_format_for(&output)) {
                Some(format) => format,
                None => Cli::command()
                    .error(
                        ErrorKind::MissingRequiredArgument,
                        format!(
                            "cannot infer the output format of '{}'; pass --to",
                            output.display()
                        ),
                    )
                    .exit(),
            };

            let result = converter.convert_file(&input, from.as_deref(), &output_format)?;

            if !cli.quiet {
                for note in &result.notes {
                    eprintln!("note: {}", note);
                }
            }
            for warning in &result.warnings {
                eprintln!("warning: {}", warning);
            }

            if dry_run {
                print!("{}", result.output);
                return Ok(ExitCode::SUCCESS);
            }

            if output.exists() && !force {
                return Err(ConvertError::IoError(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!(
                        "{} already exists (use --force to overwrite)",
                        output.display()
                    ),
                )));
            }
            fs::write(&output, &result.output)?;

            if !cli.quiet {
                println!(
                    "Converted {} -> {} ({}, {} route(s), {} service(s))",
                    input.display(),
                    output.display(),
                    result.format,
                    result.config.route_count(),
                    result.config.service_count()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate { file, format } => {
            let converter = Converter::with_settings(settings);
            let report = converter.validate_file(&file, format.as_deref())?;

            for error in &report.errors {
                println!("error: {}", error);
            }
            for warning in &report.warnings {
                println!("warning: {}", warning);
            }

            if report.valid {
                if !cli.quiet {
                    println!("{}: valid", file.display());
                }
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{}: invalid", file.display());
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Detect { file } => {
            let source = proxyconv::adapters::FileSource::from_file(&file)?;
            let format = Converter::detect_format(source.path(), source.content())?;
            println!("{}", format);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Output format from the output path, peeking at the file when it already exists.
///
/// `None` when the path alone is ambiguous, such as a new `.yml` file.
fn output_format_for(path: &Path) -> Option<String> {
    let existing = fs::read_to_string(path).unwrap_or_default();
    Converter::detect_format(path, &existing)
        .ok()
        .map(|format| format.key().to_string())
}
