//! # mitem CLI entry point
//!
//! Parses command-line arguments, loads configuration, installs the tracing
//! subscriber and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use mitem_cli::config::{CliConfig, LogConfig, LogFormat, LogOutput};
use mitem_cli::extract::{run_extract, ExtractArgs};
use mitem_cli::validate::{run_validate, ValidateArgs};
use mitem_schema::MitemService;

/// Validate mitem documents and extract their fields.
#[derive(Parser, Debug)]
#[command(name = "mitem", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate mitem documents.
    Validate(ValidateArgs),

    /// Print a single field of a mitem document.
    Extract(ExtractArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    init_tracing(&config.log, cli.verbose);
    config.log_summary();

    let service = MitemService::new();
    let mut stdout = std::io::stdout().lock();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &service, &mut stdout),
        Commands::Extract(args) => run_extract(&args, &service, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

/// Install the global subscriber. An unparsable `RUST_LOG` falls back to
/// the configured level.
fn init_tracing(log: &LogConfig, verbose: u8) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = log.filter_directive(verbose, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(log.level.to_string().to_ascii_lowercase()));

    let writer = match log.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer);

    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
