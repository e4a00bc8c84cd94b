//! pypi-refresh - keep a local package archive up to date with PyPI
//!
//! Scans a directory of wheels and source archives, asks the index for the
//! latest release of every package found and downloads whatever is newer.

use anyhow::Context;
use clap::Parser;
use pypi_refresh::cancel::{install_interrupt_handler, CancellationToken};
use pypi_refresh::cli::CliArgs;
use pypi_refresh::config::{FileConfig, Settings};
use pypi_refresh::orchestrator::Orchestrator;
use pypi_refresh::output::{create_formatter, OutputConfig};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(&args);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; RUST_LOG wins over the verbosity flags
fn init_logging(args: &CliArgs) {
    let default_level = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let file = FileConfig::discover(args.config.as_deref())?;
    let settings = Settings::resolve(&args, file)?;

    debug!("pypi-refresh v{}", env!("CARGO_PKG_VERSION"));
    debug!("packages dir: {}", settings.packages_dir.display());
    debug!("index: {}", settings.index_url);
    if !settings.execute {
        debug!("mode: dry-run");
    }

    let mut output_config = OutputConfig::from_cli(settings.json, settings.verbose, settings.quiet);
    output_config.color = io::stdout().is_terminal();

    // Create and run the orchestrator
    let cancel = CancellationToken::new();
    let interrupt_handler = install_interrupt_handler(cancel.clone());
    let orchestrator = Orchestrator::new(settings, cancel)?;
    let result = orchestrator.run().await;
    interrupt_handler.abort();
    let report = result.context("refresh aborted")?;

    // Output results
    let formatter = create_formatter(output_config);
    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    Ok(ExitCode::from(report.outcome.exit_code()))
}
