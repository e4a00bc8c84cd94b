//! CLI argument parsing module for pypi-refresh

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Refresh a local package archive with the latest releases from PyPI
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "pypi-refresh",
    version,
    about = "Refresh a local package archive with the latest releases from PyPI"
)]
pub struct CliArgs {
    /// Directory holding the local .whl and .tar.gz archives
    #[arg(long, value_name = "PATH")]
    pub packages_dir: Option<PathBuf>,

    // General options
    /// Actually run the downloads instead of only printing them
    #[arg(short, long)]
    pub execute: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    // Index options
    /// Root of the JSON metadata API
    #[arg(long, value_name = "URL")]
    pub index_url: Option<String>,

    /// Simple-index URL passed to the downloader
    #[arg(long, value_name = "URL")]
    pub simple_url: Option<String>,

    /// pip program used for downloads
    #[arg(long, value_name = "PROGRAM")]
    pub pip: Option<String>,

    /// Maximum number of concurrent metadata requests
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    // Package filters
    /// Exclude specific packages from the refresh (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Refresh only specific packages (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub only: Vec<String>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}
