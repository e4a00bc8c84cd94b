//! Configuration file handling and settings resolution
//!
//! Settings come from three layers, highest priority first: command line
//! flags, a TOML configuration file, built-in defaults.
//!
//! ```toml
//! packages_dir = "/srv/pypiserver/packages"
//! execute = false
//! index_url = "https://pypi.org/pypi"
//! simple_url = "https://pypi.org/simple/"
//! pip = "pip"
//! concurrency = 10
//! timeout = 30
//! exclude = ["numpy"]
//! only = []
//! ```

use crate::cli::CliArgs;
use crate::error::ConfigError;
use crate::registry::{DEFAULT_CONCURRENCY, PYPI_API_URL};
use crate::update::UpdateFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default simple-index URL handed to the downloader
pub const PYPI_SIMPLE_URL: &str = "https://pypi.org/simple/";

/// Default pip program
pub const DEFAULT_PIP: &str = "pip";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Config file name looked up in the working and home directories
pub const RC_FILE_NAME: &str = ".pypi-refreshrc";

/// Contents of a configuration file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub packages_dir: Option<PathBuf>,
    pub execute: bool,
    pub index_url: Option<String>,
    pub simple_url: Option<String>,
    pub pip: Option<String>,
    pub concurrency: Option<usize>,
    pub timeout: Option<u64>,
    pub exclude: Vec<String>,
    pub only: Vec<String>,
}

impl FileConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Load the explicitly requested file, or the first default file that exists
    pub fn discover(explicit: Option<&Path>) -> Result<Option<Self>, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path).map(Some);
        }

        let cwd = std::env::current_dir().ok();
        let home = dirs::home_dir();
        match default_locations(cwd.as_deref(), home.as_deref())
            .into_iter()
            .find(|path| path.is_file())
        {
            Some(path) => Self::load(&path).map(Some),
            None => Ok(None),
        }
    }
}

/// Default config file locations in lookup order
pub fn default_locations(cwd: Option<&Path>, home: Option<&Path>) -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(cwd) = cwd {
        locations.push(cwd.join(RC_FILE_NAME));
    }
    if let Some(home) = home {
        locations.push(home.join(".pypi-refresh").join("pypi-refresh.toml"));
        locations.push(home.join(RC_FILE_NAME));
    }
    locations
}

/// Fully resolved and validated settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the local archives
    pub packages_dir: PathBuf,
    /// Run downloads instead of only logging them
    pub execute: bool,
    /// Root of the JSON metadata API, without trailing slash
    pub index_url: String,
    /// Simple-index URL passed to pip
    pub simple_url: String,
    /// pip program
    pub pip: String,
    /// Maximum concurrent metadata requests
    pub concurrency: usize,
    /// Per-request timeout
    pub timeout: Duration,
    /// Package filters
    pub filter: UpdateFilter,
    /// Emit a JSON report
    pub json: bool,
    /// Verbose output
    pub verbose: bool,
    /// Quiet output
    pub quiet: bool,
}

impl Settings {
    /// Settings for a packages directory with every other value defaulted
    pub fn new(packages_dir: impl Into<PathBuf>) -> Self {
        Self {
            packages_dir: packages_dir.into(),
            execute: false,
            index_url: PYPI_API_URL.to_string(),
            simple_url: PYPI_SIMPLE_URL.to_string(),
            pip: DEFAULT_PIP.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            filter: UpdateFilter::default(),
            json: false,
            verbose: false,
            quiet: false,
        }
    }

    /// Merge command line arguments over an optional config file and validate
    pub fn resolve(args: &CliArgs, file: Option<FileConfig>) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();

        let packages_dir = args
            .packages_dir
            .clone()
            .or(file.packages_dir)
            .ok_or(ConfigError::MissingPackagesDir)?;
        if !packages_dir.exists() {
            return Err(ConfigError::InvalidPath {
                path: packages_dir,
                message: "directory does not exist".to_string(),
            });
        }
        if !packages_dir.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: packages_dir,
                message: "not a directory".to_string(),
            });
        }

        let index_url = args
            .index_url
            .clone()
            .or(file.index_url)
            .unwrap_or_else(|| PYPI_API_URL.to_string());
        let index_url = index_url.trim_end_matches('/').to_string();
        if index_url.is_empty() {
            return Err(ConfigError::invalid_value("index_url", "must not be empty"));
        }

        let simple_url = args
            .simple_url
            .clone()
            .or(file.simple_url)
            .unwrap_or_else(|| PYPI_SIMPLE_URL.to_string());
        if simple_url.trim().is_empty() {
            return Err(ConfigError::invalid_value("simple_url", "must not be empty"));
        }

        let pip = args
            .pip
            .clone()
            .or(file.pip)
            .unwrap_or_else(|| DEFAULT_PIP.to_string());
        if pip.trim().is_empty() {
            return Err(ConfigError::invalid_value("pip", "must not be empty"));
        }

        let concurrency = args
            .concurrency
            .or(file.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(ConfigError::invalid_value("concurrency", "must be at least 1"));
        }

        let timeout = args
            .timeout
            .or(file.timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout == 0 {
            return Err(ConfigError::invalid_value("timeout", "must be at least 1 second"));
        }

        let exclude = if args.exclude.is_empty() {
            file.exclude
        } else {
            args.exclude.clone()
        };
        let only = if args.only.is_empty() {
            file.only
        } else {
            args.only.clone()
        };

        Ok(Self {
            packages_dir,
            execute: args.execute || file.execute,
            index_url,
            simple_url,
            pip,
            concurrency,
            timeout: Duration::from_secs(timeout),
            filter: UpdateFilter::new().with_exclude(exclude).with_only(only),
            json: args.json,
            verbose: args.verbose,
            quiet: args.quiet,
        })
    }

    /// Whether the progress bar should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
