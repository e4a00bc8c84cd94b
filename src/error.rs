//! Application error types using thiserror
//!
//! Error hierarchy:
//! - InventoryError: The local packages directory cannot be read (fatal)
//! - RegistryError: Issues with package index communication (per package)
//! - MetadataError: Unusable release metadata (per package)
//! - ConfigError: Issues with CLI or config file settings

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Local inventory related errors
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Package index related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to scanning the local packages directory
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Directory not found
    #[error("packages directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Path exists but is not a directory
    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Failed to read the directory
    #[error("failed to read packages directory {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to package index communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to reading a package's release metadata
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Payload is not JSON or lacks the expected keys
    #[error("malformed metadata for '{package}': {message}")]
    Malformed {
        package: String,
        message: String,
        raw: String,
    },

    /// No release key parses as a PEP 440 version
    #[error("no PEP 440 compliant release for '{package}'")]
    NoCompliantVersion { package: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse config file
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// No packages directory given on the command line or in a config file
    #[error("--packages-dir is required")]
    MissingPackagesDir,

    /// Invalid path
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },

    /// Invalid setting value
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl InventoryError {
    /// Creates a new DirectoryNotFound error
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        InventoryError::DirectoryNotFound { path: path.into() }
    }

    /// Creates a new NotADirectory error
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        InventoryError::NotADirectory { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InventoryError::ReadError {
            path: path.into(),
            source,
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

impl MetadataError {
    /// Creates a new Malformed error carrying the offending payload
    pub fn malformed(
        package: impl Into<String>,
        message: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        MetadataError::Malformed {
            package: package.into(),
            message: message.into(),
            raw: raw.into(),
        }
    }

    /// Creates a new NoCompliantVersion error
    pub fn no_compliant_version(package: impl Into<String>) -> Self {
        MetadataError::NoCompliantVersion {
            package: package.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new InvalidValue error
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
