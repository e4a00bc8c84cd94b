//! pypi-refresh - local package archive refresher library
//!
//! This library provides the core functionality for keeping a directory of
//! Python distribution archives current with a package index:
//! - Local inventory of `.whl` and `.tar.gz` files
//! - PEP 440 version ordering
//! - Parallel metadata queries against the PyPI JSON API
//! - Upgrade planning and download execution with cooperative cancellation

pub mod cancel;
pub mod cli;
pub mod config;
pub mod domain;
pub mod downloader;
pub mod error;
pub mod inventory;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod registry;
pub mod update;
