//! Local package inventory
//!
//! Scans the immediate contents of the packages directory for wheels and
//! source distributions and groups their versions by normalized package
//! name. The inventory is built once per run and never modified afterwards.

use crate::domain::PackageName;
use crate::error::InventoryError;
use crate::parser::{parse_filename, ArchiveKind};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Packages and versions already present in the packages directory
#[derive(Debug, Clone, Default)]
pub struct LocalInventory {
    /// Directory the inventory was built from
    dir: PathBuf,
    /// Version strings found for each package
    versions: BTreeMap<PackageName, Vec<String>>,
    /// Every archive filename in the directory, parsed or not
    filenames: BTreeSet<String>,
}

impl LocalInventory {
    /// Scan a packages directory (no recursion)
    pub fn scan(dir: &Path) -> Result<Self, InventoryError> {
        if !dir.exists() {
            return Err(InventoryError::directory_not_found(dir));
        }
        if !dir.is_dir() {
            return Err(InventoryError::not_a_directory(dir));
        }

        let entries = std::fs::read_dir(dir).map_err(|e| InventoryError::read_error(dir, e))?;

        let mut filenames = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => filenames.push(name),
                Err(name) => debug!("skipping non UTF-8 filename {:?}", name),
            }
        }

        let inventory = Self::from_filenames(dir, filenames);
        debug!(
            "found {} archives for {} packages in {}",
            inventory.file_count(),
            inventory.package_count(),
            dir.display()
        );
        Ok(inventory)
    }

    /// Build an inventory from a list of filenames.
    ///
    /// Names that are not wheels or source distributions are ignored;
    /// archives whose name cannot be parsed are remembered as present but
    /// contribute no version.
    pub fn from_filenames<I, S>(dir: impl Into<PathBuf>, filenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut inventory = Self {
            dir: dir.into(),
            ..Self::default()
        };

        for filename in filenames {
            let filename = filename.into();
            if ArchiveKind::from_filename(&filename).is_none() {
                continue;
            }

            match parse_filename(&filename) {
                Some(parsed) => inventory
                    .versions
                    .entry(parsed.name)
                    .or_default()
                    .push(parsed.version),
                None => debug!("no package version in filename {}", filename),
            }

            inventory.filenames.insert(filename);
        }

        inventory
    }

    /// Directory the inventory was built from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Normalized names of all packages found
    pub fn package_names(&self) -> impl Iterator<Item = &PackageName> {
        self.versions.keys()
    }

    /// Version strings found for a package
    pub fn versions(&self, package: &PackageName) -> Option<&[String]> {
        self.versions.get(package).map(Vec::as_slice)
    }

    /// Check whether an archive with this exact filename is present
    pub fn contains_file(&self, filename: &str) -> bool {
        self.filenames.contains(filename)
    }

    /// Number of distinct packages
    pub fn package_count(&self) -> usize {
        self.versions.len()
    }

    /// Number of archive files
    pub fn file_count(&self) -> usize {
        self.filenames.len()
    }

    /// Returns true if no package was found
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
