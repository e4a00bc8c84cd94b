//! Parsers for local package archives
//!
//! This module provides:
//! - Archive kind detection (wheel or source distribution)
//! - Filename parsing into normalized package name and version

mod filename;

pub use filename::{parse_filename, ParsedFilename};

/// Kind of package archive kept in the packages directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Built distribution (`.whl`)
    Wheel,
    /// Source distribution (`.tar.gz`)
    Sdist,
}

impl ArchiveKind {
    /// Get all archive kinds
    pub fn all() -> &'static [ArchiveKind] {
        &[ArchiveKind::Wheel, ArchiveKind::Sdist]
    }

    /// Get the filename suffix for this archive kind
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveKind::Wheel => ".whl",
            ArchiveKind::Sdist => ".tar.gz",
        }
    }

    /// Detect the archive kind from a filename
    pub fn from_filename(filename: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| filename.ends_with(kind.extension()))
    }
}
