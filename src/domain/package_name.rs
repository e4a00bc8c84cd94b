//! Normalized package name

use serde::Serialize;
use std::fmt;

/// A package name in canonical form.
///
/// Every `-` is replaced with `_`; case and all other characters are kept.
/// `Flask-RESTful` and `Flask_RESTful` therefore denote the same package.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    /// Create a package name, normalizing the raw spelling
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(Self::normalize(raw.as_ref()))
    }

    /// Normalize a raw package name
    pub fn normalize(raw: &str) -> String {
        raw.replace('-', "_")
    }

    /// Get the normalized name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for PackageName {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
