//! Archive filename parser
//!
//! Handles filename formats:
//! - Source distribution: `requests-2.31.0.tar.gz`
//! - Wheel: `requests-2.31.0-py3-none-any.whl`
//! - Dashed names: `flask-restful-0.3.10.tar.gz`

use crate::domain::PackageName;
use regex::Regex;
use std::sync::LazyLock;

// Name, dash, then the shortest digit-led version that is followed by a
// separator and a non-digit (the start of `.tar.gz` or `-py3-...`).
static FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)-(\d[.\da-z]*?)[.-]\D").unwrap());

/// Package name and version extracted from an archive filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    /// Normalized package name
    pub name: PackageName,
    /// Version string as written in the filename
    pub version: String,
}

/// Extract the package name and version from an archive filename.
///
/// Returns None when the filename has no digit-led version segment after
/// the name.
pub fn parse_filename(filename: &str) -> Option<ParsedFilename> {
    let caps = FILENAME_RE.captures(filename)?;
    let name = caps.get(1)?.as_str();
    let version = caps.get(2)?.as_str();

    if name.is_empty() {
        return None;
    }

    Some(ParsedFilename {
        name: PackageName::new(name),
        version: version.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(filename: &str) -> Option<(String, String)> {
        parse_filename(filename).map(|p| (p.name.to_string(), p.version))
    }

    fn pair(name: &str, version: &str) -> Option<(String, String)> {
        Some((name.to_string(), version.to_string()))
    }

    #[test]
    fn test_parse_sdist() {
        assert_eq!(parse("requests-2.31.0.tar.gz"), pair("requests", "2.31.0"));
    }

    #[test]
    fn test_parse_wheel() {
        assert_eq!(
            parse("requests-2.31.0-py3-none-any.whl"),
            pair("requests", "2.31.0")
        );
        assert_eq!(
            parse("numpy-1.26.4-cp312-cp312-win_amd64.whl"),
            pair("numpy", "1.26.4")
        );
    }

    #[test]
    fn test_parse_dashed_name_is_normalized() {
        assert_eq!(
            parse("flask-restful-0.3.10.tar.gz"),
            pair("flask_restful", "0.3.10")
        );
        assert_eq!(
            parse("typing_extensions-4.9.0-py3-none-any.whl"),
            pair("typing_extensions", "4.9.0")
        );
    }

    #[test]
    fn test_parse_keeps_case_and_dots() {
        assert_eq!(parse("Django-4.2.tar.gz"), pair("Django", "4.2"));
        assert_eq!(
            parse("zope.interface-6.0-cp311-cp311-manylinux_2_17_x86_64.whl"),
            pair("zope.interface", "6.0")
        );
    }

    #[test]
    fn test_parse_prerelease_version() {
        assert_eq!(parse("pkg-1.0rc1.tar.gz"), pair("pkg", "1.0rc1"));
        // a dot followed by a letter ends the version segment
        assert_eq!(parse("pkg-2.0.dev3.tar.gz"), pair("pkg", "2.0"));
    }

    #[test]
    fn test_parse_first_version_group_wins() {
        assert_eq!(parse("py3dns-3.2.1.tar.gz"), pair("py3dns", "3.2.1"));
        assert_eq!(
            parse("pkg2-10.4-py2.py3-none-any.whl"),
            pair("pkg2", "10.4")
        );
        assert_eq!(
            parse("backports.zoneinfo-0.2.1-cp38-cp38-manylinux1_x86_64.whl"),
            pair("backports.zoneinfo", "0.2.1")
        );
    }

    #[test]
    fn test_parse_no_version() {
        assert_eq!(parse("README.tar.gz"), None);
        assert_eq!(parse("foo-bar.tar.gz"), None);
        assert_eq!(parse("foo-v1.0.tar.gz"), None);
        assert_eq!(parse("pkg-1.0"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_parse_empty_name() {
        assert_eq!(parse("-1.0.tar.gz"), None);
    }
}
