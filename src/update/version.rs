//! PEP 440 version ordering
//!
//! This module provides the Pep440Version type, which parses the public
//! version scheme used by the Python package index and orders versions by
//! epoch, release segments, pre-release, post-release, dev-release and
//! local label. Strings that do not parse are "non-compliant" and never
//! take part in an ordering.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static PEP440_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)
        ^\s*v?
        (?:(?P<epoch>[0-9]+)!)?
        (?P<release>[0-9]+(?:\.[0-9]+)*)
        (?:[-_.]?(?P<pre_l>alpha|a|beta|b|preview|pre|c|rc)[-_.]?(?P<pre_n>[0-9]+)?)?
        (?:
            -(?P<post_n1>[0-9]+)
            |
            [-_.]?(?P<post_l>post|rev|r)[-_.]?(?P<post_n2>[0-9]+)?
        )?
        (?:[-_.]?(?P<dev_l>dev)[-_.]?(?P<dev_n>[0-9]+)?)?
        (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
        \s*$",
    )
    .unwrap()
});

/// Pre-release phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrePhase {
    Alpha,
    Beta,
    ReleaseCandidate,
}

impl PrePhase {
    fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "a" | "alpha" => PrePhase::Alpha,
            "b" | "beta" => PrePhase::Beta,
            _ => PrePhase::ReleaseCandidate,
        }
    }
}

/// An unbounded non-negative integer kept as its digits.
///
/// Leading zeros are stripped, so zero is the empty string. Shorter digit
/// strings are smaller; equal lengths compare lexically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Number(String);

impl Number {
    fn new(digits: &str) -> Self {
        Number(digits.trim_start_matches('0').to_string())
    }

    fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One dot-separated piece of a local version label.
///
/// Numeric pieces always sort above alphanumeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum LocalSegment {
    Alpha(String),
    Numeric(Number),
}

// Sort position of the pre-release slot. A bare dev release sorts below
// every pre-release of the same release.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum PreKey {
    DevOnly,
    Pre(PrePhase, Number),
    Final,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum DevKey {
    Dev(Number),
    Release,
}

/// A version string that parses under PEP 440
#[derive(Debug, Clone)]
pub struct Pep440Version {
    raw: String,
    epoch: Number,
    release: Vec<Number>,
    pre: Option<(PrePhase, Number)>,
    post: Option<Number>,
    dev: Option<Number>,
    local: Option<Vec<LocalSegment>>,
}

impl Pep440Version {
    /// Parse a version string, returning None when it is not compliant
    pub fn parse(version: &str) -> Option<Self> {
        let caps = PEP440_RE.captures(version)?;

        let number = |name: &str| caps.name(name).map(|m| Number::new(m.as_str()));

        let epoch = number("epoch").unwrap_or_default();

        let release = caps
            .name("release")?
            .as_str()
            .split('.')
            .map(Number::new)
            .collect();

        let pre = caps.name("pre_l").map(|label| {
            (
                PrePhase::from_label(label.as_str()),
                number("pre_n").unwrap_or_default(),
            )
        });

        let post = if caps.name("post_n1").is_some() {
            number("post_n1")
        } else if caps.name("post_l").is_some() {
            Some(number("post_n2").unwrap_or_default())
        } else {
            None
        };

        let dev = caps
            .name("dev_l")
            .map(|_| number("dev_n").unwrap_or_default());

        let local = caps.name("local").map(|m| {
            m.as_str()
                .split(['.', '-', '_'])
                .map(|piece| {
                    if piece.bytes().all(|b| b.is_ascii_digit()) {
                        LocalSegment::Numeric(Number::new(piece))
                    } else {
                        LocalSegment::Alpha(piece.to_ascii_lowercase())
                    }
                })
                .collect()
        });

        Some(Self {
            raw: version.trim().to_string(),
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    /// The version string exactly as it was found
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true for alpha, beta, release-candidate and dev releases
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    /// Release segments with trailing zeros removed, so `1.0` equals `1.0.0`
    fn significant_release(&self) -> &[Number] {
        let len = self
            .release
            .iter()
            .rposition(|n| !n.is_zero())
            .map_or(0, |idx| idx + 1);
        &self.release[..len]
    }

    fn pre_key(&self) -> PreKey {
        match (&self.pre, &self.post, &self.dev) {
            (None, None, Some(_)) => PreKey::DevOnly,
            (Some((phase, n)), _, _) => PreKey::Pre(*phase, n.clone()),
            _ => PreKey::Final,
        }
    }

    fn dev_key(&self) -> DevKey {
        self.dev.clone().map_or(DevKey::Release, DevKey::Dev)
    }
}

impl Ord for Pep440Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.significant_release().cmp(other.significant_release()))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
            .then_with(|| self.local.cmp(&other.local))
    }
}

impl PartialOrd for Pep440Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Pep440Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pep440Version {}

impl fmt::Display for Pep440Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Pep440Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Check whether a version string is PEP 440 compliant
pub fn is_compliant(version: &str) -> bool {
    Pep440Version::parse(version).is_some()
}

/// Parse every compliant version, dropping the rest with a debug log
pub fn compliant_versions<'a, I>(versions: I) -> Vec<Pep440Version>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .filter_map(|raw| {
            let parsed = Pep440Version::parse(raw);
            if parsed.is_none() {
                debug!("ignoring non-compliant version '{}'", raw);
            }
            parsed
        })
        .collect()
}

/// Find the greatest compliant version.
///
/// Returns None when no version is compliant; callers treat that as
/// "no usable version" for the package.
pub fn max_compliant<'a, I>(versions: I) -> Option<Pep440Version>
where
    I: IntoIterator<Item = &'a str>,
{
    compliant_versions(versions).into_iter().max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Pep440Version {
        Pep440Version::parse(s).unwrap()
    }

    #[test]
    fn test_compliant_versions() {
        for s in [
            "1", "1.0", "1.2.3", "2!1.0", "1.0a1", "1.0b2", "1.0rc1", "1.0c1", "1.0.post1",
            "1.0-1", "1.0.dev3", "1.0a1.post2.dev3", "1.0+local.7", "v1.0", "1.0RC1",
            "1.0-alpha-1", "1.0.preview2",
        ] {
            assert!(is_compliant(s), "{} should be compliant", s);
        }
    }

    #[test]
    fn test_non_compliant_versions() {
        for s in ["", "latest", "1.0-foo", "1..0", "1.0.x", "abc1.0", "1.0+", "1.0 beta"] {
            assert!(!is_compliant(s), "{} should not be compliant", s);
        }
    }

    #[test]
    fn test_version_comparison_release() {
        assert!(v("1.0") < v("1.1"));
        assert!(v("1.9") < v("1.10"));
        assert!(v("10.0") > v("9.9.9"));
        assert!(v("1.2") < v("1.2.1"));
    }

    #[test]
    fn test_trailing_zeros_are_equal() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1"), v("1.0.0.0"));
        assert_eq!(v("1.0").cmp(&v("1.0.0")), Ordering::Equal);
    }

    #[test]
    fn test_epoch_wins() {
        assert!(v("1!0.1") > v("2024.1"));
    }

    #[test]
    fn test_prerelease_ordering() {
        let ordered = [
            "1.0.dev1", "1.0a1.dev1", "1.0a1", "1.0a2", "1.0b1", "1.0rc1", "1.0", "1.0+abc",
            "1.0+5", "1.0.post1.dev1", "1.0.post1", "1.0.post2", "1.1.dev1",
        ];
        for pair in ordered.windows(2) {
            assert!(v(pair[0]) < v(pair[1]), "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_spelling_variants_are_equal() {
        assert_eq!(v("1.0alpha1"), v("1.0a1"));
        assert_eq!(v("1.0c1"), v("1.0rc1"));
        assert_eq!(v("1.0-1"), v("1.0.post1"));
        assert_eq!(v("1.0a"), v("1.0a0"));
    }

    #[test]
    fn test_strict_total_order() {
        let versions: Vec<Pep440Version> = [
            "0.9", "1.0.dev0", "1.0a1", "1.0b1", "1.0rc1", "1.0", "1.0.post1", "1.0+x", "1.1",
            "2.0", "1!0.1",
        ]
        .iter()
        .map(|s| v(s))
        .collect();

        for a in &versions {
            assert!(!(a < a), "irreflexive: {}", a);
            for b in &versions {
                if a < b {
                    assert!(!(b < a), "antisymmetric: {} {}", a, b);
                }
                assert!(a < b || b < a || a == b, "total: {} {}", a, b);
                for c in &versions {
                    if a < b && b < c {
                        assert!(a < c, "transitive: {} {} {}", a, b, c);
                    }
                }
            }
        }
    }

    #[test]
    fn test_long_numbers_are_compliant() {
        assert!(is_compliant("1.0.20230314123456789012"));
        assert!(is_compliant("0.1.dev99999999999999999999"));
        assert!(is_compliant("99999999999999999999999!1.0"));
        assert!(is_compliant("1.0+build.123456789012345678901234"));
    }

    #[test]
    fn test_long_numbers_order_by_value() {
        assert!(v("1.0.20230314123456789012") > v("1.0.20230314"));
        assert!(v("1.0.20230314123456789012") < v("1.0.20230314123456789013"));
        assert!(v("1.0.20230314123456789012") < v("1.1"));
        assert!(v("0.1.dev99999999999999999999") > v("0.1.dev9"));
        assert!(v("0.1.dev99999999999999999999") < v("0.1a1"));
        assert!(v("1.0+123456789012345678901234") > v("1.0+99"));
    }

    #[test]
    fn test_leading_zeros_are_ignored() {
        assert_eq!(v("01.002"), v("1.2"));
        assert_eq!(v("1.0.00000000000000000000000"), v("1.0"));
        assert!(v("1.009") > v("1.8"));
    }

    #[test]
    fn test_is_prerelease() {
        assert!(v("1.0a1").is_prerelease());
        assert!(v("1.0.dev1").is_prerelease());
        assert!(!v("1.0").is_prerelease());
        assert!(!v("1.0.post1").is_prerelease());
    }

    #[test]
    fn test_display_keeps_raw_string() {
        assert_eq!(v("1.0RC1").to_string(), "1.0RC1");
        assert_eq!(v("v2.0").as_str(), "v2.0");
    }

    #[test]
    fn test_max_compliant_skips_garbage() {
        let max = max_compliant(["1.0", "not-a-version", "2.0rc1", "1.9"]).unwrap();
        assert_eq!(max.as_str(), "2.0rc1");
    }

    #[test]
    fn test_max_compliant_empty() {
        assert!(max_compliant(Vec::<&str>::new()).is_none());
        assert!(max_compliant(["junk", "latest"]).is_none());
    }

    #[test]
    fn test_serialize_as_string() {
        assert_eq!(serde_json::to_string(&v("1.2.3")).unwrap(), "\"1.2.3\"");
    }
}
