use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?$").unwrap());

#[derive(Debug, thiserror::Error)]
#[error("`{0}` is not a valid version number")]
pub struct VersionNumberError(String);

/// Simplified semantic version of the form `major.minor[.patch]`.
///
/// A missing patch segment defaults to zero, so `"1.2"` and `"1.2.0"` parse
/// to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionNumber {
    major: u32,
    minor: u32,
    patch: u32,
}

impl VersionNumber {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }
}

impl FromStr for VersionNumber {
    type Err = VersionNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = VERSION_REGEX
            .captures(s)
            .ok_or_else(|| VersionNumberError(s.to_string()))?;

        let segment = |i: usize| {
            captures
                .get(i)
                .map_or(Ok(0), |m| m.as_str().parse::<u32>())
                .map_err(|_| VersionNumberError(s.to_string()))
        };

        Ok(Self {
            major: segment(1)?,
            minor: segment(2)?,
            patch: segment(3)?,
        })
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_patch() {
        let version: VersionNumber = "1.5.7".parse().unwrap();
        assert_eq!(version, VersionNumber::new(1, 5, 7));
    }

    #[test]
    fn parse_without_patch() {
        let version: VersionNumber = "1.2".parse().unwrap();
        assert_eq!(version, VersionNumber::new(1, 2, 0));
    }

    #[test]
    fn parse_invalid() {
        assert!("1".parse::<VersionNumber>().is_err());
        assert!("1.2.3.4".parse::<VersionNumber>().is_err());
        assert!("a.b.c".parse::<VersionNumber>().is_err());
        assert!("".parse::<VersionNumber>().is_err());
    }

    #[test]
    fn ordering() {
        let min: VersionNumber = "1.5.0".parse().unwrap();
        assert!("1.5.1".parse::<VersionNumber>().unwrap() > min);
        assert!("1.10.0".parse::<VersionNumber>().unwrap() > min);
        assert!("1.4.9".parse::<VersionNumber>().unwrap() < min);
        assert_eq!("1.5".parse::<VersionNumber>().unwrap(), min);
    }

    #[test]
    fn display() {
        assert_eq!("1.2".parse::<VersionNumber>().unwrap().to_string(), "1.2.0");
        assert_eq!(VersionNumber::new(2, 0, 1).to_string(), "2.0.1");
    }
}
