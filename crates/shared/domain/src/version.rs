use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A textual value that does not have the shape of the expected domain type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub input: String,
    pub expected: &'static str,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid {}", self.input, self.expected)
    }
}

impl std::error::Error for ParseError {}

fn parse_number(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Major number of a core release (e.g. `5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReleaseMajor(u32);

impl ReleaseMajor {
    #[must_use]
    pub const fn new(major: u32) -> Self {
        Self(major)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Shifts the major by `delta`, returning `None` when it would leave the `u32` range.
    #[must_use]
    pub fn shifted(self, delta: i64) -> Option<Self> {
        u32::try_from(i64::from(self.0) + delta).ok().map(Self)
    }
}

impl fmt::Display for ReleaseMajor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReleaseMajor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_number(s.trim())
            .map(Self)
            .ok_or_else(|| ParseError { input: s.to_owned(), expected: "release major" })
    }
}

impl TryFrom<String> for ReleaseMajor {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReleaseMajor> for String {
    fn from(value: ReleaseMajor) -> Self {
        value.to_string()
    }
}

/// A major with an optional minor. A missing minor means "the latest minor of that major".
///
/// Ordering is by major, then minor, with the major-only line sorting first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReleaseLine {
    pub major: ReleaseMajor,
    pub minor: Option<u32>,
}

impl ReleaseLine {
    #[must_use]
    pub const fn major_only(major: ReleaseMajor) -> Self {
        Self { major, minor: None }
    }

    #[must_use]
    pub const fn with_minor(major: ReleaseMajor, minor: u32) -> Self {
        Self { major, minor: Some(minor) }
    }

    #[must_use]
    pub const fn is_major_only(&self) -> bool {
        self.minor.is_none()
    }

    /// The same line with the minor dropped.
    #[must_use]
    pub const fn as_major_line(&self) -> Self {
        Self::major_only(self.major)
    }
}

impl fmt::Display for ReleaseLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.minor {
            Some(minor) => write!(f, "{}.{minor}", self.major),
            None => write!(f, "{}", self.major),
        }
    }
}

impl FromStr for ReleaseLine {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError { input: s.to_owned(), expected: "release line" };
        let trimmed = s.trim();
        let (major, minor) = match trimmed.split_once('.') {
            Some((major, minor)) => (major, Some(parse_number(minor).ok_or_else(err)?)),
            None => (trimmed, None),
        };
        let major = parse_number(major).ok_or_else(err)?;
        Ok(Self { major: ReleaseMajor(major), minor })
    }
}

impl TryFrom<String> for ReleaseLine {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReleaseLine> for String {
    fn from(value: ReleaseLine) -> Self {
        value.to_string()
    }
}

/// A `major.minor` language runtime version such as `8.3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuntimeVersion {
    major: u32,
    minor: u32,
}

impl RuntimeVersion {
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    #[must_use]
    pub const fn major(self) -> u32 {
        self.major
    }

    #[must_use]
    pub const fn minor(self) -> u32 {
        self.minor
    }

    /// The version as a `(major, minor, patch)` triple with patch `0`.
    #[must_use]
    pub const fn triple(self) -> (u32, u32, u32) {
        (self.major, self.minor, 0)
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for RuntimeVersion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError { input: s.to_owned(), expected: "runtime version" };
        let (major, minor) = s.trim().split_once('.').ok_or_else(err)?;
        Ok(Self {
            major: parse_number(major).ok_or_else(err)?,
            minor: parse_number(minor).ok_or_else(err)?,
        })
    }
}

impl TryFrom<String> for RuntimeVersion {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RuntimeVersion> for String {
    fn from(value: RuntimeVersion) -> Self {
        value.to_string()
    }
}

/// Non-empty, strictly ascending runtime versions a matrix is built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RuntimeSet(Vec<RuntimeVersion>);

impl RuntimeSet {
    /// Sorts and deduplicates `versions`; `None` when nothing is left.
    #[must_use]
    pub fn new(mut versions: Vec<RuntimeVersion>) -> Option<Self> {
        versions.sort_unstable();
        versions.dedup();
        (!versions.is_empty()).then_some(Self(versions))
    }

    #[must_use]
    pub fn single(version: RuntimeVersion) -> Self {
        Self(vec![version])
    }

    #[must_use]
    pub fn lowest(&self) -> RuntimeVersion {
        self.0[0]
    }

    #[must_use]
    pub fn highest(&self) -> RuntimeVersion {
        self.0[self.0.len() - 1]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[RuntimeVersion] {
        &self.0
    }
}

impl fmt::Display for RuntimeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", joined.join(", "))
    }
}
