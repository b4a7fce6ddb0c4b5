use crate::constants::DEV_SUFFIX;
use crate::version::{ReleaseLine, ReleaseMajor};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Core development branch (or tag) a package is installed against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum InstallerVersion {
    /// The package is tested standalone.
    #[default]
    None,
    /// `<major>.x-dev` or `<major>.<minor>.x-dev`.
    DevBranch(ReleaseLine),
    /// A pinned tag such as `5.0.0-beta1`, or any other literal value.
    Tag(String),
}

impl InstallerVersion {
    /// Reads an installer version back from its textual form. Never fails: values that are
    /// not a dev branch are kept verbatim as a tag.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::None;
        }
        raw.strip_suffix(DEV_SUFFIX)
            .and_then(|line| line.parse::<ReleaseLine>().ok())
            .map_or_else(|| Self::Tag(raw.to_owned()), Self::DevBranch)
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The release line this installer version belongs to, if it has one.
    ///
    /// Tags resolve to their `major.minor` prefix (`5.0.0-beta1` → `5.0`).
    #[must_use]
    pub fn release_line(&self) -> Option<ReleaseLine> {
        match self {
            Self::None => None,
            Self::DevBranch(line) => Some(*line),
            Self::Tag(tag) => {
                let mut parts = tag.split(['.', '-']);
                let major = parts.next()?.parse::<ReleaseMajor>().ok()?;
                let minor = parts.next().and_then(|minor| minor.parse::<u32>().ok());
                Some(ReleaseLine { major, minor })
            }
        }
    }
}

impl fmt::Display for InstallerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::DevBranch(line) => write!(f, "{line}{DEV_SUFFIX}"),
            Self::Tag(tag) => f.write_str(tag),
        }
    }
}

impl Serialize for InstallerVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// The development branches that actually exist upstream for the core installer.
///
/// An empty set means "unknown": every inferred branch is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownBranches(BTreeSet<ReleaseLine>);

impl KnownBranches {
    #[must_use]
    pub fn new(lines: impl IntoIterator<Item = ReleaseLine>) -> Self {
        Self(lines.into_iter().collect())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the branch exists, or when nothing is known about existing branches.
    #[must_use]
    pub fn allows(&self, line: &ReleaseLine) -> bool {
        self.0.is_empty() || self.0.contains(line)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReleaseLine> {
        self.0.iter()
    }
}

impl FromIterator<ReleaseLine> for KnownBranches {
    fn from_iter<T: IntoIterator<Item = ReleaseLine>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_branches_round_trip_through_text() {
        for raw in ["5.x-dev", "5.4.x-dev", "6.0.x-dev"] {
            let parsed = InstallerVersion::parse(raw);
            assert!(matches!(parsed, InstallerVersion::DevBranch(_)), "{raw}");
            assert_eq!(parsed.to_string(), raw);
        }
    }

    #[test]
    fn other_values_are_tags_or_empty() {
        assert_eq!(InstallerVersion::parse(""), InstallerVersion::None);
        assert_eq!(
            InstallerVersion::parse("5.0.0-beta1"),
            InstallerVersion::Tag("5.0.0-beta1".to_owned())
        );
        assert_eq!(
            InstallerVersion::parse("5.0.0-beta1").release_line(),
            Some(ReleaseLine::with_minor(ReleaseMajor::new(5), 0))
        );
    }

    #[test]
    fn empty_known_branches_allow_everything() {
        let line = ReleaseLine::with_minor(ReleaseMajor::new(5), 4);
        assert!(KnownBranches::default().allows(&line));
        let known = KnownBranches::new([ReleaseLine::major_only(ReleaseMajor::new(5))]);
        assert!(!known.allows(&line));
    }
}
