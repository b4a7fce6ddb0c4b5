//! Static reference data consulted by every resolver.
//!
//! The catalog is plain data: adding a newly discovered exception package or a new
//! release line is a catalog edit, never a code change.

use crate::engine::DbEngine;
use crate::version::{ReleaseLine, ReleaseMajor, RuntimeVersion};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub lowest_supported_major: ReleaseMajor,
    pub highest_stable_major: ReleaseMajor,
    /// A pre-release major that already has branches but no stable release.
    #[serde(default)]
    pub next_major: Option<ReleaseMajor>,
    pub releases: Vec<ReleaseRuntimes>,
    pub engine_policies: Vec<EnginePolicy>,
    #[serde(default)]
    pub repositories: Vec<RepositoryMeta>,
    #[serde(default)]
    pub core_dependencies: Vec<CoreDependency>,
    #[serde(default)]
    pub exceptions: Exceptions,
    #[serde(default)]
    pub ecosystem_package_types: Vec<String>,
    #[serde(default)]
    pub pinned_tags: Vec<PinnedTag>,
}

/// Runtime versions supported by one release line, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRuntimes {
    pub line: ReleaseLine,
    pub runtimes: Vec<RuntimeVersion>,
}

/// Database engines tested for one major.
///
/// `engines` is ordered oldest first; each entry becomes one row of the unit-test table.
/// `default_engine` is used for every job that runs once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnginePolicy {
    pub major: ReleaseMajor,
    pub default_engine: DbEngine,
    pub engines: Vec<DbEngine>,
}

/// Versioning metadata for a repository of the ecosystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryMeta {
    /// Bare repository name (`silverstripe-admin`).
    pub name: String,
    /// Branches move in lockstep with the core release lines.
    pub lockstepped: bool,
    /// Repository major minus core major (`silverstripe-admin` 2 is core 5, so `-3`).
    pub major_offset: i64,
    /// Explicit per-major mapping, consulted before `major_offset`.
    pub majors: Vec<MajorOverride>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorOverride {
    pub branch: ReleaseMajor,
    pub core: ReleaseMajor,
}

/// A package whose constraint reveals which core major a module targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreDependency {
    /// Composer package name (`silverstripe/framework`).
    pub package: String,
    #[serde(default)]
    pub major_offset: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exceptions {
    /// Repositories that are never installed into the core installer.
    pub never_installer: Vec<String>,
    /// Repositories treated as independently versioned regardless of `lockstepped`.
    pub force_independent: Vec<String>,
    /// Dependencies ignored when scanning a manifest for the core major.
    pub ignored_dependencies: Vec<String>,
}

/// A pre-release tag ref that must be installed against a specific installer tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedTag {
    pub tag: String,
    pub installer: String,
}

impl RepositoryMeta {
    /// Maps a branch line of this repository onto the core release line.
    #[must_use]
    pub fn core_line(&self, line: ReleaseLine) -> Option<ReleaseLine> {
        let major = self
            .majors
            .iter()
            .find(|o| o.branch == line.major)
            .map(|o| o.core)
            .or_else(|| line.major.shifted(-self.major_offset))?;
        Some(ReleaseLine { major, minor: line.minor })
    }
}

impl CoreDependency {
    #[must_use]
    pub fn core_major(&self, declared: ReleaseMajor) -> Option<ReleaseMajor> {
        declared.shifted(-self.major_offset)
    }
}

impl Catalog {
    /// Every major the catalog knows about, ascending, including the pre-release one.
    pub fn known_majors(&self) -> impl Iterator<Item = ReleaseMajor> + '_ {
        (self.lowest_supported_major.get()..=self.highest_stable_major.get())
            .map(ReleaseMajor::new)
            .chain(self.next_major.filter(|next| *next > self.highest_stable_major))
    }

    #[must_use]
    pub fn is_known_major(&self, major: ReleaseMajor) -> bool {
        self.known_majors().any(|known| known == major)
    }

    /// Runtime versions for exactly this line.
    #[must_use]
    pub fn runtimes_for(&self, line: &ReleaseLine) -> Option<&[RuntimeVersion]> {
        self.releases.iter().find(|r| r.line == *line).map(|r| r.runtimes.as_slice())
    }

    /// Highest `major.minor` line the catalog lists for `major`.
    #[must_use]
    pub fn current_minor(&self, major: ReleaseMajor) -> Option<ReleaseLine> {
        self.releases
            .iter()
            .map(|r| r.line)
            .filter(|line| line.major == major && line.minor.is_some())
            .max()
    }

    #[must_use]
    pub fn engine_policy(&self, major: ReleaseMajor) -> Option<&EnginePolicy> {
        self.engine_policies.iter().find(|p| p.major == major)
    }

    #[must_use]
    pub fn repository(&self, name: &str) -> Option<&RepositoryMeta> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// Whether branches of `name` follow the core release lines.
    #[must_use]
    pub fn is_lockstepped(&self, name: &str) -> bool {
        !self.exceptions.force_independent.iter().any(|n| n == name)
            && self.repository(name).is_some_and(|r| r.lockstepped)
    }

    #[must_use]
    pub fn is_never_installer(&self, name: &str) -> bool {
        self.exceptions.never_installer.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn is_ignored_dependency(&self, package: &str) -> bool {
        self.exceptions.ignored_dependencies.iter().any(|p| p == package)
    }

    #[must_use]
    pub fn is_ecosystem_type(&self, package_type: &str) -> bool {
        self.ecosystem_package_types.iter().any(|t| t == package_type)
    }

    #[must_use]
    pub fn pinned_installer(&self, tag: &str) -> Option<&str> {
        self.pinned_tags.iter().find(|p| p.tag == tag).map(|p| p.installer.as_str())
    }
}
