//! # Installer version resolution
//!
//! Decides which development branch of the core installer a package is built against.
//! Rules are tried in order and the first one that produces an answer wins:
//!
//! | # | rule | result |
//! |---|---|---|
//! | 1 | repository never depends on the installer | empty |
//! | 2 | ref is a pinned pre-release tag | the tag's installer |
//! | 3 | lockstepped repository, version-shaped branch | branch mapped onto the core line |
//! | 4 | other known repository, version-shaped branch | mapped major, if a known branch |
//! | 5 | manifest requires a core package | its `.x-dev` value, or its constraint's major |
//! | 6 | version-shaped parent branch | as 3 / 4 for the parent |
//! | 7 | known repository | current minor of the lowest supported major |
//! | - | anything else | empty |
//!
//! Resolution never fails: every ambiguity has a documented fallback.

use mgen_branch::{classify, clean_ref};
use mgen_domain::catalog::Catalog;
use mgen_domain::installer::{InstallerVersion, KnownBranches};
use mgen_domain::manifest::DependencyManifest;
use mgen_domain::version::{ReleaseLine, ReleaseMajor};
use strum_macros::{Display, IntoStaticStr};
use tracing::{debug, instrument, trace};

/// Which rule of the decision table produced a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum InstallerRule {
    NeverInstaller,
    PinnedTag,
    Lockstepped,
    MappedBranch,
    DependencyDevBranch,
    DependencyConstraint,
    ParentBranch,
    CurrentMinorFallback,
    Standalone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub version: InstallerVersion,
    pub rule: InstallerRule,
}

impl Resolution {
    const fn new(version: InstallerVersion, rule: InstallerRule) -> Self {
        Self { version, rule }
    }
}

/// Everything known about the package under test.
#[derive(Debug, Clone, Copy)]
pub struct InstallerQuery<'q> {
    /// `owner/name` or a bare repository name.
    pub repository: &'q str,
    pub reference: &'q str,
    pub parent_branch: Option<&'q str>,
    pub manifest: &'q DependencyManifest,
}

#[derive(Debug, Clone, Copy)]
pub struct InstallerVersionResolver<'a> {
    catalog: &'a Catalog,
    known_branches: &'a KnownBranches,
}

impl<'a> InstallerVersionResolver<'a> {
    /// `known_branches` grounds inferred branches; an empty set accepts anything.
    #[must_use]
    pub const fn new(catalog: &'a Catalog, known_branches: &'a KnownBranches) -> Self {
        Self { catalog, known_branches }
    }

    #[must_use]
    #[instrument(
        level = "debug",
        skip_all,
        fields(repository = query.repository, reference = query.reference)
    )]
    pub fn resolve(&self, query: &InstallerQuery<'_>) -> Resolution {
        let name = query.repository.rsplit('/').next().unwrap_or_default();
        let reference = clean_ref(query.reference);
        let resolution = self.decide(name, reference, query);
        debug!(
            rule = %resolution.rule,
            installer = %resolution.version,
            "Installer version resolved"
        );
        resolution
    }

    fn decide(&self, name: &str, reference: &str, query: &InstallerQuery<'_>) -> Resolution {
        if self.catalog.is_never_installer(name) {
            return Resolution::new(InstallerVersion::None, InstallerRule::NeverInstaller);
        }
        if let Some(tag) = self.catalog.pinned_installer(reference) {
            return Resolution::new(InstallerVersion::Tag(tag.to_owned()), InstallerRule::PinnedTag);
        }

        let branch = classify(reference);
        if let Some(resolution) = branch.and_then(|line| self.from_branch(name, line)) {
            return resolution;
        }

        let repository = self.catalog.repository(name);
        let ecosystem_package = query
            .manifest
            .package_type
            .as_deref()
            .is_some_and(|package_type| self.catalog.is_ecosystem_type(package_type));
        if (repository.is_some() || ecosystem_package)
            && let Some(resolution) = self.from_dependencies(query.manifest, branch)
        {
            return resolution;
        }

        if let Some(resolution) =
            query.parent_branch.and_then(classify).and_then(|line| self.from_branch(name, line))
        {
            return Resolution::new(resolution.version, InstallerRule::ParentBranch);
        }

        if repository.is_some() {
            return Resolution::new(self.unresolved_fallback(), InstallerRule::CurrentMinorFallback);
        }
        Resolution::new(InstallerVersion::None, InstallerRule::Standalone)
    }

    /// Rules 3 and 4: a version-shaped branch of a repository the catalog knows.
    fn from_branch(&self, name: &str, line: ReleaseLine) -> Option<Resolution> {
        let repository = self.catalog.repository(name)?;
        let core =
            repository.core_line(line).filter(|core| self.catalog.is_known_major(core.major));
        trace!(branch = %line, core = ?core, "Mapped branch onto core line");
        let core = core?;

        if self.catalog.is_lockstepped(name) {
            let version = InstallerVersion::DevBranch(core);
            return Some(Resolution::new(version, InstallerRule::Lockstepped));
        }
        Some(Resolution::new(
            self.dev_branch_for_major(core.major, core.is_major_only()),
            InstallerRule::MappedBranch,
        ))
    }

    /// Rule 5: scans the manifest for core packages in catalog order.
    fn from_dependencies(
        &self,
        manifest: &DependencyManifest,
        branch: Option<ReleaseLine>,
    ) -> Option<Resolution> {
        for dependency in &self.catalog.core_dependencies {
            if self.catalog.is_ignored_dependency(&dependency.package) {
                continue;
            }
            let Some(constraint) = manifest.requirement(&dependency.package).map(str::trim) else {
                continue;
            };

            if let dev @ InstallerVersion::DevBranch(_) = InstallerVersion::parse(constraint) {
                return Some(Resolution::new(dev, InstallerRule::DependencyDevBranch));
            }

            let Some(major) = first_major(constraint)
                .and_then(|declared| dependency.core_major(declared))
                .filter(|major| self.catalog.is_known_major(*major))
            else {
                trace!(
                    package = dependency.package,
                    constraint,
                    "No known core major in constraint"
                );
                continue;
            };

            let prefer_major_only = branch.is_some_and(|line| line.is_major_only());
            return Some(Resolution::new(
                self.dev_branch_for_major(major, prefer_major_only),
                InstallerRule::DependencyConstraint,
            ));
        }
        None
    }

    /// `<major>.x-dev` or the major's current minor, whichever is preferred and exists.
    fn dev_branch_for_major(
        &self,
        major: ReleaseMajor,
        prefer_major_only: bool,
    ) -> InstallerVersion {
        let major_line = Some(ReleaseLine::major_only(major));
        let current_minor = self.catalog.current_minor(major);
        let candidates = if prefer_major_only {
            [major_line, current_minor]
        } else {
            [current_minor, major_line]
        };

        candidates
            .into_iter()
            .flatten()
            .find(|line| self.known_branches.allows(line))
            .map_or_else(
                || {
                    debug!(%major, "No matching installer branch exists, using fallback");
                    self.unresolved_fallback()
                },
                InstallerVersion::DevBranch,
            )
    }

    /// Current minor of the lowest supported major.
    fn unresolved_fallback(&self) -> InstallerVersion {
        let lowest = self.catalog.lowest_supported_major;
        InstallerVersion::DevBranch(
            self.catalog.current_minor(lowest).unwrap_or_else(|| ReleaseLine::major_only(lowest)),
        )
    }
}

/// First run of digits in a constraint (`^2.1` → `2`, `>=5.0 <6` → `5`).
fn first_major(constraint: &str) -> Option<ReleaseMajor> {
    let start = constraint.find(|c: char| c.is_ascii_digit())?;
    let digits = &constraint[start..];
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::first_major;
    use mgen_domain::version::ReleaseMajor;

    #[test]
    fn first_major_reads_leading_number() {
        assert_eq!(first_major("^2.1"), Some(ReleaseMajor::new(2)));
        assert_eq!(first_major(">=5.0 <6"), Some(ReleaseMajor::new(5)));
        assert_eq!(first_major("dev-main"), None);
    }
}
