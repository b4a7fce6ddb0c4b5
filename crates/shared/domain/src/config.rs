use crate::engine::DbEngine;
use crate::suites::SuiteSet;
use crate::version::RuntimeVersion;
use serde::Deserialize;

/// A validated matrix request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixConfig {
    /// `owner/name` identity of the repository under test.
    pub github_repository: String,
    /// Cleaned branch, tag or pull-request ref being tested.
    pub github_my_ref: String,
    /// Branch a pull request targets; used when `github_my_ref` is not version-shaped.
    pub parent_branch: Option<String>,
    pub suites: SuiteSet,
    pub phpcoverage_force_off: bool,
    /// Run unit tests on the first table row only.
    pub simple_matrix: bool,
    /// Run unit tests once against the manifest's pinned runtime.
    pub composer_install: bool,
    /// `Some(false)` disables generation entirely; absent means enabled.
    pub dynamic_matrix: Option<bool>,
    /// Overrides the installer-derived `needs_full_setup` value.
    pub needs_full_setup: Option<bool>,
    pub endtoend_suite: Option<String>,
    pub endtoend_config: Option<String>,
    pub extra_jobs: Vec<ExtraJob>,
}

impl MatrixConfig {
    #[must_use]
    pub fn new(repository: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            github_repository: repository.into(),
            github_my_ref: reference.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_suites(mut self, suites: SuiteSet) -> Self {
        self.suites = suites;
        self
    }

    /// Bare repository name: the segment after the last `/`.
    #[must_use]
    pub fn repository_name(&self) -> &str {
        self.github_repository.rsplit('/').next().unwrap_or_default()
    }

    #[must_use]
    pub fn dynamic_matrix_enabled(&self) -> bool {
        self.dynamic_matrix.unwrap_or(true)
    }

    #[must_use]
    pub const fn runs(&self, suite: SuiteSet) -> bool {
        self.suites.contains(suite)
    }

    #[must_use]
    pub const fn coverage_enabled(&self) -> bool {
        self.runs(SuiteSet::PHPCOVERAGE) && !self.phpcoverage_force_off
    }
}

/// A caller-supplied job. Missing fields are filled from the generated matrix defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtraJob {
    pub installer_version: Option<String>,
    pub php: Option<RuntimeVersion>,
    pub db: Option<DbEngine>,
    pub composer_require_extra: Option<String>,
    pub composer_args: Option<String>,
    pub composer_install: Option<bool>,
    pub name_suffix: Option<String>,
    pub phpunit: Option<bool>,
    pub phpunit_suite: Option<String>,
    pub phplinting: Option<bool>,
    pub phpcoverage: Option<bool>,
    pub endtoend: Option<bool>,
    pub endtoend_suite: Option<String>,
    pub endtoend_config: Option<String>,
    pub endtoend_tags: Option<String>,
    pub js: Option<bool>,
    pub doclinting: Option<bool>,
    pub needs_full_setup: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_name_strips_owner() {
        let config = MatrixConfig::new("silverstripe/silverstripe-admin", "2.1");
        assert_eq!(config.repository_name(), "silverstripe-admin");
        assert_eq!(MatrixConfig::new("bare", "5").repository_name(), "bare");
    }

    #[test]
    fn dynamic_matrix_defaults_to_enabled() {
        let mut config = MatrixConfig::new("a/b", "5");
        assert!(config.dynamic_matrix_enabled());
        config.dynamic_matrix = Some(false);
        assert!(!config.dynamic_matrix_enabled());
    }

    #[test]
    fn coverage_can_be_forced_off() {
        let mut config = MatrixConfig::new("a/b", "5").with_suites(SuiteSet::PHPCOVERAGE);
        assert!(config.coverage_enabled());
        config.phpcoverage_force_off = true;
        assert!(!config.coverage_enabled());
    }
}
