use crate::constants::{DEFAULT_ENDTOEND_SUITE, DEFAULT_PHPUNIT_SUITE};
use crate::engine::DbEngine;
use crate::installer::InstallerVersion;
use crate::version::RuntimeVersion;
use serde::{Serialize, Serializer};

/// Everything that identifies a CI job. Two jobs with equal specs are duplicates.
///
/// Serialized with the wire keys CI workflows read; booleans become `"true"`/`"false"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct JobSpec {
    pub installer_version: InstallerVersion,
    #[serde(rename = "php")]
    pub runtime: RuntimeVersion,
    #[serde(rename = "db")]
    pub database: DbEngine,
    pub composer_require_extra: String,
    pub composer_args: String,
    #[serde(serialize_with = "flag")]
    pub composer_install: bool,
    pub name_suffix: String,
    #[serde(serialize_with = "flag")]
    pub phpunit: bool,
    pub phpunit_suite: String,
    #[serde(serialize_with = "flag")]
    pub phplinting: bool,
    #[serde(serialize_with = "flag")]
    pub phpcoverage: bool,
    #[serde(serialize_with = "flag")]
    pub endtoend: bool,
    pub endtoend_suite: String,
    pub endtoend_config: String,
    pub endtoend_tags: String,
    #[serde(serialize_with = "flag")]
    pub js: bool,
    #[serde(serialize_with = "flag")]
    pub doclinting: bool,
    #[serde(serialize_with = "flag")]
    pub needs_full_setup: bool,
}

impl JobSpec {
    /// A job with every suite switched off.
    #[must_use]
    pub fn new(
        installer_version: InstallerVersion,
        runtime: RuntimeVersion,
        database: DbEngine,
    ) -> Self {
        Self {
            needs_full_setup: !installer_version.is_none(),
            installer_version,
            runtime,
            database,
            composer_require_extra: String::new(),
            composer_args: String::new(),
            composer_install: false,
            name_suffix: String::new(),
            phpunit: false,
            phpunit_suite: DEFAULT_PHPUNIT_SUITE.to_owned(),
            phplinting: false,
            phpcoverage: false,
            endtoend: false,
            endtoend_suite: DEFAULT_ENDTOEND_SUITE.to_owned(),
            endtoend_config: String::new(),
            endtoend_tags: String::new(),
            js: false,
            doclinting: false,
        }
    }
}

/// A job spec plus its human readable name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobDescriptor {
    #[serde(flatten)]
    pub spec: JobSpec,
    pub name: String,
}

/// The emitted document: `{"include": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Matrix {
    pub include: Vec<JobDescriptor>,
}

impl Matrix {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.include.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.include.is_empty()
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "true" } else { "false" })
}
