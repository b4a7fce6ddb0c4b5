//! Parsing of the YAML inputs document into a [`MatrixConfig`].

use crate::error::{KernelError, KernelErrorExt};
use config::{Config, File, FileFormat, Value, ValueKind};
use mgen_domain::config::{ExtraJob, MatrixConfig};
use mgen_domain::suites::SuiteSet;
use serde::Deserialize;

/// Keys whose values look numeric (`1.10`, `5`) but must stay textual.
const STRING_KEYS: [&str; 3] = ["github_repository", "github_my_ref", "parent_branch"];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InputsDocument {
    github_repository: Option<String>,
    github_my_ref: Option<String>,
    parent_branch: Option<String>,
    phpunit: bool,
    phpcoverage: bool,
    phpcoverage_force_off: bool,
    phplinting: bool,
    endtoend: bool,
    doclinting: bool,
    js: bool,
    simple_matrix: bool,
    composer_install: bool,
    dynamic_matrix: Option<bool>,
    needs_full_setup: Option<bool>,
    endtoend_suite: Option<String>,
    endtoend_config: Option<String>,
    extra_jobs: Vec<ExtraJob>,
}

/// Parses the inputs document.
///
/// # Errors
/// * [`KernelError::InvalidInputs`] when the YAML is malformed or a required key is missing.
/// * [`KernelError::UnquotedScalar`] when a ref or repository was not written as a string
///   (an unquoted `1.10` would otherwise silently become `1.1`).
/// * [`KernelError::Config`] when a value has the wrong type.
pub fn parse_inputs(yaml: &str) -> Result<MatrixConfig, KernelError> {
    let document = Config::builder()
        .add_source(File::from_str(yaml, FileFormat::Yaml))
        .build()
        .map_err(|e| KernelError::InvalidInputs { message: e.to_string().into(), context: None })?;

    for key in STRING_KEYS {
        ensure_string(&document, key)?;
    }

    let raw: InputsDocument = document.try_deserialize().context("Decoding inputs")?;
    raw.into_config()
}

fn ensure_string(document: &Config, key: &'static str) -> Result<(), KernelError> {
    match document.get::<Value>(key) {
        Ok(value) => match value.kind {
            ValueKind::String(_) | ValueKind::Nil => Ok(()),
            _ => Err(KernelError::UnquotedScalar { field: key, context: None }),
        },
        Err(config::ConfigError::NotFound(_)) => Ok(()),
        Err(source) => Err(KernelError::Config { source, context: Some(key.into()) }),
    }
}

impl InputsDocument {
    fn into_config(self) -> Result<MatrixConfig, KernelError> {
        let github_repository = required(self.github_repository, "github_repository")?;
        let github_my_ref = required(self.github_my_ref, "github_my_ref")?;

        let mut suites = SuiteSet::empty();
        for (enabled, suite) in [
            (self.phpunit, SuiteSet::PHPUNIT),
            (self.phpcoverage, SuiteSet::PHPCOVERAGE),
            (self.phplinting, SuiteSet::PHPLINTING),
            (self.endtoend, SuiteSet::ENDTOEND),
            (self.doclinting, SuiteSet::DOCLINTING),
            (self.js, SuiteSet::JS),
        ] {
            suites.set(suite, enabled);
        }

        Ok(MatrixConfig {
            github_repository,
            github_my_ref,
            parent_branch: self.parent_branch.filter(|b| !b.trim().is_empty()),
            suites,
            phpcoverage_force_off: self.phpcoverage_force_off,
            simple_matrix: self.simple_matrix,
            composer_install: self.composer_install,
            dynamic_matrix: self.dynamic_matrix,
            needs_full_setup: self.needs_full_setup,
            endtoend_suite: self.endtoend_suite.filter(|s| !s.is_empty()),
            endtoend_config: self.endtoend_config.filter(|s| !s.is_empty()),
            extra_jobs: self.extra_jobs,
        })
    }
}

fn required(value: Option<String>, key: &'static str) -> Result<String, KernelError> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(|| KernelError::InvalidInputs {
        message: format!("{key} is required").into(),
        context: None,
    })
}
