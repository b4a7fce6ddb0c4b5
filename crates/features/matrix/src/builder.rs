use crate::error::MatrixError;
use crate::naming::job_name;
use crate::suite::Suite;
use fxhash::FxHashSet;
use mgen_domain::catalog::{Catalog, EnginePolicy};
use mgen_domain::config::{ExtraJob, MatrixConfig};
use mgen_domain::constants::{DEFAULT_ENDTOEND_SUITE, DEFAULT_PHPUNIT_SUITE, PREFER_LOWEST};
use mgen_domain::engine::DbEngine;
use mgen_domain::installer::InstallerVersion;
use mgen_domain::job::{JobDescriptor, JobSpec, Matrix};
use mgen_domain::project::FeatureFile;
use mgen_domain::version::{ReleaseMajor, RuntimeSet, RuntimeVersion};
use std::collections::BTreeSet;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

/// Everything resolved upstream that a matrix is expanded from.
#[derive(Debug, Clone, Copy)]
pub struct MatrixRequest<'r> {
    pub config: &'r MatrixConfig,
    /// Core major whose engine policy applies.
    pub major: ReleaseMajor,
    /// Every runtime the release line supports, before the package constraint applies.
    pub universe: &'r [RuntimeVersion],
    pub runtimes: &'r RuntimeSet,
    pub installer: &'r InstallerVersion,
    pub feature_files: &'r [FeatureFile],
    /// Runtime the manifest pins for dependency resolution.
    pub pinned_runtime: Option<RuntimeVersion>,
}

#[derive(Debug, Clone, Copy)]
pub struct MatrixBuilder<'a> {
    catalog: &'a Catalog,
}

impl<'a> MatrixBuilder<'a> {
    #[must_use]
    pub const fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Expands `request` into the ordered, de-duplicated job list.
    ///
    /// # Errors
    /// * [`MatrixError::MissingEnginePolicy`] when the catalog has no policy for the major.
    /// * [`MatrixError::UntaggedFeatureFile`] when end-to-end tests are enabled and only some
    ///   feature files carry a `@job<N>` tag.
    #[instrument(
        level = "debug",
        skip_all,
        fields(major = %request.major, runtimes = %request.runtimes)
    )]
    pub fn build(&self, request: &MatrixRequest<'_>) -> Result<Matrix, MatrixError> {
        let config = request.config;
        if !config.dynamic_matrix_enabled() {
            info!("Dynamic matrix disabled, emitting no jobs");
            return Ok(Matrix::default());
        }

        let policy = self.catalog.engine_policy(request.major).ok_or_else(|| {
            MatrixError::MissingEnginePolicy { major: request.major.to_string(), context: None }
        })?;
        let endtoend_tags = if config.runs(Suite::Endtoend.flag()) {
            endtoend_tags(request.feature_files)?
        } else {
            Vec::new()
        };

        let plan = Plan {
            request,
            policy,
            needs_full_setup: config.needs_full_setup.unwrap_or(!request.installer.is_none()),
        };

        let mut jobs = Vec::new();
        for suite in Suite::iter().filter(|suite| plan.enabled(*suite)) {
            let before = jobs.len();
            plan.push_suite(suite, &endtoend_tags, &mut jobs);
            debug!(%suite, jobs = jobs.len() - before, "Suite expanded");
        }
        jobs.extend(config.extra_jobs.iter().map(|extra| plan.extra_job(extra)));

        let include = dedup(jobs)
            .into_iter()
            .map(|spec| JobDescriptor { name: job_name(&spec), spec })
            .collect::<Vec<_>>();
        info!(jobs = include.len(), "Matrix built");
        Ok(Matrix { include })
    }
}

struct Plan<'p> {
    request: &'p MatrixRequest<'p>,
    policy: &'p EnginePolicy,
    needs_full_setup: bool,
}

impl Plan<'_> {
    fn enabled(&self, suite: Suite) -> bool {
        let config = self.request.config;
        match suite {
            Suite::Phpcoverage => config.coverage_enabled(),
            _ => config.runs(suite.flag()),
        }
    }

    fn job(&self, runtime: RuntimeVersion, database: DbEngine) -> JobSpec {
        let mut job = JobSpec::new(self.request.installer.clone(), runtime, database);
        job.needs_full_setup = self.needs_full_setup;
        job
    }

    /// Lowest runtime on the default engine, used by every suite that runs once.
    fn primary(&self) -> JobSpec {
        self.job(self.request.runtimes.lowest(), self.policy.default_engine)
    }

    fn push_suite(&self, suite: Suite, endtoend_tags: &[String], jobs: &mut Vec<JobSpec>) {
        match suite {
            Suite::Phpunit => self.push_unit_tests(jobs),
            Suite::Phpcoverage => jobs.push(JobSpec { phpcoverage: true, ..self.primary() }),
            Suite::Phplinting => jobs.push(JobSpec { phplinting: true, ..self.primary() }),
            Suite::Endtoend => {
                let config = self.request.config;
                jobs.extend(endtoend_tags.iter().map(|tags| JobSpec {
                    endtoend: true,
                    endtoend_suite: config
                        .endtoend_suite
                        .clone()
                        .unwrap_or_else(|| DEFAULT_ENDTOEND_SUITE.to_owned()),
                    endtoend_config: config.endtoend_config.clone().unwrap_or_default(),
                    endtoend_tags: tags.clone(),
                    ..self.primary()
                }));
            },
            Suite::Doclinting => jobs.push(JobSpec { doclinting: true, ..self.primary() }),
            Suite::Js => jobs.push(JobSpec { js: true, ..self.primary() }),
        }
    }

    fn push_unit_tests(&self, jobs: &mut Vec<JobSpec>) {
        let config = self.request.config;
        if config.composer_install {
            let runtime =
                self.request.pinned_runtime.unwrap_or_else(|| self.request.runtimes.lowest());
            jobs.push(JobSpec {
                phpunit: true,
                composer_install: true,
                ..self.job(runtime, self.policy.default_engine)
            });
            return;
        }

        let rows = if config.simple_matrix { 1 } else { self.policy.engines.len() };
        for (row, database) in self.policy.engines.iter().take(rows).enumerate() {
            let runtime = runtime_slot(self.request.universe, self.request.runtimes, row);
            let mut job = self.job(runtime, *database);
            job.phpunit = true;
            if row == 0 {
                PREFER_LOWEST.clone_into(&mut job.composer_args);
            }
            jobs.push(job);
        }
    }

    fn extra_job(&self, extra: &ExtraJob) -> JobSpec {
        let installer = extra
            .installer_version
            .as_deref()
            .map_or_else(|| self.request.installer.clone(), InstallerVersion::parse);
        let mut job = JobSpec::new(
            installer,
            extra.php.unwrap_or_else(|| self.request.runtimes.lowest()),
            extra.db.unwrap_or(self.policy.default_engine),
        );

        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        job.composer_require_extra = text(&extra.composer_require_extra);
        job.composer_args = text(&extra.composer_args);
        job.name_suffix = text(&extra.name_suffix);
        job.endtoend_config = text(&extra.endtoend_config);
        job.endtoend_tags = text(&extra.endtoend_tags);
        job.phpunit_suite =
            extra.phpunit_suite.clone().unwrap_or_else(|| DEFAULT_PHPUNIT_SUITE.to_owned());
        job.endtoend_suite =
            extra.endtoend_suite.clone().unwrap_or_else(|| DEFAULT_ENDTOEND_SUITE.to_owned());

        job.composer_install = extra.composer_install.unwrap_or(false);
        job.phpunit = extra.phpunit.unwrap_or(false);
        job.phplinting = extra.phplinting.unwrap_or(false);
        job.phpcoverage = extra.phpcoverage.unwrap_or(false);
        job.endtoend = extra.endtoend.unwrap_or(false);
        job.js = extra.js.unwrap_or(false);
        job.doclinting = extra.doclinting.unwrap_or(false);
        job.needs_full_setup = extra.needs_full_setup.unwrap_or(self.needs_full_setup);
        job
    }
}

/// Runtime for row `row` of the engine table.
///
/// The slot is picked from the line's `universe`: row 0 gets the lowest version, row 1 the
/// second when at least three exist (otherwise the lowest), every later row the highest.
/// The slot is then moved onto the highest allowed runtime at or below it, or onto the
/// lowest allowed runtime when nothing allowed is that low.
#[must_use]
pub fn runtime_slot(
    universe: &[RuntimeVersion],
    runtimes: &RuntimeSet,
    row: usize,
) -> RuntimeVersion {
    let universe = if universe.is_empty() { runtimes.as_slice() } else { universe };
    let slot = match row {
        0 => universe.first(),
        1 if universe.len() >= 3 => universe.get(1),
        1 => universe.first(),
        _ => universe.last(),
    };
    let Some(slot) = slot.copied() else {
        return runtimes.lowest();
    };

    runtimes
        .as_slice()
        .iter()
        .copied()
        .filter(|runtime| *runtime <= slot)
        .max()
        .unwrap_or_else(|| runtimes.lowest())
}

/// One entry per distinct `@job<N>` tag, or a single untagged entry when no file is tagged.
fn endtoend_tags(files: &[FeatureFile]) -> Result<Vec<String>, MatrixError> {
    if files.iter().all(|file| file.job_tag.is_none()) {
        return Ok(vec![String::new()]);
    }
    if let Some(untagged) = files.iter().find(|file| file.job_tag.is_none()) {
        return Err(MatrixError::UntaggedFeatureFile { path: untagged.path.clone(), context: None });
    }

    let tags: BTreeSet<u32> = files.iter().filter_map(|file| file.job_tag).collect();
    Ok(tags.into_iter().map(|tag| format!("job{tag}")).collect())
}

/// Drops later copies of identical jobs, keeping order.
fn dedup(jobs: Vec<JobSpec>) -> Vec<JobSpec> {
    let total = jobs.len();
    let mut seen = FxHashSet::default();
    let unique: Vec<JobSpec> = jobs.into_iter().filter(|job| seen.insert(job.clone())).collect();
    if unique.len() < total {
        debug!(dropped = total - unique.len(), "Duplicate jobs removed");
    }
    unique
}
