use crate::error::{GenerateError, GenerateErrorExt};
use mgen_branch::classify;
use mgen_domain::catalog::Catalog;
use mgen_domain::config::MatrixConfig;
use mgen_domain::installer::{InstallerVersion, KnownBranches};
use mgen_domain::job::Matrix;
use mgen_domain::manifest::DependencyManifest;
use mgen_domain::project::FeatureFile;
use mgen_domain::version::{ReleaseLine, RuntimeVersion};
use mgen_installer::{InstallerQuery, InstallerVersionResolver};
use mgen_kernel::inputs::parse_inputs;
use mgen_kernel::manifest::{parse_known_branches, parse_manifest};
use mgen_kernel::project::ProjectLayout;
use mgen_matrix::{MatrixBuilder, MatrixRequest};
use mgen_runtime::RuntimeVersionResolver;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Everything a run needs besides the catalog.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub config: MatrixConfig,
    pub manifest: DependencyManifest,
    pub known_branches: KnownBranches,
    pub feature_files: Vec<FeatureFile>,
}

impl GenerateRequest {
    #[must_use]
    pub fn new(config: MatrixConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Builds a request from raw documents.
    ///
    /// When `project_root` is given the checkout is scanned: suites without a marker file
    /// are switched off and feature files are collected.
    ///
    /// # Errors
    /// Returns [`GenerateError::Kernel`] when a document cannot be parsed or the project
    /// tree cannot be read.
    pub fn from_documents(
        inputs_yaml: &str,
        manifest_json: Option<&str>,
        branches_json: Option<&str>,
        project_root: Option<&Path>,
    ) -> Result<Self, GenerateError> {
        let mut config = parse_inputs(inputs_yaml)?;
        let manifest = manifest_json.map(parse_manifest).transpose()?.unwrap_or_default();
        let known_branches =
            branches_json.map(parse_known_branches).transpose()?.unwrap_or_default();

        let feature_files = match project_root {
            Some(root) => {
                let layout = ProjectLayout::scan(root)?;
                layout.restrict(&mut config);
                layout.feature_files
            },
            None => Vec::new(),
        };

        Ok(Self { config, manifest, known_branches, feature_files })
    }
}

/// Runs the whole pipeline: installer version, runtime versions, then the matrix.
///
/// # Errors
/// * [`GenerateError::Runtime`] when the runtime constraint cannot be satisfied.
/// * [`GenerateError::Matrix`] when the matrix cannot be expanded (untagged feature file,
///   missing engine policy).
///
/// No partial matrix is ever returned.
#[instrument(
    skip_all,
    fields(repository = request.config.github_repository, reference = request.config.github_my_ref)
)]
pub fn generate(request: &GenerateRequest, catalog: &Catalog) -> Result<Matrix, GenerateError> {
    let config = &request.config;
    if !config.dynamic_matrix_enabled() {
        info!("Dynamic matrix disabled");
        return Ok(Matrix::default());
    }

    let installer = InstallerVersionResolver::new(catalog, &request.known_branches)
        .resolve(&InstallerQuery {
            repository: &config.github_repository,
            reference: &config.github_my_ref,
            parent_branch: config.parent_branch.as_deref(),
            manifest: &request.manifest,
        })
        .version;
    let needs_full_setup = config.needs_full_setup.unwrap_or(!installer.is_none());

    let line = runtime_line(catalog, config, &installer, needs_full_setup);
    let resolver = RuntimeVersionResolver::new(catalog);
    let universe = resolver.universe(line).context(format!("release line {line}"))?;
    let runtimes = resolver
        .resolve(line, request.manifest.runtime_constraint.as_deref())
        .context(format!("release line {line}"))?;
    info!(installer = %installer, line = %line, runtimes = %runtimes, "Inputs resolved");

    let matrix = MatrixBuilder::new(catalog).build(&MatrixRequest {
        config,
        major: line.major,
        universe,
        runtimes: &runtimes,
        installer: &installer,
        feature_files: &request.feature_files,
        pinned_runtime: pinned_runtime(&request.manifest),
    })?;
    Ok(matrix)
}

/// Release line whose runtimes the matrix is built from.
///
/// A full setup runs on the installer's line. Otherwise the branch (or its parent) is
/// mapped onto the core line. Anything unknown falls back to the lowest supported major.
fn runtime_line(
    catalog: &Catalog,
    config: &MatrixConfig,
    installer: &InstallerVersion,
    needs_full_setup: bool,
) -> ReleaseLine {
    let known = |line: &ReleaseLine| catalog.is_known_major(line.major);

    if needs_full_setup && let Some(line) = installer.release_line().filter(known) {
        return line;
    }

    let repository = catalog.repository(config.repository_name());
    let from_branch = [Some(config.github_my_ref.as_str()), config.parent_branch.as_deref()]
        .into_iter()
        .flatten()
        .filter_map(classify)
        .find_map(|line| repository.and_then(|meta| meta.core_line(line)).filter(known));
    if let Some(line) = from_branch {
        debug!(%line, "Runtime line taken from branch");
        return line;
    }

    let lowest = ReleaseLine::major_only(catalog.lowest_supported_major);
    if needs_full_setup {
        warn!(installer = %installer, fallback = %lowest, "Installer line is not in the catalog");
    } else {
        debug!(fallback = %lowest, "No catalog line for branch, using lowest supported major");
    }
    lowest
}

fn pinned_runtime(manifest: &DependencyManifest) -> Option<RuntimeVersion> {
    let raw = manifest.pinned_runtime.as_deref()?;
    raw.parse()
        .inspect_err(|_| debug!(pinned = raw, "Pinned runtime is not a major.minor version"))
        .ok()
}
