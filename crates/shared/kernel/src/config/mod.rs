use crate::error::{KernelError, KernelErrorExt};
use config::{Config, Environment, File, FileFormat};
use mgen_domain::catalog::Catalog;
use mgen_domain::version::{ReleaseLine, ReleaseMajor};
use std::path::Path;
use tracing::{debug, info};

/// Catalog shipped with the binary.
pub const BUILTIN_CATALOG: &str = include_str!("../../catalog.toml");

/// Loads the metadata catalog.
///
/// Sources, later ones overriding earlier ones:
/// 1. **Catalog file**: `path` when given, otherwise the built-in [`BUILTIN_CATALOG`].
/// 2. **Environment overrides**: variables prefixed with `MGEN__`, nested keys separated by
///    double underscores (e.g. `MGEN__HIGHEST_STABLE_MAJOR=6`).
///
/// The result is validated with [`validate_catalog`].
///
/// # Errors
/// * [`KernelError::Config`] if the file is missing or does not match the catalog shape.
/// * [`KernelError::InvalidCatalog`] if the data is inconsistent.
///
/// # Example
/// ```rust
/// use mgen_kernel::config::load_catalog;
///
/// let catalog = load_catalog(None).unwrap();
/// assert!(catalog.engine_policy(catalog.lowest_supported_major).is_some());
/// ```
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, KernelError> {
    load_catalog_with(path, catalog_environment())
}

/// Environment variables layered over the catalog file.
fn catalog_environment() -> Environment {
    Environment::with_prefix("MGEN").separator("__").convert_case(config::Case::Snake)
}

fn load_catalog_with(
    path: Option<&Path>,
    environment: Environment,
) -> Result<Catalog, KernelError> {
    let builder = match path {
        Some(path) => {
            info!("Loading catalog from {}", path.display());
            Config::builder().add_source(File::from(path).required(true))
        },
        None => {
            debug!("Loading built-in catalog");
            Config::builder().add_source(File::from_str(BUILTIN_CATALOG, FileFormat::Toml))
        },
    };

    let catalog = builder
        .add_source(environment)
        .build()
        .context("Failed to build catalog")?
        .try_deserialize::<Catalog>()
        .context("Failed to deserialize catalog")?;

    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Checks the invariants the resolvers rely on.
///
/// # Errors
/// Returns [`KernelError::InvalidCatalog`] naming the first violated invariant.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), KernelError> {
    if catalog.lowest_supported_major > catalog.highest_stable_major {
        return Err(invalid(format!(
            "lowest supported major {} is above highest stable major {}",
            catalog.lowest_supported_major, catalog.highest_stable_major
        )));
    }

    for release in &catalog.releases {
        if release.runtimes.is_empty() {
            return Err(invalid(format!("release line {} has no runtime versions", release.line)));
        }
        if release.runtimes.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(invalid(format!(
                "runtime versions of release line {} must be strictly ascending",
                release.line
            )));
        }
    }

    let majors: Vec<ReleaseMajor> = catalog.known_majors().collect();
    for major in majors {
        if catalog.runtimes_for(&ReleaseLine::major_only(major)).is_none() {
            return Err(invalid(format!("major {major} has no major-level runtime list")));
        }
        let Some(policy) = catalog.engine_policy(major) else {
            return Err(invalid(format!("major {major} has no database engine policy")));
        };
        if policy.engines.is_empty() {
            return Err(invalid(format!("engine policy of major {major} lists no engines")));
        }
    }

    Ok(())
}

fn invalid(message: String) -> KernelError {
    KernelError::InvalidCatalog { message: message.into(), context: None }
}
