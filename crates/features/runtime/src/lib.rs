//! Runtime version selection.
//!
//! The catalog fixes which runtime versions a release line supports (the *universe*);
//! the package's own runtime constraint narrows that list down.

pub mod constraint;
mod error;

pub use constraint::Constraint;
pub use error::{RuntimeError, RuntimeErrorExt};

use mgen_domain::catalog::Catalog;
use mgen_domain::version::{ReleaseLine, RuntimeSet, RuntimeVersion};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy)]
pub struct RuntimeVersionResolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> RuntimeVersionResolver<'a> {
    #[must_use]
    pub const fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Runtime versions listed for `line`, falling back to its major line.
    ///
    /// # Errors
    /// Returns [`RuntimeError::UnknownReleaseLine`] when neither is in the catalog.
    pub fn universe(&self, line: ReleaseLine) -> Result<&'a [RuntimeVersion], RuntimeError> {
        self.catalog
            .runtimes_for(&line)
            .or_else(|| self.catalog.runtimes_for(&line.as_major_line()))
            .filter(|runtimes| !runtimes.is_empty())
            .ok_or_else(|| RuntimeError::UnknownReleaseLine {
                line: line.to_string(),
                context: None,
            })
    }

    /// Resolves the runtime versions to test `line` with.
    ///
    /// # Errors
    /// * [`RuntimeError::UnknownReleaseLine`] when the catalog has no runtimes for `line`.
    /// * [`RuntimeError::NoSatisfiableRuntime`] when the constraint rules out the whole
    ///   universe and no lower version exists to fall back to.
    #[instrument(level = "debug", skip(self), fields(line = %line))]
    pub fn resolve(
        &self,
        line: ReleaseLine,
        constraint: Option<&str>,
    ) -> Result<RuntimeSet, RuntimeError> {
        let universe = self.universe(line)?;
        filter(universe, constraint)
    }
}

/// Narrows `universe` to the versions `constraint` allows.
///
/// * No constraint, or a version-shaped one that cannot be parsed, leaves the universe
///   unchanged.
/// * A constraint naming no version at all (`none`) rules every version out.
/// * When nothing in the universe matches, the highest version at or below the
///   constraint's lowest acceptable version is used instead.
///
/// # Errors
/// Returns [`RuntimeError::NoSatisfiableRuntime`] when there is nothing to fall back to,
/// and [`RuntimeError::UnknownReleaseLine`] for an empty universe.
pub fn filter(
    universe: &[RuntimeVersion],
    constraint: Option<&str>,
) -> Result<RuntimeSet, RuntimeError> {
    let all = || {
        RuntimeSet::new(universe.to_vec()).ok_or_else(|| RuntimeError::UnknownReleaseLine {
            line: String::new(),
            context: Some("empty runtime universe".into()),
        })
    };

    let Some(raw) = constraint.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return all();
    };
    let Some(constraint) = Constraint::parse(raw) else {
        if names_no_version(raw) {
            return Err(RuntimeError::NoSatisfiableRuntime {
                constraint: raw.to_owned(),
                universe: format_universe(universe),
                context: Some("the constraint names no version".into()),
            });
        }
        warn!(constraint = raw, "Unparseable runtime constraint, using every supported version");
        return all();
    };
    if constraint.is_unconstrained() {
        return all();
    }

    let matching: Vec<RuntimeVersion> =
        universe.iter().copied().filter(|v| constraint.allows(*v)).collect();
    if let Some(set) = RuntimeSet::new(matching) {
        debug!(constraint = raw, runtimes = %set, "Runtime versions selected");
        return Ok(set);
    }

    let lowest_point = constraint.lowest_point();
    let fallback = universe.iter().copied().filter(|v| v.triple() <= lowest_point).max();
    match fallback {
        Some(version) => {
            warn!(
                constraint = raw,
                runtime = %version,
                "No supported runtime satisfies the constraint, falling back"
            );
            Ok(RuntimeSet::single(version))
        },
        None => Err(RuntimeError::NoSatisfiableRuntime {
            constraint: raw.to_owned(),
            universe: format_universe(universe),
            context: None,
        }),
    }
}

/// Words without a single digit, as opposed to a version with broken punctuation.
fn names_no_version(raw: &str) -> bool {
    !raw.bytes().any(|b| b.is_ascii_digit()) && raw.bytes().any(|b| b.is_ascii_alphabetic())
}

fn format_universe(universe: &[RuntimeVersion]) -> String {
    let joined: Vec<String> = universe.iter().map(ToString::to_string).collect();
    format!("[{}]", joined.join(", "))
}
