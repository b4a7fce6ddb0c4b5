use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The parts of a package's dependency manifest the resolvers care about.
///
/// Every optional piece is an `Option`: "not declared" is never encoded as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyManifest {
    /// Declared package type (`silverstripe-vendormodule`, `library`, ...).
    pub package_type: Option<String>,
    /// Runtime and development requirements, package name to constraint.
    pub requires: BTreeMap<String, String>,
    /// Constraint on the language runtime itself (`require.php`).
    pub runtime_constraint: Option<String>,
    /// Runtime version the package pins for dependency resolution (`config.platform.php`).
    pub pinned_runtime: Option<String>,
}

impl DependencyManifest {
    #[must_use]
    pub fn requirement(&self, package: &str) -> Option<&str> {
        self.requires.get(package).map(String::as_str)
    }
}
