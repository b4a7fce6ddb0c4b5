//! Readers for the JSON documents the pipeline consumes: the package's `composer.json`
//! and the list of branches that exist upstream for the core installer.

use crate::error::{KernelError, KernelErrorExt};
use mgen_domain::installer::KnownBranches;
use mgen_domain::manifest::DependencyManifest;
use mgen_domain::version::ReleaseLine;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

const RUNTIME_PACKAGE: &str = "php";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ComposerJson {
    #[serde(rename = "type")]
    package_type: Option<String>,
    require: Value,
    #[serde(rename = "require-dev")]
    require_dev: Value,
    config: Value,
}

/// Parses a `composer.json` document.
///
/// `require` and `require-dev` are merged (runtime requirements win). Non-string entries
/// and the empty-array form PHP emits for an empty object are tolerated.
///
/// # Errors
/// Returns [`KernelError::Json`] if the document is not a JSON object.
pub fn parse_manifest(raw: &str) -> Result<DependencyManifest, KernelError> {
    let composer: ComposerJson = serde_json::from_str(raw).context("Decoding composer.json")?;

    let mut requires = string_map(&composer.require_dev);
    requires.extend(string_map(&composer.require));

    let runtime_constraint =
        requires.get(RUNTIME_PACKAGE).cloned().filter(|c| !c.trim().is_empty());
    let pinned_runtime = composer
        .config
        .pointer("/platform/php")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned);

    Ok(DependencyManifest {
        package_type: composer.package_type.filter(|t| !t.trim().is_empty()),
        requires,
        runtime_constraint,
        pinned_runtime,
    })
}

fn string_map(value: &Value) -> BTreeMap<String, String> {
    value
        .as_object()
        .map(|object| {
            object
                .iter()
                .filter_map(|(name, constraint)| {
                    Some((name.clone(), constraint.as_str()?.to_owned()))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct BranchEntry {
    name: String,
}

/// Parses a branch listing (`[{"name": "5"}, {"name": "5.4"}, ...]`) into the version-shaped
/// branches it contains. Other branch names are ignored.
///
/// # Errors
/// Returns [`KernelError::Json`] if the document is not an array of named entries.
pub fn parse_known_branches(raw: &str) -> Result<KnownBranches, KernelError> {
    let entries: Vec<BranchEntry> =
        serde_json::from_str(raw).context("Decoding installer branches")?;
    let branches: KnownBranches =
        entries.iter().filter_map(|entry| entry.name.parse::<ReleaseLine>().ok()).collect();
    debug!(count = branches.iter().count(), "Known installer branches loaded");
    Ok(branches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_require_array_is_tolerated() {
        let manifest = parse_manifest(r#"{"name": "a/b", "require": []}"#).expect("manifest");
        assert!(manifest.requires.is_empty());
        assert!(manifest.package_type.is_none());
        assert!(manifest.runtime_constraint.is_none());
    }

    #[test]
    fn non_object_document_fails() {
        let err = parse_manifest("[1, 2]").expect_err("array is not a manifest");
        assert_eq!(err.rule(), "json");
    }
}
