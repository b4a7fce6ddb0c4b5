//! Inspection of the checked-out project: which suites it can run at all, and which
//! end-to-end feature files carry `@job<N>` tags.

use crate::error::{KernelError, KernelErrorExt};
use mgen_domain::config::MatrixConfig;
use mgen_domain::constants::JOB_TAG_PREFIX;
use mgen_domain::project::FeatureFile;
use mgen_domain::suites::SuiteSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

const FEATURE_EXTENSION: &str = "feature";
const SKIPPED_DIRS: [&str; 2] = ["vendor", "node_modules"];

/// Files whose presence enables a suite.
const MARKERS: [(SuiteSet, &[&str]); 6] = [
    (SuiteSet::PHPUNIT, &["phpunit.xml", "phpunit.xml.dist"]),
    (SuiteSet::PHPCOVERAGE, &["phpunit.xml", "phpunit.xml.dist"]),
    (SuiteSet::PHPLINTING, &["phpcs.xml", "phpcs.xml.dist"]),
    (SuiteSet::ENDTOEND, &["behat.yml"]),
    (SuiteSet::DOCLINTING, &[".doclintrc"]),
    (SuiteSet::JS, &["package.json"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    /// Suites whose marker file exists.
    pub available: SuiteSet,
    pub feature_files: Vec<FeatureFile>,
}

impl ProjectLayout {
    /// Scans `root` for suite markers and feature files.
    ///
    /// # Errors
    /// Returns [`KernelError::Walk`] or [`KernelError::Io`] if the tree cannot be read.
    pub fn scan(root: impl AsRef<Path>) -> Result<Self, KernelError> {
        let root = root.as_ref().to_path_buf();
        let available = MARKERS
            .iter()
            .filter(|(_, files)| files.iter().any(|file| root.join(file).is_file()))
            .fold(SuiteSet::empty(), |acc, (suite, _)| acc | *suite);

        let feature_files = scan_feature_files(&root)?;
        info!(
            root = %root.display(),
            features = feature_files.len(),
            "Project scanned"
        );

        Ok(Self { root, available, feature_files })
    }

    /// Switches off the suites of `config` the project cannot run.
    pub fn restrict(&self, config: &mut MatrixConfig) {
        let missing = config.suites.difference(self.available);
        if !missing.is_empty() {
            debug!(?missing, "Disabling suites without a marker file");
        }
        config.suites &= self.available;
    }
}

fn scan_feature_files(root: &Path) -> Result<Vec<FeatureFile>, KernelError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root).sort_by_file_name().into_iter();
    for entry in walker.filter_entry(|e| !is_skipped(e)) {
        let entry = entry.context("Walking project tree")?;
        if !entry.file_type().is_file()
            || entry.path().extension().and_then(|ext| ext.to_str()) != Some(FEATURE_EXTENSION)
        {
            continue;
        }

        let contents = fs::read_to_string(entry.path())
            .context(format!("Reading {}", entry.path().display()))?;
        let relative = entry.path().strip_prefix(root).unwrap_or_else(|_| entry.path());
        files.push(FeatureFile {
            path: relative.to_string_lossy().replace('\\', "/"),
            job_tag: job_tag(&contents),
        });
    }
    Ok(files)
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') || SKIPPED_DIRS.contains(&name))
}

/// First `@job<N>` tag in a feature file.
#[must_use]
pub fn job_tag(contents: &str) -> Option<u32> {
    contents.match_indices(JOB_TAG_PREFIX).find_map(|(index, _)| {
        let digits: String = contents[index + JOB_TAG_PREFIX.len()..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    })
}
