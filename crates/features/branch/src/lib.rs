//! # Branch classification
//!
//! Maps a git ref onto the release line it belongs to:
//!
//! | ref | line |
//! |---|---|
//! | `5` | `5` |
//! | `5.2`, `5.2.3`, `5.2.0-beta1` | `5.2` |
//! | `pulls/5.2/some-fix` | `5.2` |
//! | anything else | unresolved |
//!
//! Classification is total: unrecognised refs yield `None`, never an error.

use mgen_domain::version::{ReleaseLine, ReleaseMajor};
use tracing::trace;

const REF_PREFIXES: [&str; 3] = ["refs/heads/", "refs/tags/", "origin/"];
const PULL_PREFIX: &str = "pulls/";

/// Trims whitespace and strips git ref namespaces.
#[must_use]
pub fn clean_ref(reference: &str) -> &str {
    let trimmed = reference.trim();
    REF_PREFIXES.iter().find_map(|prefix| trimmed.strip_prefix(prefix)).unwrap_or(trimmed)
}

/// Classifies a ref into a release line.
///
/// # Example
/// ```rust
/// use mgen_branch::classify;
///
/// assert_eq!(classify("pulls/5.2/fix").map(|l| l.to_string()), Some("5.2".to_owned()));
/// assert_eq!(classify("random-feature-branch"), None);
/// ```
#[must_use]
pub fn classify(reference: &str) -> Option<ReleaseLine> {
    let cleaned = clean_ref(reference);
    let candidate = cleaned
        .strip_prefix(PULL_PREFIX)
        .map_or(cleaned, |rest| rest.split('/').next().unwrap_or_default());

    let line = parse_version_shaped(candidate);
    trace!(reference, ?line, "Classified ref");
    line
}

/// Accepts `X`, `X.Y`, `X.Y.Z` and `X.Y.Z-<prerelease>`; the patch and prerelease are dropped.
fn parse_version_shaped(candidate: &str) -> Option<ReleaseLine> {
    let (version, prerelease) = match candidate.split_once('-') {
        Some((version, pre)) => (version, Some(pre)),
        None => (candidate, None),
    };
    let parts: Vec<&str> = version.split('.').collect();
    if !parts.iter().all(|part| is_number(part)) {
        return None;
    }

    let major = parts.first()?.parse::<ReleaseMajor>().ok()?;
    let minor = || parts.get(1).and_then(|minor| minor.parse::<u32>().ok());
    match (parts.len(), prerelease) {
        (1, None) => Some(ReleaseLine::major_only(major)),
        (2 | 3, None) => Some(ReleaseLine::with_minor(major, minor()?)),
        (3, Some(pre)) if is_prerelease(pre) => Some(ReleaseLine::with_minor(major, minor()?)),
        _ => None,
    }
}

fn is_number(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

fn is_prerelease(label: &str) -> bool {
    !label.is_empty() && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line(raw: &str) -> Option<ReleaseLine> {
        Some(raw.parse().expect("valid line"))
    }

    #[test]
    fn version_shaped_refs_are_classified() {
        assert_eq!(classify("5"), line("5"));
        assert_eq!(classify("5.2"), line("5.2"));
        assert_eq!(classify("5.2.3"), line("5.2"));
        assert_eq!(classify("5.0.0-beta2"), line("5.0"));
        assert_eq!(classify("5.10"), line("5.10"));
    }

    #[test]
    fn pull_request_refs_use_their_target_line() {
        assert_eq!(classify("pulls/5.2/fix"), classify("5.2"));
        assert_eq!(classify("pulls/5/some-feature"), line("5"));
        assert_eq!(classify("pulls/burger/x"), None);
    }

    #[test]
    fn namespaces_are_stripped() {
        assert_eq!(clean_ref(" refs/heads/5.1 "), "5.1");
        assert_eq!(classify("refs/tags/5.0.0-beta2"), line("5.0"));
    }

    #[test]
    fn other_refs_are_unresolved() {
        for reference in
            ["random-feature-branch", "burger", "master", "5.x", "5.2.3.4", "5-fix", "", "v5.1"]
        {
            assert_eq!(classify(reference), None, "{reference}");
        }
    }

    proptest! {
        #[test]
        fn pull_prefix_never_changes_classification(
            major in 0u32..100,
            minor in proptest::option::of(0u32..100),
            suffix in "[a-z][a-z0-9-]{0,12}",
        ) {
            let target = minor.map_or_else(|| major.to_string(), |m| format!("{major}.{m}"));
            prop_assert_eq!(classify(&format!("pulls/{target}/{suffix}")), classify(&target));
        }

        #[test]
        fn classification_is_total(reference in "\\PC{0,24}") {
            let _ = classify(&reference);
        }
    }
}
