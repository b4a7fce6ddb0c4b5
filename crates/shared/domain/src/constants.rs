/// Composer flag that resolves dependencies to their lowest allowed versions.
pub const PREFER_LOWEST: &str = "--prefer-lowest";
/// Short form of [`PREFER_LOWEST`] used in job names.
pub const PREFER_LOWEST_LABEL: &str = "prf-low";
/// Suffix of a development branch installer version (`5.4.x-dev`).
pub const DEV_SUFFIX: &str = ".x-dev";

pub const DEFAULT_PHPUNIT_SUITE: &str = "all";
pub const DEFAULT_ENDTOEND_SUITE: &str = "root";

/// Prefix of feature-file tags that split end-to-end runs into sub-suites.
pub const JOB_TAG_PREFIX: &str = "@job";
