use mgen_domain::constants::{PREFER_LOWEST, PREFER_LOWEST_LABEL};
use mgen_domain::job::JobSpec;

/// Human readable job name, e.g. `8.1 prf-low mysql57 phpunit all`.
///
/// Parts: runtime, `prf-low` for prefer-lowest installs, database, one label per enabled
/// suite (end-to-end with its suite, config and tags), then the caller's suffix.
#[must_use]
pub fn job_name(spec: &JobSpec) -> String {
    let mut parts: Vec<String> = vec![spec.runtime.to_string()];
    if spec.composer_args.contains(PREFER_LOWEST) {
        parts.push(PREFER_LOWEST_LABEL.to_owned());
    }
    parts.push(spec.database.label().to_owned());

    if spec.phpunit {
        parts.push(format!("phpunit {}", spec.phpunit_suite));
    }
    if spec.endtoend {
        parts.push("endtoend".to_owned());
        parts.extend(
            [&spec.endtoend_suite, &spec.endtoend_config, &spec.endtoend_tags]
                .into_iter()
                .filter(|part| !part.is_empty())
                .cloned(),
        );
    }
    for (enabled, label) in [
        (spec.phpcoverage, "phpcoverage"),
        (spec.phplinting, "phplinting"),
        (spec.doclinting, "doclinting"),
        (spec.js, "js"),
    ] {
        if enabled {
            parts.push(label.to_owned());
        }
    }
    parts.push(spec.name_suffix.clone());

    parts.retain(|part| !part.trim().is_empty());
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::job_name;
    use mgen_domain::engine::DbEngine;
    use mgen_domain::installer::InstallerVersion;
    use mgen_domain::job::JobSpec;
    use mgen_domain::version::RuntimeVersion;

    fn spec() -> JobSpec {
        JobSpec::new(InstallerVersion::None, RuntimeVersion::new(8, 1), DbEngine::Mysql57)
    }

    #[test]
    fn unit_test_row_with_prefer_lowest() {
        let mut job = spec();
        job.phpunit = true;
        job.composer_args = "--prefer-lowest".to_owned();
        assert_eq!(job_name(&job), "8.1 prf-low mysql57 phpunit all");
    }

    #[test]
    fn endtoend_includes_suite_config_and_tag() {
        let mut job = spec();
        job.endtoend = true;
        job.endtoend_tags = "job2".to_owned();
        assert_eq!(job_name(&job), "8.1 mysql57 endtoend root job2");

        job.endtoend_config = "vendor/x/behat.yml".to_owned();
        assert_eq!(job_name(&job), "8.1 mysql57 endtoend root vendor/x/behat.yml job2");
    }

    #[test]
    fn suffix_comes_last_and_blanks_are_skipped() {
        let mut job = spec();
        job.js = true;
        job.name_suffix = "  ".to_owned();
        assert_eq!(job_name(&job), "8.1 mysql57 js");
        job.name_suffix = "nightly".to_owned();
        assert_eq!(job_name(&job), "8.1 mysql57 js nightly");
    }
}
