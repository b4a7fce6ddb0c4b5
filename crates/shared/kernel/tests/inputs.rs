use mgen_domain::engine::DbEngine;
use mgen_domain::suites::SuiteSet;
use mgen_domain::version::RuntimeVersion;
use mgen_kernel::KernelError;
use mgen_kernel::inputs::parse_inputs;

#[test]
fn full_document_is_parsed() {
    let yaml = r"
github_repository: 'silverstripe/silverstripe-framework'
github_my_ref: '5.1'
parent_branch: ''
phpunit: true
phplinting: false
phpcoverage: true
phpcoverage_force_off: true
endtoend: true
endtoend_suite: 'admin'
js: 'true'
doclinting: false
simple_matrix: false
dynamic_matrix: true
extra_jobs:
  - php: 8.2
    db: pgsql
    phpunit: true
    name_suffix: 'fish'
  - endtoend: true
";
    let config = parse_inputs(yaml).expect("inputs");
    assert_eq!(config.repository_name(), "silverstripe-framework");
    assert_eq!(config.github_my_ref, "5.1");
    assert!(config.parent_branch.is_none());
    assert_eq!(
        config.suites,
        SuiteSet::PHPUNIT | SuiteSet::PHPCOVERAGE | SuiteSet::ENDTOEND | SuiteSet::JS
    );
    assert!(!config.coverage_enabled());
    assert_eq!(config.endtoend_suite.as_deref(), Some("admin"));
    assert_eq!(config.dynamic_matrix, Some(true));

    assert_eq!(config.extra_jobs.len(), 2);
    let first = &config.extra_jobs[0];
    assert_eq!(first.php, Some(RuntimeVersion::new(8, 2)));
    assert_eq!(first.db, Some(DbEngine::Pgsql));
    assert_eq!(first.phpunit, Some(true));
    assert_eq!(first.name_suffix.as_deref(), Some("fish"));
    assert_eq!(config.extra_jobs[1].php, None);
}

#[test]
fn unquoted_ref_is_rejected() {
    let err =
        parse_inputs("github_repository: 'a/b'\ngithub_my_ref: 1.10\n").expect_err("float ref");
    assert_eq!(err.to_string(), "github_my_ref needs to be surrounded by single-quotes");
    assert!(matches!(err, KernelError::UnquotedScalar { field: "github_my_ref", .. }));
}

#[test]
fn unquoted_parent_branch_is_rejected() {
    let yaml = "github_repository: 'a/b'\ngithub_my_ref: 'pulls/1/x'\nparent_branch: 5\n";
    let err = parse_inputs(yaml).expect_err("integer parent branch");
    assert_eq!(err.to_string(), "parent_branch needs to be surrounded by single-quotes");
}

#[test]
fn malformed_yaml_is_reported() {
    let err = parse_inputs("github_repository: [unclosed\n").expect_err("bad yaml");
    assert!(err.to_string().starts_with("Failed to parse yml"), "{err}");
    assert_eq!(err.rule(), "invalid_inputs");
}

#[test]
fn missing_repository_is_reported() {
    let err = parse_inputs("github_my_ref: '5'\n").expect_err("no repository");
    assert!(err.to_string().contains("github_repository is required"));
}

#[test]
fn dynamic_matrix_absent_means_enabled() {
    let config =
        parse_inputs("github_repository: 'a/b'\ngithub_my_ref: 'burger'\n").expect("inputs");
    assert_eq!(config.dynamic_matrix, None);
    assert!(config.dynamic_matrix_enabled());
    assert!(config.suites.is_empty());
}
