use mgen::domain::catalog::Catalog;
use mgen::domain::config::MatrixConfig;
use mgen::domain::manifest::DependencyManifest;
use mgen::domain::suites::SuiteSet;
use mgen::kernel::config::load_catalog;
use mgen::{GenerateRequest, generate};
use proptest::prelude::*;
use std::collections::HashSet;
use std::fs;

const GENERIC_INPUTS: &str = "\
endtoend: true
js: true
phpcoverage: false
phpcoverage_force_off: false
phplinting: true
phpunit: true
doclinting: true
simple_matrix: false
composer_install: false
";

fn catalog() -> Catalog {
    load_catalog(None).expect("built-in catalog")
}

fn inputs(repository: &str, reference: &str) -> String {
    format!(
        "{GENERIC_INPUTS}github_repository: '{repository}'\n\
         github_my_ref: '{reference}'\nparent_branch: ''\n"
    )
}

fn names(request: &GenerateRequest) -> Vec<String> {
    generate(request, &catalog()).expect("matrix").include.into_iter().map(|job| job.name).collect()
}

#[test]
fn lockstepped_framework_on_lowest_major() {
    let request = GenerateRequest::from_documents(
        &inputs("myaccount/silverstripe-framework", "5"),
        None,
        None,
        None,
    )
    .expect("request");

    let matrix = generate(&request, &catalog()).expect("matrix");
    assert!(matrix.include.iter().all(|job| job.spec.installer_version.to_string() == "5.x-dev"));
    assert!(matrix.include.iter().all(|job| job.spec.needs_full_setup));
    assert_eq!(
        matrix.include.iter().map(|job| job.name.as_str()).collect::<Vec<_>>(),
        [
            "8.1 prf-low mysql57 phpunit all",
            "8.2 mariadb phpunit all",
            "8.3 mysql80 phpunit all",
            "8.3 mysql84 phpunit all",
            "8.1 mysql57 phplinting",
            "8.1 mysql57 endtoend root",
            "8.1 mysql57 doclinting",
            "8.1 mysql57 js",
        ]
    );
}

#[test]
fn highest_major_uses_its_own_policy() {
    let config =
        MatrixConfig::new("myaccount/silverstripe-framework", "6").with_suites(SuiteSet::PHPUNIT);
    assert_eq!(
        names(&GenerateRequest::new(config)),
        ["8.3 prf-low mariadb phpunit all", "8.3 mysql80 phpunit all", "8.4 mysql84 phpunit all"]
    );
}

#[test]
fn third_party_module_with_core_dependency() {
    let manifest = r#"{
        "name": "myaccount/my-module",
        "type": "silverstripe-module",
        "require": {"silverstripe/framework": "^5"}
    }"#;
    let branches = r#"[{"name": "5"}, {"name": "6"}, {"name": "main"}]"#;
    let yaml =
        "github_repository: 'myaccount/my-module'\ngithub_my_ref: 'mybranch'\nphpunit: true\n";

    let request = GenerateRequest::from_documents(yaml, Some(manifest), Some(branches), None)
        .expect("request");
    let catalog = catalog();
    let matrix = generate(&request, &catalog).expect("matrix");

    let engines = &catalog.engine_policy(catalog.lowest_supported_major).expect("policy").engines;
    assert_eq!(matrix.len(), engines.len());
    assert!(matrix.include.iter().all(|job| job.spec.installer_version.to_string() == "5.x-dev"));

    let disabled = format!("{yaml}dynamic_matrix: false\n");
    let request = GenerateRequest::from_documents(&disabled, Some(manifest), Some(branches), None)
        .expect("request");
    assert!(generate(&request, &catalog).expect("matrix").is_empty());
}

#[test]
fn standalone_package_skips_full_setup() {
    let mut request = GenerateRequest::new(
        MatrixConfig::new("myaccount/my-library", "1.2").with_suites(SuiteSet::PHPUNIT),
    );
    request.manifest =
        DependencyManifest { package_type: Some("library".to_owned()), ..Default::default() };

    let matrix = generate(&request, &catalog()).expect("matrix");
    assert_eq!(matrix.len(), 4);
    assert!(matrix.include.iter().all(|job| job.spec.installer_version.is_none()));
    assert!(matrix.include.iter().all(|job| !job.spec.needs_full_setup));
}

#[test]
fn runtime_constraint_narrows_table() {
    let mut request = GenerateRequest::new(
        MatrixConfig::new("myaccount/silverstripe-framework", "5").with_suites(SuiteSet::PHPUNIT),
    );
    request.manifest.runtime_constraint = Some("^8.2".to_owned());
    assert_eq!(
        names(&request),
        [
            "8.2 prf-low mysql57 phpunit all",
            "8.2 mariadb phpunit all",
            "8.3 mysql80 phpunit all",
            "8.3 mysql84 phpunit all",
        ]
    );
}

#[test]
fn unsatisfiable_runtime_constraint_is_fatal() {
    let mut request = GenerateRequest::new(
        MatrixConfig::new("myaccount/silverstripe-framework", "5").with_suites(SuiteSet::PHPUNIT),
    );
    request.manifest.runtime_constraint = Some("^7.4".to_owned());

    let err = generate(&request, &catalog()).expect_err("nothing satisfies ^7.4");
    assert_eq!(err.rule(), "runtime");
    assert_eq!(err.cause_rule(), "no_satisfiable_runtime");

    request.manifest.runtime_constraint = Some("none".to_owned());
    let err = generate(&request, &catalog()).expect_err("none names no version");
    assert_eq!(err.cause_rule(), "no_satisfiable_runtime");
}

#[test]
fn upper_bounded_constraint_keeps_row_slots() {
    for constraint in ["<8.3", "^8 <8.3"] {
        let mut request = GenerateRequest::new(
            MatrixConfig::new("myaccount/silverstripe-framework", "5.4")
                .with_suites(SuiteSet::PHPUNIT),
        );
        request.manifest.runtime_constraint = Some(constraint.to_owned());
        assert_eq!(
            names(&request),
            [
                "8.1 prf-low mysql57 phpunit all",
                "8.2 mariadb phpunit all",
                "8.2 mysql80 phpunit all",
                "8.2 mysql84 phpunit all",
            ],
            "{constraint}"
        );
    }
}

#[test]
fn config_package_never_needs_the_installer() {
    let cases = [
        (
            "2.1",
            "^8.1",
            vec![
                "8.1 prf-low mysql57 phpunit all",
                "8.1 mariadb phpunit all",
                "8.2 mysql80 phpunit all",
                "8.2 mysql84 phpunit all",
                "8.1 mysql57 phplinting",
            ],
        ),
        (
            "2",
            "^8.1",
            vec![
                "8.1 prf-low mysql57 phpunit all",
                "8.2 mariadb phpunit all",
                "8.3 mysql80 phpunit all",
                "8.3 mysql84 phpunit all",
                "8.1 mysql57 phplinting",
            ],
        ),
        (
            "3",
            "^8.3",
            vec![
                "8.3 prf-low mariadb phpunit all",
                "8.3 mysql80 phpunit all",
                "8.4 mysql84 phpunit all",
                "8.3 mysql80 phplinting",
            ],
        ),
    ];

    for (reference, php, expected) in cases {
        let yaml = format!(
            "phpunit: true\nphplinting: true\n\
             github_repository: 'silverstripe/silverstripe-config'\n\
             github_my_ref: '{reference}'\n"
        );
        let manifest =
            format!(r#"{{"name": "silverstripe/config", "require": {{"php": "{php}"}}}}"#);
        let request = GenerateRequest::from_documents(&yaml, Some(&manifest), None, None)
            .expect("request");

        let matrix = generate(&request, &catalog()).expect("matrix");
        let names: Vec<&str> = matrix.include.iter().map(|job| job.name.as_str()).collect();
        assert_eq!(names, expected, "{reference}");
        assert!(matrix.include.iter().all(|job| job.spec.installer_version.is_none()));
        assert!(matrix.include.iter().all(|job| !job.spec.needs_full_setup));
    }
}

#[test]
fn untagged_feature_file_fails_the_whole_run() {
    let project = tempfile::tempdir().expect("tempdir");
    fs::write(project.path().join("behat.yml"), "").expect("behat.yml");
    fs::create_dir(project.path().join("features")).expect("features dir");
    fs::write(project.path().join("features/one.feature"), "@job1\nFeature: one").expect("one");
    fs::write(project.path().join("features/two.feature"), "@missing\nFeature: two").expect("two");

    let request = GenerateRequest::from_documents(
        &inputs("myaccount/silverstripe-framework", "5"),
        None,
        None,
        Some(project.path()),
    )
    .expect("request");

    let err = generate(&request, &catalog()).expect_err("partial tags");
    assert_eq!(err.cause_rule(), "untagged_feature_file");
    assert!(err.to_string().contains("At least one .feature files missing a @job[0-9]+ tag"));
}

#[test]
fn project_scan_disables_suites_without_markers() {
    let project = tempfile::tempdir().expect("tempdir");
    fs::write(project.path().join("behat.yml"), "").expect("behat.yml");
    fs::create_dir(project.path().join("features")).expect("features dir");
    fs::write(project.path().join("features/a.feature"), "@job1\nFeature: a").expect("a");
    fs::write(project.path().join("features/b.feature"), "@job2\nFeature: b").expect("b");

    let request = GenerateRequest::from_documents(
        &inputs("myaccount/silverstripe-framework", "5"),
        None,
        None,
        Some(project.path()),
    )
    .expect("request");

    assert_eq!(
        names(&request),
        ["8.1 mysql57 endtoend root job1", "8.1 mysql57 endtoend root job2"]
    );
}

proptest! {
    #[test]
    fn output_is_deterministic_and_free_of_duplicates(
        bits in 0u32..64,
        simple in any::<bool>(),
        force_off in any::<bool>(),
        reference in prop::sample::select(vec!["5", "5.2", "6", "burger", "pulls/6.0/fix"]),
    ) {
        let mut config = MatrixConfig::new("myaccount/silverstripe-framework", reference)
            .with_suites(SuiteSet::from_bits_truncate(bits));
        config.simple_matrix = simple;
        config.phpcoverage_force_off = force_off;
        let request = GenerateRequest::new(config);
        let catalog = catalog();

        let first = generate(&request, &catalog).expect("matrix");
        let second = generate(&request, &catalog).expect("matrix");
        prop_assert_eq!(
            serde_json::to_string(&first).expect("json"),
            serde_json::to_string(&second).expect("json")
        );

        let mut seen = HashSet::new();
        prop_assert!(first.include.iter().all(|job| seen.insert(job.spec.clone())));
    }
}
