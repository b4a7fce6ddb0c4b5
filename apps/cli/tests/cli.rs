use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const INPUTS: &str = "\
github_repository: 'myaccount/silverstripe-framework'
github_my_ref: '5'
parent_branch: ''
phpunit: true
phplinting: true
endtoend: true
js: true
doclinting: true
";

fn matrixgen(project: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("matrixgen").expect("binary is built");
    cmd.arg("--project-root").arg(project.path());
    cmd
}

fn names(stdout: &[u8]) -> Vec<String> {
    let document: Value = serde_json::from_slice(stdout).expect("stdout is JSON");
    document["include"]
        .as_array()
        .expect("include array")
        .iter()
        .map(|job| job["name"].as_str().expect("name").to_owned())
        .collect()
}

#[test]
fn reads_inputs_from_stdin_without_scanning() {
    let project = TempDir::new().expect("tempdir");
    let output = matrixgen(&project).arg("--no-scan").write_stdin(INPUTS).assert().success();

    let names = names(&output.get_output().stdout);
    assert_eq!(names.len(), 8);
    assert_eq!(names[0], "8.1 prf-low mysql57 phpunit all");
    assert_eq!(names[7], "8.1 mysql57 js");
}

#[test]
fn scan_keeps_only_suites_with_markers() {
    let project = TempDir::new().expect("tempdir");
    fs::write(project.path().join("phpunit.xml.dist"), "<phpunit/>").expect("marker");
    fs::write(project.path().join("inputs.yml"), INPUTS).expect("inputs");

    let output = matrixgen(&project)
        .arg("--input")
        .arg(project.path().join("inputs.yml"))
        .assert()
        .success();

    assert_eq!(
        names(&output.get_output().stdout),
        [
            "8.1 prf-low mysql57 phpunit all",
            "8.2 mariadb phpunit all",
            "8.3 mysql80 phpunit all",
            "8.3 mysql84 phpunit all",
        ]
    );
}

#[test]
fn manifest_constraint_is_applied() {
    let project = TempDir::new().expect("tempdir");
    fs::write(project.path().join("phpunit.xml"), "<phpunit/>").expect("marker");
    fs::write(project.path().join("composer.json"), r#"{"require": {"php": "^8.3"}}"#)
        .expect("manifest");

    let output = matrixgen(&project).write_stdin(INPUTS).assert().success();
    let names = names(&output.get_output().stdout);
    assert!(names.iter().all(|name| name.starts_with("8.3 ")), "{names:?}");
}

#[test]
fn disabled_dynamic_matrix_prints_empty_document() {
    let project = TempDir::new().expect("tempdir");
    let inputs = format!("{INPUTS}dynamic_matrix: false\n");

    matrixgen(&project)
        .arg("--no-scan")
        .write_stdin(inputs)
        .assert()
        .success()
        .stdout(predicate::str::diff("{\"include\":[]}\n"));
}

#[test]
fn unquoted_ref_is_rejected() {
    let project = TempDir::new().expect("tempdir");
    let inputs = INPUTS.replace("github_my_ref: '5'", "github_my_ref: 1.10");

    matrixgen(&project)
        .write_stdin(inputs)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("github_my_ref needs to be surrounded by single-quotes"));
}

#[test]
fn untagged_feature_file_fails_without_output() {
    let project = TempDir::new().expect("tempdir");
    fs::write(project.path().join("behat.yml"), "").expect("behat.yml");
    fs::create_dir(project.path().join("features")).expect("dir");
    fs::write(project.path().join("features/a.feature"), "@job1\nFeature: a").expect("a");
    fs::write(project.path().join("features/b.feature"), "Feature: b").expect("b");

    matrixgen(&project)
        .write_stdin(INPUTS)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("At least one .feature files missing a @job[0-9]+ tag"));
}
