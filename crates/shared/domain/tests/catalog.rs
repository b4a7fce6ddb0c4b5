use mgen_domain::catalog::Catalog;
use mgen_domain::engine::DbEngine;
use mgen_domain::version::{ReleaseLine, ReleaseMajor, RuntimeVersion};
use serde_json::json;

fn catalog() -> Catalog {
    serde_json::from_value(json!({
        "lowest_supported_major": "5",
        "highest_stable_major": "6",
        "next_major": "7",
        "releases": [
            { "line": "5", "runtimes": ["8.1", "8.2", "8.3"] },
            { "line": "5.3", "runtimes": ["8.1", "8.2", "8.3"] },
            { "line": "5.4", "runtimes": ["8.1", "8.2", "8.3"] },
            { "line": "6.0", "runtimes": ["8.3", "8.4"] }
        ],
        "engine_policies": [
            {
                "major": "5",
                "default_engine": "mysql57",
                "engines": ["mysql57", "mariadb", "mysql80"]
            }
        ],
        "repositories": [
            { "name": "silverstripe-admin", "lockstepped": true, "major_offset": -3 },
            { "name": "silverstripe-session-manager", "lockstepped": true,
              "majors": [{ "branch": "2", "core": "5" }] },
            { "name": "silverstripe-behat-extension", "lockstepped": true }
        ],
        "exceptions": { "force_independent": ["silverstripe-behat-extension"] },
        "pinned_tags": [{ "tag": "5.0.0-beta2", "installer": "5.0.0-beta1" }]
    }))
    .expect("catalog deserialize")
}

#[test]
fn known_majors_include_next_major() {
    let majors: Vec<u32> = catalog().known_majors().map(ReleaseMajor::get).collect();
    assert_eq!(majors, vec![5, 6, 7]);
}

#[test]
fn current_minor_is_highest_listed_minor() {
    let catalog = catalog();
    let current = |major| catalog.current_minor(ReleaseMajor::new(major)).map(|l| l.to_string());
    assert_eq!(current(5), Some("5.4".into()));
    assert_eq!(current(6), Some("6.0".into()));
    assert_eq!(catalog.current_minor(ReleaseMajor::new(7)), None);
}

#[test]
fn runtimes_are_looked_up_by_exact_line() {
    let catalog = catalog();
    let line: ReleaseLine = "6.0".parse().expect("line");
    assert_eq!(
        catalog.runtimes_for(&line),
        Some([RuntimeVersion::new(8, 3), RuntimeVersion::new(8, 4)].as_slice())
    );
    let missing: ReleaseLine = "6".parse().expect("line");
    assert!(catalog.runtimes_for(&missing).is_none());
}

#[test]
fn repository_offsets_map_branches_to_core_lines() {
    let catalog = catalog();
    let admin = catalog.repository("silverstripe-admin").expect("admin");
    let line: ReleaseLine = "2.1".parse().expect("line");
    assert_eq!(admin.core_line(line).map(|l| l.to_string()), Some("5.1".into()));

    let session = catalog.repository("silverstripe-session-manager").expect("session");
    let line: ReleaseLine = "2.2".parse().expect("line");
    assert_eq!(session.core_line(line).map(|l| l.to_string()), Some("5.2".into()));
}

#[test]
fn forced_independent_overrides_lockstep_flag() {
    let catalog = catalog();
    assert!(catalog.is_lockstepped("silverstripe-admin"));
    assert!(!catalog.is_lockstepped("silverstripe-behat-extension"));
    assert!(!catalog.is_lockstepped("unknown-module"));
}

#[test]
fn policies_and_pins_are_looked_up() {
    let catalog = catalog();
    let policy = catalog.engine_policy(ReleaseMajor::new(5)).expect("policy");
    assert_eq!(policy.default_engine, DbEngine::Mysql57);
    assert!(catalog.engine_policy(ReleaseMajor::new(6)).is_none());
    assert_eq!(catalog.pinned_installer("5.0.0-beta2"), Some("5.0.0-beta1"));
    assert_eq!(catalog.pinned_installer("5.0.0"), None);
}
