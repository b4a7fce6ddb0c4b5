#[test]
fn mgen_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/mgen_error_pass.rs");
    t.pass("tests/ui/mgen_error_rule.rs");
}
