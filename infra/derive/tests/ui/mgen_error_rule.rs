use mgen_derive::mgen_error;
use std::borrow::Cow;

#[mgen_error]
pub enum ResolveError {
    #[error("No runtime satisfies '{constraint}'{}", format_context(.context))]
    NoSatisfiableRuntime { constraint: String, context: Option<Cow<'static, str>> },

    #[error("Feature file {path} lacks a job tag")]
    UntaggedFeatureFile { path: String },
}

fn main() {
    let err = ResolveError::NoSatisfiableRuntime { constraint: "^9".to_owned(), context: None };
    assert_eq!(err.rule(), "no_satisfiable_runtime");

    let err: Result<(), ResolveError> = Err(err);
    let err = err.context("major 5").unwrap_err();
    assert_eq!(err.to_string(), "No runtime satisfies '^9' (major 5)");

    let untagged = ResolveError::UntaggedFeatureFile { path: "a.feature".to_owned() };
    assert_eq!(untagged.rule(), "untagged_feature_file");
}
