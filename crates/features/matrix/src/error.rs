use std::borrow::Cow;

#[mgen_derive::mgen_error]
pub enum MatrixError {
    /// Some feature files carry `@job<N>` tags and this one does not.
    #[error(
        "At least one .feature files missing a @job[0-9]+ tag: {path}{}",
        format_context(.context)
    )]
    UntaggedFeatureFile { path: String, context: Option<Cow<'static, str>> },

    #[error("No database engine policy for major {major}{}", format_context(.context))]
    MissingEnginePolicy { major: String, context: Option<Cow<'static, str>> },
}
