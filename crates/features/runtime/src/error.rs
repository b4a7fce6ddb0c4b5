use std::borrow::Cow;

#[mgen_derive::mgen_error]
pub enum RuntimeError {
    /// The catalog lists no runtimes for the line nor for its major.
    #[error("No runtime versions are known for release line {line}{}", format_context(.context))]
    UnknownReleaseLine { line: String, context: Option<Cow<'static, str>> },

    #[error(
        "Runtime constraint '{constraint}' matches none of {universe} and nothing lower is available{}",
        format_context(.context)
    )]
    NoSatisfiableRuntime {
        constraint: String,
        universe: String,
        context: Option<Cow<'static, str>>,
    },
}
