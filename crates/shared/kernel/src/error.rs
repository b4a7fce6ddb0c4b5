use std::borrow::Cow;

#[mgen_derive::mgen_error]
pub enum KernelError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("JSON decode error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Project scan error{}: {source}", format_context(.context))]
    Walk { source: walkdir::Error, context: Option<Cow<'static, str>> },

    /// An ambiguous scalar (e.g. `1.10`) was not written as a string.
    #[error("{field} needs to be surrounded by single-quotes{}", format_context(.context))]
    UnquotedScalar { field: &'static str, context: Option<Cow<'static, str>> },

    #[error("Failed to parse yml{}: {message}", format_context(.context))]
    InvalidInputs { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid catalog{}: {message}", format_context(.context))]
    InvalidCatalog { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
