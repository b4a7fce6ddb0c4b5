use mgen_kernel::KernelError;
use mgen_matrix::MatrixError;
use mgen_runtime::RuntimeError;
use std::borrow::Cow;

#[mgen_derive::mgen_error]
pub enum GenerateError {
    #[error("Loading inputs failed{}: {source}", format_context(.context))]
    Kernel { source: KernelError, context: Option<Cow<'static, str>> },

    #[error("Runtime resolution failed{}: {source}", format_context(.context))]
    Runtime { source: RuntimeError, context: Option<Cow<'static, str>> },

    #[error("Matrix expansion failed{}: {source}", format_context(.context))]
    Matrix { source: MatrixError, context: Option<Cow<'static, str>> },
}

impl GenerateError {
    /// Rule of the underlying failure, e.g. `untagged_feature_file`.
    #[must_use]
    pub const fn cause_rule(&self) -> &'static str {
        match self {
            Self::Kernel { source, .. } => source.rule(),
            Self::Runtime { source, .. } => source.rule(),
            Self::Matrix { source, .. } => source.rule(),
        }
    }
}
