use mgen_domain::suites::SuiteSet;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Generated suites, in the order their jobs are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Suite {
    Phpunit,
    Phpcoverage,
    Phplinting,
    Endtoend,
    Doclinting,
    Js,
}

impl Suite {
    #[must_use]
    pub const fn flag(self) -> SuiteSet {
        match self {
            Self::Phpunit => SuiteSet::PHPUNIT,
            Self::Phpcoverage => SuiteSet::PHPCOVERAGE,
            Self::Phplinting => SuiteSet::PHPLINTING,
            Self::Endtoend => SuiteSet::ENDTOEND,
            Self::Doclinting => SuiteSet::DOCLINTING,
            Self::Js => SuiteSet::JS,
        }
    }
}
