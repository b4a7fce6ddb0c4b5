use bitflags::bitflags;

bitflags! {
    /// Test suites a matrix request can enable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct SuiteSet: u32 {
        const PHPUNIT = 1 << 0;
        const PHPCOVERAGE = 1 << 1;
        const PHPLINTING = 1 << 2;
        const ENDTOEND = 1 << 3;
        const DOCLINTING = 1 << 4;
        const JS = 1 << 5;
    }
}

const KEYS: [(SuiteSet, &str); 6] = [
    (SuiteSet::PHPUNIT, "phpunit"),
    (SuiteSet::PHPCOVERAGE, "phpcoverage"),
    (SuiteSet::PHPLINTING, "phplinting"),
    (SuiteSet::ENDTOEND, "endtoend"),
    (SuiteSet::DOCLINTING, "doclinting"),
    (SuiteSet::JS, "js"),
];

impl SuiteSet {
    /// Input key of a single suite flag; `None` for combinations.
    #[must_use]
    pub fn key(self) -> Option<&'static str> {
        KEYS.iter().find(|(flag, _)| *flag == self).map(|(_, key)| *key)
    }
}

impl From<&str> for SuiteSet {
    fn from(s: &str) -> Self {
        match s {
            "all" | "*" => Self::all(),
            _ => KEYS.iter().find(|(_, key)| *key == s).map_or_else(Self::empty, |(flag, _)| *flag),
        }
    }
}
