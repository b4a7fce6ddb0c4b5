use crate::version::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Database engines a job can run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbEngine {
    Mysql57,
    Mysql57Pdo,
    Mysql80,
    Mysql84,
    Mariadb,
    Pgsql,
    Sqlite3,
}

impl DbEngine {
    pub const ALL: [Self; 7] = [
        Self::Mysql57,
        Self::Mysql57Pdo,
        Self::Mysql80,
        Self::Mysql84,
        Self::Mariadb,
        Self::Pgsql,
        Self::Sqlite3,
    ];

    /// Identifier used on the wire and in job names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mysql57 => "mysql57",
            Self::Mysql57Pdo => "mysql57pdo",
            Self::Mysql80 => "mysql80",
            Self::Mysql84 => "mysql84",
            Self::Mariadb => "mariadb",
            Self::Pgsql => "pgsql",
            Self::Sqlite3 => "sqlite3",
        }
    }
}

impl fmt::Display for DbEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DbEngine {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|engine| engine.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseError { input: s.to_owned(), expected: "database engine" })
    }
}
