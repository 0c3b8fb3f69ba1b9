//! SQL dialect tags for Postgres, `MySQL`, and `SQLite`.
//!
//! The dialect travels with the request so the upstream SQL writer can
//! target the right syntax. The gate itself is dialect-blind in v1: no
//! keyword or LIMIT-syntax variation is applied per dialect.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target SQL dialect for generated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `PostgreSQL` syntax.
    #[default]
    Postgres,
    /// `MySQL` syntax.
    Mysql,
    /// `SQLite` syntax.
    Sqlite,
}

impl Dialect {
    /// Canonical lowercase name, as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = DialectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" => Ok(Self::Mysql),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(DialectParseError { name: s.to_string() }),
        }
    }
}

/// Error for dialect names that are not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectParseError {
    /// The name that failed to parse.
    pub name: String,
}

impl fmt::Display for DialectParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown SQL dialect '{}'. Supported dialects: postgres, mysql, sqlite",
            self.name
        )
    }
}

impl std::error::Error for DialectParseError {}
