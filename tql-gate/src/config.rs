//! Gate configuration.
//!
//! Configuration is an explicit immutable value built once at process start
//! and passed by reference into the gate. There is no runtime-mutable
//! singleton; concurrent requests share the same `GateConfig` without locks.

use crate::dialect::Dialect;

/// Statement-leading keywords that are rejected outright.
///
/// These cover irreversible or administrative operations. The list is fixed
/// in v1 and intentionally not part of [`GateConfig`]: callers cannot widen
/// or narrow it per request.
pub const DANGEROUS_KEYWORDS: &[&str] = &[
    "DROP", "TRUNCATE", "ALTER", "CREATE", "GRANT", "REVOKE", "EXEC", "EXECUTE", "MERGE", "UPSERT",
];

/// Read-only configuration consumed by the validation pipeline.
///
/// # Example
///
/// ```
/// use tql_gate::{Dialect, GateConfig};
///
/// let config = GateConfig::new()
///     .max_row_limit(100)
///     .default_dialect(Dialect::Sqlite);
///
/// assert_eq!(config.max_row_limit, 100);
/// ```
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Row limit appended to SELECT statements that carry no top-level LIMIT.
    pub max_row_limit: u32,
    /// Dialect assumed when a request does not name one.
    pub default_dialect: Dialect,
}

impl GateConfig {
    /// Create a configuration with the stock defaults: `LIMIT 50`, postgres.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_row_limit: 50,
            default_dialect: Dialect::Postgres,
        }
    }

    /// Set the row limit enforced on unbounded SELECT statements.
    #[must_use]
    pub const fn max_row_limit(mut self, limit: u32) -> Self {
        self.max_row_limit = limit;
        self
    }

    /// Set the dialect assumed when a request does not name one.
    #[must_use]
    pub const fn default_dialect(mut self, dialect: Dialect) -> Self {
        self.default_dialect = dialect;
        self
    }

    /// Build a configuration from the process environment.
    ///
    /// Recognized variables: `TQL_MAX_ROW_LIMIT` (positive integer) and
    /// `TQL_DEFAULT_DIALECT` (`postgres`, `mysql`, `sqlite`). Unset or
    /// unparseable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let vars: Vec<(String, String)> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Build a configuration from an explicit variable list.
    ///
    /// Same lookup rules as [`from_env`](Self::from_env); useful for tests
    /// and for hosts that hand the environment in as data.
    #[must_use]
    pub fn from_vars(vars: &[(String, String)]) -> Self {
        let mut config = Self::new();

        if let Some(value) = lookup(vars, "TQL_MAX_ROW_LIMIT") {
            if let Ok(limit) = value.trim().parse::<u32>() {
                if limit > 0 {
                    config.max_row_limit = limit;
                }
            }
        }

        if let Some(value) = lookup(vars, "TQL_DEFAULT_DIALECT") {
            if let Ok(dialect) = value.parse() {
                config.default_dialect = dialect;
            }
        }

        config
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup<'a>(vars: &'a [(String, String)], name: &str) -> Option<&'a str> {
    vars.iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}
