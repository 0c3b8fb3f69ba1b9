//! The deterministic policy gate.
//!
//! Composes the analyzer, placeholder extractor, and schema checker into
//! policy decisions, and performs the single SQL mutation the pipeline
//! allows: appending a row limit to unbounded SELECT statements.
//!
//! Order of operations is fixed. Multi-statement payloads are rejected
//! before anything else — multiple statements in one request are the single
//! highest-risk injection vector. Dangerous leading keywords are rejected
//! next. Everything after that accumulates advisory findings and always
//! yields a usable SQL string.

use crate::analyzer::{self, ParsedStatement, StatementType};
use crate::checker;
use crate::config::GateConfig;
use crate::dialect::Dialect;
use crate::placeholder::{self, Placeholder};
use crate::schema::SchemaModel;

/// Category of a policy finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    /// More than one statement in the request. Fatal.
    MultiStatement,
    /// A dangerous (irreversible/administrative) leading keyword. Fatal.
    DangerousOperation,
    /// No schema was supplied, so identifiers could not be verified.
    MissingSchema,
    /// A referenced table or column does not exist in the supplied schema.
    UnknownIdentifier,
    /// The statement writes data (INSERT/UPDATE/DELETE).
    ModifyingStatement,
}

impl FindingKind {
    /// Fatal findings force `status = error` and short-circuit the gate.
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::MultiStatement | Self::DangerousOperation)
    }
}

/// One safety or completeness concern raised by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Category.
    pub kind: FindingKind,
    /// Human-readable detail, ready for the response payload.
    pub detail: String,
}

impl Finding {
    /// Create a finding.
    #[must_use]
    pub fn new(kind: FindingKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Everything the gate decided about one candidate SQL string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    /// The SQL to hand back — rewritten only when a row limit was injected.
    pub sql: String,
    /// Analyzer output for the candidate.
    pub statement: ParsedStatement,
    /// Findings in discovery order.
    pub findings: Vec<Finding>,
    /// Placeholders discovered in the (possibly rewritten) SQL.
    pub placeholders: Vec<Placeholder>,
    /// Whether a `LIMIT` clause was appended.
    pub limit_enforced: bool,
}

/// Run every policy check against one candidate SQL string.
///
/// `dialect` is accepted for forward compatibility but does not change gate
/// behavior in v1 (no dialect-specific LIMIT or quoting rules).
///
/// # Example
///
/// ```
/// use tql_gate::{Dialect, GateConfig, evaluate};
///
/// let config = GateConfig::new();
/// let outcome = evaluate("SELECT * FROM accounts", None, Dialect::Postgres, &config);
/// assert_eq!(outcome.sql, "SELECT * FROM accounts LIMIT 50");
/// assert!(outcome.limit_enforced);
/// ```
#[must_use]
pub fn evaluate(
    sql: &str,
    schema: Option<&SchemaModel>,
    _dialect: Dialect,
    config: &GateConfig,
) -> GateOutcome {
    let statement = analyzer::analyze(sql);

    // 1. Multiple statements: reject before any other analysis, no rewrite.
    if statement.is_multi_statement {
        let finding = Finding::new(
            FindingKind::MultiStatement,
            "Multiple SQL statements detected. Please submit one query at a time.",
        );
        return GateOutcome {
            sql: sql.to_string(),
            statement,
            findings: vec![finding],
            placeholders: Vec::new(),
            limit_enforced: false,
        };
    }

    // 2. Dangerous leading keyword: reject, no rewrite.
    if !statement.dangerous_keywords.is_empty() {
        let findings = statement
            .dangerous_keywords
            .iter()
            .map(|keyword| Finding::new(FindingKind::DangerousOperation, dangerous_detail(keyword)))
            .collect();
        return GateOutcome {
            sql: sql.to_string(),
            statement,
            findings,
            placeholders: Vec::new(),
            limit_enforced: false,
        };
    }

    let mut findings = Vec::new();

    // 3. Unbounded SELECT: append the configured row limit.
    let mut rewritten = sql.to_string();
    let mut limit_enforced = false;
    if statement.statement_type == StatementType::Select && !statement.has_top_level_limit {
        rewritten = append_limit(sql, config.max_row_limit);
        limit_enforced = true;
    }

    // 4. Modifying statements get a cautionary finding, never a rejection.
    if let Some(detail) = modifying_detail(statement.statement_type) {
        findings.push(Finding::new(FindingKind::ModifyingStatement, detail));
    }

    // 5. Placeholders, scanned over the possibly rewritten SQL.
    let placeholders = placeholder::extract_placeholders(&rewritten);

    // 6. Schema cross-check, or a single missing-schema finding.
    match schema {
        Some(model) => {
            for issue in checker::check_identifiers(&statement, model) {
                findings.push(Finding::new(FindingKind::UnknownIdentifier, issue));
            }
        },
        None => findings.push(Finding::new(
            FindingKind::MissingSchema,
            "No schema was provided; table and column references could not be verified",
        )),
    }

    GateOutcome {
        sql: rewritten,
        statement,
        findings,
        placeholders,
        limit_enforced,
    }
}

/// Append `LIMIT {max}` before any trailing semicolon.
///
/// Only called when the statement has no top-level LIMIT, which is what makes
/// the rewrite idempotent: running the gate on its own output finds the
/// injected clause and leaves the SQL alone.
fn append_limit(sql: &str, max_row_limit: u32) -> String {
    let trimmed = sql.trim_end();
    match trimmed.strip_suffix(';') {
        Some(body) => format!("{} LIMIT {max_row_limit};", body.trim_end()),
        None => format!("{trimmed} LIMIT {max_row_limit}"),
    }
}

fn dangerous_detail(keyword: &str) -> String {
    let reason = match keyword {
        "DROP" => "it permanently deletes database objects",
        "TRUNCATE" => "it permanently deletes all rows in a table",
        "ALTER" => "it changes table structure",
        "CREATE" => "it creates database objects",
        "GRANT" | "REVOKE" => "it changes database permissions",
        "EXEC" | "EXECUTE" => "it runs arbitrary procedures",
        _ => "it is an administrative operation",
    };
    format!("{keyword} statements are not allowed: {reason}")
}

const fn modifying_detail(statement_type: StatementType) -> Option<&'static str> {
    match statement_type {
        StatementType::Insert => {
            Some("This is an INSERT statement - it will add new data when executed")
        },
        StatementType::Update => Some(
            "This is an UPDATE statement - it will modify existing data when executed. \
             Verify the WHERE clause carefully.",
        ),
        StatementType::Delete => Some(
            "This is a DELETE statement - it will permanently remove data when executed. \
             Verify the WHERE clause carefully.",
        ),
        StatementType::Select | StatementType::Other => None,
    }
}
