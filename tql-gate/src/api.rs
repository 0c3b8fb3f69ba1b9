//! Wire types and the pipeline entry point.
//!
//! These types define the contract with the orchestrator that runs the
//! planner and SQL-writer agents. The gate's only obligation at this
//! boundary is to accept a finished candidate-SQL string (plus whatever the
//! agents produced alongside it) and return a structured response; it
//! assumes nothing about retries or timeouts upstream.

use serde::{Deserialize, Serialize};

use crate::config::GateConfig;
use crate::placeholder::Placeholder;
use crate::policy::{self, FindingKind};
use crate::schema::{self, SchemaParseError};
use crate::status::{self, QueryStatus};

/// A validation request, assembled by the orchestrator after the writer
/// agent has produced candidate SQL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The original natural-language question.
    pub question: String,
    /// Target dialect; falls back to the configured default when absent.
    #[serde(default)]
    pub dialect: Option<crate::Dialect>,
    /// Optional database schema metadata, as raw JSON.
    #[serde(default)]
    pub schema_metadata: Option<serde_json::Value>,
    /// The candidate SQL produced by the writer agent. Untrusted.
    pub candidate_sql: String,
    /// Clarifying questions collected by the planner agent.
    #[serde(default)]
    pub clarifying_questions: Vec<String>,
    /// Assumptions collected by the planner agent.
    #[serde(default)]
    pub assumptions: Vec<String>,
}

/// The terminal, wire-compatible validation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// The validated (possibly rewritten) SQL.
    pub sql: String,
    /// Final status.
    pub status: QueryStatus,
    /// Placeholders that still need user-supplied values.
    pub placeholders: Vec<Placeholder>,
    /// Advisory warnings.
    pub warnings: Vec<String>,
    /// Questions to surface back to the user.
    pub clarifying_questions: Vec<String>,
    /// Assumptions the agents made while generating the SQL.
    pub assumptions: Vec<String>,
    /// Hard policy violations; non-empty exactly when status is `error`.
    pub policy_errors: Vec<String>,
}

/// Run the full deterministic pipeline over one request.
///
/// Malformed schema metadata is a request-level error and returns
/// `Err(SchemaParseError)` before the gate runs. Everything else — including
/// unparseable SQL, policy violations, and schema mismatches — produces an
/// `Ok` response carrying one of the four statuses; there is no silent
/// failure mode.
///
/// # Example
///
/// ```
/// use tql_gate::{GateConfig, QueryRequest, QueryStatus, validate};
///
/// let request = QueryRequest {
///     question: "Show inactive accounts".to_string(),
///     dialect: None,
///     schema_metadata: None,
///     candidate_sql: "SELECT * FROM accounts WHERE status = 'inactive'".to_string(),
///     clarifying_questions: Vec::new(),
///     assumptions: Vec::new(),
/// };
/// let response = validate(&request, &GateConfig::new()).unwrap();
///
/// assert_eq!(response.status, QueryStatus::Draft);
/// assert!(response.sql.ends_with("LIMIT 50"));
/// ```
pub fn validate(
    request: &QueryRequest,
    config: &GateConfig,
) -> Result<QueryResponse, SchemaParseError> {
    let schema = match &request.schema_metadata {
        Some(value) => Some(schema::parse_schema(value)?),
        None => None,
    };
    let dialect = request.dialect.unwrap_or(config.default_dialect);

    let outcome = policy::evaluate(&request.candidate_sql, schema.as_ref(), dialect, config);
    let status = status::resolve_status(&outcome.findings, &outcome.placeholders);

    let mut warnings = Vec::new();
    let mut policy_errors = Vec::new();

    for finding in &outcome.findings {
        if finding.kind.is_fatal() {
            policy_errors.push(finding.detail.clone());
        } else if finding.kind == FindingKind::ModifyingStatement {
            warnings.push(finding.detail.clone());
        }
    }
    if outcome.limit_enforced {
        warnings.push(format!(
            "LIMIT {} was enforced on the query",
            config.max_row_limit
        ));
    }
    if !outcome.placeholders.is_empty() {
        warnings
            .push("SQL contains placeholders that need to be replaced with actual values".to_string());
    }
    for finding in &outcome.findings {
        if matches!(
            finding.kind,
            FindingKind::MissingSchema | FindingKind::UnknownIdentifier
        ) {
            warnings.push(finding.detail.clone());
        }
    }

    let mut clarifying_questions = request.clarifying_questions.clone();
    if status == QueryStatus::Draft
        && !outcome.placeholders.is_empty()
        && !clarifying_questions
            .iter()
            .any(|q| q.to_lowercase().contains("schema"))
    {
        clarifying_questions
            .push("Please provide your database schema to remove placeholders.".to_string());
    }

    Ok(QueryResponse {
        sql: outcome.sql,
        status,
        placeholders: outcome.placeholders,
        warnings,
        clarifying_questions,
        assumptions: request.assumptions.clone(),
        policy_errors,
    })
}
