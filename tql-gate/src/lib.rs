//! Deterministic validation gate for LLM-generated SQL.
//!
//! `tql-gate` is the hard core of a natural-language-to-SQL service: the
//! upstream planner and SQL-writer agents are a single round of text
//! generation, but the SQL they produce is untrusted, possibly malformed,
//! and possibly schema-agnostic. This crate turns that candidate SQL into a
//! safe, classified, user-facing result with no further model calls:
//!
//! - [`schema`] parses caller-supplied JSON schema metadata into a closed
//!   model;
//! - [`analyzer`] lexically classifies the statement and extracts referenced
//!   identifiers;
//! - [`placeholder`] finds explicit `<UPPER_SNAKE_CASE>` markers the writer
//!   left behind;
//! - [`policy`] composes those into findings and performs the one permitted
//!   rewrite (injecting a row limit into unbounded SELECTs);
//! - [`status`] resolves everything to one of four terminal statuses;
//! - [`api`] exposes the wire types and the [`validate`] entry point.
//!
//! The whole pipeline is pure, synchronous, and side-effect free: no I/O, no
//! shared mutable state, no locks. It is safe to call concurrently across
//! independent requests; the only shared value is a read-only [`GateConfig`].
//!
//! # Example
//!
//! ```
//! use tql_gate::{GateConfig, QueryRequest, QueryStatus, validate};
//!
//! let config = GateConfig::new();
//! let request = QueryRequest {
//!     question: "Delete inactive accounts".to_string(),
//!     dialect: None,
//!     schema_metadata: Some(serde_json::json!({
//!         "tables": [{"name": "accounts", "columns": [{"name": "id"}, {"name": "status"}]}]
//!     })),
//!     candidate_sql: "DELETE FROM accounts WHERE status = 'inactive'".to_string(),
//!     clarifying_questions: Vec::new(),
//!     assumptions: Vec::new(),
//! };
//!
//! let response = validate(&request, &config).unwrap();
//! assert_eq!(response.status, QueryStatus::ReviewRequired);
//! assert_eq!(response.sql, "DELETE FROM accounts WHERE status = 'inactive'");
//! ```

pub mod analyzer;
pub mod api;
pub mod checker;
pub mod config;
pub mod dialect;
pub mod placeholder;
pub mod policy;
pub mod schema;
pub mod status;

pub use analyzer::{ParsedStatement, StatementType, analyze};
pub use api::{QueryRequest, QueryResponse, validate};
pub use config::{DANGEROUS_KEYWORDS, GateConfig};
pub use dialect::{Dialect, DialectParseError};
pub use placeholder::{Placeholder, extract_placeholders};
pub use policy::{Finding, FindingKind, GateOutcome, evaluate};
pub use schema::{Column, SchemaModel, SchemaParseError, Table, lint_schema, parse_schema};
pub use status::{QueryStatus, resolve_status};
