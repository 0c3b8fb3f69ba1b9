//! Snapshot tests for gate rewrites and response payloads.
//!
//! These use insta inline snapshots to pin the exact SQL the gate emits and
//! the exact wire shape of the response.
//!
//! Run with: cargo test -p tql-gate
//! Update snapshots: cargo insta review

use insta::assert_snapshot;
use serde_json::json;
use tql_gate::{Dialect, GateConfig, QueryRequest, evaluate, validate};

fn request(sql: &str) -> QueryRequest {
    QueryRequest {
        question: "test".to_string(),
        dialect: None,
        schema_metadata: None,
        candidate_sql: sql.to_string(),
        clarifying_questions: Vec::new(),
        assumptions: Vec::new(),
    }
}

fn response_json(request: &QueryRequest) -> String {
    let response = validate(request, &GateConfig::new()).unwrap();
    serde_json::to_string(&response).unwrap()
}

// =============================================================================
// Rewritten SQL snapshots
// =============================================================================

#[test]
fn snapshot_limit_injection() {
    let outcome = evaluate(
        "SELECT * FROM accounts WHERE status = 'inactive'",
        None,
        Dialect::Postgres,
        &GateConfig::new(),
    );
    assert_snapshot!(outcome.sql, @"SELECT * FROM accounts WHERE status = 'inactive' LIMIT 50");
}

#[test]
fn snapshot_limit_injection_with_semicolon() {
    let outcome = evaluate(
        "SELECT id FROM users ORDER BY id;",
        None,
        Dialect::Postgres,
        &GateConfig::new(),
    );
    assert_snapshot!(outcome.sql, @"SELECT id FROM users ORDER BY id LIMIT 50;");
}

#[test]
fn snapshot_modifying_statement_untouched() {
    let outcome = evaluate(
        "DELETE FROM accounts WHERE status = 'inactive'",
        None,
        Dialect::Postgres,
        &GateConfig::new(),
    );
    assert_snapshot!(outcome.sql, @"DELETE FROM accounts WHERE status = 'inactive'");
}

// =============================================================================
// Response payload snapshots
// =============================================================================

#[test]
fn snapshot_draft_response() {
    assert_snapshot!(
        response_json(&request("SELECT * FROM accounts WHERE status = 'inactive'")),
        @r#"{"sql":"SELECT * FROM accounts WHERE status = 'inactive' LIMIT 50","status":"draft","placeholders":[],"warnings":["LIMIT 50 was enforced on the query","No schema was provided; table and column references could not be verified"],"clarifying_questions":[],"assumptions":[],"policy_errors":[]}"#
    );
}

#[test]
fn snapshot_error_response() {
    assert_snapshot!(
        response_json(&request("SELECT 1; DROP TABLE users;")),
        @r#"{"sql":"SELECT 1; DROP TABLE users;","status":"error","placeholders":[],"warnings":[],"clarifying_questions":[],"assumptions":[],"policy_errors":["Multiple SQL statements detected. Please submit one query at a time."]}"#
    );
}

#[test]
fn snapshot_placeholder_response() {
    assert_snapshot!(
        response_json(&request("SELECT * FROM <USERS_TABLE>")),
        @r#"{"sql":"SELECT * FROM <USERS_TABLE> LIMIT 50","status":"draft","placeholders":[{"token":"<USERS_TABLE>","meaning":"Table name for users"}],"warnings":["LIMIT 50 was enforced on the query","SQL contains placeholders that need to be replaced with actual values","No schema was provided; table and column references could not be verified"],"clarifying_questions":["Please provide your database schema to remove placeholders."],"assumptions":[],"policy_errors":[]}"#
    );
}

#[test]
fn snapshot_review_required_response() {
    let mut req = request("DELETE FROM accounts WHERE status = 'inactive'");
    req.schema_metadata = Some(json!({
        "tables": [{"name": "accounts", "columns": [{"name": "id"}, {"name": "status"}]}]
    }));
    assert_snapshot!(
        response_json(&req),
        @r#"{"sql":"DELETE FROM accounts WHERE status = 'inactive'","status":"review_required","placeholders":[],"warnings":["This is a DELETE statement - it will permanently remove data when executed. Verify the WHERE clause carefully."],"clarifying_questions":[],"assumptions":[],"policy_errors":[]}"#
    );
}
