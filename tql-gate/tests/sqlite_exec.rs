//! Executes gate output against a real SQLite database.
//!
//! The gate's one rewrite (LIMIT injection) must always produce SQL the
//! database actually accepts; these tests validate that end to end instead
//! of trusting string assertions.

use rusqlite::Connection;
use tql_gate::{Dialect, GateConfig, evaluate};

fn seeded_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory database");
    conn.execute_batch(
        "CREATE TABLE accounts (id INTEGER PRIMARY KEY, status TEXT NOT NULL);
         INSERT INTO accounts (id, status) VALUES
             (1, 'active'),
             (2, 'inactive'),
             (3, 'inactive');",
    )
    .expect("seed schema");
    conn
}

fn gate(sql: &str, config: &GateConfig) -> String {
    evaluate(sql, None, Dialect::Sqlite, config).sql
}

#[test]
fn rewritten_select_executes() {
    let conn = seeded_connection();
    let sql = gate(
        "SELECT id FROM accounts WHERE status = 'inactive'",
        &GateConfig::new(),
    );

    let mut stmt = conn.prepare(&sql).expect("rewritten SQL must parse");
    let ids: Vec<i64> = stmt
        .query_map([], |row| row.get(0))
        .expect("query runs")
        .collect::<Result<_, _>>()
        .expect("rows decode");

    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn injected_limit_actually_limits() {
    let conn = seeded_connection();
    for id in 4..100 {
        conn.execute(
            "INSERT INTO accounts (id, status) VALUES (?1, 'inactive')",
            [id],
        )
        .expect("insert row");
    }

    let config = GateConfig::new().max_row_limit(5);
    let sql = gate("SELECT id FROM accounts", &config);

    let mut stmt = conn.prepare(&sql).expect("rewritten SQL must parse");
    let ids: Vec<i64> = stmt
        .query_map([], |row| row.get(0))
        .expect("query runs")
        .collect::<Result<_, _>>()
        .expect("rows decode");

    assert_eq!(ids.len(), 5);
}

#[test]
fn rewritten_select_with_trailing_semicolon_executes() {
    let conn = seeded_connection();
    let sql = gate("SELECT id FROM accounts ORDER BY id;", &GateConfig::new());

    conn.prepare(&sql).expect("rewritten SQL must parse");
}

#[test]
fn rewritten_cte_select_executes() {
    let conn = seeded_connection();
    let sql = gate(
        "WITH inactive AS (SELECT id FROM accounts WHERE status = 'inactive') \
         SELECT id FROM inactive",
        &GateConfig::new(),
    );

    let mut stmt = conn.prepare(&sql).expect("rewritten CTE must parse");
    let ids: Vec<i64> = stmt
        .query_map([], |row| row.get(0))
        .expect("query runs")
        .collect::<Result<_, _>>()
        .expect("rows decode");

    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn unmodified_delete_still_executes() {
    let conn = seeded_connection();
    let sql = gate(
        "DELETE FROM accounts WHERE status = 'inactive'",
        &GateConfig::new(),
    );

    // The gate leaves modifying statements untouched; they stay executable.
    let affected = conn.execute(&sql, []).expect("delete runs");
    assert_eq!(affected, 2);
}

#[test]
fn bounded_select_passes_through_executable() {
    let conn = seeded_connection();
    let sql = gate("SELECT id FROM accounts LIMIT 1", &GateConfig::new());

    assert_eq!(sql, "SELECT id FROM accounts LIMIT 1");
    conn.prepare(&sql).expect("untouched SQL must parse");
}
