//! Property-based tests for the validation gate using proptest.
//!
//! These tests generate random inputs to find edge cases that manual tests
//! might miss.

use proptest::prelude::*;
use tql_gate::{
    Dialect, GateConfig, QueryRequest, QueryStatus, analyze, evaluate, extract_placeholders,
    validate,
};

fn config() -> GateConfig {
    GateConfig::new()
}

fn request(sql: &str) -> QueryRequest {
    QueryRequest {
        question: "q".to_string(),
        dialect: None,
        schema_metadata: None,
        candidate_sql: sql.to_string(),
        clarifying_questions: Vec::new(),
        assumptions: Vec::new(),
    }
}

// =============================================================================
// Totality: the analyzer and gate must never panic
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn random_printable_never_panics(s in "[[:print:]]{0,200}") {
        let _parsed = analyze(&s);
        let _outcome = evaluate(&s, None, Dialect::Postgres, &config());
    }

    #[test]
    fn random_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..200)) {
        if let Ok(s) = std::str::from_utf8(&bytes) {
            let _parsed = analyze(s);
            let _outcome = evaluate(s, None, Dialect::Postgres, &config());
        }
    }

    #[test]
    fn gate_always_produces_a_status(s in "[[:print:]]{0,200}") {
        let response = validate(&request(&s), &config()).unwrap();
        let _status: QueryStatus = response.status;
    }
}

// =============================================================================
// Multi-statement rejection
// =============================================================================

proptest! {
    /// Any two statements joined by an unquoted semicolon resolve to `error`.
    #[test]
    fn stacked_statements_are_rejected(
        table1 in "[a-zA-Z][a-zA-Z0-9_]{0,12}",
        table2 in "[a-zA-Z][a-zA-Z0-9_]{0,12}"
    ) {
        let sql = format!("SELECT id FROM {table1}; SELECT id FROM {table2}");
        let response = validate(&request(&sql), &config()).unwrap();

        prop_assert_eq!(response.status, QueryStatus::Error);
        prop_assert!(!response.policy_errors.is_empty());
        prop_assert_eq!(&response.sql, &sql, "fatal paths must not rewrite");
    }

    /// Dangerous leading keywords resolve to `error` no matter the object.
    #[test]
    fn dangerous_statements_are_rejected(
        keyword in prop_oneof![
            Just("DROP"),
            Just("TRUNCATE"),
            Just("ALTER"),
            Just("GRANT"),
            Just("REVOKE"),
        ],
        object in "[a-zA-Z][a-zA-Z0-9_]{0,12}"
    ) {
        let sql = format!("{keyword} TABLE {object}");
        let response = validate(&request(&sql), &config()).unwrap();

        prop_assert_eq!(response.status, QueryStatus::Error);
        prop_assert!(!response.policy_errors.is_empty());
    }
}

// =============================================================================
// LIMIT injection idempotence
// =============================================================================

proptest! {
    #[test]
    fn limit_injection_is_idempotent(
        table in "[a-zA-Z][a-zA-Z0-9_]{0,12}",
        column in "[a-zA-Z][a-zA-Z0-9_]{0,12}",
        semicolon in any::<bool>()
    ) {
        let terminator = if semicolon { ";" } else { "" };
        let sql = format!("SELECT {column} FROM {table}{terminator}");

        let first = evaluate(&sql, None, Dialect::Postgres, &config());
        let second = evaluate(&first.sql, None, Dialect::Postgres, &config());

        prop_assert_eq!(&first.sql, &second.sql);
        prop_assert!(first.sql.matches("LIMIT").count() <= 1);
        prop_assert!(!second.limit_enforced);
    }
}

// =============================================================================
// Placeholder round-trip
// =============================================================================

proptest! {
    /// The returned placeholder list is exactly the distinct tokens found,
    /// in first-occurrence order, each with a non-empty meaning.
    #[test]
    fn placeholder_round_trip(
        names in prop::collection::vec("[A-Z][A-Z0-9_]{0,8}", 1..6)
    ) {
        let tokens: Vec<String> = names.iter().map(|n| format!("<{n}>")).collect();
        let sql = format!("SELECT {} FROM t", tokens.join(", "));

        let mut expected: Vec<&String> = Vec::new();
        for token in &tokens {
            if !expected.contains(&token) {
                expected.push(token);
            }
        }

        let found = extract_placeholders(&sql);
        let found_tokens: Vec<&String> = found.iter().map(|p| &p.token).collect();

        prop_assert_eq!(found_tokens, expected);
        for placeholder in &found {
            prop_assert!(!placeholder.meaning.is_empty());
        }
    }
}
