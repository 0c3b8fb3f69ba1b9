//! Placeholder token detection.
//!
//! When the SQL writer cannot resolve an identifier it emits an explicit
//! marker in the form `<UPPER_SNAKE_CASE>`. This module finds those markers
//! and attaches a human-readable meaning to each one. The meaning comes from
//! an explicit suffix lookup, never from a model call.

use serde::{Deserialize, Serialize};

/// A placeholder the writer left in the SQL, with a derived explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    /// The literal token, e.g. `<CUSTOMERS_TABLE>`.
    pub token: String,
    /// Human-readable explanation of what the token stands for.
    pub meaning: String,
}

/// Extract placeholder tokens from SQL text.
///
/// Tokens match `<[A-Z][A-Z0-9_]*>`. The result is ordered by first
/// occurrence and deduplicated by token text; every entry carries a
/// non-empty meaning.
///
/// # Example
///
/// ```
/// use tql_gate::extract_placeholders;
///
/// let found = extract_placeholders("SELECT * FROM <CUSTOMERS_TABLE>");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].token, "<CUSTOMERS_TABLE>");
/// assert!(found[0].meaning.contains("Table"));
/// ```
#[must_use]
pub fn extract_placeholders(sql: &str) -> Vec<Placeholder> {
    let chars: Vec<char> = sql.chars().collect();
    let mut found: Vec<Placeholder> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '<' {
            i += 1;
            continue;
        }
        match token_end(&chars, i) {
            Some(end) => {
                let token: String = chars[i..=end].iter().collect();
                if !found.iter().any(|p| p.token == token) {
                    let inner: String = chars[i + 1..end].iter().collect();
                    found.push(Placeholder {
                        meaning: describe(&inner),
                        token,
                    });
                }
                i = end + 1;
            },
            None => i += 1,
        }
    }

    found
}

/// Index of the closing `>` if a placeholder starts at `start`.
fn token_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if !chars.get(i).is_some_and(char::is_ascii_uppercase) {
        return None;
    }
    i += 1;
    while chars
        .get(i)
        .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '_')
    {
        i += 1;
    }
    (chars.get(i) == Some(&'>')).then_some(i)
}

/// Suffix-heuristic meaning lookup with a generic fallback.
fn describe(inner: &str) -> String {
    let words = inner.to_ascii_lowercase().replace('_', " ");

    if words.contains("table") {
        let rest = remove_word(&words, "table");
        if rest.is_empty() {
            "Table name to be specified".to_string()
        } else {
            format!("Table name for {rest}")
        }
    } else if words.contains("column") {
        let rest = remove_word(&words, "column");
        if rest.is_empty() {
            "Column name to be specified".to_string()
        } else {
            format!("Column name for {rest}")
        }
    } else {
        format!("Value or identifier for {words}")
    }
}

fn remove_word(words: &str, word: &str) -> String {
    words
        .split_whitespace()
        .filter(|w| *w != word)
        .collect::<Vec<_>>()
        .join(" ")
}
