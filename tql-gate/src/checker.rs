//! Schema consistency checking.
//!
//! Cross-references the identifiers the analyzer extracted against a parsed
//! [`SchemaModel`]. Columns are checked against the union of all tables'
//! columns, since the lexical analyzer does not always know which table a
//! column came from. Callers skip this check entirely when no schema was
//! supplied; a present schema with zero tables is still checked (and will
//! flag every referenced identifier).

use crate::analyzer::ParsedStatement;
use crate::schema::SchemaModel;

/// Report identifiers that do not exist in the schema.
///
/// Returns one message per unknown table or column, in the order the
/// analyzer discovered them. Matching is case-insensitive. Identifiers the
/// analyzer failed to extract are silently missed — an accepted
/// precision/recall tradeoff of the lexical approach.
#[must_use]
pub fn check_identifiers(statement: &ParsedStatement, schema: &SchemaModel) -> Vec<String> {
    let mut issues = Vec::new();

    for table in &statement.referenced_tables {
        if !schema.has_table(table) {
            issues.push(format!("Table '{table}' not found in provided schema"));
        }
    }

    for column in &statement.referenced_columns {
        let known = schema
            .tables
            .iter()
            .any(|table| table.has_column(column));
        if !known {
            issues.push(format!("Column '{column}' not found in provided schema"));
        }
    }

    issues
}
