//! Schema metadata parsing and the internal schema model.
//!
//! Callers may attach database schema metadata to a request as arbitrary
//! JSON. That JSON goes through a strict parse-then-validate step here and
//! comes out as a closed [`SchemaModel`]; nothing downstream ever touches the
//! raw value. Absent metadata is not an error — the pipeline represents it as
//! `Option<SchemaModel>`, and `None` is deliberately distinct from a present
//! schema with zero tables (the latter still participates in identifier
//! checks).
//!
//! Expected shape:
//!
//! ```json
//! {
//!   "tables": [
//!     {
//!       "name": "customers",
//!       "columns": [
//!         {"name": "id", "type": "integer", "primary_key": true},
//!         {"name": "state", "type": "varchar"}
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::fmt;

use serde_json::Value;

/// A database column as described by caller-supplied metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Optional data type, informational only.
    pub column_type: Option<String>,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Whether this column is a primary key.
    pub primary_key: bool,
    /// Optional foreign key reference in `table.column` form.
    pub foreign_key: Option<String>,
}

/// A database table: a name plus its columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
    /// Optional human-readable description.
    pub description: Option<String>,
}

impl Table {
    /// Check whether the table has a column with the given name,
    /// case-insensitively.
    #[must_use]
    pub fn has_column(&self, column_name: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(column_name))
    }

    /// Look up a column by name, case-insensitively.
    #[must_use]
    pub fn get_column(&self, column_name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(column_name))
    }
}

/// The parsed schema model: an ordered sequence of tables.
///
/// Table names are unique within a model and column names are unique within
/// a table, both case-insensitively; [`lint_schema`] reports violations as
/// advisory warnings rather than hard errors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaModel {
    /// Tables in declaration order.
    pub tables: Vec<Table>,
}

impl SchemaModel {
    /// Whether the schema describes no tables at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Check whether the schema has a table with the given name,
    /// case-insensitively.
    #[must_use]
    pub fn has_table(&self, table_name: &str) -> bool {
        self.tables
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case(table_name))
    }

    /// Look up a table by name, case-insensitively.
    #[must_use]
    pub fn get_table(&self, table_name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(table_name))
    }

    /// Check whether a specific table has a specific column.
    #[must_use]
    pub fn has_column(&self, table_name: &str, column_name: &str) -> bool {
        self.get_table(table_name)
            .is_some_and(|t| t.has_column(column_name))
    }

    /// Compact one-line rendering, `Tables: users(id, name); orders(id)`.
    ///
    /// This is the form handed to the upstream prompt builder.
    #[must_use]
    pub fn to_compact_string(&self) -> String {
        if self.is_empty() {
            return "No schema provided.".to_string();
        }
        let parts: Vec<String> = self
            .tables
            .iter()
            .map(|table| {
                let cols: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
                format!("{}({})", table.name, cols.join(", "))
            })
            .collect();
        format!("Tables: {}", parts.join("; "))
    }
}

/// Error raised when schema metadata does not conform to the expected shape.
///
/// This is a request-level error: it is surfaced to the caller before the
/// gate runs and never produces a partial schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaParseError {
    message: String,
}

impl SchemaParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SchemaParseError {}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse caller-supplied schema metadata into a [`SchemaModel`].
///
/// The top-level value must be an object; a `tables` key, when present, must
/// be an array of table objects. A missing `tables` key parses as an empty
/// schema.
pub fn parse_schema(value: &Value) -> Result<SchemaModel, SchemaParseError> {
    let object = value.as_object().ok_or_else(|| {
        SchemaParseError::new(format!(
            "Schema must be an object, got {}",
            json_type_name(value)
        ))
    })?;

    let tables_value = match object.get("tables") {
        None | Some(Value::Null) => return Ok(SchemaModel::default()),
        Some(v) => v,
    };

    let entries = tables_value.as_array().ok_or_else(|| {
        SchemaParseError::new(format!(
            "Schema 'tables' must be an array, got {}",
            json_type_name(tables_value)
        ))
    })?;

    let mut tables = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let table = parse_table(entry)
            .map_err(|e| SchemaParseError::new(format!("Error parsing table {index}: {e}")))?;
        tables.push(table);
    }

    Ok(SchemaModel { tables })
}

fn parse_table(value: &Value) -> Result<Table, SchemaParseError> {
    let object = value.as_object().ok_or_else(|| {
        SchemaParseError::new(format!(
            "Table must be an object, got {}",
            json_type_name(value)
        ))
    })?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| SchemaParseError::new("Table must have a 'name' field of type string"))?;

    let columns_value = object.get("columns");
    let entries: &[Value] = match columns_value {
        None | Some(Value::Null) => &[],
        Some(v) => v.as_array().map(Vec::as_slice).ok_or_else(|| {
            SchemaParseError::new(format!(
                "Table 'columns' must be an array, got {}",
                json_type_name(v)
            ))
        })?,
    };

    let mut columns = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let column = parse_column(entry).map_err(|e| {
            SchemaParseError::new(format!("Error parsing column {index} in table '{name}': {e}"))
        })?;
        columns.push(column);
    }

    Ok(Table {
        name: name.to_string(),
        columns,
        description: string_field(object, "description"),
    })
}

fn parse_column(value: &Value) -> Result<Column, SchemaParseError> {
    let object = value.as_object().ok_or_else(|| {
        SchemaParseError::new(format!(
            "Column must be an object, got {}",
            json_type_name(value)
        ))
    })?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| SchemaParseError::new("Column must have a 'name' field of type string"))?;

    Ok(Column {
        name: name.to_string(),
        column_type: string_field(object, "type"),
        description: string_field(object, "description"),
        primary_key: object
            .get("primary_key")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        foreign_key: string_field(object, "foreign_key"),
    })
}

fn string_field(object: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

/// Lint a parsed schema for internal consistency.
///
/// Returns advisory warnings only — duplicate names, empty tables, malformed
/// or dangling foreign keys. A linted schema is still usable; these never
/// fail the request.
#[must_use]
pub fn lint_schema(schema: &SchemaModel) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut seen_tables: Vec<String> = Vec::new();
    for table in &schema.tables {
        let lowered = table.name.to_lowercase();
        if seen_tables.contains(&lowered) {
            warnings.push(format!("Duplicate table name: '{lowered}'"));
        }
        seen_tables.push(lowered);
    }

    for table in &schema.tables {
        if table.columns.is_empty() {
            warnings.push(format!("Table '{}' has no columns defined", table.name));
        }

        let mut seen_columns: Vec<String> = Vec::new();
        for column in &table.columns {
            let lowered = column.name.to_lowercase();
            if seen_columns.contains(&lowered) {
                warnings.push(format!(
                    "Duplicate column name '{lowered}' in table '{}'",
                    table.name
                ));
            }
            seen_columns.push(lowered);
        }
    }

    for table in &schema.tables {
        for column in &table.columns {
            let Some(reference) = &column.foreign_key else {
                continue;
            };
            let parts: Vec<&str> = reference.split('.').collect();
            match parts.as_slice() {
                [ref_table, ref_column] if !ref_table.is_empty() && !ref_column.is_empty() => {
                    if !schema.has_table(ref_table) {
                        warnings.push(format!(
                            "Foreign key references non-existent table '{ref_table}' in {}.{}",
                            table.name, column.name
                        ));
                    } else if !schema.has_column(ref_table, ref_column) {
                        warnings.push(format!(
                            "Foreign key references non-existent column '{ref_column}' in table \
                             '{ref_table}' (from {}.{})",
                            table.name, column.name
                        ));
                    }
                },
                _ => warnings.push(format!(
                    "Invalid foreign key format '{reference}' in {}.{}. Expected 'table.column'",
                    table.name, column.name
                )),
            }
        }
    }

    warnings
}
