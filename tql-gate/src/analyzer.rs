//! Lexical SQL statement analysis.
//!
//! This is a quote-aware scanner, not a SQL grammar. It classifies a raw
//! candidate string, detects multi-statement payloads and dangerous leading
//! keywords, finds top-level `LIMIT` clauses, and extracts referenced
//! table/column identifiers on a best-effort basis.
//!
//! The analyzer never fails: malformed SQL degrades to
//! [`StatementType::Other`] with empty identifier sets, because the gate must
//! still produce a response for bad agent output. Known blind spots of the
//! lexical approach (identifiers inside deeply nested subqueries, expression
//! aliases, dialect-quoted identifiers) under-approximate rather than
//! over-reject.

use crate::config::DANGEROUS_KEYWORDS;

/// Classification of a SQL statement by its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementType {
    /// `SELECT` or `WITH` (CTEs read like SELECT).
    Select,
    /// `INSERT`.
    Insert,
    /// `UPDATE`.
    Update,
    /// `DELETE`.
    Delete,
    /// Anything unrecognized, including malformed input.
    Other,
}

impl StatementType {
    /// Whether the statement writes data (`INSERT`/`UPDATE`/`DELETE`).
    #[must_use]
    pub const fn is_modifying(self) -> bool {
        matches!(self, Self::Insert | Self::Update | Self::Delete)
    }
}

/// Immutable result of analyzing one SQL string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStatement {
    /// Statement classification from the leading keyword.
    pub statement_type: StatementType,
    /// More than one non-empty statement separated by unquoted semicolons.
    pub is_multi_statement: bool,
    /// A `LIMIT` token outside parentheses and string literals.
    pub has_top_level_limit: bool,
    /// Dangerous statement-leading keywords, first-seen order, deduplicated.
    pub dangerous_keywords: Vec<String>,
    /// Referenced table names, lowercased, first-occurrence order.
    pub referenced_tables: Vec<String>,
    /// Referenced column names, lowercased, first-occurrence order.
    pub referenced_columns: Vec<String>,
}

impl ParsedStatement {
    fn empty() -> Self {
        Self {
            statement_type: StatementType::Other,
            is_multi_statement: false,
            has_top_level_limit: false,
            dangerous_keywords: Vec::new(),
            referenced_tables: Vec::new(),
            referenced_columns: Vec::new(),
        }
    }
}

/// Analyze a raw candidate SQL string.
///
/// # Example
///
/// ```
/// use tql_gate::{StatementType, analyze};
///
/// let parsed = analyze("SELECT id FROM users WHERE status = 'active'");
/// assert_eq!(parsed.statement_type, StatementType::Select);
/// assert_eq!(parsed.referenced_tables, vec!["users"]);
/// assert!(!parsed.is_multi_statement);
/// ```
#[must_use]
pub fn analyze(sql: &str) -> ParsedStatement {
    let cleaned = strip_comments(sql);
    let statements = split_statements(&cleaned);

    let Some(first) = statements.first() else {
        return ParsedStatement::empty();
    };

    let mut dangerous_keywords = Vec::new();
    for statement in &statements {
        if let Some(keyword) = leading_keyword(statement) {
            if DANGEROUS_KEYWORDS.contains(&keyword.as_str()) {
                push_unique(&mut dangerous_keywords, keyword);
            }
        }
    }

    let statement_type = match leading_keyword(first).as_deref() {
        Some("SELECT" | "WITH") => StatementType::Select,
        Some("INSERT") => StatementType::Insert,
        Some("UPDATE") => StatementType::Update,
        Some("DELETE") => StatementType::Delete,
        _ => StatementType::Other,
    };

    let tokens = tokenize(&neutralize(first));
    let has_top_level_limit = tokens
        .iter()
        .any(|t| t.depth == 0 && t.is_word() && t.text.eq_ignore_ascii_case("LIMIT"));
    let (referenced_tables, referenced_columns) = extract_identifiers(&tokens);

    ParsedStatement {
        statement_type,
        is_multi_statement: statements.len() > 1,
        has_top_level_limit,
        dangerous_keywords,
        referenced_tables,
        referenced_columns,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SCANNING PRIMITIVES
// ═══════════════════════════════════════════════════════════════════════════

/// Remove `--` line comments and `/* */` block comments outside string
/// literals. Doubled quotes (`''`, `""`) are escapes, not terminators.
fn strip_comments(sql: &str) -> String {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            quote @ ('\'' | '"') => {
                out.push(quote);
                i += 1;
                while i < chars.len() {
                    let c = chars[i];
                    out.push(c);
                    i += 1;
                    if c == quote {
                        if chars.get(i) == Some(&quote) {
                            out.push(quote);
                            i += 1;
                        } else {
                            break;
                        }
                    }
                }
            },
            '-' if chars.get(i + 1) == Some(&'-') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            },
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() {
                    if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
                out.push(' ');
            },
            c => {
                out.push(c);
                i += 1;
            },
        }
    }

    out
}

/// Split on `;` outside single- and double-quoted literals, dropping empty
/// segments.
fn split_statements(sql: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_single = false;
    let mut in_double = false;

    for c in sql.chars() {
        match c {
            '\'' if !in_double => {
                in_single = !in_single;
                current.push(c);
            },
            '"' if !in_single => {
                in_double = !in_double;
                current.push(c);
            },
            ';' if !in_single && !in_double => {
                parts.push(std::mem::take(&mut current));
            },
            _ => current.push(c),
        }
    }
    parts.push(current);

    parts
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Blank out string literal contents and collapse placeholder tokens
/// (`<NAME>`) to a neutral word, so neither pollutes identifier extraction.
fn neutralize(statement: &str) -> String {
    let chars: Vec<char> = statement.chars().collect();
    let mut out = String::with_capacity(statement.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            quote @ ('\'' | '"') => {
                out.push(quote);
                i += 1;
                while i < chars.len() {
                    if chars[i] == quote {
                        if chars.get(i + 1) == Some(&quote) {
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
                out.push(quote);
                i += 1;
            },
            '<' => {
                let token_end = placeholder_end(&chars, i);
                if let Some(end) = token_end {
                    out.push_str("PLACEHOLDER");
                    i = end + 1;
                } else {
                    out.push('<');
                    i += 1;
                }
            },
            c => {
                out.push(c);
                i += 1;
            },
        }
    }

    out
}

/// Index of the closing `>` if a placeholder token starts at `start`.
fn placeholder_end(chars: &[char], start: usize) -> Option<usize> {
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

/// Uppercased first word of a statement, if any.
fn leading_keyword(statement: &str) -> Option<String> {
    let word: String = statement
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic() || *c == '_')
        .collect();
    if word.is_empty() {
        None
    } else {
        Some(word.to_ascii_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tok {
    text: String,
    depth: u32,
}

impl Tok {
    fn is_word(&self) -> bool {
        self.text
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    }
}

/// Tokenize into words, numbers, and single-char punctuation, each tagged
/// with its parenthesis depth.
fn tokenize(sql: &str) -> Vec<Tok> {
    let mut tokens = Vec::new();
    let mut depth: u32 = 0;
    let mut chars = sql.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c.is_ascii_alphabetic() || c == '_' {
            let mut word = String::new();
            while let Some(&next) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    word.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Tok { text: word, depth });
        } else if c.is_ascii_digit() {
            let mut number = String::new();
            while let Some(&next) = chars.peek() {
                if next.is_ascii_digit() || next == '.' {
                    number.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Tok { text: number, depth });
        } else if c == '(' {
            tokens.push(Tok {
                text: "(".to_string(),
                depth,
            });
            depth += 1;
            chars.next();
        } else if c == ')' {
            depth = depth.saturating_sub(1);
            tokens.push(Tok {
                text: ")".to_string(),
                depth,
            });
            chars.next();
        } else {
            tokens.push(Tok {
                text: c.to_string(),
                depth,
            });
            chars.next();
        }
    }

    tokens
}

// ═══════════════════════════════════════════════════════════════════════════
// IDENTIFIER EXTRACTION
// ═══════════════════════════════════════════════════════════════════════════

/// Words that look like identifiers but never are.
const STOP_WORDS: &[&str] = &[
    "select", "from", "where", "and", "or", "not", "in", "like", "between", "is", "null", "true",
    "false", "as", "on", "join", "left", "right", "inner", "outer", "full", "cross", "order", "by",
    "group", "having", "limit", "offset", "distinct", "all", "asc", "desc", "case", "when", "then",
    "else", "end", "count", "sum", "avg", "min", "max", "set", "into", "values", "union", "using",
    "exists", "placeholder",
];

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

/// Resolve an identifier starting at `index`, following `a.b.c` chains to the
/// final segment. Returns `None` for non-words and stop words.
fn identifier_at(tokens: &[Tok], index: usize) -> Option<String> {
    let first = tokens.get(index)?;
    if !first.is_word() {
        return None;
    }
    let mut name = first.text.clone();
    let mut i = index;
    while tokens.get(i + 1).is_some_and(|t| t.text == ".")
        && tokens.get(i + 2).is_some_and(Tok::is_word)
    {
        name.clone_from(&tokens[i + 2].text);
        i += 2;
    }
    let lowered = name.to_lowercase();
    if is_stop_word(&lowered) { None } else { Some(lowered) }
}

/// Width in tokens of the identifier starting at `index` (1 for `a`, 3 for
/// `a.b`, 5 for `a.b.c`).
fn identifier_width(tokens: &[Tok], index: usize) -> usize {
    let mut width = 1;
    let mut i = index;
    while tokens.get(i + 1).is_some_and(|t| t.text == ".")
        && tokens.get(i + 2).is_some_and(Tok::is_word)
    {
        width += 2;
        i += 2;
    }
    width
}

fn find_word_at_depth(tokens: &[Tok], word: &str, depth: u32, from: usize) -> Option<usize> {
    tokens
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, t)| t.depth == depth && t.is_word() && t.text.eq_ignore_ascii_case(word))
        .map(|(i, _)| i)
}

/// Best-effort table/column extraction over a token stream.
fn extract_identifiers(tokens: &[Tok]) -> (Vec<String>, Vec<String>) {
    let mut tables = Vec::new();
    let mut columns = Vec::new();

    collect_tables(tokens, &mut tables);
    collect_select_list(tokens, &mut columns);
    collect_set_targets(tokens, &mut columns);
    collect_comparison_targets(tokens, &mut columns);
    collect_ordering_columns(tokens, &mut columns);

    (tables, columns)
}

/// Tables follow `FROM` / `JOIN` / `INTO`, or a statement-leading `UPDATE`.
fn collect_tables(tokens: &[Tok], tables: &mut Vec<String>) {
    for (i, tok) in tokens.iter().enumerate() {
        if !tok.is_word() {
            continue;
        }
        let anchor = tok.text.to_ascii_uppercase();
        let is_anchor = matches!(anchor.as_str(), "FROM" | "JOIN" | "INTO")
            || (anchor == "UPDATE" && i == 0);
        if is_anchor {
            if let Some(name) = identifier_at(tokens, i + 1) {
                push_unique(tables, name);
            }
        }
    }
}

/// Bare column references in the SELECT list, between the leading `SELECT`
/// and its `FROM`. Splits on top-level commas; skips `*`, `DISTINCT`/`ALL`,
/// and function calls.
fn collect_select_list(tokens: &[Tok], columns: &mut Vec<String>) {
    let Some(select_idx) = find_word_at_depth(tokens, "SELECT", 0, 0) else {
        return;
    };
    let from_idx =
        find_word_at_depth(tokens, "FROM", 0, select_idx + 1).unwrap_or(tokens.len());

    let mut part_start = select_idx + 1;
    for idx in select_idx + 1..=from_idx {
        let at_boundary =
            idx == from_idx || (tokens[idx].text == "," && tokens[idx].depth == 0);
        if !at_boundary {
            continue;
        }
        collect_select_item(&tokens[part_start..idx], columns);
        part_start = idx + 1;
    }
}

fn collect_select_item(part: &[Tok], columns: &mut Vec<String>) {
    let mut start = 0;
    while part.get(start).is_some_and(|t| {
        t.is_word()
            && (t.text.eq_ignore_ascii_case("DISTINCT") || t.text.eq_ignore_ascii_case("ALL"))
    }) {
        start += 1;
    }

    let Some(name) = identifier_at(part, start) else {
        return;
    };
    let width = identifier_width(part, start);
    // A word immediately followed by '(' is a function call, not a column.
    if width == 1 && part.get(start + 1).is_some_and(|t| t.text == "(") {
        return;
    }
    push_unique(columns, name);
}

/// Columns in the WHERE clause: identifiers directly followed by a comparison
/// operator or by `IN`/`LIKE`/`BETWEEN`/`IS`.
fn collect_comparison_targets(tokens: &[Tok], columns: &mut Vec<String>) {
    let Some(where_idx) = find_word_at_depth(tokens, "WHERE", 0, 0) else {
        return;
    };
    let end = tokens
        .iter()
        .enumerate()
        .skip(where_idx + 1)
        .find(|(_, t)| {
            t.depth == 0
                && t.is_word()
                && matches!(
                    t.text.to_ascii_uppercase().as_str(),
                    "ORDER" | "GROUP" | "LIMIT" | "HAVING"
                )
        })
        .map_or(tokens.len(), |(i, _)| i);

    let clause = &tokens[where_idx + 1..end];
    scan_for_compared_identifiers(clause, columns, true);
}

/// Assignment targets in an UPDATE `SET` clause.
fn collect_set_targets(tokens: &[Tok], columns: &mut Vec<String>) {
    if !tokens
        .first()
        .is_some_and(|t| t.text.eq_ignore_ascii_case("UPDATE"))
    {
        return;
    }
    let Some(set_idx) = find_word_at_depth(tokens, "SET", 0, 0) else {
        return;
    };
    let end = find_word_at_depth(tokens, "WHERE", 0, set_idx + 1).unwrap_or(tokens.len());
    scan_for_compared_identifiers(&tokens[set_idx + 1..end], columns, false);
}

fn scan_for_compared_identifiers(clause: &[Tok], columns: &mut Vec<String>, word_operators: bool) {
    let mut i = 0;
    while i < clause.len() {
        if !clause[i].is_word() {
            i += 1;
            continue;
        }
        let name = identifier_at(clause, i);
        let width = identifier_width(clause, i);
        if let (Some(name), Some(next)) = (name, clause.get(i + width)) {
            let compared = matches!(next.text.as_str(), "=" | "<" | ">" | "!")
                || (word_operators
                    && next.is_word()
                    && matches!(
                        next.text.to_ascii_uppercase().as_str(),
                        "IN" | "LIKE" | "BETWEEN" | "IS"
                    ));
            if compared {
                push_unique(columns, name);
            }
        }
        i += width;
    }
}

/// First identifier after `ORDER BY` / `GROUP BY`.
fn collect_ordering_columns(tokens: &[Tok], columns: &mut Vec<String>) {
    for (i, tok) in tokens.iter().enumerate() {
        if tok.is_word()
            && matches!(tok.text.to_ascii_uppercase().as_str(), "ORDER" | "GROUP")
            && tokens
                .get(i + 1)
                .is_some_and(|t| t.text.eq_ignore_ascii_case("BY"))
        {
            if let Some(name) = identifier_at(tokens, i + 2) {
                push_unique(columns, name);
            }
        }
    }
}
