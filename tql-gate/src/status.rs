//! Final status resolution.
//!
//! A fixed-priority state machine over the gate's findings. Safety
//! rejections dominate; incompleteness dominates cautionary-but-complete
//! modifying statements; only a fully specified, fully schema-matched,
//! non-modifying statement comes out `validated`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::placeholder::Placeholder;
use crate::policy::{Finding, FindingKind};

/// Terminal status of a validated query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    /// Single read-only statement, all identifiers matched, no placeholders.
    Validated,
    /// Incomplete: placeholders remain, the schema is missing, or referenced
    /// identifiers are unknown.
    Draft,
    /// Complete but modifying — a human should review before execution.
    ReviewRequired,
    /// Rejected by policy (multiple statements or a dangerous operation).
    Error,
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validated => "validated",
            Self::Draft => "draft",
            Self::ReviewRequired => "review_required",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Map findings and placeholders to a terminal status.
///
/// Priority order, first match wins: fatal findings → `error`;
/// missing-schema/unknown-identifier findings or any placeholder → `draft`;
/// a modifying statement → `review_required`; otherwise `validated`.
#[must_use]
pub fn resolve_status(findings: &[Finding], placeholders: &[Placeholder]) -> QueryStatus {
    if findings.iter().any(|f| f.kind.is_fatal()) {
        return QueryStatus::Error;
    }

    let incomplete = !placeholders.is_empty()
        || findings.iter().any(|f| {
            matches!(
                f.kind,
                FindingKind::MissingSchema | FindingKind::UnknownIdentifier
            )
        });
    if incomplete {
        return QueryStatus::Draft;
    }

    if findings
        .iter()
        .any(|f| f.kind == FindingKind::ModifyingStatement)
    {
        return QueryStatus::ReviewRequired;
    }

    QueryStatus::Validated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(kind: FindingKind) -> Finding {
        Finding::new(kind, "detail")
    }

    fn placeholder() -> Placeholder {
        Placeholder {
            token: "<T>".to_string(),
            meaning: "Table name to be specified".to_string(),
        }
    }

    #[test]
    fn test_no_findings_is_validated() {
        assert_eq!(resolve_status(&[], &[]), QueryStatus::Validated);
    }

    #[test]
    fn test_fatal_findings_are_error() {
        for kind in [FindingKind::MultiStatement, FindingKind::DangerousOperation] {
            assert_eq!(resolve_status(&[finding(kind)], &[]), QueryStatus::Error);
        }
    }

    #[test]
    fn test_incompleteness_is_draft() {
        for kind in [FindingKind::MissingSchema, FindingKind::UnknownIdentifier] {
            assert_eq!(resolve_status(&[finding(kind)], &[]), QueryStatus::Draft);
        }
        assert_eq!(resolve_status(&[], &[placeholder()]), QueryStatus::Draft);
    }

    #[test]
    fn test_modifying_is_review_required() {
        assert_eq!(
            resolve_status(&[finding(FindingKind::ModifyingStatement)], &[]),
            QueryStatus::ReviewRequired
        );
    }

    #[test]
    fn test_error_dominates_everything() {
        let findings = vec![
            finding(FindingKind::ModifyingStatement),
            finding(FindingKind::MissingSchema),
            finding(FindingKind::MultiStatement),
        ];
        assert_eq!(resolve_status(&findings, &[placeholder()]), QueryStatus::Error);
    }

    #[test]
    fn test_draft_dominates_review_required() {
        let findings = vec![
            finding(FindingKind::ModifyingStatement),
            finding(FindingKind::UnknownIdentifier),
        ];
        assert_eq!(resolve_status(&findings, &[]), QueryStatus::Draft);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&QueryStatus::ReviewRequired).unwrap(),
            "\"review_required\""
        );
        assert_eq!(
            serde_json::from_str::<QueryStatus>("\"draft\"").unwrap(),
            QueryStatus::Draft
        );
    }

    #[test]
    fn test_display_matches_wire_names() {
        assert_eq!(QueryStatus::Validated.to_string(), "validated");
        assert_eq!(QueryStatus::ReviewRequired.to_string(), "review_required");
    }
}
