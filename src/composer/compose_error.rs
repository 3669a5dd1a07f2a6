use std::fmt;

use crate::filter::TranslateError;
use crate::statement::StatementError;

/// Flattened error surface of one composition attempt. Structural and
/// semantic failures are fatal and deterministic; nothing inside the
/// composer retries.
#[derive(Debug, Clone, PartialEq)]
pub enum ComposeError {
    MalformedStatement(String),
    AmbiguousClause { keyword: String, occurrences: usize },
    UnresolvableGroupTerm(String),
    UnresolvableField(String),
    GroupLookup(String),
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeError::MalformedStatement(context) => {
                write!(f, "malformed statement: {context}")
            }
            ComposeError::AmbiguousClause { keyword, occurrences } => {
                write!(f, "ambiguous statement: {occurrences} top-level {keyword} clauses")
            }
            ComposeError::UnresolvableGroupTerm(term) => {
                write!(f, "GROUP BY term '{term}' does not resolve to a known field")
            }
            ComposeError::UnresolvableField(token) => {
                write!(f, "filter field '{token}' is not in the statement or the field table")
            }
            ComposeError::GroupLookup(message) => {
                write!(f, "group lookup failed: {message}")
            }
        }
    }
}

impl std::error::Error for ComposeError {}

impl From<StatementError> for ComposeError {
    fn from(error: StatementError) -> Self {
        match error {
            StatementError::MalformedStatement(context) => {
                ComposeError::MalformedStatement(context)
            }
            StatementError::AmbiguousClause { keyword, occurrences } => {
                ComposeError::AmbiguousClause { keyword, occurrences }
            }
        }
    }
}

impl From<TranslateError> for ComposeError {
    fn from(error: TranslateError) -> Self {
        match error {
            TranslateError::UnresolvableField(token) => ComposeError::UnresolvableField(token),
            TranslateError::GroupLookup(message) => ComposeError::GroupLookup(message),
        }
    }
}
