use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TranslateError {
    UnresolvableField(String),
    GroupLookup(String),
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::UnresolvableField(token) => {
                write!(f, "filter field '{token}' is not in the statement or the field table")
            }
            TranslateError::GroupLookup(message) => {
                write!(f, "group lookup failed: {message}")
            }
        }
    }
}

impl std::error::Error for TranslateError {}
