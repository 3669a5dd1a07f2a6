use chrono::{DateTime, Utc};
use ordered_float::NotNan;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// One filter operand or bound value. Timestamps are tried before plain text
/// when deserializing so RFC 3339 strings keep their type on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(NotNan<f64>),
    Timestamp(DateTime<Utc>),
    Text(String),
    Null,
}

impl ParamValue {
    pub fn text(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The operand as pattern text, for the LIKE-based operators.
    pub fn text_form(&self) -> Option<String> {
        match self {
            ParamValue::Text(text) => Some(text.clone()),
            ParamValue::Int(value) => Some(value.to_string()),
            ParamValue::Float(value) => Some(value.into_inner().to_string()),
            _ => None,
        }
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(value) => write!(f, "{value}"),
            ParamValue::Int(value) => write!(f, "{value}"),
            ParamValue::Float(value) => write!(f, "{}", value.into_inner()),
            ParamValue::Timestamp(value) => write!(f, "{}", value.to_rfc3339()),
            ParamValue::Text(text) => write!(f, "\"{text}\""),
            ParamValue::Null => write!(f, "NULL"),
        }
    }
}

/// A named value bound into the composed statement. Names are unique within
/// one composition; the caller binds them in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundParameter {
    pub name: String,
    pub value: ParamValue,
}
