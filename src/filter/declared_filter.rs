use serde::{Deserialize, Serialize};

use crate::filter::ParamValue;
use crate::statement::CombineLogic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    InRange,
    InSet,
    InHierarchicalGroup,
    OlderThanMinutes,
    NewerThanMinutes,
}

/// One runtime-supplied report constraint: which fields it targets (OR'ed
/// together), the comparison to apply, and whether the filtered columns stay
/// visible in the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredFilter {
    pub fields: Vec<String>,
    pub operator: FilterOperator,
    #[serde(default)]
    pub values: Vec<Option<ParamValue>>,
    #[serde(default)]
    pub combine: CombineLogic,
    #[serde(default = "enabled_by_default")]
    pub show_matching_columns: bool,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl DeclaredFilter {
    pub fn new(field: &str, operator: FilterOperator, values: Vec<Option<ParamValue>>) -> Self {
        Self {
            fields: vec![field.to_string()],
            operator,
            values,
            combine: CombineLogic::And,
            show_matching_columns: true,
            enabled: true,
        }
    }

    pub fn hiding(mut self) -> Self {
        self.show_matching_columns = false;
        self
    }

    pub fn or_combined(mut self) -> Self {
        self.combine = CombineLogic::Or;
        self
    }

    /// A filter that binds nothing and must leave the statement untouched:
    /// disabled, fieldless, or carrying no usable value.
    pub fn is_inert(&self) -> bool {
        !self.enabled
            || self.fields.is_empty()
            || !self
                .values
                .iter()
                .any(|value| matches!(value, Some(v) if !v.is_null()))
    }

    pub fn usable_values(&self) -> impl Iterator<Item = &ParamValue> {
        self.values
            .iter()
            .filter_map(|value| value.as_ref())
            .filter(|value| !value.is_null())
    }

    pub fn first_value(&self) -> Option<&ParamValue> {
        self.usable_values().next()
    }

    /// A range bound by position; `None` leaves that side of the range open.
    pub fn bound(&self, index: usize) -> Option<&ParamValue> {
        self.values
            .get(index)
            .and_then(|value| value.as_ref())
            .filter(|value| !value.is_null())
    }
}
