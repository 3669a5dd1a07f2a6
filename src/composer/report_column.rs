use serde::Serialize;

use crate::fields::FieldLookup;
use crate::statement::ColumnDescriptor;

/// Output-side description of one select-list column, used by the caller to
/// map result rows back to business fields. Built fresh per invocation and
/// mutated only by the visibility resolver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportColumn {
    /// Stable key of the resolved field, or `None` when the column does not
    /// translate to a known field.
    pub field: Option<String>,
    pub alias: String,
    pub is_translated: bool,
    pub is_hidden: bool,
    pub is_permanent: bool,
}

impl ReportColumn {
    /// One report column per select item, resolved through the field table
    /// by output alias first and source field second.
    pub fn from_projection(
        projection: &[ColumnDescriptor],
        fields: &dyn FieldLookup,
    ) -> Vec<ReportColumn> {
        projection
            .iter()
            .map(|column| {
                let definition = fields
                    .resolve(&column.alias)
                    .or_else(|| fields.resolve(&column.source_field));
                ReportColumn {
                    field: definition.map(|def| def.key.clone()),
                    alias: column.alias.clone(),
                    is_translated: definition.is_some(),
                    is_hidden: false,
                    is_permanent: definition.map(|def| def.is_permanent).unwrap_or(false),
                }
            })
            .collect()
    }
}
