use indexmap::IndexSet;
use tracing::debug;

use crate::composer::{ComposeError, ReportColumn};
use crate::fields::FieldLookup;
use crate::filter::DeclaredFilter;
use crate::statement::{contains_word, ColumnDescriptor, ParsedStatement};

/// One field named by a hiding filter, carrying every textual form a select
/// item may use to refer to it.
struct RemovedField {
    identity: String,
    forms: Vec<String>,
}

/// Removes the columns matched by "hide matching columns" filters from the
/// select list, cascades the removal into columns derived from them, and
/// re-validates GROUP BY so a term resolving to a removed field goes with it.
pub struct VisibilityResolver;

impl VisibilityResolver {
    /// Two passes over the projection: mark everything the removal set
    /// reaches, then prune. Permanent columns are never removed; the report
    /// column list keeps pruned entries flagged `is_hidden` so the caller
    /// knows which fields were suppressed.
    pub fn hide_filtered(
        statement: &mut ParsedStatement,
        columns: &mut [ReportColumn],
        filters: &[DeclaredFilter],
        fields: &dyn FieldLookup,
    ) -> Result<(), ComposeError> {
        let removed = Self::removal_set(filters, fields);
        if removed.is_empty() {
            return Ok(());
        }

        let mut identities: IndexSet<String> =
            removed.iter().map(|entry| entry.identity.clone()).collect();

        // pass 1: mark
        for (index, column) in statement.projection.iter_mut().enumerate() {
            if columns[index].is_permanent {
                continue;
            }
            if Self::column_matches(column, &columns[index], &removed) {
                column.is_hidden = true;
                columns[index].is_hidden = true;
                identities.insert(Self::column_identity(&columns[index], column));
                debug!(alias = %column.alias, "hiding filtered column");
            }
        }

        let snapshot = statement.projection.clone();
        let column_snapshot: Vec<ReportColumn> = columns.to_vec();

        // pass 2: prune
        statement.projection.retain(|column| !column.is_hidden);

        let mut kept_terms: Vec<String> = vec![];
        for term in &statement.group_by {
            let identity =
                Self::resolve_group_term(term, &snapshot, &column_snapshot, fields)?;
            if identities.contains(&identity) {
                debug!(term = %term, "dropping GROUP BY term for hidden field");
            } else {
                kept_terms.push(term.clone());
            }
        }
        statement.group_by = kept_terms;

        Ok(())
    }

    fn removal_set(filters: &[DeclaredFilter], fields: &dyn FieldLookup) -> Vec<RemovedField> {
        let mut removed: Vec<RemovedField> = vec![];
        let hiding = filters
            .iter()
            .filter(|filter| filter.enabled && !filter.show_matching_columns);
        for filter in hiding {
            for token in &filter.fields {
                let entry = match fields.resolve(token) {
                    Some(def) => RemovedField {
                        identity: def.key.to_lowercase(),
                        forms: vec![def.key.clone(), def.alias.clone(), def.qualified()],
                    },
                    None => RemovedField {
                        identity: token.trim().to_lowercase(),
                        forms: vec![token.trim().to_string()],
                    },
                };
                if !removed.iter().any(|existing| existing.identity == entry.identity) {
                    removed.push(entry);
                }
            }
        }
        removed
    }

    fn column_matches(
        column: &ColumnDescriptor,
        report: &ReportColumn,
        removed: &[RemovedField],
    ) -> bool {
        removed.iter().any(|entry| {
            if let Some(field) = &report.field {
                if field.to_lowercase() == entry.identity {
                    return true;
                }
            }
            entry.forms.iter().any(|form| {
                column.alias_matches(form) || contains_word(&column.source_field, form)
            })
        })
    }

    fn column_identity(report: &ReportColumn, column: &ColumnDescriptor) -> String {
        report
            .field
            .as_ref()
            .map(|field| field.to_lowercase())
            .unwrap_or_else(|| column.source_field.trim().to_lowercase())
    }

    /// A GROUP BY term resolves through, in order: the field table (exact
    /// qualified name), a select item's output alias, a select item's source
    /// expression. A term resolving through none of them is a structural
    /// error; silently dropping it would corrupt the result set.
    fn resolve_group_term(
        term: &str,
        snapshot: &[ColumnDescriptor],
        columns: &[ReportColumn],
        fields: &dyn FieldLookup,
    ) -> Result<String, ComposeError> {
        if let Some(def) = fields.resolve(term) {
            return Ok(def.key.to_lowercase());
        }
        if let Some(index) = snapshot.iter().position(|column| column.alias_matches(term)) {
            return Ok(Self::column_identity(&columns[index], &snapshot[index]));
        }
        if let Some(index) = snapshot
            .iter()
            .position(|column| column.source_expression.eq_ignore_ascii_case(term.trim()))
        {
            return Ok(Self::column_identity(&columns[index], &snapshot[index]));
        }
        Err(ComposeError::UnresolvableGroupTerm(term.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::composer::{ComposeError, ReportColumn, VisibilityResolver};
    use crate::fields::{FieldDef, StaticFieldLookup};
    use crate::filter::{DeclaredFilter, FilterOperator, ParamValue};
    use crate::statement::{Dialect, ParsedStatement, StatementParser};

    fn fields() -> StaticFieldLookup {
        StaticFieldLookup::new()
            .with(FieldDef::new("item_id", "a", "ID").with_alias("Id").permanent())
            .with(FieldDef::new("qty", "b", "Qty").with_alias("Qty"))
            .with(FieldDef::new("item_name", "a", "Name").with_alias("Name"))
    }

    fn parse(sql: &str) -> ParsedStatement {
        StatementParser::parse(sql, Dialect::default()).expect("Failed to parse statement")
    }

    fn hiding_filter(field: &str) -> DeclaredFilter {
        DeclaredFilter::new(
            field,
            FilterOperator::GreaterThan,
            vec![Some(ParamValue::Int(0))],
        )
        .hiding()
    }

    #[test]
    pub fn test_hide_cascades_into_derived_column_and_group_by() {
        let fields = fields();
        let mut statement = parse(
            "SELECT a.ID AS Id, b.Qty AS Qty, SUM(b.Qty) AS Total, a.Name AS Name \
             FROM a JOIN b ON a.ID = b.AId GROUP BY b.Qty, a.Name",
        );
        let mut columns = ReportColumn::from_projection(&statement.projection, &fields);

        VisibilityResolver::hide_filtered(
            &mut statement,
            &mut columns,
            &[hiding_filter("qty")],
            &fields,
        )
        .expect("Failed to hide filtered columns");

        let aliases: Vec<&str> =
            statement.projection.iter().map(|column| column.alias.as_str()).collect();
        assert_eq!(aliases, vec!["Id", "Name"]);
        assert!(columns[1].is_hidden);
        assert!(columns[2].is_hidden);
        assert!(!columns[3].is_hidden);
        assert_eq!(statement.group_by, vec!["a.Name"]);
    }

    #[test]
    pub fn test_permanent_columns_survive() {
        let fields = fields();
        let mut statement = parse("SELECT a.ID AS Id, a.Name AS Name FROM a");
        let mut columns = ReportColumn::from_projection(&statement.projection, &fields);

        VisibilityResolver::hide_filtered(
            &mut statement,
            &mut columns,
            &[hiding_filter("item_id")],
            &fields,
        )
        .expect("Failed to hide filtered columns");

        assert_eq!(statement.projection.len(), 2);
        assert!(!columns[0].is_hidden);
    }

    #[test]
    pub fn test_visible_filter_hides_nothing() {
        let fields = fields();
        let mut statement = parse("SELECT a.Name AS Name FROM a");
        let mut columns = ReportColumn::from_projection(&statement.projection, &fields);
        let filter = DeclaredFilter::new(
            "item_name",
            FilterOperator::Equals,
            vec![Some(ParamValue::text("milk"))],
        );

        VisibilityResolver::hide_filtered(&mut statement, &mut columns, &[filter], &fields)
            .expect("Failed to run visibility resolver");

        assert_eq!(statement.projection.len(), 1);
        assert!(!columns[0].is_hidden);
    }

    #[test]
    pub fn test_unresolvable_group_term() {
        let fields = fields();
        let mut statement =
            parse("SELECT a.Name AS Name FROM a GROUP BY mystery.Column");
        let mut columns = ReportColumn::from_projection(&statement.projection, &fields);

        let result = VisibilityResolver::hide_filtered(
            &mut statement,
            &mut columns,
            &[hiding_filter("item_name")],
            &fields,
        );

        match result {
            Err(ComposeError::UnresolvableGroupTerm(term)) => {
                assert_eq!(term, "mystery.Column");
            }
            _ => panic!(),
        }
    }
}
