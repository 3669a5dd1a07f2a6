use crate::statement::{ClausePredicate, ColumnDescriptor, Dialect};

/// A base statement sliced into its clause lists. Created per report
/// invocation and discarded after the final string is produced; the
/// visibility resolver and the filter translator are the only stages that
/// mutate it, and `from` is never rewritten.
#[derive(Debug, Clone)]
pub struct ParsedStatement {
    pub projection: Vec<ColumnDescriptor>,
    pub from: String,
    pub criteria: Vec<ClausePredicate>,
    pub group_by: Vec<String>,
    pub having: Vec<ClausePredicate>,
    pub order_by: Vec<String>,
    pub limit: Option<String>,
    pub dialect: Dialect,
}

impl ParsedStatement {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            projection: vec![],
            from: String::new(),
            criteria: vec![],
            group_by: vec![],
            having: vec![],
            order_by: vec![],
            limit: None,
            dialect,
        }
    }

    /// The renamed select item whose output name matches the token. A filter
    /// on such a field has to operate on the computed expression the user
    /// sees, not on the underlying column.
    pub fn renamed_source(&self, token: &str) -> Option<&ColumnDescriptor> {
        self.projection
            .iter()
            .find(|column| column.is_renamed && column.alias_matches(token))
    }

    /// A select item located by output alias or by its source expression.
    pub fn column_for(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.projection.iter().find(|column| {
            column.alias_matches(name) || column.source_expression.eq_ignore_ascii_case(name.trim())
        })
    }

    /// Append a translated predicate to WHERE, or to HAVING when its target
    /// expression is aggregated.
    pub fn push_predicate(&mut self, predicate: ClausePredicate, aggregated: bool) {
        if aggregated {
            self.having.push(predicate);
        } else {
            self.criteria.push(predicate);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::statement::{
        ClausePredicate, ColumnDescriptor, CombineLogic, Dialect, ParsedStatement,
    };

    fn statement_with(items: &[&str]) -> ParsedStatement {
        let mut statement = ParsedStatement::new(Dialect::default());
        statement.projection = items
            .iter()
            .map(|item| ColumnDescriptor::classify(item, statement.dialect))
            .collect();
        statement
    }

    #[test]
    pub fn test_renamed_source() {
        let statement = statement_with(&["a.ID AS Id", "SUM(b.Qty) AS Total", "a.Name"]);

        let column = statement
            .renamed_source("total")
            .expect("Failed to find renamed column");

        assert_eq!(column.source_expression, "SUM(b.Qty)");
        assert!(statement.renamed_source("a.Name").is_none());
    }

    #[test]
    pub fn test_column_for_source_expression() {
        let statement = statement_with(&["a.ID AS Id", "a.Name"]);

        let column = statement
            .column_for("a.id")
            .expect("Failed to find column by source expression");

        assert_eq!(column.alias, "Id");
    }

    #[test]
    pub fn test_push_predicate_placement() {
        let mut statement = statement_with(&["a.ID"]);

        statement.push_predicate(
            ClausePredicate::new("(a.X > @wPar0)", CombineLogic::And),
            false,
        );
        statement.push_predicate(
            ClausePredicate::new("(SUM(b.Qty) > @wPar1)", CombineLogic::And),
            true,
        );

        assert_eq!(statement.criteria.len(), 1);
        assert_eq!(statement.having.len(), 1);
        assert_eq!(statement.having[0].text, "(SUM(b.Qty) > @wPar1)");
    }
}
