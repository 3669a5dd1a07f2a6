use crate::assemble::SortDirection;
use crate::statement::{
    is_enclosed, ClausePredicate, ColumnDescriptor, Dialect, ParsedStatement,
};

/// Recombines the clause lists of a parsed statement back into one string.
/// Clause order is fixed; a clause with no terms is omitted entirely, never
/// emitted as an empty keyword.
pub struct Renderer;

impl Renderer {
    pub fn render(statement: &ParsedStatement) -> String {
        let mut sql = String::from("SELECT ");
        let items: Vec<&str> = statement
            .projection
            .iter()
            .map(|column| column.text.as_str())
            .collect();
        sql.push_str(&items.join(", "));

        sql.push_str(" FROM ");
        sql.push_str(&statement.from);

        if let Some(clause) = Self::compose_clause(&statement.criteria, statement.dialect) {
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }
        if !statement.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&statement.group_by.join(", "));
        }
        if let Some(clause) = Self::compose_clause(&statement.having, statement.dialect) {
            sql.push_str(" HAVING ");
            sql.push_str(&clause);
        }
        if !statement.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&statement.order_by.join(", "));
        }
        if let Some(limit) = &statement.limit {
            sql.push_str(" LIMIT ");
            sql.push_str(limit);
        }

        sql
    }

    /// AND-joined predicate list. OR-marked predicates are collected into one
    /// parenthesized group that AND-joins with the rest; negated predicates
    /// render behind NOT.
    fn compose_clause(predicates: &[ClausePredicate], dialect: Dialect) -> Option<String> {
        if predicates.is_empty() {
            return None;
        }

        let mut ands: Vec<String> = vec![];
        let mut ors: Vec<String> = vec![];
        for predicate in predicates {
            let text = if predicate.combine.negated() {
                format!("NOT {}", Self::wrap(&predicate.text, dialect))
            } else {
                predicate.text.clone()
            };
            if predicate.combine.is_or() {
                ors.push(text);
            } else {
                ands.push(text);
            }
        }
        if !ors.is_empty() {
            if ors.len() == 1 {
                ands.push(Self::wrap(&ors.remove(0), dialect));
            } else {
                ands.push(format!("({})", ors.join(" OR ")));
            }
        }

        Some(ands.join(" AND "))
    }

    fn wrap(text: &str, dialect: Dialect) -> String {
        if is_enclosed(text, dialect) {
            text.to_string()
        } else {
            format!("({text})")
        }
    }

    /// Puts `source_expression ASC|DESC` at the front of ORDER BY, dropping
    /// any previous ordering on the same column.
    pub fn with_sort(statement: &mut ParsedStatement, column: &str, direction: SortDirection) {
        let (expression, alias) = match statement.column_for(column) {
            Some(found) => (found.source_expression.clone(), found.alias.clone()),
            None => (column.trim().to_string(), column.trim().to_string()),
        };

        statement
            .order_by
            .retain(|term| !Self::orders_same_column(term, &expression, &alias));
        statement
            .order_by
            .insert(0, format!("{expression} {}", direction.keyword()));
    }

    fn orders_same_column(term: &str, expression: &str, alias: &str) -> bool {
        let mut base = term.trim();
        for suffix in [" ASC", " DESC"] {
            if base.len() > suffix.len()
                && base[base.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
            {
                base = base[..base.len() - suffix.len()].trim_end();
                break;
            }
        }
        base.eq_ignore_ascii_case(expression) || base.eq_ignore_ascii_case(alias)
    }

    /// A derived statement that counts matching rows without returning row
    /// data: only grouped or aggregated select items survive (a constant `1`
    /// if none do), ordering and paging are dropped, and the rest is wrapped
    /// in an outer COUNT.
    pub fn count_variant(statement: &ParsedStatement) -> String {
        let mut inner = statement.clone();
        inner
            .projection
            .retain(|column| column.is_grouped || column.is_aggregated);
        if inner.projection.is_empty() {
            inner
                .projection
                .push(ColumnDescriptor::classify("1", statement.dialect));
        }
        inner.order_by.clear();
        inner.limit = None;

        format!("SELECT COUNT(*) FROM ({}) AS t", Self::render(&inner))
    }
}

#[cfg(test)]
mod tests {
    use crate::assemble::{Renderer, SortDirection};
    use crate::statement::{ClausePredicate, CombineLogic, Dialect, StatementParser};

    fn parse(sql: &str) -> crate::statement::ParsedStatement {
        StatementParser::parse(sql, Dialect::default()).expect("Failed to parse statement")
    }

    #[test]
    pub fn test_render_round_trip_is_identity_for_normalized_text() {
        let sql = "SELECT a.ID AS Id, SUM(b.Qty) AS Total FROM a JOIN b ON a.ID = b.AId \
                   WHERE a.Active = 1 GROUP BY a.ID HAVING SUM(b.Qty) > 10 \
                   ORDER BY a.ID LIMIT 20";

        assert_eq!(Renderer::render(&parse(sql)), sql);
    }

    #[test]
    pub fn test_render_is_idempotent() {
        let sql = "SELECT one FROM t WHERE a = 1 OR b = 2 AND NOT c = 3";

        let once = Renderer::render(&parse(sql));
        let twice = Renderer::render(&parse(&once));

        assert_eq!(once, twice);
    }

    #[test]
    pub fn test_render_omits_empty_clauses() {
        let rendered = Renderer::render(&parse("SELECT one FROM t"));

        assert_eq!(rendered, "SELECT one FROM t");
    }

    #[test]
    pub fn test_or_predicates_group_together() {
        let mut statement = parse("SELECT one FROM t WHERE base = 1");
        statement.push_predicate(
            ClausePredicate::new("(a = @wPar0)", CombineLogic::Or),
            false,
        );
        statement.push_predicate(
            ClausePredicate::new("(b = @wPar1)", CombineLogic::Or),
            false,
        );

        let rendered = Renderer::render(&statement);

        assert_eq!(
            rendered,
            "SELECT one FROM t WHERE base = 1 AND ((a = @wPar0) OR (b = @wPar1))"
        );
    }

    #[test]
    pub fn test_negated_predicate_renders_behind_not() {
        let mut statement = parse("SELECT one FROM t");
        statement.push_predicate(
            ClausePredicate::new("(a = @wPar0)", CombineLogic::AndNot),
            false,
        );

        let rendered = Renderer::render(&statement);

        assert_eq!(rendered, "SELECT one FROM t WHERE NOT (a = @wPar0)");
    }

    #[test]
    pub fn test_with_sort_inserts_at_front_and_replaces() {
        let mut statement =
            parse("SELECT a.ID AS Id, a.Name AS Name FROM a ORDER BY a.Name, a.ID");

        Renderer::with_sort(&mut statement, "Name", SortDirection::Descending);

        assert_eq!(statement.order_by, vec!["a.Name DESC", "a.ID"]);
    }

    #[test]
    pub fn test_with_sort_replaces_directional_term() {
        let mut statement = parse("SELECT a.Name AS Name FROM a ORDER BY a.Name DESC");

        Renderer::with_sort(&mut statement, "Name", SortDirection::Ascending);

        assert_eq!(statement.order_by, vec!["a.Name ASC"]);
    }

    #[test]
    pub fn test_with_sort_unknown_column_uses_given_text() {
        let mut statement = parse("SELECT a.Name FROM a");

        Renderer::with_sort(&mut statement, "b.Other", SortDirection::Ascending);

        assert_eq!(statement.order_by, vec!["b.Other ASC"]);
    }

    #[test]
    pub fn test_count_variant_keeps_aggregated_items() {
        let statement = parse(
            "SELECT a.ID AS Id, SUM(b.Qty) AS Total FROM a \
             GROUP BY a.ID ORDER BY a.ID LIMIT 20",
        );

        let count = Renderer::count_variant(&statement);

        assert_eq!(
            count,
            "SELECT COUNT(*) FROM (SELECT SUM(b.Qty) AS Total FROM a GROUP BY a.ID) AS t"
        );
    }

    #[test]
    pub fn test_count_variant_falls_back_to_constant() {
        let statement = parse("SELECT a.ID, a.Name FROM a WHERE a.Active = 1 ORDER BY a.Name");

        let count = Renderer::count_variant(&statement);

        assert_eq!(
            count,
            "SELECT COUNT(*) FROM (SELECT 1 FROM a WHERE a.Active = 1) AS t"
        );
    }
}
