use once_cell::sync::Lazy;
use regex::Regex;

use crate::statement::{collapse_whitespace, Dialect, SearchableText};

static AGGREGATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:MIN|MAX|AVG|SUM|COUNT)\s*\(").unwrap());
static DISTINCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bDISTINCT\b").unwrap());
static CASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^CASE\b").unwrap());
static WHEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bWHEN\b").unwrap());

/// Whether an expression computes an aggregate. Also decides WHERE vs HAVING
/// placement for translated filters.
pub fn is_aggregate_expr(expression: &str) -> bool {
    AGGREGATE_RE.is_match(expression)
}

/// One select-list item, classified.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    /// Raw item text, whitespace-normalized; rendering re-emits this.
    pub text: String,
    /// Output name of the column.
    pub alias: String,
    /// Expression left of the alias, or the whole item.
    pub source_expression: String,
    /// Best-effort field token, unwrapped from a leading CASE.
    pub source_field: String,
    pub is_renamed: bool,
    pub is_grouped: bool,
    pub is_aggregated: bool,
    pub is_hidden: bool,
}

impl ColumnDescriptor {
    /// Classify one `expr [AS alias]` select item. Never fails: with no
    /// top-level AS the whole text doubles as alias and source.
    pub fn classify(item: &str, dialect: Dialect) -> Self {
        let text = collapse_whitespace(item, dialect);
        let mask = SearchableText::new(&text, dialect);

        let (source_expression, alias, is_renamed) = match mask.find_keyword(&["AS"]).last() {
            Some(&(start, end)) => {
                let source = mask.slice(0, start).trim().to_string();
                let alias = mask.slice(end, mask.len()).trim().to_string();
                if source.is_empty() || alias.is_empty() {
                    (text.clone(), text.clone(), false)
                } else {
                    let alias = strip_quotes(&alias, dialect);
                    let renamed = alias != source;
                    (source, alias, renamed)
                }
            }
            None => (text.clone(), text.clone(), false),
        };

        let source_field = unwrap_case(&source_expression).to_string();

        Self {
            is_grouped: DISTINCT_RE.is_match(&source_expression),
            is_aggregated: is_aggregate_expr(&source_expression),
            is_hidden: false,
            text,
            alias,
            source_expression,
            source_field,
            is_renamed,
        }
    }

    pub fn alias_matches(&self, name: &str) -> bool {
        self.alias.eq_ignore_ascii_case(name.trim())
    }
}

/// Text between a leading CASE and the first WHEN, when non-empty; this is
/// the field a simple `CASE field WHEN ...` expression switches on.
fn unwrap_case(expression: &str) -> &str {
    if let Some(case_match) = CASE_RE.find(expression) {
        if let Some(when_match) = WHEN_RE.find(expression) {
            let between = expression[case_match.end()..when_match.start()].trim();
            if !between.is_empty() {
                return between;
            }
        }
    }
    expression
}

fn strip_quotes(name: &str, dialect: Dialect) -> String {
    let trimmed = name.trim();
    let quoted = trimmed.len() >= 2
        && trimmed.starts_with(dialect.quote)
        && trimmed.ends_with(dialect.quote);
    if quoted {
        trimmed[dialect.quote.len_utf8()..trimmed.len() - dialect.quote.len_utf8()].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::statement::{ColumnDescriptor, Dialect};

    #[test]
    pub fn test_classify_plain_column() {
        let column = ColumnDescriptor::classify("a.Name", Dialect::default());

        assert_eq!(column.alias, "a.Name");
        assert_eq!(column.source_expression, "a.Name");
        assert_eq!(column.source_field, "a.Name");
        assert!(!column.is_renamed);
        assert!(!column.is_aggregated);
        assert!(!column.is_grouped);
    }

    #[test]
    pub fn test_classify_renamed_column() {
        let column = ColumnDescriptor::classify("a.full_name AS Name", Dialect::default());

        assert_eq!(column.alias, "Name");
        assert_eq!(column.source_expression, "a.full_name");
        assert!(column.is_renamed);
    }

    #[test]
    pub fn test_classify_uses_last_top_level_as() {
        let column =
            ColumnDescriptor::classify("CAST(x AS CHAR) AS Label", Dialect::default());

        assert_eq!(column.alias, "Label");
        assert_eq!(column.source_expression, "CAST(x AS CHAR)");
    }

    #[test]
    pub fn test_classify_aggregate() {
        let column = ColumnDescriptor::classify("SUM(b.Qty) AS Total", Dialect::default());

        assert!(column.is_aggregated);
        assert!(!column.is_grouped);
        assert_eq!(column.alias, "Total");
    }

    #[test]
    pub fn test_classify_distinct() {
        let column =
            ColumnDescriptor::classify("DISTINCT a.Partner AS Partner", Dialect::default());

        assert!(column.is_grouped);
    }

    #[test]
    pub fn test_classify_case_unwraps_field() {
        let column = ColumnDescriptor::classify(
            "CASE o.Kind WHEN 1 THEN 'Sale' ELSE 'Other' END AS KindName",
            Dialect::default(),
        );

        assert_eq!(column.source_field, "o.Kind");
        assert_eq!(column.alias, "KindName");
    }

    #[test]
    pub fn test_classify_searched_case_keeps_expression() {
        let column = ColumnDescriptor::classify(
            "CASE WHEN o.Qty > 0 THEN 'in' ELSE 'out' END AS Direction",
            Dialect::default(),
        );

        assert_eq!(column.source_field, column.source_expression);
    }

    #[test]
    pub fn test_classify_quoted_alias() {
        let column =
            ColumnDescriptor::classify("a.Name AS `Partner Name`", Dialect::default());

        assert_eq!(column.alias, "Partner Name");
        assert!(column.is_renamed);
    }

    #[test]
    pub fn test_classify_lowercase_as() {
        let column = ColumnDescriptor::classify("one as alias", Dialect::default());

        assert_eq!(column.alias, "alias");
        assert_eq!(column.source_expression, "one");
    }
}
