use crate::statement::{
    collapse_whitespace, ClauseKeyword, ClausePredicate, ColumnDescriptor, Dialect,
    ParsedStatement, SearchableText, StatementError,
};

/// Locates clause keyword boundaries in the base statement and slices the
/// text into typed clause lists. One masked scan decides which positions are
/// eligible; a keyword occurring more than once on eligible positions rejects
/// the statement instead of guessing which one is real.
pub struct StatementParser;

impl StatementParser {
    pub fn parse(raw: &str, dialect: Dialect) -> Result<ParsedStatement, StatementError> {
        let mask = SearchableText::new(raw, dialect);

        let mut located: Vec<(ClauseKeyword, usize, usize)> = vec![];
        for keyword in ClauseKeyword::ORDERED {
            let occurrences = mask.find_keyword(keyword.words());
            match occurrences.len() {
                0 => {
                    if keyword.is_required() {
                        return Err(StatementError::MalformedStatement(format!(
                            "no {keyword} clause found"
                        )));
                    }
                }
                1 => located.push((keyword, occurrences[0].0, occurrences[0].1)),
                count => {
                    return Err(StatementError::AmbiguousClause {
                        keyword: keyword.to_string(),
                        occurrences: count,
                    })
                }
            }
        }

        if !mask.slice(0, located[0].1).trim().is_empty() {
            return Err(StatementError::MalformedStatement(
                "statement must begin with SELECT".to_string(),
            ));
        }
        for pair in located.windows(2) {
            let (previous, _, previous_end) = pair[0];
            let (next, next_start, _) = pair[1];
            if next_start < previous_end {
                return Err(StatementError::MalformedStatement(format!(
                    "{next} clause cannot precede {previous}"
                )));
            }
        }

        let mut statement = ParsedStatement::new(dialect);
        for (index, &(keyword, _, keyword_end)) in located.iter().enumerate() {
            let body_end = located
                .get(index + 1)
                .map(|&(_, next_start, _)| next_start)
                .unwrap_or(mask.len());
            let body = mask.slice(keyword_end, body_end);

            match keyword {
                ClauseKeyword::Select => {
                    statement.projection = SearchableText::new(&body, dialect)
                        .split_top_level(',')
                        .iter()
                        .map(|item| ColumnDescriptor::classify(item, dialect))
                        .collect();
                    if statement.projection.is_empty() {
                        return Err(StatementError::MalformedStatement(
                            "empty select list".to_string(),
                        ));
                    }
                }
                ClauseKeyword::From => {
                    statement.from = collapse_whitespace(&body, dialect);
                    if statement.from.is_empty() {
                        return Err(StatementError::MalformedStatement(
                            "empty FROM clause".to_string(),
                        ));
                    }
                }
                ClauseKeyword::Where => {
                    statement.criteria = ClausePredicate::split_clause(&body, dialect);
                }
                ClauseKeyword::GroupBy => {
                    statement.group_by = Self::split_terms(&body, dialect);
                }
                ClauseKeyword::Having => {
                    statement.having = ClausePredicate::split_clause(&body, dialect);
                }
                ClauseKeyword::OrderBy => {
                    statement.order_by = Self::split_terms(&body, dialect);
                }
                ClauseKeyword::Limit => {
                    let text = collapse_whitespace(&body, dialect);
                    statement.limit = if text.is_empty() { None } else { Some(text) };
                }
            }
        }

        Ok(statement)
    }

    fn split_terms(body: &str, dialect: Dialect) -> Vec<String> {
        SearchableText::new(body, dialect)
            .split_top_level(',')
            .iter()
            .map(|term| collapse_whitespace(term, dialect))
            .collect()
    }
}
