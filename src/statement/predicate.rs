use serde::{Deserialize, Serialize};

use crate::statement::{collapse_whitespace, CombineLogic::*, Dialect, SearchableText};

/// How a predicate joins its siblings when the clause is assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombineLogic {
    #[default]
    And,
    Or,
    AndNot,
    OrNot,
}

impl CombineLogic {
    pub fn negated(&self) -> bool {
        matches!(self, AndNot | OrNot)
    }

    pub fn is_or(&self) -> bool {
        matches!(self, Or | OrNot)
    }
}

/// One WHERE/HAVING predicate: opaque text plus the logic that attaches it
/// to the rest of its clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ClausePredicate {
    pub text: String,
    pub combine: CombineLogic,
}

impl ClausePredicate {
    pub fn new(text: impl Into<String>, combine: CombineLogic) -> Self {
        Self { text: text.into(), combine }
    }

    /// Split a WHERE/HAVING clause body on its top-level connectors. The
    /// connector attaches to the predicate that follows it; the first
    /// predicate joins with AND.
    pub fn split_clause(body: &str, dialect: Dialect) -> Vec<ClausePredicate> {
        let mask = SearchableText::new(body, dialect);

        // longest connector first so AND NOT is not read as a bare AND
        let connectors: [(&[&str], CombineLogic); 4] = [
            (&["AND", "NOT"], AndNot),
            (&["OR", "NOT"], OrNot),
            (&["AND"], And),
            (&["OR"], Or),
        ];

        let mut cuts: Vec<(usize, usize, CombineLogic)> = vec![];
        for (words, logic) in connectors {
            for (start, end) in mask.find_keyword(words) {
                if cuts.iter().any(|&(s, e, _)| start >= s && start < e) {
                    continue;
                }
                cuts.push((start, end, logic));
            }
        }
        cuts.sort_by_key(|&(start, _, _)| start);

        let mut predicates = vec![];
        let mut segment_start = 0;
        let mut logic = And;
        for (start, end, next_logic) in cuts {
            let text = collapse_whitespace(&mask.slice(segment_start, start), dialect);
            if !text.is_empty() {
                predicates.push(ClausePredicate::new(text, logic));
            }
            logic = next_logic;
            segment_start = end;
        }
        let text = collapse_whitespace(&mask.slice(segment_start, mask.len()), dialect);
        if !text.is_empty() {
            predicates.push(ClausePredicate::new(text, logic));
        }

        predicates
    }
}

#[cfg(test)]
mod tests {
    use crate::statement::{ClausePredicate, CombineLogic, Dialect};

    #[test]
    pub fn test_split_single_predicate() {
        let predicates = ClausePredicate::split_clause("a.Age > 16", Dialect::default());

        assert_eq!(predicates.len(), 1);
        assert_eq!(predicates[0].text, "a.Age > 16");
        assert_eq!(predicates[0].combine, CombineLogic::And);
    }

    #[test]
    pub fn test_split_and_or() {
        let predicates = ClausePredicate::split_clause(
            "a.Age > 16 AND b.City = 'Porto' OR b.City = 'Braga'",
            Dialect::default(),
        );

        assert_eq!(predicates.len(), 3);
        assert_eq!(predicates[1].combine, CombineLogic::And);
        assert_eq!(predicates[2].combine, CombineLogic::Or);
    }

    #[test]
    pub fn test_split_and_not() {
        let predicates =
            ClausePredicate::split_clause("a.Age > 16 AND NOT b.Blocked = 1", Dialect::default());

        assert_eq!(predicates.len(), 2);
        assert_eq!(predicates[1].combine, CombineLogic::AndNot);
        assert_eq!(predicates[1].text, "b.Blocked = 1");
    }

    #[test]
    pub fn test_split_keeps_nested_groups_opaque() {
        let predicates = ClausePredicate::split_clause(
            "(b.City = 'Porto' OR b.City = 'Braga') AND a.Age > 16",
            Dialect::default(),
        );

        assert_eq!(predicates.len(), 2);
        assert_eq!(predicates[0].text, "(b.City = 'Porto' OR b.City = 'Braga')");
    }

    #[test]
    pub fn test_split_ignores_quoted_connectors() {
        let predicates =
            ClausePredicate::split_clause("note = 'salt AND pepper'", Dialect::default());

        assert_eq!(predicates.len(), 1);
    }
}
