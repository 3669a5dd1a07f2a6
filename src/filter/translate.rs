use chrono::{Duration, Utc};
use indexmap::IndexMap;
use tracing::trace;

use crate::fields::{FieldLookup, FieldSemantics};
use crate::filter::{
    paired_kind, CompositionContext, DeclaredFilter, FilterOperator, GroupLookup, ParamValue,
    TranslateError,
};
use crate::statement::{is_aggregate_expr, is_enclosed, CombineLogic, ParsedStatement};

/// One filter turned into SQL: the predicate text, how it joins its
/// siblings, and whether it targets an aggregated expression (which decides
/// WHERE against HAVING).
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedFilter {
    pub text: String,
    pub combine: CombineLogic,
    pub aggregated: bool,
}

/// The concrete expression a filter field resolved to, with the semantics
/// tag of its definition when one exists.
struct FilterTarget {
    expression: String,
    semantics: FieldSemantics,
}

pub struct FilterTranslator;

impl FilterTranslator {
    /// Translate every usable filter into a parameterized predicate, keyed
    /// by the index of the filter that produced it. Bound values accumulate
    /// in the context in placeholder order.
    pub fn translate(
        filters: &[DeclaredFilter],
        statement: &ParsedStatement,
        fields: &dyn FieldLookup,
        groups: &dyn GroupLookup,
        context: &mut CompositionContext,
    ) -> Result<IndexMap<usize, TranslatedFilter>, TranslateError> {
        let mut translated = IndexMap::new();

        for (index, filter) in filters.iter().enumerate() {
            if filter.is_inert() {
                trace!(filter = index, "skipping inert filter");
                continue;
            }

            let mut fragments: Vec<String> = vec![];
            let mut aggregated = false;
            for token in &filter.fields {
                let target = Self::resolve_target(token, statement, fields)?;
                let Some(fragment) = Self::build_fragment(filter, &target, groups, context)?
                else {
                    continue;
                };
                aggregated |= is_aggregate_expr(&target.expression);
                fragments.push(fragment);
            }
            if fragments.is_empty() {
                continue;
            }

            let text = if fragments.len() == 1 {
                fragments.remove(0)
            } else {
                let alternatives: Vec<String> = fragments
                    .iter()
                    .map(|fragment| Self::wrap(fragment, statement))
                    .collect();
                format!("({})", alternatives.join(" OR "))
            };

            translated.insert(
                index,
                TranslatedFilter { text, combine: filter.combine, aggregated },
            );
        }

        Ok(translated)
    }

    /// A renamed select item wins so the predicate operates on the same
    /// computed value the user sees; otherwise the field table supplies the
    /// canonical qualified name.
    fn resolve_target(
        token: &str,
        statement: &ParsedStatement,
        fields: &dyn FieldLookup,
    ) -> Result<FilterTarget, TranslateError> {
        let definition = fields.resolve(token);
        if let Some(column) = statement.renamed_source(token) {
            return Ok(FilterTarget {
                expression: column.source_expression.clone(),
                semantics: definition.map(|def| def.semantics).unwrap_or_default(),
            });
        }
        match definition {
            Some(def) => Ok(FilterTarget {
                expression: def.qualified(),
                semantics: def.semantics,
            }),
            None => Err(TranslateError::UnresolvableField(token.to_string())),
        }
    }

    fn build_fragment(
        filter: &DeclaredFilter,
        target: &FilterTarget,
        groups: &dyn GroupLookup,
        context: &mut CompositionContext,
    ) -> Result<Option<String>, TranslateError> {
        let expr = &target.expression;
        let fragment = match filter.operator {
            FilterOperator::LessThan => Self::comparison(expr, "<", filter, context),
            FilterOperator::LessOrEqual => Self::comparison(expr, "<=", filter, context),
            FilterOperator::GreaterThan => Self::comparison(expr, ">", filter, context),
            FilterOperator::GreaterOrEqual => Self::comparison(expr, ">=", filter, context),
            FilterOperator::Equals => Self::equals(expr, target.semantics, filter, context),
            FilterOperator::Contains => Self::contains(expr, filter, context),
            FilterOperator::StartsWith => Self::like_anchored(expr, filter, context, false),
            FilterOperator::EndsWith => Self::like_anchored(expr, filter, context, true),
            FilterOperator::InRange => Self::in_range(expr, filter, context),
            FilterOperator::InSet => Self::in_set(expr, filter, context),
            FilterOperator::InHierarchicalGroup => {
                return Self::in_group(expr, filter, groups);
            }
            FilterOperator::OlderThanMinutes => Self::minute_window(expr, "<=", filter, context),
            FilterOperator::NewerThanMinutes => Self::minute_window(expr, ">=", filter, context),
        };
        Ok(fragment)
    }

    fn comparison(
        expr: &str,
        op: &str,
        filter: &DeclaredFilter,
        context: &mut CompositionContext,
    ) -> Option<String> {
        let value = filter.first_value()?;
        let placeholder = context.bind(value.clone());
        Some(format!("({expr} {op} {placeholder})"))
    }

    /// Plain equality, widened to both halves of a paired operation kind so
    /// a report on one side of a transfer or recipe shows the whole
    /// operation.
    fn equals(
        expr: &str,
        semantics: FieldSemantics,
        filter: &DeclaredFilter,
        context: &mut CompositionContext,
    ) -> Option<String> {
        let value = filter.first_value()?;
        if semantics == FieldSemantics::OperationKind {
            if let Some(pair) = value.as_int().and_then(paired_kind) {
                let first = context.bind(value.clone());
                let second = context.bind(ParamValue::Int(pair));
                return Some(format!("(({expr} = {first}) OR ({expr} = {second}))"));
            }
        }
        let placeholder = context.bind(value.clone());
        Some(format!("({expr} = {placeholder})"))
    }

    /// Every whitespace-separated token of the operand must match somewhere
    /// in the value.
    fn contains(
        expr: &str,
        filter: &DeclaredFilter,
        context: &mut CompositionContext,
    ) -> Option<String> {
        let text = filter.first_value()?.text_form()?;
        let mut tests: Vec<String> = vec![];
        for token in text.split_whitespace() {
            let placeholder = context.bind(ParamValue::Text(format!("%{token}%")));
            tests.push(format!("({expr} LIKE {placeholder})"));
        }
        match tests.len() {
            0 => None,
            1 => Some(tests.remove(0)),
            _ => Some(format!("({})", tests.join(" AND "))),
        }
    }

    fn like_anchored(
        expr: &str,
        filter: &DeclaredFilter,
        context: &mut CompositionContext,
        anchor_end: bool,
    ) -> Option<String> {
        let text = filter.first_value()?.text_form()?;
        let pattern = if anchor_end { format!("%{text}") } else { format!("{text}%") };
        let placeholder = context.bind(ParamValue::Text(pattern));
        Some(format!("({expr} LIKE {placeholder})"))
    }

    fn in_range(
        expr: &str,
        filter: &DeclaredFilter,
        context: &mut CompositionContext,
    ) -> Option<String> {
        let mut parts: Vec<String> = vec![];
        if let Some(low) = filter.bound(0) {
            let placeholder = context.bind(low.clone());
            parts.push(format!("({expr} >= {placeholder})"));
        }
        if let Some(high) = filter.bound(1) {
            let placeholder = context.bind(high.clone());
            parts.push(format!("({expr} <= {placeholder})"));
        }
        match parts.len() {
            0 => None,
            1 => Some(parts.remove(0)),
            _ => Some(parts.join(" AND ")),
        }
    }

    fn in_set(
        expr: &str,
        filter: &DeclaredFilter,
        context: &mut CompositionContext,
    ) -> Option<String> {
        let placeholders: Vec<String> = filter
            .usable_values()
            .map(|value| context.bind(value.clone()))
            .collect();
        if placeholders.is_empty() {
            return None;
        }
        Some(format!("({expr} IN ({}))", placeholders.join(", ")))
    }

    /// Prefix tests over every group whose name matches the operand. Zero
    /// matching groups must yield zero rows, not an unfiltered report, so
    /// the empty result degenerates to an always-false predicate.
    fn in_group(
        expr: &str,
        filter: &DeclaredFilter,
        groups: &dyn GroupLookup,
    ) -> Result<Option<String>, TranslateError> {
        let Some(name) = filter.first_value().and_then(|value| value.text_form()) else {
            return Ok(None);
        };
        let codes = groups.codes_by_name(&name).map_err(TranslateError::GroupLookup)?;
        if codes.is_empty() {
            return Ok(Some("1 = 0".to_string()));
        }
        let mut tests: Vec<String> = codes
            .iter()
            .map(|code| format!("({expr} LIKE '{}%')", escape_literal(code)))
            .collect();
        if tests.len() == 1 {
            Ok(Some(tests.remove(0)))
        } else {
            Ok(Some(format!("({})", tests.join(" OR "))))
        }
    }

    fn minute_window(
        expr: &str,
        op: &str,
        filter: &DeclaredFilter,
        context: &mut CompositionContext,
    ) -> Option<String> {
        let minutes = filter.first_value()?.as_int()?;
        let cutoff = Utc::now() - Duration::minutes(minutes);
        let placeholder = context.bind(ParamValue::Timestamp(cutoff));
        Some(format!("({expr} {op} {placeholder})"))
    }

    fn wrap(fragment: &str, statement: &ParsedStatement) -> String {
        if is_enclosed(fragment, statement.dialect) {
            fragment.to_string()
        } else {
            format!("({fragment})")
        }
    }
}

fn escape_literal(text: &str) -> String {
    text.replace('\'', "''")
}
