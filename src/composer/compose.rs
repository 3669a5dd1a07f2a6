use tracing::{debug, trace};

use crate::assemble::Renderer;
use crate::composer::{ComposeError, ReportColumn, ReportRequest, VisibilityResolver};
use crate::fields::FieldLookup;
use crate::filter::{BoundParameter, CompositionContext, FilterTranslator, GroupLookup};
use crate::statement::{ClausePredicate, Dialect, ParsedStatement, StatementParser};

/// A composed report: the final statement text with named placeholders, the
/// values to bind in order, and the surviving projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedReport {
    pub sql: String,
    pub params: Vec<BoundParameter>,
    pub columns: Vec<ReportColumn>,
}

/// The row-count variant of a report, used for pagination totals.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedCount {
    pub sql: String,
    pub params: Vec<BoundParameter>,
}

/// Entry point: takes one hand-authored base statement plus one declarative
/// request and produces the final parameterized statement. Pure and
/// synchronous; the injected group lookup is the only external call.
pub struct ReportComposer<'a> {
    pub dialect: Dialect,
    pub fields: &'a dyn FieldLookup,
    pub groups: &'a dyn GroupLookup,
}

impl<'a> ReportComposer<'a> {
    pub fn new(
        dialect: Dialect,
        fields: &'a dyn FieldLookup,
        groups: &'a dyn GroupLookup,
    ) -> Self {
        Self { dialect, fields, groups }
    }

    pub fn compose(
        &self,
        base_sql: &str,
        request: &ReportRequest,
    ) -> Result<ComposedReport, ComposeError> {
        let (mut statement, columns, params) = self.prepare(base_sql, request)?;

        if let Some(sort) = &request.sort {
            Renderer::with_sort(&mut statement, &sort.column, sort.direction);
        }
        if let Some(page) = &request.page {
            statement.limit = Some(page.limit_text());
        }

        let sql = Renderer::render(&statement);
        trace!(%sql, "composed report");
        Ok(ComposedReport { sql, params, columns })
    }

    /// Same pipeline without sort or paging, rendered as the row-count
    /// variant; the bound parameters match the full report's.
    pub fn compose_count(
        &self,
        base_sql: &str,
        request: &ReportRequest,
    ) -> Result<ComposedCount, ComposeError> {
        let (statement, _, params) = self.prepare(base_sql, request)?;

        let sql = Renderer::count_variant(&statement);
        trace!(%sql, "composed row count");
        Ok(ComposedCount { sql, params })
    }

    fn prepare(
        &self,
        base_sql: &str,
        request: &ReportRequest,
    ) -> Result<(ParsedStatement, Vec<ReportColumn>, Vec<BoundParameter>), ComposeError> {
        debug!(
            filters = request.filters.len(),
            prune = request.prune_hidden,
            "composing report"
        );
        let mut statement = StatementParser::parse(base_sql, self.dialect)?;
        let mut columns = ReportColumn::from_projection(&statement.projection, self.fields);

        // translation resolves renamed fields against the full projection,
        // so it runs before any column is pruned
        let mut context = CompositionContext::new(self.dialect);
        let translated = FilterTranslator::translate(
            &request.filters,
            &statement,
            self.fields,
            self.groups,
            &mut context,
        )?;

        if request.prune_hidden {
            VisibilityResolver::hide_filtered(
                &mut statement,
                &mut columns,
                &request.filters,
                self.fields,
            )?;
        }

        for (_, filter) in translated {
            statement.push_predicate(
                ClausePredicate::new(filter.text, filter.combine),
                filter.aggregated,
            );
        }

        Ok((statement, columns, context.into_params()))
    }
}
