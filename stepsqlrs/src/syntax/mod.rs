//! Per-step SQL syntax strategies.
//!
//! A [`StepSyntax`] renders one [`StepKind`]. Providers register strategies
//! only for the kinds where their database deviates from the generic
//! dialect; [`StepRenderer`] looks a kind up in the active provider first and
//! in the fallback provider second. Filter renderers and value formatting go
//! through the same two-level lookup.

use crate::catalog::AggregateFunctionDef;
use crate::dialect::Dialect;
use crate::error::{Result, StepSqlError};
use crate::provider::DialectProvider;
use crate::steps::{Column, FilterCondition, Source, Step, StepKind};
use crate::types::ColumnType;

pub mod aggregate;
pub mod filter;
pub mod join;
pub mod sample;
pub mod select;
pub mod sort;
pub mod value;

pub use aggregate::AggregateSql;
pub use filter::{escape_like, FilterOperand, FilterRenderer, FilterSql, LIKE_ESCAPE};
pub use join::{AnsiJoinKeyword, JoinKeyword, JoinSql, OracleJoinKeyword};
pub use sample::{unique_alias, LimitOffsetSample, RowWindow, RownumSample};
pub use select::SelectSql;
pub use sort::SortSql;
pub use value::{
    normalize_temporal, AnsiValueFormatter, OracleValueFormatter, Temporal, ValueFormatter,
};

/// Renders one kind of step to SQL.
pub trait StepSyntax: Send + Sync {
    fn to_sql(&self, ctx: &StepRenderer<'_>, step: &Step) -> Result<String>;
}

/// Walks a step tree, dispatching every step to the strategy registered for
/// its kind.
#[derive(Debug, Clone, Copy)]
pub struct StepRenderer<'p> {
    provider: &'p DialectProvider,
    fallback: &'p DialectProvider,
}

impl<'p> StepRenderer<'p> {
    /// Renderer falling back to the built-in generic provider.
    pub fn new(provider: &'p DialectProvider) -> Self {
        Self {
            provider,
            fallback: DialectProvider::generic(),
        }
    }

    pub fn with_fallback(provider: &'p DialectProvider, fallback: &'p DialectProvider) -> Self {
        Self { provider, fallback }
    }

    pub fn provider(&self) -> &'p DialectProvider {
        self.provider
    }

    pub fn dialect(&self) -> &'p dyn Dialect {
        self.provider.dialect()
    }

    pub fn quote(&self, ident: &str) -> String {
        self.dialect().quote_ident(ident)
    }

    pub fn render(&self, step: &Step) -> Result<String> {
        let kind = step.kind();
        let syntax = self.syntax_for(kind)?;
        let sql = syntax.to_sql(self, step)?;
        tracing::debug!(
            dialect = self.provider.id(),
            kind = kind.name(),
            len = sql.len(),
            "rendered step"
        );
        Ok(sql)
    }

    fn syntax_for(&self, kind: StepKind) -> Result<&'p dyn StepSyntax> {
        if let Some(syntax) = self.provider.step_syntax(kind) {
            return Ok(syntax);
        }
        if let Some(syntax) = self.fallback.step_syntax(kind) {
            tracing::debug!(
                dialect = self.provider.id(),
                fallback = self.fallback.id(),
                kind = kind.name(),
                "using fallback step syntax"
            );
            return Ok(syntax);
        }
        Err(StepSqlError::unsupported(format!(
            "{kind} step in dialect {}",
            self.provider.id()
        )))
    }

    /// Render one predicate; the dialect's renderer wins over the fallback's.
    pub fn render_filter(
        &self,
        condition: FilterCondition,
        operand: &FilterOperand<'_>,
    ) -> Result<String> {
        let renderer = self
            .provider
            .filter_renderer(condition)
            .or_else(|| self.fallback.filter_renderer(condition))
            .ok_or_else(|| {
                StepSqlError::unsupported(format!(
                    "filter condition {condition} in dialect {}",
                    self.provider.id()
                ))
            })?;
        renderer(self, operand)
    }

    /// Format `raw` as a SQL literal for a column of `column_type`.
    pub fn format_value(&self, raw: &str, column_type: ColumnType) -> Result<String> {
        let formatter = self
            .provider
            .value_formatter()
            .or_else(|| self.fallback.value_formatter())
            .ok_or_else(|| {
                StepSqlError::unsupported(format!(
                    "value formatting in dialect {}",
                    self.provider.id()
                ))
            })?;
        formatter.format(self.dialect(), raw, column_type)
    }

    pub fn aggregate_function(&self, name: &str) -> Result<&'p AggregateFunctionDef> {
        self.provider
            .aggregate_functions()
            .get(name)
            .or_else(|| self.fallback.aggregate_functions().get(name))
            .ok_or_else(|| {
                StepSqlError::unsupported(format!(
                    "aggregate function {name} in dialect {}",
                    self.provider.id()
                ))
            })
    }

    /// `"SCHEMA"."TABLE" "alias"` for tables, `(<sql>) "alias"` otherwise.
    pub fn from_clause(&self, source: &Source, alias: &str) -> Result<String> {
        let alias = self.quote(alias);
        match source {
            Source::Table { schema, name } => Ok(format!(
                "{} {alias}",
                self.dialect().qualify_table(schema.as_deref(), name)
            )),
            Source::Query { sql } => Ok(format!("({sql}) {alias}")),
            Source::Step(step) => Ok(format!("({}) {alias}", self.render(step)?)),
        }
    }

    pub fn column_item(&self, column: &Column) -> String {
        match &column.expr {
            Some(expr) => format!("{expr} AS {}", self.quote(&column.name)),
            None => self.quote(&column.name),
        }
    }

    pub fn projection(&self, columns: &[Column]) -> Result<String> {
        if columns.is_empty() {
            return Err(StepSqlError::ContractViolation(
                "projection needs at least one column".to_string(),
            ));
        }
        let items: Vec<String> = columns.iter().map(|c| self.column_item(c)).collect();
        Ok(items.join(", "))
    }

    /// Comma-separated quoted names.
    pub fn column_list(&self, names: &[String]) -> Result<String> {
        if names.is_empty() {
            return Err(StepSqlError::ContractViolation(
                "column list needs at least one column".to_string(),
            ));
        }
        let quoted: Vec<String> = names.iter().map(|n| self.quote(n)).collect();
        Ok(quoted.join(", "))
    }
}

/// Error for a strategy invoked with a step of another kind.
pub(crate) fn mismatch(expected: StepKind, step: &Step) -> StepSqlError {
    StepSqlError::unsupported(format!(
        "{} step handed to {expected} syntax",
        step.kind()
    ))
}
