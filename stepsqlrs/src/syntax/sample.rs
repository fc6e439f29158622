//! Row-windowed sampling (offset + limit).
//!
//! The generic dialect has `LIMIT`/`OFFSET`. Oracle before 12c has neither,
//! so the window is cut with the `ROWNUM` pseudo-column over two nested
//! queries: the inner one bounds the upper edge, the outer one trims the
//! lower edge. `ROWNUM` is only meaningful inside the query that produces
//! the rows, which is why the upper bound has to be applied first.

use crate::config::RenderingConfig;
use crate::dialect::Dialect;
use crate::error::{Result, StepSqlError};
use crate::steps::{Step, StepKind};

use super::{mismatch, StepRenderer, StepSyntax};

/// A validated `(offset, limit)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub offset: u64,
    pub limit: u64,
}

impl RowWindow {
    pub fn new(limit: i64, offset: i64) -> Result<Self> {
        let limit = u64::try_from(limit).map_err(|_| {
            StepSqlError::ContractViolation(format!("sample limit must be >= 0, got {limit}"))
        })?;
        let offset = u64::try_from(offset).map_err(|_| {
            StepSqlError::ContractViolation(format!("sample offset must be >= 0, got {offset}"))
        })?;
        Ok(Self { offset, limit })
    }

    /// Last row number kept (1-based, inclusive). Two non-negative `i64`
    /// values always sum within `u64`.
    pub fn upper(&self) -> u64 {
        self.offset + self.limit
    }

    /// Rows selected out of `available` input rows: the count the rendered
    /// window (`LIMIT`/`OFFSET` or the `ROWNUM` pair) returns, computed
    /// without running the query.
    pub fn rows_selected(&self, available: u64) -> u64 {
        available.saturating_sub(self.offset).min(self.limit)
    }
}

/// `base`, or `base_1`, `base_2`, ... whichever first differs from every
/// column name (case-insensitively).
pub fn unique_alias(base: &str, columns: &[String]) -> String {
    let taken = |candidate: &str| columns.iter().any(|c| c.eq_ignore_ascii_case(candidate));
    if !taken(base) {
        return base.to_string();
    }
    let mut n = 1u32;
    loop {
        let candidate = format!("{base}_{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// `SELECT <cols> FROM <source> LIMIT n OFFSET m`
#[derive(Debug, Clone)]
pub struct LimitOffsetSample {
    subquery_alias: String,
}

impl LimitOffsetSample {
    pub fn new(settings: &RenderingConfig) -> Self {
        Self {
            subquery_alias: settings.subquery_alias.clone(),
        }
    }
}

impl StepSyntax for LimitOffsetSample {
    fn to_sql(&self, ctx: &StepRenderer<'_>, step: &Step) -> Result<String> {
        let Step::Sample(sample) = step else {
            return Err(mismatch(StepKind::Sample, step));
        };
        let window = RowWindow::new(sample.limit, sample.offset)?;
        Ok(format!(
            "SELECT {} FROM {} LIMIT {} OFFSET {}",
            ctx.column_list(&sample.columns)?,
            ctx.from_clause(&sample.from, &self.subquery_alias)?,
            window.limit,
            window.offset
        ))
    }
}

/// `ROWNUM`-based window for Oracle versions without `OFFSET ... FETCH`.
#[derive(Debug, Clone)]
pub struct RownumSample {
    row_number_alias: String,
    subquery_alias: String,
}

impl RownumSample {
    pub fn new(settings: &RenderingConfig) -> Self {
        Self {
            row_number_alias: settings.row_number_alias.clone(),
            subquery_alias: settings.subquery_alias.clone(),
        }
    }

    /// Render the window over `from_clause` (an aliased source such as
    /// `(SELECT ...) "t1"`), projecting `columns`.
    pub fn window(
        &self,
        dialect: &dyn Dialect,
        columns: &[String],
        from_clause: &str,
        limit: i64,
        offset: i64,
    ) -> Result<String> {
        let window = RowWindow::new(limit, offset)?;
        if columns.is_empty() {
            return Err(StepSqlError::ContractViolation(
                "sample needs at least one column".to_string(),
            ));
        }
        let column_list = columns
            .iter()
            .map(|c| dialect.quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let rownum = dialect.quote_ident(&unique_alias(&self.row_number_alias, columns));
        Ok(format!(
            "SELECT {column_list} FROM (SELECT {column_list}, ROWNUM {rownum} FROM {from_clause} WHERE ROWNUM <= {upper}) {alias} WHERE {rownum} > {offset}",
            upper = window.upper(),
            alias = dialect.quote_ident(&self.subquery_alias),
            offset = window.offset,
        ))
    }
}

impl StepSyntax for RownumSample {
    fn to_sql(&self, ctx: &StepRenderer<'_>, step: &Step) -> Result<String> {
        let Step::Sample(sample) = step else {
            return Err(mismatch(StepKind::Sample, step));
        };
        let from_clause = ctx.from_clause(&sample.from, &self.subquery_alias)?;
        self.window(
            ctx.dialect(),
            &sample.columns,
            &from_clause,
            sample.limit,
            sample.offset,
        )
    }
}
