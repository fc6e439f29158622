use crate::config::RenderingConfig;
use crate::error::{Result, StepSqlError};
use crate::steps::{SortDirection, Step, StepKind};

use super::{mismatch, StepRenderer, StepSyntax};

/// `SELECT <projection> FROM <source> ORDER BY "c1" ASC, "c2" DESC`
#[derive(Debug, Clone)]
pub struct SortSql {
    subquery_alias: String,
}

impl SortSql {
    pub fn new(settings: &RenderingConfig) -> Self {
        Self {
            subquery_alias: settings.subquery_alias.clone(),
        }
    }
}

impl StepSyntax for SortSql {
    fn to_sql(&self, ctx: &StepRenderer<'_>, step: &Step) -> Result<String> {
        let Step::Sort(sort) = step else {
            return Err(mismatch(StepKind::Sort, step));
        };
        if sort.order.is_empty() {
            return Err(StepSqlError::ContractViolation(
                "sort needs at least one key".to_string(),
            ));
        }
        let keys: Vec<String> = sort
            .order
            .iter()
            .map(|key| {
                let direction = match key.direction {
                    SortDirection::Asc => "ASC",
                    SortDirection::Desc => "DESC",
                };
                format!("{} {direction}", ctx.quote(&key.column))
            })
            .collect();
        Ok(format!(
            "SELECT {} FROM {} ORDER BY {}",
            ctx.projection(&sort.columns)?,
            ctx.from_clause(&sort.from, &self.subquery_alias)?,
            keys.join(", ")
        ))
    }
}
