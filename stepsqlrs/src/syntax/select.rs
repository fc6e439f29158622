use crate::config::RenderingConfig;
use crate::error::Result;
use crate::steps::{Step, StepKind};

use super::{mismatch, StepRenderer, StepSyntax};

/// `SELECT <projection> FROM <source>`
#[derive(Debug, Clone)]
pub struct SelectSql {
    subquery_alias: String,
}

impl SelectSql {
    pub fn new(settings: &RenderingConfig) -> Self {
        Self {
            subquery_alias: settings.subquery_alias.clone(),
        }
    }
}

impl StepSyntax for SelectSql {
    fn to_sql(&self, ctx: &StepRenderer<'_>, step: &Step) -> Result<String> {
        let Step::Select(select) = step else {
            return Err(mismatch(StepKind::Select, step));
        };
        Ok(format!(
            "SELECT {} FROM {}",
            ctx.projection(&select.columns)?,
            ctx.from_clause(&select.from, &self.subquery_alias)?
        ))
    }
}
