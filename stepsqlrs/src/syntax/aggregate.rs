use crate::config::RenderingConfig;
use crate::error::{Result, StepSqlError};
use crate::steps::{Step, StepKind};

use super::{mismatch, StepRenderer, StepSyntax};

/// `SELECT <groups>, FN("c") AS "alias" FROM <source> GROUP BY <groups>`
///
/// Function templates come from the active provider's catalog, then the
/// fallback's.
#[derive(Debug, Clone)]
pub struct AggregateSql {
    subquery_alias: String,
}

impl AggregateSql {
    pub fn new(settings: &RenderingConfig) -> Self {
        Self {
            subquery_alias: settings.subquery_alias.clone(),
        }
    }
}

impl StepSyntax for AggregateSql {
    fn to_sql(&self, ctx: &StepRenderer<'_>, step: &Step) -> Result<String> {
        let Step::Aggregate(aggregate) = step else {
            return Err(mismatch(StepKind::Aggregate, step));
        };
        if aggregate.group_by.is_empty() && aggregate.aggregates.is_empty() {
            return Err(StepSqlError::ContractViolation(
                "aggregate needs a grouping column or an aggregate call".to_string(),
            ));
        }

        let mut items: Vec<String> = aggregate
            .group_by
            .iter()
            .map(|c| ctx.column_item(c))
            .collect();
        for call in &aggregate.aggregates {
            let def = ctx.aggregate_function(&call.function)?;
            items.push(format!(
                "{} AS {}",
                def.render(&ctx.quote(&call.column)),
                ctx.quote(&call.alias)
            ));
        }

        let mut sql = format!(
            "SELECT {} FROM {}",
            items.join(", "),
            ctx.from_clause(&aggregate.from, &self.subquery_alias)?
        );
        if !aggregate.group_by.is_empty() {
            let groups: Vec<String> = aggregate
                .group_by
                .iter()
                .map(|c| match &c.expr {
                    Some(expr) => expr.clone(),
                    None => ctx.quote(&c.name),
                })
                .collect();
            sql.push_str(" GROUP BY ");
            sql.push_str(&groups.join(", "));
        }
        Ok(sql)
    }
}
