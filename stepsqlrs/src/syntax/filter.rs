//! Filter predicates.
//!
//! Each [`FilterCondition`] maps to a [`FilterRenderer`]. The generic
//! renderers cover every condition; Oracle replaces the pattern-matching ones
//! because Oracle's `LIKE` has no default escape character.

use crate::config::RenderingConfig;
use crate::error::{Result, StepSqlError};
use crate::steps::{FilterCondition, Step, StepKind};
use crate::types::ColumnType;

use super::{mismatch, StepRenderer, StepSyntax};

/// Escape character used in rendered `LIKE` patterns.
pub const LIKE_ESCAPE: char = '\\';

/// Renders `(column expression, literal)` into a predicate.
pub type FilterRenderer = fn(&StepRenderer<'_>, &FilterOperand<'_>) -> Result<String>;

#[derive(Debug, Clone, Copy)]
pub struct FilterOperand<'a> {
    /// Already-rendered column expression, e.g. `"NAME"`.
    pub column: &'a str,
    /// Raw, unquoted literal; `None` for conditions without an operand.
    pub value: Option<&'a str>,
    pub column_type: ColumnType,
}

impl<'a> FilterOperand<'a> {
    pub fn new(column: &'a str, value: Option<&'a str>, column_type: ColumnType) -> Self {
        Self {
            column,
            value,
            column_type,
        }
    }

    fn required_value(&self, condition: FilterCondition) -> Result<&'a str> {
        self.value.ok_or_else(|| {
            StepSqlError::ContractViolation(format!(
                "{condition} on {} needs a value",
                self.column
            ))
        })
    }
}

/// Prefix every `%`, `_` and `escape` in `raw` with `escape`.
pub fn escape_like(raw: &str, escape: char) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '%' || c == '_' || c == escape {
            escaped.push(escape);
        }
        escaped.push(c);
    }
    escaped
}

fn like_pattern(
    ctx: &StepRenderer<'_>,
    operand: &FilterOperand<'_>,
    condition: FilterCondition,
) -> Result<(bool, String)> {
    let escaped = escape_like(operand.required_value(condition)?, LIKE_ESCAPE);
    let (negated, pattern) = match condition {
        FilterCondition::Contains => (false, format!("%{escaped}%")),
        FilterCondition::DoesNotContain => (true, format!("%{escaped}%")),
        FilterCondition::StartsWith => (false, format!("{escaped}%")),
        FilterCondition::EndsWith => (false, format!("%{escaped}")),
        other => {
            return Err(StepSqlError::unsupported(format!(
                "{other} as a LIKE pattern"
            )))
        }
    };
    Ok((negated, ctx.dialect().quote_literal(&pattern)))
}

fn anchored_regex(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
    let raw = operand.required_value(FilterCondition::Matches)?;
    Ok(ctx.dialect().quote_literal(&format!("^{raw}$")))
}

/// Generic renderers, one per condition.
pub mod ansi {
    use super::*;

    fn comparison(
        ctx: &StepRenderer<'_>,
        operand: &FilterOperand<'_>,
        condition: FilterCondition,
        op: &str,
    ) -> Result<String> {
        let literal = ctx.format_value(operand.required_value(condition)?, operand.column_type)?;
        Ok(format!("{} {op} {literal}", operand.column))
    }

    pub fn equals(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        comparison(ctx, operand, FilterCondition::Equals, "=")
    }

    pub fn not_equals(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        comparison(ctx, operand, FilterCondition::NotEquals, "<>")
    }

    pub fn less_than(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        comparison(ctx, operand, FilterCondition::LessThan, "<")
    }

    pub fn less_or_equal(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        comparison(ctx, operand, FilterCondition::LessOrEqual, "<=")
    }

    pub fn greater_than(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        comparison(ctx, operand, FilterCondition::GreaterThan, ">")
    }

    pub fn greater_or_equal(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        comparison(ctx, operand, FilterCondition::GreaterOrEqual, ">=")
    }

    pub fn is_missing(_ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        Ok(format!("{} IS NULL", operand.column))
    }

    pub fn is_not_missing(_ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        Ok(format!("{} IS NOT NULL", operand.column))
    }

    // The generic target treats `\` as the implicit LIKE escape.
    fn like(
        ctx: &StepRenderer<'_>,
        operand: &FilterOperand<'_>,
        condition: FilterCondition,
    ) -> Result<String> {
        let (negated, pattern) = like_pattern(ctx, operand, condition)?;
        let not = if negated { "NOT " } else { "" };
        Ok(format!("{} {not}LIKE {pattern}", operand.column))
    }

    pub fn contains(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        like(ctx, operand, FilterCondition::Contains)
    }

    pub fn does_not_contain(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        like(ctx, operand, FilterCondition::DoesNotContain)
    }

    pub fn starts_with(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        like(ctx, operand, FilterCondition::StartsWith)
    }

    pub fn ends_with(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        like(ctx, operand, FilterCondition::EndsWith)
    }

    pub fn matches(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        Ok(format!(
            "{} LIKE_REGEX {}",
            operand.column,
            anchored_regex(ctx, operand)?
        ))
    }
}

/// Oracle renderers for the pattern-matching conditions.
pub mod oracle {
    use super::*;

    fn like(
        ctx: &StepRenderer<'_>,
        operand: &FilterOperand<'_>,
        condition: FilterCondition,
    ) -> Result<String> {
        let (negated, pattern) = like_pattern(ctx, operand, condition)?;
        let not = if negated { "NOT " } else { "" };
        Ok(format!(
            "{} {not}LIKE {pattern} ESCAPE '{LIKE_ESCAPE}'",
            operand.column
        ))
    }

    pub fn contains(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        like(ctx, operand, FilterCondition::Contains)
    }

    pub fn does_not_contain(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        like(ctx, operand, FilterCondition::DoesNotContain)
    }

    pub fn starts_with(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        like(ctx, operand, FilterCondition::StartsWith)
    }

    pub fn ends_with(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        like(ctx, operand, FilterCondition::EndsWith)
    }

    pub fn matches(ctx: &StepRenderer<'_>, operand: &FilterOperand<'_>) -> Result<String> {
        Ok(format!(
            "REGEXP_LIKE({}, {})",
            operand.column,
            anchored_regex(ctx, operand)?
        ))
    }
}

/// `SELECT <projection> FROM <source> WHERE p1 AND p2 ...`
#[derive(Debug, Clone)]
pub struct FilterSql {
    subquery_alias: String,
}

impl FilterSql {
    pub fn new(settings: &RenderingConfig) -> Self {
        Self {
            subquery_alias: settings.subquery_alias.clone(),
        }
    }
}

impl StepSyntax for FilterSql {
    fn to_sql(&self, ctx: &StepRenderer<'_>, step: &Step) -> Result<String> {
        let Step::Filter(filter) = step else {
            return Err(mismatch(StepKind::Filter, step));
        };
        let mut sql = format!(
            "SELECT {} FROM {}",
            ctx.projection(&filter.columns)?,
            ctx.from_clause(&filter.from, &self.subquery_alias)?
        );
        if filter.predicates.is_empty() {
            return Ok(sql);
        }
        let predicates = filter
            .predicates
            .iter()
            .map(|p| {
                let column = ctx.quote(&p.column);
                let operand = FilterOperand::new(&column, p.value.as_deref(), p.column_type);
                ctx.render_filter(p.condition, &operand)
            })
            .collect::<Result<Vec<_>>>()?;
        let joiner = format!(" {} ", filter.connective.keyword());
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(&joiner));
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_wildcards_and_escape_char() {
        assert_eq!(escape_like("50%_off", '\\'), "50\\%\\_off");
        assert_eq!(escape_like("a\\b", '\\'), "a\\\\b");
        assert_eq!(escape_like("plain", '\\'), "plain");
        assert_eq!(escape_like("", '\\'), "");
    }

    #[test]
    fn escape_respects_custom_escape_char() {
        assert_eq!(escape_like("a!b%", '!'), "a!!b!%");
    }
}
