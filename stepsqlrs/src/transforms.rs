//! Step-building transforms on top of a provider.

use std::collections::HashSet;

use crate::error::{Result, StepSqlError};
use crate::provider::DialectProvider;
use crate::steps::{Column, SelectStep, Source, Step};
use crate::types::ColumnType;

/// Select over `from` that trims the selected character columns and passes
/// every other column through.
///
/// Columns of unknown type (`AttributeValue`, e.g. generated expressions) are
/// cast to text first. Fails when the selection contains no such column.
pub fn trim_nominal_columns(
    provider: &DialectProvider,
    from: Source,
    columns: &[Column],
    selection: &HashSet<String>,
) -> Result<Step> {
    let trimmable = |c: &Column| {
        selection.contains(&c.name)
            && (c.column_type.is_nominal() || c.column_type == ColumnType::AttributeValue)
    };
    if !columns.iter().any(trimmable) {
        return Err(StepSqlError::ContractViolation(
            "trim needs at least one selected nominal column".to_string(),
        ));
    }

    let output = columns
        .iter()
        .map(|c| {
            if !trimmable(c) {
                return Column::new(c.name.clone(), c.column_type);
            }
            let quoted = provider.quote_ident(&c.name);
            let arg = if c.column_type == ColumnType::AttributeValue {
                provider.dialect().cast_to_text(&quoted)
            } else {
                quoted
            };
            Column::expr(format!("TRIM({arg})"), c.name.clone(), c.column_type)
        })
        .collect::<Vec<_>>();
    tracing::debug!(
        dialect = provider.id(),
        trimmed = output.iter().filter(|c| c.expr.is_some()).count(),
        "built trim step"
    );
    Ok(Step::Select(SelectStep {
        from,
        columns: output,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderingConfig;
    use crate::dialect::oracle_provider;

    fn input() -> Vec<Column> {
        vec![
            Column::new("NAME", ColumnType::Nominal),
            Column::new("AGE", ColumnType::Integer),
            Column::expr("A || B", "GEN", ColumnType::AttributeValue),
        ]
    }

    #[test]
    fn trims_selected_nominals_only() {
        let oracle = oracle_provider(&RenderingConfig::default());
        let selection: HashSet<String> =
            ["NAME", "AGE", "GEN"].iter().map(|s| s.to_string()).collect();
        let step =
            trim_nominal_columns(&oracle, Source::table(Some("S"), "T"), &input(), &selection)
                .unwrap();
        let sql = oracle.to_sql(&step).unwrap();
        assert_eq!(
            sql,
            "SELECT TRIM(\"NAME\") AS \"NAME\", \"AGE\", TRIM(CAST (\"GEN\" AS VARCHAR2(4000))) AS \"GEN\" FROM \"S\".\"T\" \"t1\""
        );
    }

    #[test]
    fn selection_without_nominals_fails() {
        let oracle = oracle_provider(&RenderingConfig::default());
        let selection: HashSet<String> = ["AGE".to_string()].into_iter().collect();
        let err = trim_nominal_columns(&oracle, Source::table(None, "T"), &input(), &selection)
            .unwrap_err();
        assert!(matches!(err, StepSqlError::ContractViolation(_)));
    }
}
