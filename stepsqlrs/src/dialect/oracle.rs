use std::sync::Arc;

use crate::catalog::{AggregateCatalog, AggregateFunctionDef, OutputTypeRule};
use crate::config::RenderingConfig;
use crate::provider::DialectProvider;
use crate::steps::{FilterCondition, StepKind};
use crate::syntax::filter::oracle;
use crate::syntax::{JoinSql, OracleJoinKeyword, OracleValueFormatter, RownumSample};

use super::{generic_provider, Dialect};

#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDialect;

impl Dialect for OracleDialect {
    fn id(&self) -> &str {
        "oracle"
    }

    fn cast_to_text(&self, expr: &str) -> String {
        format!("CAST ({expr} AS VARCHAR2(4000))")
    }

    fn supports_drop_if_exists(&self) -> bool {
        false
    }

    fn table_names_sql(&self) -> String {
        "SELECT table_name FROM all_tables WHERE owner = ?".to_string()
    }

    // No LIMIT in Oracle.
    fn column_metadata_sql(&self, qualified_table: &str) -> String {
        format!("SELECT * FROM {qualified_table} WHERE 0=1")
    }
}

/// Generic catalog plus `MEDIAN`; join, sample, pattern filters and temporal
/// literals overridden, everything else from the generic provider.
pub fn oracle_provider(settings: &RenderingConfig) -> DialectProvider {
    let aggregates = AggregateCatalog::merge(
        DialectProvider::generic().aggregate_functions(),
        [AggregateFunctionDef::new(
            "MEDIAN",
            "MEDIAN({expr})",
            "Return the median value of the argument.",
            OutputTypeRule::SameAsInput,
        )],
    );
    DialectProvider::builder(OracleDialect)
        .aggregates(aggregates)
        .step(StepKind::Join, JoinSql::new(OracleJoinKeyword, settings))
        .step(StepKind::Sample, RownumSample::new(settings))
        .filter(FilterCondition::Contains, oracle::contains)
        .filter(FilterCondition::DoesNotContain, oracle::does_not_contain)
        .filter(FilterCondition::StartsWith, oracle::starts_with)
        .filter(FilterCondition::EndsWith, oracle::ends_with)
        .filter(FilterCondition::Matches, oracle::matches)
        .values(OracleValueFormatter)
        .fallback(Arc::new(generic_provider(settings)))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_adds_median_once() {
        let settings = RenderingConfig::default();
        let first = oracle_provider(&settings);
        let second = oracle_provider(&settings);
        assert_eq!(first.aggregate_functions(), second.aggregate_functions());
        assert_eq!(
            first.aggregate_functions().len(),
            AggregateCatalog::generic().len() + 1
        );
        assert_eq!(
            first.aggregate_functions().get("MEDIAN").unwrap().render("\"x\""),
            "MEDIAN(\"x\")"
        );
    }

    #[test]
    fn metadata_statements() {
        let oracle = oracle_provider(&RenderingConfig::default());
        let tables = oracle.table_names_query("SCOTT");
        assert_eq!(tables.sql, "SELECT table_name FROM all_tables WHERE owner = ?");
        assert_eq!(tables.params, vec!["SCOTT".to_string()]);
        assert_eq!(
            oracle.column_metadata_query(Some("SCOTT"), "EMP").sql,
            "SELECT * FROM \"SCOTT\".\"EMP\" WHERE 0=1"
        );
    }
}
