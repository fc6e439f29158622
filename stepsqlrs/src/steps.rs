//! Backend-agnostic query-pipeline steps.
//!
//! A step describes one relational operation over a [`Source`]. Steps nest:
//! a source can itself be a step, so a pipeline is a tree rendered bottom-up
//! by [`crate::syntax::StepRenderer`].

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::AggregateCatalog;
use crate::error::{Result, StepSqlError};
use crate::types::ColumnType;

/// Closed set of step categories; strategy tables are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Select,
    Join,
    Filter,
    Sample,
    Aggregate,
    Sort,
}

impl StepKind {
    pub const ALL: [StepKind; 6] = [
        StepKind::Select,
        StepKind::Join,
        StepKind::Filter,
        StepKind::Sample,
        StepKind::Aggregate,
        StepKind::Sort,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StepKind::Select => "select",
            StepKind::Join => "join",
            StepKind::Filter => "filter",
            StepKind::Sample => "sample",
            StepKind::Aggregate => "aggregate",
            StepKind::Sort => "sort",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    Select(SelectStep),
    Join(JoinStep),
    Filter(FilterStep),
    Sample(SampleStep),
    Aggregate(AggregateStep),
    Sort(SortStep),
}

impl Step {
    pub fn kind(&self) -> StepKind {
        match self {
            Step::Select(_) => StepKind::Select,
            Step::Join(_) => StepKind::Join,
            Step::Filter(_) => StepKind::Filter,
            Step::Sample(_) => StepKind::Sample,
            Step::Aggregate(_) => StepKind::Aggregate,
            Step::Sort(_) => StepKind::Sort,
        }
    }

    /// Load a step tree from a `.json`, `.yml` or `.yaml` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(serde_json::from_str(&contents)?),
            Some("yml") | Some("yaml") => Ok(serde_yaml::from_str(&contents)?),
            other => Err(StepSqlError::unsupported(format!(
                "step file extension {:?} ({})",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }
}

/// Where a step reads its rows from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Table {
        #[serde(default)]
        schema: Option<String>,
        name: String,
    },
    /// Already-rendered SQL, used verbatim as a sub-query.
    Query { sql: String },
    Step(Box<Step>),
}

impl Source {
    pub fn table(schema: Option<&str>, name: impl Into<String>) -> Self {
        Source::Table {
            schema: schema.map(str::to_string),
            name: name.into(),
        }
    }

    pub fn query(sql: impl Into<String>) -> Self {
        Source::Query { sql: sql.into() }
    }

    pub fn step(step: Step) -> Self {
        Source::Step(Box::new(step))
    }
}

/// An output column. Without `expr` it projects the source column `name`;
/// with `expr` it projects `expr AS name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default)]
    pub expr: Option<String>,
    #[serde(default)]
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Column {
            name: name.into(),
            expr: None,
            column_type,
        }
    }

    pub fn expr(expr: impl Into<String>, name: impl Into<String>, column_type: ColumnType) -> Self {
        Column {
            name: name.into(),
            expr: Some(expr.into()),
            column_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStep {
    pub from: Source,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    /// Logical full outer join.
    Outer,
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinKey {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinColumn {
    pub side: JoinSide,
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub column_type: ColumnType,
}

impl JoinColumn {
    pub fn left(name: impl Into<String>) -> Self {
        JoinColumn {
            side: JoinSide::Left,
            name: name.into(),
            alias: None,
            column_type: ColumnType::default(),
        }
    }

    pub fn right(name: impl Into<String>) -> Self {
        JoinColumn {
            side: JoinSide::Right,
            name: name.into(),
            alias: None,
            column_type: ColumnType::default(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinStep {
    pub join_type: JoinType,
    pub left: Source,
    pub right: Source,
    #[serde(default)]
    pub on: Vec<JoinKey>,
    pub columns: Vec<JoinColumn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterCondition {
    Equals,
    NotEquals,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    IsMissing,
    IsNotMissing,
    Contains,
    DoesNotContain,
    StartsWith,
    EndsWith,
    Matches,
}

impl FilterCondition {
    pub const ALL: [FilterCondition; 13] = [
        FilterCondition::Equals,
        FilterCondition::NotEquals,
        FilterCondition::LessThan,
        FilterCondition::LessOrEqual,
        FilterCondition::GreaterThan,
        FilterCondition::GreaterOrEqual,
        FilterCondition::IsMissing,
        FilterCondition::IsNotMissing,
        FilterCondition::Contains,
        FilterCondition::DoesNotContain,
        FilterCondition::StartsWith,
        FilterCondition::EndsWith,
        FilterCondition::Matches,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterCondition::Equals => "EQUALS",
            FilterCondition::NotEquals => "NOT_EQUALS",
            FilterCondition::LessThan => "LESS_THAN",
            FilterCondition::LessOrEqual => "LESS_OR_EQUAL",
            FilterCondition::GreaterThan => "GREATER_THAN",
            FilterCondition::GreaterOrEqual => "GREATER_OR_EQUAL",
            FilterCondition::IsMissing => "IS_MISSING",
            FilterCondition::IsNotMissing => "IS_NOT_MISSING",
            FilterCondition::Contains => "CONTAINS",
            FilterCondition::DoesNotContain => "DOES_NOT_CONTAIN",
            FilterCondition::StartsWith => "STARTS_WITH",
            FilterCondition::EndsWith => "ENDS_WITH",
            FilterCondition::Matches => "MATCHES",
        }
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    pub condition: FilterCondition,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub column_type: ColumnType,
}

impl Predicate {
    pub fn new(
        column: impl Into<String>,
        condition: FilterCondition,
        value: Option<&str>,
        column_type: ColumnType,
    ) -> Self {
        Predicate {
            column: column.into(),
            condition,
            value: value.map(str::to_string),
            column_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connective {
    #[default]
    And,
    Or,
}

impl Connective {
    pub fn keyword(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterStep {
    pub from: Source,
    pub columns: Vec<Column>,
    pub predicates: Vec<Predicate>,
    #[serde(default)]
    pub connective: Connective,
}

/// Row-windowed sampling: skip `offset` rows, keep at most `limit`.
///
/// Both bounds are signed so that a negative value coming from a caller is
/// reported as a contract violation at render time instead of wrapping.
/// Row order is whatever `from` produces; stable paging needs an ordered source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleStep {
    pub from: Source,
    pub columns: Vec<String>,
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateCall {
    /// Catalog name of the function, e.g. `SUM` or `MEDIAN`.
    pub function: String,
    pub column: String,
    pub alias: String,
    #[serde(default)]
    pub column_type: ColumnType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStep {
    pub from: Source,
    #[serde(default)]
    pub group_by: Vec<Column>,
    pub aggregates: Vec<AggregateCall>,
}

impl AggregateStep {
    /// Output schema: grouping columns first, then one column per aggregate.
    pub fn output_columns(&self, catalog: &AggregateCatalog) -> Result<Vec<Column>> {
        let mut columns = self.group_by.clone();
        for call in &self.aggregates {
            let def = catalog.get(&call.function).ok_or_else(|| {
                StepSqlError::unsupported(format!("aggregate function {}", call.function))
            })?;
            columns.push(Column::new(
                call.alias.clone(),
                def.output_type.resolve(call.column_type),
            ));
        }
        Ok(columns)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortStep {
    pub from: Source,
    pub columns: Vec<Column>,
    pub order: Vec<SortKey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_kind_follows_variant() {
        let step = Step::Sample(SampleStep {
            from: Source::query("SELECT 1 FROM dual"),
            columns: vec!["a".to_string()],
            limit: 1,
            offset: 0,
        });
        assert_eq!(step.kind(), StepKind::Sample);
        assert_eq!(step.kind().to_string(), "sample");
    }

    #[test]
    fn parses_nested_json_pipeline() {
        let json = r#"{
            "kind": "sample",
            "from": {"step": {
                "kind": "select",
                "from": {"table": {"schema": "HR", "name": "EMPLOYEES"}},
                "columns": [{"name": "ID", "column_type": "integer"}]
            }},
            "columns": ["ID"],
            "limit": 10
        }"#;
        let step: Step = serde_json::from_str(json).unwrap();
        let Step::Sample(sample) = step else {
            panic!("expected sample step");
        };
        assert_eq!(sample.offset, 0);
        match sample.from {
            Source::Step(inner) => assert_eq!(inner.kind(), StepKind::Select),
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[test]
    fn parses_filter_conditions_in_screaming_case() {
        let yaml = r#"
kind: filter
from: {query: {sql: "SELECT name FROM t"}}
columns: [{name: name, column_type: nominal}]
predicates:
  - {column: name, condition: DOES_NOT_CONTAIN, value: "x", column_type: nominal}
"#;
        let step: Step = serde_yaml::from_str(yaml).unwrap();
        let Step::Filter(filter) = step else {
            panic!("expected filter step");
        };
        assert_eq!(filter.predicates[0].condition, FilterCondition::DoesNotContain);
        assert_eq!(filter.connective, Connective::And);
    }

    #[test]
    fn loads_step_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("sort.yaml");
        fs::write(
            &yaml,
            "kind: sort\nfrom: {table: {name: T}}\ncolumns: [{name: A}]\norder: [{column: A, direction: desc}]\n",
        )
        .unwrap();
        let step = Step::from_file(&yaml).unwrap();
        assert_eq!(step.kind(), StepKind::Sort);

        let txt = dir.path().join("sort.txt");
        fs::write(&txt, "kind: sort").unwrap();
        assert!(matches!(
            Step::from_file(&txt),
            Err(StepSqlError::Unsupported { .. })
        ));
    }
}
