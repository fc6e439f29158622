//! Aggregate-function catalogs.
//!
//! A catalog maps a function name to its definition and always iterates in
//! name order (byte-wise, case-sensitive), whatever order definitions were
//! registered in. Dialects build theirs by merging extras into the generic one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::ColumnType;

/// Placeholder substituted with the rendered argument in a SQL template.
pub const EXPR_PLACEHOLDER: &str = "{expr}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputTypeRule {
    SameAsInput,
    Fixed(ColumnType),
}

impl OutputTypeRule {
    pub fn resolve(self, input: ColumnType) -> ColumnType {
        match self {
            OutputTypeRule::SameAsInput => input,
            OutputTypeRule::Fixed(t) => t,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateFunctionDef {
    pub name: String,
    /// SQL with an `{expr}` placeholder, e.g. `COUNT(DISTINCT {expr})`.
    pub sql_template: String,
    pub description: String,
    pub output_type: OutputTypeRule,
}

impl AggregateFunctionDef {
    pub fn new(
        name: impl Into<String>,
        sql_template: impl Into<String>,
        description: impl Into<String>,
        output_type: OutputTypeRule,
    ) -> Self {
        AggregateFunctionDef {
            name: name.into(),
            sql_template: sql_template.into(),
            description: description.into(),
            output_type,
        }
    }

    pub fn render(&self, expr: &str) -> String {
        self.sql_template.replace(EXPR_PLACEHOLDER, expr)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateCatalog {
    functions: BTreeMap<String, AggregateFunctionDef>,
}

impl AggregateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `base` and insert every `extra` definition, later entries
    /// replacing earlier ones with the same name.
    pub fn merge<I>(base: &AggregateCatalog, extra: I) -> AggregateCatalog
    where
        I: IntoIterator<Item = AggregateFunctionDef>,
    {
        let mut merged = base.clone();
        for def in extra {
            merged.functions.insert(def.name.clone(), def);
        }
        merged
    }

    /// Catalog shipped with the generic dialect.
    pub fn generic() -> AggregateCatalog {
        use OutputTypeRule::{Fixed, SameAsInput};
        AggregateCatalog::merge(
            &AggregateCatalog::new(),
            [
                AggregateFunctionDef::new(
                    "AVG",
                    "AVG({expr})",
                    "Return the average value of the argument.",
                    Fixed(ColumnType::Real),
                ),
                AggregateFunctionDef::new(
                    "COUNT",
                    "COUNT({expr})",
                    "Return the number of non-missing values.",
                    Fixed(ColumnType::Integer),
                ),
                AggregateFunctionDef::new(
                    "COUNT_DISTINCT",
                    "COUNT(DISTINCT {expr})",
                    "Return the number of distinct non-missing values.",
                    Fixed(ColumnType::Integer),
                ),
                AggregateFunctionDef::new(
                    "MAX",
                    "MAX({expr})",
                    "Return the maximum value of the argument.",
                    SameAsInput,
                ),
                AggregateFunctionDef::new(
                    "MIN",
                    "MIN({expr})",
                    "Return the minimum value of the argument.",
                    SameAsInput,
                ),
                AggregateFunctionDef::new(
                    "STDDEV",
                    "STDDEV_SAMP({expr})",
                    "Return the sample standard deviation of the argument.",
                    Fixed(ColumnType::Real),
                ),
                AggregateFunctionDef::new(
                    "SUM",
                    "SUM({expr})",
                    "Return the sum of the argument.",
                    SameAsInput,
                ),
                AggregateFunctionDef::new(
                    "VARIANCE",
                    "VAR_SAMP({expr})",
                    "Return the sample variance of the argument.",
                    Fixed(ColumnType::Real),
                ),
            ],
        )
    }

    pub fn get(&self, name: &str) -> Option<&AggregateFunctionDef> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Definitions in name order.
    pub fn iter(&self) -> impl Iterator<Item = &AggregateFunctionDef> {
        self.functions.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FromIterator<AggregateFunctionDef> for AggregateCatalog {
    fn from_iter<I: IntoIterator<Item = AggregateFunctionDef>>(iter: I) -> Self {
        AggregateCatalog::merge(&AggregateCatalog::new(), iter)
    }
}
