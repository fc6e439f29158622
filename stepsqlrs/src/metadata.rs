//! Schema discovery queries.
//!
//! Providers only build the statements; running them and reading the result
//! sets is up to the caller's connection layer.

use serde::Serialize;

/// A statement plus its positional (`?`) parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataQuery {
    pub sql: String,
    pub params: Vec<String>,
}

impl MetadataQuery {
    pub fn new(sql: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Table names as a catalog browser lists them: case-insensitive order,
/// ties broken by the exact name.
pub fn sorted_table_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
    names.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    names
}
