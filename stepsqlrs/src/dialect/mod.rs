//! SQL dialect primitives.
//!
//! A [`Dialect`] knows how to quote identifiers and literals and which SQL
//! features its database accepts. Everything that renders whole statements
//! lives in [`crate::syntax`]; a [`crate::provider::DialectProvider`] bundles a
//! dialect with its rendering strategies.

/// Dialects render identifiers and primitive pieces of SQL text.
/// The default methods follow ANSI SQL.
pub trait Dialect: std::fmt::Debug + Send + Sync {
    /// Stable identifier, e.g. `oracle`.
    fn id(&self) -> &str;

    fn quote_ident(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    fn qualify_table(&self, schema: Option<&str>, table: &str) -> String {
        match schema {
            Some(schema) => format!("{}.{}", self.quote_ident(schema), self.quote_ident(table)),
            None => self.quote_ident(table),
        }
    }

    fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Cast an expression of unknown type to a character type.
    fn cast_to_text(&self, expr: &str) -> String {
        format!("CAST({expr} AS VARCHAR(4000))")
    }

    fn supports_drop_if_exists(&self) -> bool {
        true
    }

    /// Query listing the tables of the schema bound to its only parameter.
    fn table_names_sql(&self) -> String {
        "SELECT table_name FROM information_schema.tables WHERE table_schema = ?".to_string()
    }

    /// Query returning no rows but the full column metadata of `qualified_table`.
    fn column_metadata_sql(&self, qualified_table: &str) -> String {
        format!("SELECT * FROM {qualified_table} LIMIT 0")
    }
}

mod generic;
mod oracle;

pub use generic::{generic_provider, GenericDialect};
pub use oracle::{oracle_provider, OracleDialect};
