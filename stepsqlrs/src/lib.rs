pub mod catalog;
pub mod config;
pub mod dialect;
pub mod error;
pub mod metadata;
pub mod provider;
pub mod registry;
pub mod steps;
pub mod syntax;
pub mod transforms;
pub mod types;

use std::sync::Arc;

use crate::error::Result;

/// Provider for `connection_string` from the built-in registry.
pub fn resolve(connection_string: &str) -> Result<Arc<DialectProvider>> {
    DialectRegistry::global().resolve(connection_string)
}

pub use catalog::{AggregateCatalog, AggregateFunctionDef, OutputTypeRule};
pub use config::StepSqlConfig;
pub use error::StepSqlError;
pub use provider::DialectProvider;
pub use registry::DialectRegistry;
pub use steps::{Step, StepKind};
pub use types::ColumnType;
