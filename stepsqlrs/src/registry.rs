//! Connection-string based provider lookup.
//!
//! Providers are registered with a prefix and a priority. `resolve` picks the
//! highest-priority provider whose prefix starts the connection string, so a
//! specific `jdbc:oracle:` entry beats a catch-all `jdbc:` one. Ambiguous
//! registrations fail when they are made, never during lookup.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::config::{RenderingConfig, StepSqlConfig};
use crate::dialect::{generic_provider, oracle_provider};
use crate::error::{Result, StepSqlError};
use crate::provider::DialectProvider;

static DEFAULT_REGISTRY: Lazy<DialectRegistry> = Lazy::new(DialectRegistry::builtin);

#[derive(Debug, Clone)]
pub struct RegisteredProvider {
    pub provider: Arc<DialectProvider>,
    pub priority: i32,
    pub prefix: String,
}

#[derive(Debug, Default, Clone)]
pub struct DialectRegistry {
    entries: Vec<RegisteredProvider>,
}

impl DialectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry holding the built-in providers with their
    /// default priorities.
    pub fn global() -> &'static DialectRegistry {
        &DEFAULT_REGISTRY
    }

    /// Registry populated from `[[registry.providers]]`.
    pub fn from_config(config: &StepSqlConfig) -> Result<Self> {
        let mut registry = DialectRegistry::new();
        let generic = Arc::new(generic_provider(&config.rendering));
        let oracle = Arc::new(oracle_provider(&config.rendering));
        for entry in &config.registry.providers {
            let provider = match entry.dialect.as_str() {
                "generic" => Arc::clone(&generic),
                "oracle" => Arc::clone(&oracle),
                other => {
                    return Err(StepSqlError::Configuration(format!(
                        "unknown dialect '{other}' for prefix '{}'",
                        entry.prefix
                    )))
                }
            };
            registry.register(provider, entry.priority, entry.prefix.clone())?;
        }
        tracing::info!(providers = registry.entries.len(), "dialect registry initialised");
        Ok(registry)
    }

    fn builtin() -> Self {
        let settings = RenderingConfig::default();
        let generic = Arc::new(generic_provider(&settings));
        let oracle = Arc::new(oracle_provider(&settings));
        DialectRegistry {
            entries: vec![
                RegisteredProvider {
                    provider: oracle,
                    priority: 30,
                    prefix: "jdbc:oracle:".to_string(),
                },
                RegisteredProvider {
                    provider: generic,
                    priority: 10,
                    prefix: "jdbc:".to_string(),
                },
            ],
        }
    }

    /// Add `provider` for connection strings starting with `prefix`.
    ///
    /// Fails when another entry with the same priority has a prefix that is
    /// equal to, or a prefix of, this one (or the reverse), since neither
    /// would win a lookup. Also fails when a different provider already uses
    /// the same dialect id.
    pub fn register(
        &mut self,
        provider: Arc<DialectProvider>,
        priority: i32,
        prefix: impl Into<String>,
    ) -> Result<()> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(StepSqlError::Configuration(format!(
                "empty prefix for dialect '{}'",
                provider.id()
            )));
        }
        for entry in &self.entries {
            if entry.priority == priority
                && (entry.prefix.starts_with(&prefix) || prefix.starts_with(&entry.prefix))
            {
                return Err(StepSqlError::Configuration(format!(
                    "prefix '{prefix}' of dialect '{}' overlaps '{}' of dialect '{}' at priority {priority}",
                    provider.id(),
                    entry.prefix,
                    entry.provider.id()
                )));
            }
            if entry.provider.id() == provider.id() && !Arc::ptr_eq(&entry.provider, &provider) {
                return Err(StepSqlError::Configuration(format!(
                    "dialect id '{}' is already registered",
                    provider.id()
                )));
            }
        }
        tracing::debug!(dialect = provider.id(), priority, prefix = %prefix, "registered dialect");
        let at = self
            .entries
            .iter()
            .position(|e| e.priority < priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            at,
            RegisteredProvider {
                provider,
                priority,
                prefix,
            },
        );
        Ok(())
    }

    /// Highest-priority provider whose prefix matches `connection_string`.
    pub fn resolve(&self, connection_string: &str) -> Result<Arc<DialectProvider>> {
        // Entries are kept in descending priority order.
        let entry = self
            .entries
            .iter()
            .find(|e| connection_string.starts_with(&e.prefix))
            .ok_or_else(|| {
                StepSqlError::NotFound(format!(
                    "no dialect registered for connection string '{connection_string}'"
                ))
            })?;
        tracing::debug!(
            dialect = entry.provider.id(),
            prefix = %entry.prefix,
            priority = entry.priority,
            "resolved dialect"
        );
        Ok(Arc::clone(&entry.provider))
    }

    /// Provider registered under dialect id `id`.
    pub fn get(&self, id: &str) -> Option<Arc<DialectProvider>> {
        self.entries
            .iter()
            .find(|e| e.provider.id() == id)
            .map(|e| Arc::clone(&e.provider))
    }

    /// Registrations in descending priority order.
    pub fn providers(&self) -> &[RegisteredProvider] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_matches_default_config() {
        let from_config = DialectRegistry::from_config(&StepSqlConfig::default()).unwrap();
        let builtin = DialectRegistry::global();
        let summary = |r: &DialectRegistry| {
            r.providers()
                .iter()
                .map(|e| (e.provider.id().to_string(), e.priority, e.prefix.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(summary(&from_config), summary(builtin));
    }

    #[test]
    fn unknown_dialect_in_config() {
        let toml = r#"
[[registry.providers]]
dialect = "db2"
priority = 1
prefix = "jdbc:db2:"
"#;
        let config = StepSqlConfig::from_toml(toml).unwrap();
        assert!(matches!(
            DialectRegistry::from_config(&config),
            Err(StepSqlError::Configuration(_))
        ));
    }
}
