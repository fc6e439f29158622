//! Configuration for stepsql.
//!
//! TOML-based: which providers the default registry holds (with their
//! priorities and connection-string prefixes) and the aliases used in
//! rendered SQL.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StepSqlError};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StepSqlConfig {
    pub registry: RegistryConfig,
    pub rendering: RenderingConfig,
}

/// Providers registered on startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub providers: Vec<ProviderRegistration>,
}

/// One `[[registry.providers]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderRegistration {
    /// Built-in dialect id (`generic` or `oracle`).
    pub dialect: String,
    /// Higher wins when several prefixes match.
    pub priority: i32,
    /// Connection-string prefix, e.g. `jdbc:oracle:`.
    pub prefix: String,
}

/// Aliases that appear in generated SQL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Base name of the `ROWNUM` column in windowed samples (default: `rownumalias`).
    pub row_number_alias: String,
    /// Alias of a nested source, and of the left side of a join (default: `t1`).
    pub subquery_alias: String,
    /// Alias of the right side of a join (default: `t2`).
    pub join_right_alias: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            providers: vec![
                ProviderRegistration {
                    dialect: "generic".to_string(),
                    priority: 10,
                    prefix: "jdbc:".to_string(),
                },
                ProviderRegistration {
                    dialect: "oracle".to_string(),
                    priority: 30,
                    prefix: "jdbc:oracle:".to_string(),
                },
            ],
        }
    }
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            row_number_alias: "rownumalias".to_string(),
            subquery_alias: "t1".to_string(),
            join_right_alias: "t2".to_string(),
        }
    }
}

impl RenderingConfig {
    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("row_number_alias", &self.row_number_alias),
            ("subquery_alias", &self.subquery_alias),
            ("join_right_alias", &self.join_right_alias),
        ] {
            if value.trim().is_empty() {
                return Err(StepSqlError::Config(format!(
                    "rendering.{key} must not be empty"
                )));
            }
        }
        if self.subquery_alias == self.join_right_alias {
            return Err(StepSqlError::Config(
                "rendering.subquery_alias and rendering.join_right_alias must differ".to_string(),
            ));
        }
        Ok(())
    }
}

impl StepSqlConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| StepSqlError::Config(format!("failed to read config file: {e}")))?;
        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(toml_str)
            .map_err(|e| StepSqlError::Config(format!("failed to parse config: {e}")))?;
        cfg.rendering.validate()?;
        Ok(cfg)
    }

    /// Load from default locations (env var, cwd, user config dir, or defaults).
    ///
    /// Search order:
    /// 1. `STEPSQL_CONFIG` environment variable
    /// 2. `./stepsql.toml` (current directory)
    /// 3. `~/.config/stepsql/config.toml` (user config dir)
    /// 4. Built-in defaults
    pub fn load_default() -> Self {
        if let Ok(path) = std::env::var("STEPSQL_CONFIG") {
            match Self::from_file(&path) {
                Ok(cfg) => {
                    tracing::info!(path = %path, "loaded config from STEPSQL_CONFIG");
                    return cfg;
                }
                Err(e) => tracing::warn!(path = %path, error = %e, "ignoring STEPSQL_CONFIG"),
            }
        }

        if let Ok(cfg) = Self::from_file("stepsql.toml") {
            tracing::info!("loaded config from ./stepsql.toml");
            return cfg;
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("stepsql").join("config.toml");
            if let Ok(cfg) = Self::from_file(&user_config) {
                tracing::info!(path = %user_config.display(), "loaded config from user config dir");
                return cfg;
            }
        }

        tracing::debug!("no config file found, using defaults");
        Self::default()
    }
}
