use thiserror::Error;

pub type Result<T> = std::result::Result<T, StepSqlError>;

#[derive(Debug, Error)]
pub enum StepSqlError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    /// Duplicate or ambiguous dialect registration.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// No rule for the construct in the dialect nor in the generic fallback.
    #[error("unsupported construct: {construct}")]
    Unsupported { construct: String },
    /// The caller handed in input the renderer refuses to turn into SQL.
    #[error("contract violation: {0}")]
    ContractViolation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StepSqlError {
    pub fn unsupported(construct: impl Into<String>) -> Self {
        StepSqlError::Unsupported {
            construct: construct.into(),
        }
    }
}
