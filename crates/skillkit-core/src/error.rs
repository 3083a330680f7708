//! Error types for the skillkit core crate

/// Errors raised outside of a validation run (policy loading and the like).
///
/// Problems found *inside* a package are never surfaced through this type;
/// they become [`crate::Diagnostic`]s on the report.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SkillError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported policy format: {0}")]
    UnsupportedFormat(String),
}

impl From<config::ConfigError> for SkillError {
    fn from(err: config::ConfigError) -> Self {
        SkillError::Config(err.to_string())
    }
}

/// Result type for skillkit core operations
pub type SkillResult<T> = Result<T, SkillError>;
