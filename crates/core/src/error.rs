use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("typewriter needs at least one phrase")]
    NoPhrases,

    #[error("{field} must be positive, got {value}ms")]
    NonPositiveInterval { field: &'static str, value: u64 },

    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}
