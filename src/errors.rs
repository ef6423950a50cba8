use tally_config::ConfigError;
use tally_core::CoreError;
use thiserror::Error;

/// Error type surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
