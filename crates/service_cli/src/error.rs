//! CLI error types

use crate::config::ConfigError;
use scoring_engine::{AssessmentError, FraudError, StoreError};
use thiserror::Error;

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    /// Service configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Engine rejected its configuration
    #[error("Engine configuration error: {0}")]
    Engine(#[from] scoring_engine::ConfigError),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Request document could not be read or parsed
    #[error("Invalid assessment request: {0}")]
    InvalidRequest(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Fraud detector could not be constructed
    #[error("Fraud detector setup failed: {0}")]
    Detector(#[from] FraudError),

    /// Assessment failed
    #[error(transparent)]
    Assessment(#[from] AssessmentError),

    /// Store could not be read
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Output could not be rendered
    #[error("Failed to render output: {0}")]
    Render(String),
}

/// Result alias for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;
