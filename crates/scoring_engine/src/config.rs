//! Engine configuration.
//!
//! Loaded from the `[engine]` table of the service configuration file or
//! built programmatically. Every field has a default, so an empty table is a
//! valid configuration.

use scoring_core::scoring::ScoringWeights;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default overall assessment deadline in milliseconds.
pub const DEFAULT_DEADLINE_MS: u64 = 500;

/// Default topic for assessment-completed events.
pub const DEFAULT_EVENT_TOPIC: &str = "risk-assessment-completed";

/// Upper bound accepted for `deadline_ms`.
const MAX_DEADLINE_MS: u64 = 60_000;

/// Configuration error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file '{path}': {message}")]
    Io {
        /// File path
        path: String,
        /// Underlying error message
        message: String,
    },

    /// Config content is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// One or more values are out of range
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Assessment engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Deadline covering profile load through persistence, in milliseconds
    pub deadline_ms: u64,
    /// Topic assessment-completed events are published on
    pub event_topic: String,
    /// Source weights used by the aggregator
    pub weights: ScoringWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            deadline_ms: DEFAULT_DEADLINE_MS,
            event_topic: DEFAULT_EVENT_TOPIC.to_string(),
            weights: ScoringWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Deadline as a [`Duration`].
    #[inline]
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Loads a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Validates the configuration, collecting every problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.deadline_ms == 0 {
            errors.push("deadline_ms must be greater than 0".to_string());
        }
        if self.deadline_ms > MAX_DEADLINE_MS {
            errors.push(format!(
                "deadline_ms {} exceeds maximum allowed ({})",
                self.deadline_ms, MAX_DEADLINE_MS
            ));
        }

        if self.event_topic.trim().is_empty() {
            errors.push("event_topic cannot be empty".to_string());
        }

        if let Err(e) = self.weights.validate() {
            errors.push(e.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.deadline_ms, 500);
        assert_eq!(config.deadline(), Duration::from_millis(500));
        assert_eq!(config.event_topic, "risk-assessment-completed");
        assert_eq!(config.weights, ScoringWeights::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_toml_with_weights_table() {
        let toml = r#"
deadline_ms = 250
event_topic = "risk-events"

[weights]
fraud = 0.5
external = 0.0
"#;
        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.deadline_ms, 250);
        assert_eq!(config.event_topic, "risk-events");
        assert_eq!(config.weights.fraud, 0.5);
        assert_eq!(config.weights.behavioral, 0.3);
        assert_eq!(config.weights.external, 0.0);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(matches!(
            EngineConfig::from_toml_str("deadline = 10"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[weights]\nsentiment = 0.2"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = EngineConfig {
            deadline_ms: 0,
            event_topic: "  ".to_string(),
            weights: ScoringWeights {
                fraud: -1.0,
                ..Default::default()
            },
        };

        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 3);
                assert!(errors.iter().any(|e| e.contains("deadline_ms")));
                assert!(errors.iter().any(|e| e.contains("event_topic")));
                assert!(errors.iter().any(|e| e.contains("fraud")));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_missing_file() {
        let result = EngineConfig::from_file(Path::new("/nonexistent/engine.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::Validation(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "Validation errors: a; b");
    }
}
