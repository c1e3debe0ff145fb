//! Service configuration management
//!
//! Handles loading configuration from TOML files, `RISKSCORE_*` environment
//! variables and CLI arguments.
//!
//! ```toml
//! log_level = "info"
//! log_format = "json"
//! environment = "production"
//!
//! [engine]
//! deadline_ms = 500
//! event_topic = "risk-assessment-completed"
//!
//! [engine.weights]
//! fraud = 0.4
//! behavioral = 0.3
//! market = 0.2
//! external = 0.1
//!
//! [fraud]
//! endpoint = "http://fraud-scorer.internal/score"
//! timeout_ms = 250
//! ```

use scoring_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Prefix shared by every environment variable the service reads.
pub const ENV_PREFIX: &str = "RISKSCORE_";

/// Default fraud detector request timeout in milliseconds.
pub const DEFAULT_FRAUD_TIMEOUT_MS: u64 = 250;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: text, json")]
    InvalidLogFormat(String),

    #[error("Invalid environment: {0}. Must be one of: development, staging, production")]
    InvalidEnvironment(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),

    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Log levels supported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Environment types for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

impl Environment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Fraud detector selection.
///
/// Exactly one of `endpoint` and `fixed_score` may be set. A fixed score is
/// meant for offline runs and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FraudConfig {
    /// URL of a remote fraud scorer
    pub endpoint: Option<String>,
    /// Per-request timeout for the remote scorer
    pub timeout_ms: u64,
    /// Native score returned for every request instead of calling out
    pub fixed_score: Option<f64>,
}

impl Default for FraudConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: DEFAULT_FRAUD_TIMEOUT_MS,
            fixed_score: None,
        }
    }
}

impl FraudConfig {
    /// Switches to a remote scorer, dropping any fixed score.
    pub fn use_endpoint(&mut self, endpoint: impl Into<String>) {
        self.endpoint = Some(endpoint.into());
        self.fixed_score = None;
    }

    /// Switches to a fixed score, dropping any endpoint.
    pub fn use_fixed_score(&mut self, score: f64) {
        self.fixed_score = Some(score);
        self.endpoint = None;
    }

    fn validate(&self, errors: &mut Vec<String>) {
        if self.endpoint.is_some() && self.fixed_score.is_some() {
            errors.push("fraud.endpoint and fraud.fixed_score are mutually exclusive".to_string());
        }
        if let Some(endpoint) = &self.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                errors.push(format!(
                    "fraud.endpoint must be an http(s) URL, got '{}'",
                    endpoint
                ));
            }
        }
        if self.timeout_ms == 0 {
            errors.push("fraud.timeout_ms must be greater than 0".to_string());
        }
        if let Some(score) = self.fixed_score {
            if !score.is_finite() {
                errors.push(format!("fraud.fixed_score must be finite, got {}", score));
            }
        }
    }
}

/// Service configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Log line format
    #[serde(deserialize_with = "deserialize_log_format")]
    pub log_format: LogFormat,
    /// Environment (development, staging, production)
    #[serde(deserialize_with = "deserialize_environment")]
    pub environment: Environment,
    /// Assessment engine settings
    pub engine: EngineConfig,
    /// Fraud detector settings
    pub fraud: FraudConfig,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_log_format<'de, D>(deserializer: D) -> Result<LogFormat, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogFormat::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_environment<'de, D>(deserializer: D) -> Result<Environment, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Environment::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Text,
            environment: Environment::Development,
            engine: EngineConfig::default(),
            fraud: FraudConfig::default(),
        }
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvError(format!("{}: cannot parse '{}'", key, value)))
}

impl ServiceConfig {
    /// Overrides fields whose `RISKSCORE_*` variable is set.
    ///
    /// `lookup` receives the full variable name.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let key = format!("{}{}", ENV_PREFIX, name);
            lookup(&key).map(|value| (key, value))
        };

        if let Some((_, value)) = var("LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&value)?;
        }
        if let Some((_, value)) = var("LOG_FORMAT") {
            self.log_format = LogFormat::from_str(&value)?;
        }
        if let Some((_, value)) = var("ENV") {
            self.environment = Environment::from_str(&value)?;
        }
        if let Some((key, value)) = var("DEADLINE_MS") {
            self.engine.deadline_ms = parse_env(&key, &value)?;
        }
        if let Some((_, value)) = var("EVENT_TOPIC") {
            self.engine.event_topic = value;
        }
        if let Some((_, value)) = var("FRAUD_ENDPOINT") {
            self.fraud.use_endpoint(value);
        }
        if let Some((key, value)) = var("FRAUD_TIMEOUT_MS") {
            self.fraud.timeout_ms = parse_env(&key, &value)?;
        }
        if let Some((key, value)) = var("FRAUD_SCORE") {
            self.fraud.use_fixed_score(parse_env(&key, &value)?);
        }

        Ok(())
    }

    /// Validate the configuration, collecting every problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        match self.engine.validate() {
            Ok(()) => {}
            Err(scoring_engine::ConfigError::Validation(engine_errors)) => {
                errors.extend(engine_errors.into_iter().map(|e| format!("engine: {}", e)));
            }
            Err(other) => errors.push(other.to_string()),
        }

        self.fraud.validate(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(log_level) = &cli.log_level {
            self.log_level = LogLevel::from_str(log_level)?;
        }
        if let Some(log_format) = &cli.log_format {
            self.log_format = LogFormat::from_str(log_format)?;
        }
        if let Some(deadline_ms) = cli.deadline_ms {
            self.engine.deadline_ms = deadline_ms;
        }
        if let Some(endpoint) = &cli.fraud_endpoint {
            self.fraud.use_endpoint(endpoint.clone());
        }
        if let Some(score) = cli.fraud_score {
            self.fraud.use_fixed_score(score);
        }
        Ok(())
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::FileError(format!("Failed to render TOML: {}", e)))
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<String>,
    /// Log format override
    pub log_format: Option<String>,
    /// Assessment deadline override
    pub deadline_ms: Option<u64>,
    /// Remote fraud scorer override
    pub fraud_endpoint: Option<String>,
    /// Fixed fraud score override
    pub fraud_score: Option<f64>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<ServiceConfig, ConfigError> {
    build_config_with(cli, |key| std::env::var(key).ok())
}

fn build_config_with<F>(cli: &CliArgs, lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // File values are checked only after every layer is applied
    let mut config = match &cli.config_file {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                ConfigError::FileError(format!(
                    "Failed to read config file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            toml::from_str(&content)
                .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?
        }
        None => ServiceConfig::default(),
    };

    config.apply_env(lookup)?;
    config.merge_with_cli(cli)?;

    // Final validation
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn no_env() -> impl Fn(&str) -> Option<String> {
        |_| None
    }

    fn temp_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "riskscore-{}-{}.toml",
            name,
            std::process::id()
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.fraud.endpoint, None);
        assert_eq!(config.fraud.fixed_score, None);
        assert_eq!(config.fraud.timeout_ms, 250);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);

        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("TEXT").unwrap(), LogFormat::Text);
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Text);
        assert!(LogFormat::from_str("xml").is_err());
        assert_eq!(format!("{}", LogFormat::Json), "json");
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str("dev").unwrap(),
            Environment::Development
        );
        assert_eq!(
            Environment::from_str("Staging").unwrap(),
            Environment::Staging
        );
        assert_eq!(
            Environment::from_str("prod").unwrap(),
            Environment::Production
        );
        assert!(Environment::from_str("invalid").is_err());

        assert!(Environment::Production.is_production());
        assert!(!Environment::Staging.is_production());
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
            log_level = "DEBUG"
            log_format = "json"
            environment = "production"

            [engine]
            deadline_ms = 750
            event_topic = "risk-events"

            [engine.weights]
            fraud = 0.5
            behavioral = 0.5
            market = 0.0
            external = 0.0

            [fraud]
            endpoint = "http://scorer:8080/score"
            timeout_ms = 100
        "#;

        let config: ServiceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.engine.deadline_ms, 750);
        assert_eq!(config.engine.event_topic, "risk-events");
        assert_eq!(config.engine.weights.fraud, 0.5);
        assert_eq!(config.fraud.endpoint.as_deref(), Some("http://scorer:8080/score"));
        assert_eq!(config.fraud.timeout_ms, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_deserialization() {
        let config: ServiceConfig = toml::from_str("[fraud]\nfixed_score = 300.0\n").unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.engine.deadline_ms, 500);
        assert_eq!(config.fraud.fixed_score, Some(300.0));
        assert_eq!(config.fraud.timeout_ms, 250);
    }

    #[test]
    fn test_invalid_log_level_in_toml() {
        let result: Result<ServiceConfig, _> = toml::from_str(r#"log_level = "loud""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = ServiceConfig::default();
        config.engine.deadline_ms = 0;
        config.engine.weights.fraud = -1.0;
        config.fraud.endpoint = Some("ftp://scorer".to_string());
        config.fraud.fixed_score = Some(f64::INFINITY);
        config.fraud.timeout_ms = 0;

        match config.validate().unwrap_err() {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 6);
                assert!(errors[0].starts_with("engine: deadline_ms"));
                assert!(errors.iter().any(|e| e.contains("mutually exclusive")));
                assert!(errors.iter().any(|e| e.contains("http(s) URL")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_apply_env_overrides() {
        let mut config = ServiceConfig::default();
        config
            .apply_env(env(&[
                ("RISKSCORE_LOG_LEVEL", "warn"),
                ("RISKSCORE_LOG_FORMAT", "json"),
                ("RISKSCORE_ENV", "staging"),
                ("RISKSCORE_DEADLINE_MS", "900"),
                ("RISKSCORE_EVENT_TOPIC", "scores"),
                ("RISKSCORE_FRAUD_ENDPOINT", "https://scorer/score"),
                ("RISKSCORE_FRAUD_TIMEOUT_MS", "80"),
            ]))
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.engine.deadline_ms, 900);
        assert_eq!(config.engine.event_topic, "scores");
        assert_eq!(config.fraud.endpoint.as_deref(), Some("https://scorer/score"));
        assert_eq!(config.fraud.timeout_ms, 80);
    }

    #[test]
    fn test_apply_env_rejects_bad_number() {
        let mut config = ServiceConfig::default();
        let err = config
            .apply_env(env(&[("RISKSCORE_DEADLINE_MS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("RISKSCORE_DEADLINE_MS"));
    }

    #[test]
    fn test_cli_args_merge() {
        let mut config = ServiceConfig::default();
        config.fraud.use_endpoint("http://scorer/score");

        let cli = CliArgs {
            log_level: Some("debug".to_string()),
            log_format: Some("json".to_string()),
            deadline_ms: Some(1_000),
            fraud_score: Some(300.0),
            ..Default::default()
        };
        config.merge_with_cli(&cli).unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.engine.deadline_ms, 1_000);
        // A fixed score replaces the remote scorer
        assert_eq!(config.fraud.fixed_score, Some(300.0));
        assert_eq!(config.fraud.endpoint, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_args_reject_invalid_level() {
        let mut config = ServiceConfig::default();
        let cli = CliArgs {
            log_level: Some("chatty".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.merge_with_cli(&cli),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_build_config_with_defaults() {
        let config = build_config_with(&CliArgs::default(), no_env()).unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.engine.deadline_ms, 500);
    }

    #[test]
    fn test_build_config_precedence() {
        let path = temp_config(
            "precedence",
            r#"
                log_level = "error"
                environment = "production"

                [engine]
                deadline_ms = 700

                [fraud]
                fixed_score = 10.0
            "#,
        );

        let cli = CliArgs {
            config_file: Some(path.clone()),
            deadline_ms: Some(900),
            ..Default::default()
        };
        let config = build_config_with(
            &cli,
            env(&[
                ("RISKSCORE_LOG_LEVEL", "debug"),
                ("RISKSCORE_DEADLINE_MS", "800"),
            ]),
        )
        .unwrap();
        std::fs::remove_file(&path).ok();

        // file < env < cli
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.engine.deadline_ms, 900);
        assert_eq!(config.fraud.fixed_score, Some(10.0));
    }

    #[test]
    fn test_env_can_repair_file_value() {
        let path = temp_config("repair", "[engine]\ndeadline_ms = 0\n");
        let cli = CliArgs {
            config_file: Some(path.clone()),
            ..Default::default()
        };

        assert!(build_config_with(&cli, no_env()).is_err());
        let config =
            build_config_with(&cli, env(&[("RISKSCORE_DEADLINE_MS", "300")])).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.engine.deadline_ms, 300);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = CliArgs {
            config_file: Some(PathBuf::from("/nonexistent/riskscore.toml")),
            ..Default::default()
        };
        let err = build_config_with(&cli, no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::FileError(_)));
    }

    #[test]
    fn test_toml_rendering_parses_back() {
        let mut config = ServiceConfig::default();
        config.fraud.use_fixed_score(120.0);
        config.log_format = LogFormat::Json;

        let rendered = config.to_toml().unwrap();
        let parsed: ServiceConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.log_format, LogFormat::Json);
        assert_eq!(parsed.fraud, config.fraud);
        assert_eq!(parsed.engine, config.engine);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidLogFormat("xml".to_string());
        assert!(err.to_string().contains("Invalid log format"));

        let err = ConfigError::Validation(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "Validation errors: a; b");
    }
}
