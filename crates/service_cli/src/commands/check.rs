//! Check command implementation
//!
//! Validates the effective configuration and prints it.

use super::{describe_detector, fraud_detector};
use crate::config::ServiceConfig;
use crate::Result;
use tracing::{info, warn};

/// Run the check command
pub fn run(config: &ServiceConfig) -> Result<()> {
    print!("{}", report(config)?);
    info!("Configuration check passed");
    Ok(())
}

/// Builds the check report.
///
/// A configured detector is constructed once so that client setup errors
/// surface here rather than on the first assessment.
pub fn report(config: &ServiceConfig) -> Result<String> {
    config.validate()?;

    let configured = config.fraud.endpoint.is_some() || config.fraud.fixed_score.is_some();
    if configured {
        fraud_detector(&config.fraud)?;
    } else if config.environment.is_production() {
        warn!("No fraud detector configured; assessments will be refused");
    }

    let weights = &config.engine.weights;
    let mut out = String::new();
    out.push_str("Configuration OK\n");
    out.push_str(&format!("  Environment:    {}\n", config.environment));
    out.push_str(&format!(
        "  Logging:        {} ({})\n",
        config.log_level, config.log_format
    ));
    out.push_str(&format!("  Deadline:       {} ms\n", config.engine.deadline_ms));
    out.push_str(&format!("  Event topic:    {}\n", config.engine.event_topic));
    out.push_str(&format!(
        "  Weights:        fraud {} / behavioral {} / market {} / external {}\n",
        weights.fraud, weights.behavioral, weights.market, weights.external
    ));
    out.push_str(&format!(
        "  Fraud detector: {}\n",
        describe_detector(&config.fraud)
    ));
    out.push('\n');
    out.push_str(&config.to_toml()?);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_defaults() {
        let report = report(&ServiceConfig::default()).unwrap();
        assert!(report.starts_with("Configuration OK"));
        assert!(report.contains("Deadline:       500 ms"));
        assert!(report.contains("fraud 0.4 / behavioral 0.3 / market 0.2 / external 0.1"));
        assert!(report.contains("Fraud detector: not configured"));
        assert!(report.contains("[engine]"));
    }

    #[test]
    fn test_report_rejects_invalid_config() {
        let mut config = ServiceConfig::default();
        config.engine.event_topic = " ".to_string();
        assert!(report(&config).is_err());
    }

    #[test]
    fn test_report_names_http_detector() {
        let mut config = ServiceConfig::default();
        config.fraud.use_endpoint("https://scorer.example/score");
        let report = report(&config).unwrap();
        assert!(report.contains("Fraud detector: http (https://scorer.example/score"));
    }
}
