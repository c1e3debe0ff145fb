//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Shared engine wiring
//! lives here.

pub mod assess;
pub mod check;
pub mod demo;

use crate::config::{FraudConfig, ServiceConfig};
use crate::{CliError, Result};
use scoring_engine::{
    FixedFraudDetector, FraudDetector, HttpFraudDetector, InMemoryEventBus, InMemoryRiskStore,
    RiskAssessmentEngine,
};
use std::sync::Arc;
use std::time::Duration;

/// Builds the fraud detector the configuration selects.
pub fn fraud_detector(config: &FraudConfig) -> Result<Arc<dyn FraudDetector>> {
    if let Some(score) = config.fixed_score {
        return Ok(Arc::new(FixedFraudDetector::new(score)));
    }
    if let Some(endpoint) = &config.endpoint {
        let detector =
            HttpFraudDetector::new(endpoint.clone(), Duration::from_millis(config.timeout_ms))?;
        return Ok(Arc::new(detector));
    }
    Err(CliError::InvalidArgument(
        "No fraud detector configured. Set fraud.endpoint, RISKSCORE_FRAUD_SCORE or --fraud-score"
            .to_string(),
    ))
}

/// Short description of the configured detector.
pub fn describe_detector(config: &FraudConfig) -> String {
    match (&config.endpoint, config.fixed_score) {
        (_, Some(score)) => format!("fixed (score {})", score),
        (Some(endpoint), None) => format!("http ({}, timeout {} ms)", endpoint, config.timeout_ms),
        (None, None) => "not configured".to_string(),
    }
}

/// Wires an engine over in-memory persistence and event bus.
///
/// Must be called from within a Tokio runtime.
pub fn in_memory_engine(
    config: &ServiceConfig,
    detector: Arc<dyn FraudDetector>,
) -> Result<RiskAssessmentEngine> {
    let engine = RiskAssessmentEngine::new(
        config.engine.clone(),
        Arc::new(InMemoryRiskStore::new()),
        detector,
        Arc::new(InMemoryEventBus::new()),
    )?;
    Ok(engine)
}
