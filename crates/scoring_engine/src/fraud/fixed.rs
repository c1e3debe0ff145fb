//! Detector returning a configured score.

use super::{FraudCheckRequest, FraudCheckResponse, FraudDetector, FraudError};
use async_trait::async_trait;

/// Fraud detector that always answers with the same score.
///
/// Used for offline runs and demos where no remote scorer is available.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedFraudDetector {
    score: f64,
    risk_level: Option<String>,
}

impl FixedFraudDetector {
    /// Create a detector answering `score`
    pub fn new(score: f64) -> Self {
        Self {
            score,
            risk_level: None,
        }
    }

    /// Attach a risk-level tag to every answer
    pub fn with_risk_level(mut self, level: impl Into<String>) -> Self {
        self.risk_level = Some(level.into());
        self
    }

    /// Configured score
    pub fn score(&self) -> f64 {
        self.score
    }
}

#[async_trait]
impl FraudDetector for FixedFraudDetector {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn check(&self, _request: &FraudCheckRequest) -> Result<FraudCheckResponse, FraudError> {
        Ok(FraudCheckResponse {
            fraud_score: self.score,
            risk_level: self.risk_level.clone(),
        })
    }
}
