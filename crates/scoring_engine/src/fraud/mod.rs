//! Fraud-detection collaborator and signal normalisation.
//!
//! The detector is a black box returning a native score on [0, 1000] and an
//! optional risk-level tag. [`FraudSignalAdapter`] turns that into the [0, 1]
//! sub-score the aggregator consumes. A failed or unusable response is never
//! replaced by a neutral score.

mod fixed;
mod http;

pub use fixed::FixedFraudDetector;
pub use http::HttpFraudDetector;

use async_trait::async_trait;
use scoring_core::scoring::SCORE_SCALE;
use scoring_core::types::{
    AssessmentId, AssessmentRequest, CustomerId, ExternalFactors, MarketConditions, Transaction,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Errors raised while consulting the fraud detector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FraudError {
    /// The request could not be delivered or timed out.
    #[error("Fraud detector transport error: {0}")]
    Transport(String),

    /// The detector answered with a non-success status.
    #[error("Fraud detector returned HTTP status {0}")]
    Status(u16),

    /// The response body could not be decoded.
    #[error("Failed to decode fraud detector response: {0}")]
    Decode(String),

    /// The native score is NaN or infinite.
    #[error("Fraud detector returned a non-finite score: {0}")]
    InvalidScore(f64),

    /// The detector refused or could not serve the request.
    #[error("Fraud detector unavailable: {0}")]
    Unavailable(String),
}

/// Evidence sent to the fraud detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudCheckRequest {
    /// Assessment the check belongs to
    pub assessment_id: AssessmentId,
    /// Customer being assessed
    pub customer_id: CustomerId,
    /// Transaction history
    pub transactions: Vec<Transaction>,
    /// Market indicators, if supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_conditions: Option<MarketConditions>,
    /// External signals, if supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_factors: Option<ExternalFactors>,
}

impl FraudCheckRequest {
    /// Builds a check request from an assessment request.
    pub fn from_assessment(assessment_id: AssessmentId, request: &AssessmentRequest) -> Self {
        Self {
            assessment_id,
            customer_id: request.customer_id.clone(),
            transactions: request.transactions.clone(),
            market_conditions: request.market_conditions.clone(),
            external_factors: request.external_factors.clone(),
        }
    }
}

/// Raw detector response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudCheckResponse {
    /// Native score on [0, 1000]
    pub fraud_score: f64,
    /// Optional risk-level tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
}

/// Black-box fraud scorer.
#[async_trait]
pub trait FraudDetector: Send + Sync {
    /// Detector name for logs
    fn name(&self) -> &str;

    /// Scores the evidence of one assessment.
    async fn check(&self, request: &FraudCheckRequest) -> Result<FraudCheckResponse, FraudError>;
}

/// Normalised fraud signal.
#[derive(Debug, Clone, PartialEq)]
pub struct FraudSignal {
    /// Native score, clamped to [0, 1000]
    pub native_score: f64,
    /// `native_score / 1000`
    pub sub_score: f64,
    /// Risk-level tag reported by the detector
    pub risk_level: Option<String>,
}

impl FraudSignal {
    /// Normalises a detector response.
    ///
    /// Finite scores outside [0, 1000] are clamped and logged. Non-finite
    /// scores are rejected.
    pub fn from_response(response: FraudCheckResponse) -> Result<Self, FraudError> {
        let raw = response.fraud_score;
        if !raw.is_finite() {
            return Err(FraudError::InvalidScore(raw));
        }

        let native_score = raw.clamp(0.0, SCORE_SCALE);
        if native_score != raw {
            warn!(
                raw_score = raw,
                clamped_score = native_score,
                "Fraud score outside [0, 1000]; clamped"
            );
        }

        Ok(Self {
            native_score,
            sub_score: native_score / SCORE_SCALE,
            risk_level: response.risk_level,
        })
    }
}

/// Calls the detector and normalises its answer.
#[derive(Clone)]
pub struct FraudSignalAdapter {
    detector: Arc<dyn FraudDetector>,
}

impl FraudSignalAdapter {
    /// Create an adapter around a detector
    pub fn new(detector: Arc<dyn FraudDetector>) -> Self {
        Self { detector }
    }

    /// Detector name
    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    /// Consults the detector once. No retries.
    pub async fn evaluate(&self, request: &FraudCheckRequest) -> Result<FraudSignal, FraudError> {
        let response = self.detector.check(request).await?;
        FraudSignal::from_response(response)
    }
}
