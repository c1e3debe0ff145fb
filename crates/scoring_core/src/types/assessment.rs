//! Assessment request and response contracts.

use super::error::ValidationError;
use super::evidence::{ExternalFactors, MarketConditions};
use super::ids::{AssessmentId, CustomerId};
use super::records::RiskCategory;
use super::transaction::Transaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inbound assessment request.
///
/// # Examples
///
/// ```
/// use scoring_core::types::{AssessmentRequest, Transaction};
///
/// let request = AssessmentRequest::new("CUST-7")
///     .with_transactions(vec![Transaction::new(120.0)]);
/// assert!(request.validate().is_ok());
///
/// assert!(AssessmentRequest::new("  ").validate().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    /// Customer to assess
    pub customer_id: CustomerId,
    /// Ordered transaction history
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Optional market indicators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_conditions: Option<MarketConditions>,
    /// Optional third-party signals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_factors: Option<ExternalFactors>,
}

impl AssessmentRequest {
    /// Creates a request with no evidence attached.
    pub fn new(customer_id: impl Into<CustomerId>) -> Self {
        Self {
            customer_id: customer_id.into(),
            transactions: Vec::new(),
            market_conditions: None,
            external_factors: None,
        }
    }

    /// Sets the transaction history.
    pub fn with_transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = transactions;
        self
    }

    /// Sets the market indicators.
    pub fn with_market(mut self, market: MarketConditions) -> Self {
        self.market_conditions = Some(market);
        self
    }

    /// Sets the external signals.
    pub fn with_external(mut self, external: ExternalFactors) -> Self {
        self.external_factors = Some(external);
        self
    }

    /// Checks required fields and numeric sanity.
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.customer_id.is_blank() {
            return Err(ValidationError::EmptyCustomerId);
        }

        if let Some((index, tx)) = self
            .transactions
            .iter()
            .enumerate()
            .find(|(_, tx)| !tx.amount.is_finite())
        {
            return Err(ValidationError::NonFiniteAmount {
                index,
                value: tx.amount,
            });
        }

        if let Some(market) = &self.market_conditions {
            check_finite("volatility", market.volatility)?;
            check_finite("interestRate", market.interest_rate)?;
        }

        if let Some(external) = &self.external_factors {
            check_finite("creditScore", external.credit_score)?;
        }

        Ok(())
    }
}

fn check_finite(field: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.is_finite() => Err(ValidationError::NonFiniteIndicator { field, value: v }),
        _ => Ok(()),
    }
}

/// Sub-scores that fed the comprehensive score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Normalised fraud sub-score in [0, 1]
    pub fraud: f64,
    /// Behavioral sub-score in [0, 1]
    pub behavioral: f64,
    /// Market sub-score, absent when no market evidence contributed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<f64>,
    /// External sub-score, absent when no external evidence contributed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<f64>,
}

/// Outbound assessment response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    /// Assessment identifier
    pub assessment_id: AssessmentId,
    /// Assessed customer
    pub customer_id: CustomerId,
    /// Comprehensive score in [0, 1000], two decimal places
    pub score: f64,
    /// Category of the score
    pub category: RiskCategory,
    /// Confidence percentage in [0, 100]
    pub confidence: u8,
    /// Ordered mitigation recommendations
    pub recommendations: Vec<String>,
    /// Per-source sub-scores
    pub breakdown: ScoreBreakdown,
    /// Risk-level tag reported by the fraud collaborator, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fraud_risk_level: Option<String>,
    /// Assessment time
    pub assessed_at: DateTime<Utc>,
}
