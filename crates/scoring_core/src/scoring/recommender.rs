//! Mitigation recommendations.
//!
//! Rules are additive: every matching rule contributes its actions, in rule
//! order, and an action already emitted by an earlier rule is not repeated.

use super::categorizer::{HIGH_UPPER_BOUND, MEDIUM_UPPER_BOUND};

/// Native fraud score above which fraud actions are recommended.
pub const FRAUD_ALERT_THRESHOLD: f64 = 500.0;

/// Confidence below which more data is requested.
pub const LOW_CONFIDENCE_THRESHOLD: u8 = 70;

/// A mitigation action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Recommendation {
    /// Apply enhanced due diligence procedures
    EnhancedDueDiligence,
    /// Manually review high-value transactions
    ManualReview,
    /// Require additional identity verification
    IdentityVerification,
    /// Enable enhanced transaction monitoring
    EnhancedMonitoring,
    /// Schedule periodic reassessment
    PeriodicReassessment,
    /// Require additional authentication for sensitive operations
    AdditionalAuthentication,
    /// Continue standard monitoring
    StandardMonitoring,
    /// Keep the regular reassessment schedule
    RegularReassessment,
    /// Activate fraud monitoring alerts
    FraudAlerts,
    /// Review recent transaction anomalies
    ReviewAnomalies,
    /// Gather additional customer data
    GatherCustomerData,
    /// Extend the observation period before finalising
    ExtendObservation,
}

impl Recommendation {
    /// Human-readable action text.
    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::EnhancedDueDiligence => "Implement enhanced due diligence procedures",
            Recommendation::ManualReview => "Require manual review for high-value transactions",
            Recommendation::IdentityVerification => "Request additional identity verification",
            Recommendation::EnhancedMonitoring => "Enable enhanced transaction monitoring",
            Recommendation::PeriodicReassessment => "Schedule periodic risk reassessment",
            Recommendation::AdditionalAuthentication => {
                "Require additional authentication for sensitive operations"
            }
            Recommendation::StandardMonitoring => "Continue standard monitoring procedures",
            Recommendation::RegularReassessment => "Maintain regular risk reassessment schedule",
            Recommendation::FraudAlerts => "Activate fraud monitoring alerts",
            Recommendation::ReviewAnomalies => "Review recent transaction patterns for anomalies",
            Recommendation::GatherCustomerData => "Gather additional customer data",
            Recommendation::ExtendObservation => {
                "Extend observation period before finalizing risk determination"
            }
        }
    }
}

/// Selects recommendations for a score.
pub fn recommend_actions(
    score: f64,
    native_fraud_score: f64,
    confidence: u8,
) -> Vec<Recommendation> {
    use Recommendation::*;

    let mut actions: Vec<Recommendation> = Vec::new();
    let mut push_all = |items: &[Recommendation]| {
        for item in items {
            if !actions.contains(item) {
                actions.push(*item);
            }
        }
    };

    if score > HIGH_UPPER_BOUND {
        push_all(&[EnhancedDueDiligence, ManualReview, IdentityVerification]);
    } else if score > MEDIUM_UPPER_BOUND {
        push_all(&[EnhancedMonitoring, PeriodicReassessment, AdditionalAuthentication]);
    } else {
        push_all(&[StandardMonitoring, RegularReassessment]);
    }

    if native_fraud_score > FRAUD_ALERT_THRESHOLD {
        push_all(&[FraudAlerts, ReviewAnomalies]);
    }

    if confidence < LOW_CONFIDENCE_THRESHOLD {
        push_all(&[GatherCustomerData, ExtendObservation]);
    }

    actions
}

/// Selects recommendations and renders them as text.
///
/// # Examples
///
/// ```
/// use scoring_core::scoring::recommend;
///
/// let actions = recommend(385.71, 300.0, 60);
/// assert_eq!(actions.len(), 4);
/// assert_eq!(actions[0], "Continue standard monitoring procedures");
/// ```
pub fn recommend(score: f64, native_fraud_score: f64, confidence: u8) -> Vec<String> {
    recommend_actions(score, native_fraud_score, confidence)
        .iter()
        .map(|r| r.message().to_string())
        .collect()
}
