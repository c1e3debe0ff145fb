//! Behavioral evidence analyzer over the transaction history.
//!
//! The sub-score blends four statistics over absolute amounts:
//!
//! ```text
//! sub = clamp( 0.3·high_risk_ratio + 0.3·variability
//!            + 0.2·diversity       + 0.2·min(mean / 50 000, 1), 0, 1 )
//! ```
//!
//! An empty history yields the neutral score 0.5 rather than zero, so the
//! absence of data is never read as evidence of low risk.

use super::stats::{clamp_unit, coefficient_of_variation, mean, normalized_entropy};
use super::{AnalyzerOutput, IdentifiedFactor};
use crate::types::{DataSource, Transaction};
use std::collections::BTreeMap;

/// Amount above which a single transaction counts as high value.
pub const HIGH_VALUE_THRESHOLD: f64 = 10_000.0;

/// Mean amount at which the size component saturates.
pub const MEAN_AMOUNT_SCALE: f64 = 50_000.0;

/// Sub-score returned for an empty history.
pub const NEUTRAL_SUB_SCORE: f64 = 0.5;

/// Factor tag emitted by this analyzer.
pub const FACTOR_NAME: &str = "transaction_behavior";

const W_HIGH_RISK: f64 = 0.3;
const W_VARIABILITY: f64 = 0.3;
const W_DIVERSITY: f64 = 0.2;
const W_SIZE: f64 = 0.2;

/// Statistics extracted from a non-empty transaction history.
#[derive(Clone, Debug, PartialEq)]
pub struct BehavioralMetrics {
    /// Number of transactions
    pub transaction_count: usize,
    /// Mean absolute amount
    pub mean_amount: f64,
    /// Fraction of transactions above [`HIGH_VALUE_THRESHOLD`]
    pub high_risk_ratio: f64,
    /// Coefficient of variation clamped to [0, 1]
    pub variability: f64,
    /// Normalised category entropy in [0, 1]
    pub diversity: f64,
}

impl BehavioralMetrics {
    /// Computes the metrics, `None` for an empty history.
    ///
    /// Uncategorised transactions count towards the amount statistics but are
    /// left out of the category distribution.
    pub fn compute(transactions: &[Transaction]) -> Option<Self> {
        let amounts: Vec<f64> = transactions.iter().map(Transaction::abs_amount).collect();
        let mean_amount = mean(&amounts)?;

        let high_value = amounts.iter().filter(|&&a| a > HIGH_VALUE_THRESHOLD).count();
        let high_risk_ratio = high_value as f64 / amounts.len() as f64;

        let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
        for category in transactions.iter().filter_map(|t| t.category.as_deref()) {
            *categories.entry(category).or_insert(0) += 1;
        }

        Some(Self {
            transaction_count: amounts.len(),
            mean_amount,
            high_risk_ratio,
            variability: coefficient_of_variation(&amounts),
            diversity: normalized_entropy(&categories),
        })
    }

    /// Size component: `min(mean / 50 000, 1)`.
    #[inline]
    pub fn size_component(&self) -> f64 {
        (self.mean_amount / MEAN_AMOUNT_SCALE).min(1.0)
    }

    /// Weighted blend of the four components, clamped to [0, 1].
    pub fn sub_score(&self) -> f64 {
        clamp_unit(
            W_HIGH_RISK * self.high_risk_ratio
                + W_VARIABILITY * self.variability
                + W_DIVERSITY * self.diversity
                + W_SIZE * self.size_component(),
        )
    }
}

/// Scores the transaction history.
///
/// # Examples
///
/// ```
/// use scoring_core::analysis::analyze_behavior;
/// use scoring_core::types::Transaction;
///
/// assert_eq!(analyze_behavior(&[]).sub_score, 0.5);
///
/// let history = vec![Transaction::new(5_000.0).with_category("retail"); 10];
/// let output = analyze_behavior(&history);
/// assert!((output.sub_score - 0.02).abs() < 1e-12);
/// assert_eq!(output.factors.len(), 1);
/// ```
pub fn analyze_behavior(transactions: &[Transaction]) -> AnalyzerOutput {
    let factor = |sub_score: f64, rationale: String| IdentifiedFactor {
        name: FACTOR_NAME.to_string(),
        sub_score,
        rationale,
        source: DataSource::Transactions,
    };

    match BehavioralMetrics::compute(transactions) {
        None => AnalyzerOutput {
            sub_score: NEUTRAL_SUB_SCORE,
            factors: vec![factor(
                NEUTRAL_SUB_SCORE,
                "No transaction history available; neutral behavioral score applied".to_string(),
            )],
        },
        Some(metrics) => {
            let sub_score = metrics.sub_score();
            let rationale = format!(
                "{} transactions: high-value ratio {:.3}, variability {:.3}, \
                 category diversity {:.3}, mean amount {:.2}",
                metrics.transaction_count,
                metrics.high_risk_ratio,
                metrics.variability,
                metrics.diversity,
                metrics.mean_amount
            );
            AnalyzerOutput {
                sub_score,
                factors: vec![factor(sub_score, rationale)],
            }
        }
    }
}
