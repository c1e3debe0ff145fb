//! Weighted aggregation of source sub-scores into the comprehensive score.
//!
//! ```text
//! normalized    = Σ(sub_i · w_i) / Σ(w_i)      over contributing sources
//! comprehensive = round₂( clamp(normalized · 1000, 0, 1000) )
//! ```
//!
//! Fraud and behavioral sources always contribute. Market and external
//! sources contribute only when their analyzer produced a sub-score, so an
//! absent source neither drags the score down nor distorts the relative
//! weighting of the others.

use super::weights::ScoringWeights;
use crate::analysis::stats::clamp_unit;
use crate::analysis::{EvidenceAnalysis, IdentifiedFactor};
use crate::types::{DataSource, ScoreBreakdown};

/// Upper bound of the comprehensive and native fraud score scales.
pub const SCORE_SCALE: f64 = 1000.0;

/// Factor tag recorded for the fraud collaborator's signal.
pub const FRAUD_FACTOR_NAME: &str = "fraud_signal";

/// Rounds half away from zero to two decimal places.
///
/// Ties are judged on the decimal the value was written as, so `1.005`
/// rounds to `1.01` even though its binary form lies just below the tie.
#[inline]
pub fn round_to_cents(value: f64) -> f64 {
    // A few ulps away from zero absorbs the representation error of x.xx5
    ((value * 100.0) * (1.0 + 4.0 * f64::EPSILON)).round() / 100.0
}

/// Result of aggregating one assessment.
#[derive(Clone, Debug, PartialEq)]
pub struct ComprehensiveScore {
    /// Score on [0, 1000], rounded to two decimals
    pub value: f64,
    /// Weighted mean of contributing sub-scores on [0, 1]
    pub normalized: f64,
    /// Per-source sub-scores
    pub breakdown: ScoreBreakdown,
    /// Sum of the weights that entered the denominator
    pub total_weight: f64,
}

/// Combines the fraud signal and analyzer outputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreAggregator {
    weights: ScoringWeights,
}

impl ScoreAggregator {
    /// Creates an aggregator with the given weights.
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Returns the weights in use.
    #[inline]
    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Aggregates a native fraud score on [0, 1000] with the analyzer outputs.
    ///
    /// # Examples
    ///
    /// ```
    /// use scoring_core::analysis::{analyze_evidence, EvidenceBundle};
    /// use scoring_core::scoring::{ScoreAggregator, ScoringWeights};
    ///
    /// // Empty history: behavioral 0.5, fraud 0.3 -> (0.12 + 0.15) / 0.7
    /// let analysis = analyze_evidence(&EvidenceBundle::new(&[], None, None));
    /// let score = ScoreAggregator::new(ScoringWeights::default()).aggregate(300.0, &analysis);
    /// assert_eq!(score.value, 385.71);
    /// ```
    pub fn aggregate(
        &self,
        native_fraud_score: f64,
        analysis: &EvidenceAnalysis,
    ) -> ComprehensiveScore {
        let fraud = clamp_unit(native_fraud_score / SCORE_SCALE);
        let behavioral = analysis.behavioral.sub_score;
        let market = analysis.market.as_ref().map(|m| m.sub_score);
        let external = analysis.external.as_ref().map(|e| e.sub_score);

        let mut weighted = fraud * self.weights.fraud + behavioral * self.weights.behavioral;
        let mut total_weight = self.weights.fraud + self.weights.behavioral;
        if let Some(sub) = market {
            weighted += sub * self.weights.market;
            total_weight += self.weights.market;
        }
        if let Some(sub) = external {
            weighted += sub * self.weights.external;
            total_weight += self.weights.external;
        }

        let normalized = if total_weight > 0.0 {
            clamp_unit(weighted / total_weight)
        } else {
            0.0
        };
        let value = round_to_cents((normalized * SCORE_SCALE).clamp(0.0, SCORE_SCALE));

        ComprehensiveScore {
            value,
            normalized,
            breakdown: ScoreBreakdown {
                fraud,
                behavioral,
                market,
                external,
            },
            total_weight,
        }
    }

    /// Factor describing the fraud collaborator's contribution.
    pub fn fraud_factor(
        &self,
        native_fraud_score: f64,
        risk_level: Option<&str>,
    ) -> IdentifiedFactor {
        let rationale = match risk_level {
            Some(level) => format!(
                "Fraud detection score {:.2} of {:.0} (risk level {})",
                native_fraud_score, SCORE_SCALE, level
            ),
            None => format!(
                "Fraud detection score {:.2} of {:.0}",
                native_fraud_score, SCORE_SCALE
            ),
        };
        IdentifiedFactor {
            name: FRAUD_FACTOR_NAME.to_string(),
            sub_score: clamp_unit(native_fraud_score / SCORE_SCALE),
            rationale,
            source: DataSource::FraudDetection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze_evidence, EvidenceBundle};
    use crate::types::{ExternalFactors, MarketConditions, Transaction};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn aggregator() -> ScoreAggregator {
        ScoreAggregator::new(ScoringWeights::default())
    }

    #[test]
    fn test_empty_history_fraud_300() {
        let analysis = analyze_evidence(&EvidenceBundle::new(&[], None, None));
        let score = aggregator().aggregate(300.0, &analysis);
        assert_eq!(score.value, 385.71);
        assert_relative_eq!(score.total_weight, 0.7, epsilon = 1e-12);
        assert_eq!(score.breakdown.market, None);
        assert_eq!(score.breakdown.external, None);
    }

    #[test]
    fn test_uniform_history_zero_fraud() {
        let history = vec![Transaction::new(5_000.0).with_category("retail"); 120];
        let analysis = analyze_evidence(&EvidenceBundle::new(&history, None, None));
        let score = aggregator().aggregate(0.0, &analysis);
        assert_relative_eq!(score.breakdown.behavioral, 0.02, epsilon = 1e-12);
        // 1000 * 0.3 * 0.02 / 0.7
        assert_eq!(score.value, 8.57);
    }

    #[test]
    fn test_all_sources_present() {
        let market = MarketConditions::new(Some(50.0), None);
        let external = ExternalFactors::new(None, Some(2));
        let analysis = analyze_evidence(&EvidenceBundle::new(&[], Some(&market), Some(&external)));
        let score = aggregator().aggregate(1000.0, &analysis);
        // 0.4 * 1 + 0.3 * 0.5 + 0.2 * 0.5 + 0.1 * 1 = 0.75
        assert_relative_eq!(score.total_weight, 1.0, epsilon = 1e-12);
        assert_eq!(score.value, 750.0);
        assert_eq!(score.breakdown.market, Some(0.5));
        assert_eq!(score.breakdown.external, Some(1.0));
    }

    #[test]
    fn test_relative_weighting_preserved_without_market() {
        let external = ExternalFactors::new(Some(500.0), None);
        let analysis = analyze_evidence(&EvidenceBundle::new(&[], None, Some(&external)));
        let score = aggregator().aggregate(0.0, &analysis);
        // (0.3 * 0.5 + 0.1 * 1.0) / 0.8
        assert_relative_eq!(score.normalized, 0.25 / 0.8, epsilon = 1e-12);
        assert_eq!(score.value, 312.5);
    }

    #[test]
    fn test_native_fraud_outside_scale_is_clamped() {
        let analysis = analyze_evidence(&EvidenceBundle::new(&[], None, None));
        let high = aggregator().aggregate(5_000.0, &analysis);
        assert_eq!(high.breakdown.fraud, 1.0);
        let low = aggregator().aggregate(-20.0, &analysis);
        assert_eq!(low.breakdown.fraud, 0.0);
    }

    #[test]
    fn test_round_to_cents_half_up() {
        assert_eq!(round_to_cents(385.714_285), 385.71);
        assert_eq!(round_to_cents(0.125), 0.13);
        assert_eq!(round_to_cents(0.0), 0.0);
        assert_eq!(round_to_cents(1000.0), 1000.0);
    }

    #[test]
    fn test_round_to_cents_decimal_ties() {
        assert_eq!(round_to_cents(1.005), 1.01);
        assert_eq!(round_to_cents(2.675), 2.68);
        assert_eq!(round_to_cents(-1.005), -1.01);
        assert_eq!(round_to_cents(1.004_999), 1.0);
        assert_eq!(round_to_cents(8.571_428), 8.57);
    }

    #[test]
    fn test_fraud_factor() {
        let factor = aggregator().fraud_factor(620.0, Some("HIGH"));
        assert_eq!(factor.name, FRAUD_FACTOR_NAME);
        assert_eq!(factor.source, DataSource::FraudDetection);
        assert_relative_eq!(factor.sub_score, 0.62, epsilon = 1e-12);
        assert!(factor.rationale.contains("HIGH"));
    }

    fn arb_transaction() -> impl Strategy<Value = Transaction> {
        (
            -100_000.0..100_000.0f64,
            prop::option::of(prop::sample::select(vec!["retail", "wire", "travel", "atm"])),
        )
            .prop_map(|(amount, category)| match category {
                Some(c) => Transaction::new(amount).with_category(c),
                None => Transaction::new(amount),
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_score_bounded_and_deterministic(
            history in prop::collection::vec(arb_transaction(), 0..60),
            fraud in 0.0..=1000.0f64,
            volatility in prop::option::of(-50.0..300.0f64),
            rate in prop::option::of(-5.0..30.0f64),
            credit in prop::option::of(200.0..900.0f64),
            matches in prop::option::of(0u32..6),
        ) {
            let market = MarketConditions::new(volatility, rate);
            let external = ExternalFactors::new(credit, matches);
            let bundle = EvidenceBundle::new(&history, Some(&market), Some(&external));

            let first = aggregator().aggregate(fraud, &analyze_evidence(&bundle));
            let second = aggregator().aggregate(fraud, &analyze_evidence(&bundle));

            prop_assert!((0.0..=1000.0).contains(&first.value));
            prop_assert_eq!(first.value, second.value);
            prop_assert_eq!(first.value, round_to_cents(first.value));
        }

        #[test]
        fn prop_renormalisation_without_optional_sources(
            history in prop::collection::vec(arb_transaction(), 0..40),
            fraud in 0.0..=1000.0f64,
        ) {
            let analysis = analyze_evidence(&EvidenceBundle::new(&history, None, None));
            let score = aggregator().aggregate(fraud, &analysis);

            let b = analysis.behavioral.sub_score;
            let f = fraud / 1000.0;
            let expected = round_to_cents((1000.0 * (0.4 * f + 0.3 * b) / 0.7).clamp(0.0, 1000.0));
            prop_assert!((score.value - expected).abs() <= 0.01 + 1e-9);
        }
    }
}
