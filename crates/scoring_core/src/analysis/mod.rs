//! Evidence analyzers.
//!
//! Each analyzer is a pure function from one evidence category to a
//! normalised sub-score in [0, 1] plus the factors that explain it:
//!
//! ```text
//! ┌──────────────────────┬────────────────────────┬──────────────┐
//! │ Analyzer             │ Evidence               │ When absent  │
//! ├──────────────────────┼────────────────────────┼──────────────┤
//! │ analyze_behavior     │ transaction history    │ neutral 0.5  │
//! │ analyze_market       │ volatility, rate       │ skipped      │
//! │ analyze_external     │ credit, watchlist      │ skipped      │
//! └──────────────────────┴────────────────────────┴──────────────┘
//! ```
//!
//! Analyzers hold no state, so re-running one on the same evidence returns
//! an identical result.

mod behavioral;
mod external;
mod market;
pub mod stats;

pub use behavioral::{
    analyze_behavior, BehavioralMetrics, HIGH_VALUE_THRESHOLD, MEAN_AMOUNT_SCALE,
    NEUTRAL_SUB_SCORE,
};
pub use external::{
    analyze_external, credit_contribution, watchlist_contribution, CREDIT_SCORE_CEILING,
    CREDIT_SCORE_RANGE, WATCHLIST_MATCH_PENALTY,
};
pub use market::{
    analyze_market, interest_rate_deviation, volatility_deviation, BASELINE_INTEREST_RATE,
    RATE_DEVIATION_SCALE, VOLATILITY_SCALE,
};

use crate::types::{
    AssessmentId, AssessmentRequest, DataSource, ExternalFactors, MarketConditions, ProfileId,
    RiskFactor, Transaction,
};
use chrono::{DateTime, Utc};

/// A factor identified by an analyzer, before it is tied to a profile.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentifiedFactor {
    /// Factor tag
    pub name: String,
    /// Normalised contribution in [0, 1]
    pub sub_score: f64,
    /// Human-readable rationale
    pub rationale: String,
    /// Evidence source
    pub source: DataSource,
}

impl IdentifiedFactor {
    /// Turns the factor into a durable record.
    pub fn into_record(
        self,
        profile_id: ProfileId,
        assessment_id: AssessmentId,
        weight: f64,
        computed_at: DateTime<Utc>,
    ) -> RiskFactor {
        RiskFactor {
            profile_id,
            assessment_id,
            name: self.name,
            sub_score: self.sub_score,
            weight,
            rationale: self.rationale,
            source: self.source,
            computed_at,
        }
    }
}

/// Output of one analyzer.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyzerOutput {
    /// Normalised sub-score in [0, 1]
    pub sub_score: f64,
    /// Factors explaining the sub-score
    pub factors: Vec<IdentifiedFactor>,
}

impl AnalyzerOutput {
    /// Builds an output whose sub-score is the mean of its factors' scores.
    ///
    /// Returns `None` for an empty factor list.
    pub(crate) fn from_factor_mean(factors: Vec<IdentifiedFactor>) -> Option<Self> {
        if factors.is_empty() {
            return None;
        }
        let sub_score =
            factors.iter().map(|f| f.sub_score).sum::<f64>() / factors.len() as f64;
        Some(Self {
            sub_score: stats::clamp_unit(sub_score),
            factors,
        })
    }
}

/// Borrowed view over the evidence of one request.
#[derive(Clone, Copy, Debug)]
pub struct EvidenceBundle<'a> {
    /// Ordered transaction history
    pub transactions: &'a [Transaction],
    /// Market indicators, if supplied
    pub market: Option<&'a MarketConditions>,
    /// External signals, if supplied
    pub external: Option<&'a ExternalFactors>,
}

impl<'a> EvidenceBundle<'a> {
    /// Creates a bundle from its parts.
    pub fn new(
        transactions: &'a [Transaction],
        market: Option<&'a MarketConditions>,
        external: Option<&'a ExternalFactors>,
    ) -> Self {
        Self {
            transactions,
            market,
            external,
        }
    }

    /// Borrows the evidence of a request.
    pub fn from_request(request: &'a AssessmentRequest) -> Self {
        Self::new(
            &request.transactions,
            request.market_conditions.as_ref(),
            request.external_factors.as_ref(),
        )
    }
}

/// Combined output of all analyzers for one request.
#[derive(Clone, Debug, PartialEq)]
pub struct EvidenceAnalysis {
    /// Number of transactions analysed
    pub transaction_count: usize,
    /// Behavioral output, always present
    pub behavioral: AnalyzerOutput,
    /// Market output, `None` when no market evidence contributed
    pub market: Option<AnalyzerOutput>,
    /// External output, `None` when no external evidence contributed
    pub external: Option<AnalyzerOutput>,
}

impl EvidenceAnalysis {
    /// Returns whether market evidence contributed a sub-score.
    #[inline]
    pub fn market_present(&self) -> bool {
        self.market.is_some()
    }

    /// Returns whether external evidence contributed a sub-score.
    #[inline]
    pub fn external_present(&self) -> bool {
        self.external.is_some()
    }

    /// All identified factors in source order: behavioral, market, external.
    pub fn into_factors(self) -> Vec<IdentifiedFactor> {
        let mut factors = self.behavioral.factors;
        if let Some(market) = self.market {
            factors.extend(market.factors);
        }
        if let Some(external) = self.external {
            factors.extend(external.factors);
        }
        factors
    }
}

/// Runs every analyzer over a bundle.
pub fn analyze_evidence(evidence: &EvidenceBundle<'_>) -> EvidenceAnalysis {
    EvidenceAnalysis {
        transaction_count: evidence.transactions.len(),
        behavioral: analyze_behavior(evidence.transactions),
        market: analyze_market(evidence.market),
        external: analyze_external(evidence.external),
    }
}
