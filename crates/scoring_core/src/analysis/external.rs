//! External evidence analyzer (credit bureau and watchlist signals).

use super::stats::clamp_unit;
use super::{AnalyzerOutput, IdentifiedFactor};
use crate::types::{DataSource, ExternalFactors};

/// Credit score at or above which the credit contribution is zero.
pub const CREDIT_SCORE_CEILING: f64 = 850.0;

/// Width of the credit score band mapped onto [0, 1].
pub const CREDIT_SCORE_RANGE: f64 = 350.0;

/// Contribution of each watchlist match.
pub const WATCHLIST_MATCH_PENALTY: f64 = 0.5;

/// Inverse credit contribution: `(850 − score) / 350`, clamped to [0, 1].
#[inline]
pub fn credit_contribution(credit_score: f64) -> f64 {
    clamp_unit((CREDIT_SCORE_CEILING - credit_score) / CREDIT_SCORE_RANGE)
}

/// Watchlist contribution: `min(matches · 0.5, 1)`.
#[inline]
pub fn watchlist_contribution(matches: u32) -> f64 {
    (f64::from(matches) * WATCHLIST_MATCH_PENALTY).min(1.0)
}

/// Scores third-party signals, `None` when neither signal was supplied.
pub fn analyze_external(external: Option<&ExternalFactors>) -> Option<AnalyzerOutput> {
    let external = external?;
    let mut factors = Vec::with_capacity(2);

    if let Some(score) = external.credit_score {
        factors.push(IdentifiedFactor {
            name: "credit_score".to_string(),
            sub_score: credit_contribution(score),
            rationale: format!(
                "Credit score {:.0} on an inverse {:.0}-point scale",
                score, CREDIT_SCORE_CEILING
            ),
            source: DataSource::External,
        });
    }

    if let Some(matches) = external.watchlist_matches {
        factors.push(IdentifiedFactor {
            name: "watchlist_matches".to_string(),
            sub_score: watchlist_contribution(matches),
            rationale: format!("{} watchlist match(es)", matches),
            source: DataSource::External,
        });
    }

    AnalyzerOutput::from_factor_mean(factors)
}
