//! Market evidence analyzer.
//!
//! Each present indicator is turned into a deviation in [0, 1] and the
//! sub-score is the mean over the indicators actually supplied. With no
//! recognised indicator the analyzer returns `None` and the aggregator drops
//! the market weight from its denominator.

use super::stats::clamp_unit;
use super::{AnalyzerOutput, IdentifiedFactor};
use crate::types::{DataSource, MarketConditions};

/// Interest rate (percent) regarded as normal.
pub const BASELINE_INTEREST_RATE: f64 = 3.0;

/// Volatility at which the volatility deviation saturates.
pub const VOLATILITY_SCALE: f64 = 100.0;

/// Rate deviation (percentage points) at which the rate deviation saturates.
pub const RATE_DEVIATION_SCALE: f64 = 10.0;

/// Normalised volatility deviation.
#[inline]
pub fn volatility_deviation(volatility: f64) -> f64 {
    clamp_unit(volatility / VOLATILITY_SCALE)
}

/// Normalised distance of the interest rate from the baseline.
#[inline]
pub fn interest_rate_deviation(rate: f64) -> f64 {
    clamp_unit((rate - BASELINE_INTEREST_RATE).abs() / RATE_DEVIATION_SCALE)
}

/// Scores market conditions, `None` when nothing recognisable was supplied.
pub fn analyze_market(market: Option<&MarketConditions>) -> Option<AnalyzerOutput> {
    let market = market?;
    let mut factors = Vec::with_capacity(2);

    if let Some(volatility) = market.volatility {
        let deviation = volatility_deviation(volatility);
        factors.push(IdentifiedFactor {
            name: "market_volatility".to_string(),
            sub_score: deviation,
            rationale: format!(
                "Market volatility {:.2} normalised against {:.0}",
                volatility, VOLATILITY_SCALE
            ),
            source: DataSource::Market,
        });
    }

    if let Some(rate) = market.interest_rate {
        let deviation = interest_rate_deviation(rate);
        factors.push(IdentifiedFactor {
            name: "interest_rate_deviation".to_string(),
            sub_score: deviation,
            rationale: format!(
                "Interest rate {:.2}% deviates {:.2} points from the {:.1}% baseline",
                rate,
                (rate - BASELINE_INTEREST_RATE).abs(),
                BASELINE_INTEREST_RATE
            ),
            source: DataSource::Market,
        });
    }

    AnalyzerOutput::from_factor_mean(factors)
}
