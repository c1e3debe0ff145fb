//! Optional market and external evidence maps.
//!
//! Both maps are optional on the request and each recognised key inside them
//! is optional too. Unrecognised keys are ignored so upstream producers can
//! add indicators without breaking the contract.

use serde::{Deserialize, Serialize};

/// Market indicators supplied with an assessment request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketConditions {
    /// Volatility measure, nominally a percentage in [0, 100]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    /// Prevailing interest rate in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
}

impl MarketConditions {
    /// Creates market conditions from both indicators.
    pub fn new(volatility: Option<f64>, interest_rate: Option<f64>) -> Self {
        Self {
            volatility,
            interest_rate,
        }
    }

    /// Returns whether at least one recognised indicator is present.
    pub fn has_indicators(&self) -> bool {
        self.volatility.is_some() || self.interest_rate.is_some()
    }
}

/// Third-party signals supplied with an assessment request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalFactors {
    /// Bureau credit score, nominally in [300, 850]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_score: Option<f64>,
    /// Number of sanctions/watchlist matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watchlist_matches: Option<u32>,
}

impl ExternalFactors {
    /// Creates external factors from both signals.
    pub fn new(credit_score: Option<f64>, watchlist_matches: Option<u32>) -> Self {
        Self {
            credit_score,
            watchlist_matches,
        }
    }

    /// Returns whether at least one recognised signal is present.
    pub fn has_signals(&self) -> bool {
        self.credit_score.is_some() || self.watchlist_matches.is_some()
    }
}
