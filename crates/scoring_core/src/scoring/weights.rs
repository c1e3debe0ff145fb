//! Source weighting scheme.

use crate::types::DataSource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a weighting scheme is unusable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WeightsError {
    /// A weight is NaN or infinite.
    #[error("Weight '{field}' must be finite, got {value}")]
    NonFinite {
        /// Offending key
        field: &'static str,
        /// Offending value
        value: f64,
    },

    /// A weight is below zero.
    #[error("Weight '{field}' must be non-negative, got {value}")]
    Negative {
        /// Offending key
        field: &'static str,
        /// Offending value
        value: f64,
    },

    /// The always-present sources carry no weight.
    #[error("fraud + behavioral weight must be positive, got {sum}")]
    ZeroBaseWeight {
        /// Sum of the fraud and behavioral weights
        sum: f64,
    },
}

/// Weights applied to each evidence source before renormalisation.
///
/// Fraud and behavioral sources contribute to every assessment. Market and
/// external weights only enter the denominator when that evidence is present.
///
/// # Examples
///
/// ```
/// use scoring_core::scoring::ScoringWeights;
///
/// let weights: ScoringWeights = toml::from_str("market = 0.25").unwrap();
/// assert_eq!(weights.market, 0.25);
/// assert_eq!(weights.fraud, 0.4);
/// assert!(weights.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringWeights {
    /// Weight of the fraud collaborator's signal
    pub fraud: f64,
    /// Weight of the transaction history
    pub behavioral: f64,
    /// Weight of market conditions
    pub market: f64,
    /// Weight of external signals
    pub external: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            fraud: 0.4,
            behavioral: 0.3,
            market: 0.2,
            external: 0.1,
        }
    }
}

impl ScoringWeights {
    /// Checks every weight is finite and non-negative and that the base
    /// sources carry positive weight.
    pub fn validate(&self) -> Result<(), WeightsError> {
        for (field, value) in self.entries() {
            if !value.is_finite() {
                return Err(WeightsError::NonFinite { field, value });
            }
            if value < 0.0 {
                return Err(WeightsError::Negative { field, value });
            }
        }
        let sum = self.fraud + self.behavioral;
        if sum <= 0.0 {
            return Err(WeightsError::ZeroBaseWeight { sum });
        }
        Ok(())
    }

    /// Weight applied to factors from the given source.
    #[inline]
    pub fn weight_for(&self, source: DataSource) -> f64 {
        match source {
            DataSource::FraudDetection => self.fraud,
            DataSource::Transactions => self.behavioral,
            DataSource::Market => self.market,
            DataSource::External => self.external,
        }
    }

    fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("fraud", self.fraud),
            ("behavioral", self.behavioral),
            ("market", self.market),
            ("external", self.external),
        ]
    }
}
