//! Confidence estimation.
//!
//! Confidence starts at a base level and rises with the volume of evidence:
//!
//! | Condition                       | Bonus              |
//! |---------------------------------|--------------------|
//! | more than 50 transactions       | +10                |
//! | more than 100 transactions      | +10 (cumulative)   |
//! | market evidence contributed     | +5                 |
//! | external evidence contributed   | +10                |
//! | factors from prior assessments  | +2 each, up to 15  |

/// Confidence with no supporting evidence.
pub const BASE_CONFIDENCE: u32 = 60;

/// Upper bound of the confidence scale.
pub const MAX_CONFIDENCE: u32 = 100;

const MODERATE_HISTORY: usize = 50;
const LARGE_HISTORY: usize = 100;
const HISTORY_BONUS: u32 = 10;
const MARKET_BONUS: u32 = 5;
const EXTERNAL_BONUS: u32 = 10;
const FACTOR_BONUS_EACH: u64 = 2;
const FACTOR_BONUS_CAP: u64 = 15;

/// Estimates confidence on [0, 100].
///
/// # Examples
///
/// ```
/// use scoring_core::scoring::estimate_confidence;
///
/// assert_eq!(estimate_confidence(0, false, false, 0), 60);
/// assert_eq!(estimate_confidence(120, false, false, 0), 80);
/// assert_eq!(estimate_confidence(120, true, true, 40), 100);
/// ```
pub fn estimate_confidence(
    transaction_count: usize,
    market_present: bool,
    external_present: bool,
    existing_factor_count: u64,
) -> u8 {
    let mut confidence = BASE_CONFIDENCE;
    if transaction_count > MODERATE_HISTORY {
        confidence += HISTORY_BONUS;
    }
    if transaction_count > LARGE_HISTORY {
        confidence += HISTORY_BONUS;
    }
    if market_present {
        confidence += MARKET_BONUS;
    }
    if external_present {
        confidence += EXTERNAL_BONUS;
    }
    let factor_bonus = existing_factor_count
        .saturating_mul(FACTOR_BONUS_EACH)
        .min(FACTOR_BONUS_CAP);
    // factor_bonus <= 15, so the cast is lossless
    confidence += factor_bonus as u32;

    confidence.min(MAX_CONFIDENCE) as u8
}
