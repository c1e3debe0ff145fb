//! Score categorisation.

use crate::types::RiskCategory;

/// Highest score still categorised as [`RiskCategory::Low`].
pub const LOW_UPPER_BOUND: f64 = 200.0;

/// Highest score still categorised as [`RiskCategory::Medium`].
pub const MEDIUM_UPPER_BOUND: f64 = 500.0;

/// Highest score still categorised as [`RiskCategory::High`].
pub const HIGH_UPPER_BOUND: f64 = 750.0;

/// Maps a comprehensive score to its category.
///
/// Upper bounds are inclusive, so exactly 200.00 is still LOW.
///
/// # Examples
///
/// ```
/// use scoring_core::scoring::categorize;
/// use scoring_core::types::RiskCategory;
///
/// assert_eq!(categorize(200.0), RiskCategory::Low);
/// assert_eq!(categorize(200.01), RiskCategory::Medium);
/// assert_eq!(categorize(999.0), RiskCategory::Critical);
/// ```
pub fn categorize(score: f64) -> RiskCategory {
    if score <= LOW_UPPER_BOUND {
        RiskCategory::Low
    } else if score <= MEDIUM_UPPER_BOUND {
        RiskCategory::Medium
    } else if score <= HIGH_UPPER_BOUND {
        RiskCategory::High
    } else {
        RiskCategory::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(categorize(0.0), RiskCategory::Low);
        assert_eq!(categorize(200.0), RiskCategory::Low);
        assert_eq!(categorize(200.01), RiskCategory::Medium);
        assert_eq!(categorize(500.0), RiskCategory::Medium);
        assert_eq!(categorize(500.01), RiskCategory::High);
        assert_eq!(categorize(750.0), RiskCategory::High);
        assert_eq!(categorize(750.01), RiskCategory::Critical);
        assert_eq!(categorize(1000.0), RiskCategory::Critical);
    }

    proptest! {
        #[test]
        fn prop_category_is_assessed_and_monotone(a in 0.0..=1000.0f64, b in 0.0..=1000.0f64) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(categorize(lo).is_assessed());
            prop_assert!(categorize(lo) <= categorize(hi));
        }
    }
}
