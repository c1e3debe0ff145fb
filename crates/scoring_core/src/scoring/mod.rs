//! Weighting, aggregation, confidence, categorisation and recommendations.
//!
//! - `weights`: [`ScoringWeights`] per evidence source
//! - `aggregator`: [`ScoreAggregator`] producing the [0, 1000] score
//! - `confidence`: [`estimate_confidence`]
//! - `categorizer`: [`categorize`] with inclusive 200/500/750 bounds
//! - `recommender`: additive, deduplicated [`recommend`] rules

mod aggregator;
mod categorizer;
mod confidence;
mod recommender;
mod weights;

pub use aggregator::{
    round_to_cents, ComprehensiveScore, ScoreAggregator, FRAUD_FACTOR_NAME, SCORE_SCALE,
};
pub use categorizer::{categorize, HIGH_UPPER_BOUND, LOW_UPPER_BOUND, MEDIUM_UPPER_BOUND};
pub use confidence::{estimate_confidence, BASE_CONFIDENCE, MAX_CONFIDENCE};
pub use recommender::{
    recommend, recommend_actions, Recommendation, FRAUD_ALERT_THRESHOLD,
    LOW_CONFIDENCE_THRESHOLD,
};
pub use weights::{ScoringWeights, WeightsError};
