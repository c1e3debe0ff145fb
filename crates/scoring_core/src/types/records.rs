//! Durable risk records: profile, score and factor.
//!
//! `RiskScore` and `RiskFactor` are immutable once created and are kept by the
//! store as append-only logs indexed by profile. `RiskProfile` carries only
//! the current state plus a reference to the latest score, so loading a
//! profile never drags its whole history into memory.

use super::ids::{AssessmentId, CustomerId, ProfileId, ScoreId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete risk category.
///
/// `Unknown` is the sentinel carried by a profile that has never completed
/// an assessment; the categoriser only ever produces the other four.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    /// Not yet assessed
    #[default]
    Unknown,
    /// Score in [0, 200]
    Low,
    /// Score in (200, 500]
    Medium,
    /// Score in (500, 750]
    High,
    /// Score in (750, 1000]
    Critical,
}

impl RiskCategory {
    /// Upper-case name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Unknown => "UNKNOWN",
            RiskCategory::Low => "LOW",
            RiskCategory::Medium => "MEDIUM",
            RiskCategory::High => "HIGH",
            RiskCategory::Critical => "CRITICAL",
        }
    }

    /// Returns whether this category was produced by an assessment.
    #[inline]
    pub fn is_assessed(&self) -> bool {
        !matches!(self, RiskCategory::Unknown)
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Evidence source a factor was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    /// Customer transaction history
    Transactions,
    /// Market indicators
    Market,
    /// Third-party credit and watchlist signals
    External,
    /// Fraud-detection collaborator
    FraudDetection,
}

impl DataSource {
    /// Upper-case tag as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Transactions => "TRANSACTIONS",
            DataSource::Market => "MARKET",
            DataSource::External => "EXTERNAL",
            DataSource::FraudDetection => "FRAUD_DETECTION",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-customer aggregate of the current risk state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    /// Surrogate profile identifier
    pub id: ProfileId,
    /// Unique customer key
    pub customer_id: CustomerId,
    /// Score of the most recent completed assessment, in [0, 1000]
    pub current_score: f64,
    /// Category of the most recent completed assessment
    pub category: RiskCategory,
    /// Time of the most recent completed assessment
    pub last_assessed_at: Option<DateTime<Utc>>,
    /// Reference to the newest entry of the score log
    pub latest_score_id: Option<ScoreId>,
    /// Number of completed assessments
    pub assessment_count: u64,
    /// Optimistic concurrency version, bumped by every successful save
    pub version: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl RiskProfile {
    /// Creates the initial profile for a customer: score 0, category `Unknown`.
    pub fn new(customer_id: CustomerId, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ProfileId::generate(),
            customer_id,
            current_score: 0.0,
            category: RiskCategory::Unknown,
            last_assessed_at: None,
            latest_score_id: None,
            assessment_count: 0,
            version: 0,
            created_at,
        }
    }

    /// Overwrites the current state with a freshly persisted score.
    ///
    /// The version is left untouched; the store bumps it on save.
    pub fn apply_score(&mut self, score: &RiskScore) {
        self.current_score = score.score;
        self.category = score.category;
        self.last_assessed_at = Some(score.assessed_at);
        self.latest_score_id = Some(score.id);
        self.assessment_count += 1;
    }
}

/// Immutable result of one completed assessment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskScore {
    /// Score record identifier
    pub id: ScoreId,
    /// Owning profile
    pub profile_id: ProfileId,
    /// Assessment that produced the score
    pub assessment_id: AssessmentId,
    /// Comprehensive score in [0, 1000]
    pub score: f64,
    /// Category derived from the score
    pub category: RiskCategory,
    /// Assessment time
    pub assessed_at: DateTime<Utc>,
}

/// Explainable, weighted contributor to one assessment's score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactor {
    /// Owning profile
    pub profile_id: ProfileId,
    /// Assessment the factor belongs to
    pub assessment_id: AssessmentId,
    /// Factor tag, e.g. `transaction_behavior`
    pub name: String,
    /// Normalised sub-score in [0, 1]
    pub sub_score: f64,
    /// Weight of the factor's evidence category in [0, 1]
    pub weight: f64,
    /// Human-readable rationale
    pub rationale: String,
    /// Evidence source
    pub source: DataSource,
    /// Computation time
    pub computed_at: DateTime<Utc>,
}
