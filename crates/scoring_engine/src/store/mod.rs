//! Persistence collaborator for profiles, scores and factors.
//!
//! Scores and factors are append-only logs keyed by profile. Profiles are
//! mutable, guarded by an optimistic `version` compare-and-set in
//! [`RiskStore::save_profile`]. A completed assessment is written through
//! [`RiskStore::commit_assessment`], which applies all three or none.

mod memory;

pub use memory::{InMemoryRiskStore, StoreStatistics};

use async_trait::async_trait;
use scoring_core::types::{CustomerId, ProfileId, RiskFactor, RiskProfile, RiskScore};
use thiserror::Error;

/// Errors raised by a [`RiskStore`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// A profile already exists for the customer.
    #[error("Profile already exists for customer '{customer_id}'")]
    AlreadyExists {
        /// Customer identifier
        customer_id: CustomerId,
    },

    /// No profile exists for the customer.
    #[error("No profile found for customer '{customer_id}'")]
    NotFound {
        /// Customer identifier
        customer_id: CustomerId,
    },

    /// The stored profile was modified by another writer.
    #[error("Profile version conflict for customer '{customer_id}': expected {expected}, found {actual}")]
    VersionConflict {
        /// Customer identifier
        customer_id: CustomerId,
        /// Version the writer read
        expected: u64,
        /// Version currently stored
        actual: u64,
    },

    /// The backing store could not serve the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Storage for risk profiles and their score and factor logs.
#[async_trait]
pub trait RiskStore: Send + Sync {
    /// Looks up the profile of a customer.
    async fn find_profile(&self, customer_id: &CustomerId)
        -> Result<Option<RiskProfile>, StoreError>;

    /// Inserts a new profile.
    ///
    /// Fails with [`StoreError::AlreadyExists`] when the customer already has
    /// one, so two concurrent creators cannot both succeed.
    async fn create_profile(&self, profile: RiskProfile) -> Result<RiskProfile, StoreError>;

    /// All factors recorded for a profile, oldest first.
    async fn list_factors(&self, profile_id: ProfileId) -> Result<Vec<RiskFactor>, StoreError>;

    /// Number of factors recorded for a profile.
    async fn count_factors(&self, profile_id: ProfileId) -> Result<u64, StoreError> {
        Ok(self.list_factors(profile_id).await?.len() as u64)
    }

    /// All scores recorded for a profile, oldest first.
    async fn list_scores(&self, profile_id: ProfileId) -> Result<Vec<RiskScore>, StoreError>;

    /// Appends a score record.
    async fn save_score(&self, score: &RiskScore) -> Result<(), StoreError>;

    /// Appends factor records.
    async fn save_factors(&self, factors: &[RiskFactor]) -> Result<(), StoreError>;

    /// Replaces a profile if its stored version equals `expected_version`.
    ///
    /// Returns the stored profile with its version incremented.
    async fn save_profile(
        &self,
        profile: &RiskProfile,
        expected_version: u64,
    ) -> Result<RiskProfile, StoreError>;

    /// Records one assessment as a single unit.
    ///
    /// Checks `expected_version` against the stored profile before anything
    /// is written; on any error the score log, the factor log and the profile
    /// are left as they were. Returns the stored profile with its version
    /// incremented.
    async fn commit_assessment(
        &self,
        profile: &RiskProfile,
        expected_version: u64,
        score: &RiskScore,
        factors: &[RiskFactor],
    ) -> Result<RiskProfile, StoreError>;
}
