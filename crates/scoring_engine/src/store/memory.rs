//! In-memory risk store.

use super::{RiskStore, StoreError};
use async_trait::async_trait;
use scoring_core::types::{CustomerId, ProfileId, RiskFactor, RiskProfile, RiskScore};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    profiles: HashMap<CustomerId, RiskProfile>,
    scores: HashMap<ProfileId, Vec<RiskScore>>,
    factors: HashMap<ProfileId, Vec<RiskFactor>>,
}

/// Process-local [`RiskStore`] backed by hash maps.
///
/// Each call runs under one lock acquisition, so it is atomic on its own.
/// Cloning shares the underlying tables.
#[derive(Clone, Default)]
pub struct InMemoryRiskStore {
    tables: Arc<RwLock<Tables>>,
}

/// Store statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Number of profiles
    pub profiles: usize,
    /// Number of score records across all profiles
    pub scores: usize,
    /// Number of factor records across all profiles
    pub factors: usize,
}

impl InMemoryRiskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get statistics
    pub fn statistics(&self) -> Result<StoreStatistics, StoreError> {
        let tables = self.read()?;
        Ok(StoreStatistics {
            profiles: tables.profiles.len(),
            scores: tables.scores.values().map(Vec::len).sum(),
            factors: tables.factors.values().map(Vec::len).sum(),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::unavailable("in-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::unavailable("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl RiskStore for InMemoryRiskStore {
    async fn find_profile(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<RiskProfile>, StoreError> {
        Ok(self.read()?.profiles.get(customer_id).cloned())
    }

    async fn create_profile(&self, profile: RiskProfile) -> Result<RiskProfile, StoreError> {
        let mut tables = self.write()?;
        if tables.profiles.contains_key(&profile.customer_id) {
            return Err(StoreError::AlreadyExists {
                customer_id: profile.customer_id,
            });
        }
        tables
            .profiles
            .insert(profile.customer_id.clone(), profile.clone());
        Ok(profile)
    }

    async fn list_factors(&self, profile_id: ProfileId) -> Result<Vec<RiskFactor>, StoreError> {
        Ok(self
            .read()?
            .factors
            .get(&profile_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn count_factors(&self, profile_id: ProfileId) -> Result<u64, StoreError> {
        Ok(self.read()?.factors.get(&profile_id).map_or(0, Vec::len) as u64)
    }

    async fn list_scores(&self, profile_id: ProfileId) -> Result<Vec<RiskScore>, StoreError> {
        Ok(self
            .read()?
            .scores
            .get(&profile_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_score(&self, score: &RiskScore) -> Result<(), StoreError> {
        self.write()?
            .scores
            .entry(score.profile_id)
            .or_default()
            .push(score.clone());
        Ok(())
    }

    async fn save_factors(&self, factors: &[RiskFactor]) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        for factor in factors {
            tables
                .factors
                .entry(factor.profile_id)
                .or_default()
                .push(factor.clone());
        }
        Ok(())
    }

    async fn save_profile(
        &self,
        profile: &RiskProfile,
        expected_version: u64,
    ) -> Result<RiskProfile, StoreError> {
        let mut tables = self.write()?;
        tables.check_version(profile, expected_version)?;
        Ok(tables.replace_profile(profile, expected_version))
    }

    async fn commit_assessment(
        &self,
        profile: &RiskProfile,
        expected_version: u64,
        score: &RiskScore,
        factors: &[RiskFactor],
    ) -> Result<RiskProfile, StoreError> {
        let mut tables = self.write()?;
        tables.check_version(profile, expected_version)?;

        tables
            .scores
            .entry(score.profile_id)
            .or_default()
            .push(score.clone());
        for factor in factors {
            tables
                .factors
                .entry(factor.profile_id)
                .or_default()
                .push(factor.clone());
        }
        Ok(tables.replace_profile(profile, expected_version))
    }
}

impl Tables {
    fn check_version(
        &self,
        profile: &RiskProfile,
        expected_version: u64,
    ) -> Result<(), StoreError> {
        let stored = self
            .profiles
            .get(&profile.customer_id)
            .ok_or_else(|| StoreError::NotFound {
                customer_id: profile.customer_id.clone(),
            })?;

        if stored.version != expected_version {
            return Err(StoreError::VersionConflict {
                customer_id: profile.customer_id.clone(),
                expected: expected_version,
                actual: stored.version,
            });
        }
        Ok(())
    }

    fn replace_profile(&mut self, profile: &RiskProfile, expected_version: u64) -> RiskProfile {
        let mut next = profile.clone();
        next.version = expected_version + 1;
        self.profiles.insert(profile.customer_id.clone(), next.clone());
        next
    }
}
