//! Profile lifecycle and the per-customer consistency boundary.
//!
//! A profile moves from absent to active on its first assessment and stays
//! active. Assessments for one customer are serialised in-process by a keyed
//! async mutex; writers in other processes are caught by the store's version
//! compare-and-set.

use crate::store::{RiskStore, StoreError};
use chrono::Utc;
use scoring_core::types::{CustomerId, RiskFactor, RiskProfile, RiskScore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

/// Guard serialising assessments of one customer.
pub type CustomerGuard = OwnedMutexGuard<()>;

/// Keyed async mutexes, one per customer with work in flight.
#[derive(Default)]
struct CustomerLocks {
    locks: Mutex<HashMap<CustomerId, Arc<AsyncMutex<()>>>>,
}

impl CustomerLocks {
    async fn acquire(&self, customer_id: &CustomerId) -> CustomerGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            if !locks.contains_key(customer_id) {
                // Drop locks nobody holds or waits on
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            Arc::clone(
                locks
                    .entry(customer_id.clone())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Loads, creates and updates risk profiles.
pub struct ProfileManager {
    store: Arc<dyn RiskStore>,
    locks: CustomerLocks,
}

impl ProfileManager {
    /// Create a manager over a store
    pub fn new(store: Arc<dyn RiskStore>) -> Self {
        Self {
            store,
            locks: CustomerLocks::default(),
        }
    }

    /// Waits for exclusive access to a customer's profile.
    ///
    /// Hold the guard from [`load_or_create`](Self::load_or_create) through
    /// [`persist_result`](Self::persist_result).
    pub async fn lock_customer(&self, customer_id: &CustomerId) -> CustomerGuard {
        self.locks.acquire(customer_id).await
    }

    /// Returns the customer's profile, creating it on first use.
    pub async fn load_or_create(
        &self,
        customer_id: &CustomerId,
    ) -> Result<RiskProfile, StoreError> {
        if let Some(profile) = self.store.find_profile(customer_id).await? {
            return Ok(profile);
        }

        match self
            .store
            .create_profile(RiskProfile::new(customer_id.clone(), Utc::now()))
            .await
        {
            Ok(profile) => {
                debug!(
                    customer_id = %customer_id,
                    profile_id = %profile.id,
                    "Created risk profile"
                );
                Ok(profile)
            }
            // Another process created it between find and create
            Err(StoreError::AlreadyExists { .. }) => self
                .store
                .find_profile(customer_id)
                .await?
                .ok_or_else(|| StoreError::NotFound {
                    customer_id: customer_id.clone(),
                }),
            Err(e) => Err(e),
        }
    }

    /// Number of factors recorded by earlier assessments.
    pub async fn prior_factor_count(&self, profile: &RiskProfile) -> Result<u64, StoreError> {
        self.store.count_factors(profile.id).await
    }

    /// Records the score and factors and moves the profile to the new score.
    ///
    /// All three are committed together, conditional on the profile still
    /// being at the version that was loaded. On failure nothing is recorded.
    /// The returned profile carries the incremented version.
    pub async fn persist_result(
        &self,
        profile: &RiskProfile,
        score: &RiskScore,
        factors: &[RiskFactor],
    ) -> Result<RiskProfile, StoreError> {
        let mut updated = profile.clone();
        updated.apply_score(score);
        self.store
            .commit_assessment(&updated, profile.version, score, factors)
            .await
    }

    /// Current profile of a customer, if any.
    pub async fn profile(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<RiskProfile>, StoreError> {
        self.store.find_profile(customer_id).await
    }

    /// Score history of a customer, oldest first.
    pub async fn score_history(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<RiskScore>, StoreError> {
        match self.store.find_profile(customer_id).await? {
            Some(profile) => self.store.list_scores(profile.id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Factor history of a customer, oldest first.
    pub async fn factor_history(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<RiskFactor>, StoreError> {
        match self.store.find_profile(customer_id).await? {
            Some(profile) => self.store.list_factors(profile.id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Number of customers with a lock entry.
    #[cfg(test)]
    fn tracked_customers(&self) -> usize {
        self.locks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRiskStore;
    use scoring_core::types::{AssessmentId, DataSource, RiskCategory, ScoreId};
    use std::time::Duration;

    fn manager() -> (ProfileManager, InMemoryRiskStore) {
        let store = InMemoryRiskStore::new();
        (ProfileManager::new(Arc::new(store.clone())), store)
    }

    fn score_for(profile: &RiskProfile, value: f64, category: RiskCategory) -> RiskScore {
        RiskScore {
            id: ScoreId::generate(),
            profile_id: profile.id,
            assessment_id: AssessmentId::generate(),
            score: value,
            category,
            assessed_at: Utc::now(),
        }
    }

    fn factor_for(score: &RiskScore) -> RiskFactor {
        RiskFactor {
            profile_id: score.profile_id,
            assessment_id: score.assessment_id,
            name: "transaction_behavior".to_string(),
            sub_score: 0.5,
            weight: 0.3,
            rationale: String::new(),
            source: DataSource::Transactions,
            computed_at: score.assessed_at,
        }
    }

    #[tokio::test]
    async fn test_first_load_creates_unknown_profile() {
        let (manager, _) = manager();
        let customer = CustomerId::new("C1");

        let profile = manager.load_or_create(&customer).await.unwrap();
        assert_eq!(profile.category, RiskCategory::Unknown);
        assert_eq!(profile.current_score, 0.0);
        assert_eq!(profile.version, 0);

        let again = manager.load_or_create(&customer).await.unwrap();
        assert_eq!(again.id, profile.id);
    }

    #[tokio::test]
    async fn test_persist_result_updates_profile_and_logs() {
        let (manager, _) = manager();
        let customer = CustomerId::new("C1");
        let profile = manager.load_or_create(&customer).await.unwrap();

        let score = score_for(&profile, 412.5, RiskCategory::Medium);
        let updated = manager
            .persist_result(&profile, &score, &[factor_for(&score)])
            .await
            .unwrap();

        assert_eq!(updated.current_score, 412.5);
        assert_eq!(updated.category, RiskCategory::Medium);
        assert_eq!(updated.latest_score_id, Some(score.id));
        assert_eq!(updated.assessment_count, 1);
        assert_eq!(updated.version, 1);

        assert_eq!(manager.score_history(&customer).await.unwrap(), vec![score]);
        assert_eq!(manager.factor_history(&customer).await.unwrap().len(), 1);
        assert_eq!(manager.prior_factor_count(&updated).await.unwrap(), 1);
        assert_eq!(manager.profile(&customer).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_stale_profile_is_rejected() {
        let (manager, _) = manager();
        let profile = manager.load_or_create(&CustomerId::new("C1")).await.unwrap();

        let first = score_for(&profile, 100.0, RiskCategory::Low);
        manager.persist_result(&profile, &first, &[]).await.unwrap();

        // Same stale snapshot written twice
        let second = score_for(&profile, 900.0, RiskCategory::Critical);
        let err = manager
            .persist_result(&profile, &second, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { .. }));

        // Only the first result is on record
        let history = manager.score_history(&CustomerId::new("C1")).await.unwrap();
        assert_eq!(history, vec![first]);
    }

    #[tokio::test]
    async fn test_rejected_persist_leaves_factor_count() {
        let (manager, store) = manager();
        let customer = CustomerId::new("C1");
        let profile = manager.load_or_create(&customer).await.unwrap();
        store.save_profile(&profile, 0).await.unwrap();

        let score = score_for(&profile, 640.0, RiskCategory::High);
        assert!(manager
            .persist_result(&profile, &score, &[factor_for(&score), factor_for(&score)])
            .await
            .is_err());

        assert_eq!(manager.prior_factor_count(&profile).await.unwrap(), 0);
        assert!(manager.factor_history(&customer).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_of_unknown_customer_is_empty() {
        let (manager, _) = manager();
        let ghost = CustomerId::new("ghost");
        assert!(manager.score_history(&ghost).await.unwrap().is_empty());
        assert!(manager.factor_history(&ghost).await.unwrap().is_empty());
        assert_eq!(manager.profile(&ghost).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_customer_lock_is_exclusive() {
        let (manager, _) = manager();
        let manager = Arc::new(manager);
        let customer = CustomerId::new("C1");

        let guard = manager.lock_customer(&customer).await;

        let waiter = {
            let manager = Arc::clone(&manager);
            let customer = customer.clone();
            tokio::spawn(async move {
                let _guard = manager.lock_customer(&customer).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_other_customers_are_not_blocked() {
        let (manager, _) = manager();
        let _a = manager.lock_customer(&CustomerId::new("A")).await;
        let _b = tokio::time::timeout(
            Duration::from_millis(100),
            manager.lock_customer(&CustomerId::new("B")),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_idle_locks_are_pruned() {
        let (manager, _) = manager();
        for i in 0..10 {
            let _guard = manager.lock_customer(&CustomerId::new(format!("C{i}"))).await;
        }
        // Only the most recently inserted entry can survive pruning
        assert_eq!(manager.tracked_customers(), 1);
    }
}
