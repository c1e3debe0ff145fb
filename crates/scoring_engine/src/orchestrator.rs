//! Assessment orchestration.
//!
//! ```text
//! validate ──▶ ┌───────────────── deadline ─────────────────┐
//!              │ lock ─▶ load/create ─▶ prior factors       │
//!              │   ├─▶ analyzers (blocking pool) ─┐         │
//!              │   └─▶ fraud detector ────────────┴▶ join   │
//!              │ aggregate ─▶ categorise ─▶ recommend       │
//!              │ persist score, factors, profile (CAS)      │
//!              └────────────────────────────────────────────┘
//!                            ─▶ notify (detached) ─▶ respond
//! ```

use crate::config::{ConfigError, EngineConfig};
use crate::error::AssessmentError;
use crate::fraud::{FraudCheckRequest, FraudDetector, FraudSignalAdapter};
use crate::notifier::{
    AssessmentCompletedEvent, EventNotifier, EventPublisher, NotifierStatistics,
};
use crate::profile::ProfileManager;
use crate::store::{RiskStore, StoreError};
use chrono::Utc;
use scoring_core::analysis::{analyze_evidence, EvidenceBundle};
use scoring_core::scoring::{categorize, estimate_confidence, recommend, ScoreAggregator};
use scoring_core::types::{
    AssessmentId, AssessmentRequest, AssessmentResponse, RiskFactor, RiskProfile, RiskScore,
    ScoreId,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Real-time risk assessment engine.
///
/// Cheap to share behind an `Arc`; every collaborator is a long-lived handle.
pub struct RiskAssessmentEngine {
    config: EngineConfig,
    aggregator: ScoreAggregator,
    profiles: ProfileManager,
    fraud: FraudSignalAdapter,
    notifier: EventNotifier,
}

/// Outcome of the deadline-bounded part of an assessment.
struct Completed {
    response: AssessmentResponse,
    profile: RiskProfile,
}

impl RiskAssessmentEngine {
    /// Create an engine from its collaborators.
    ///
    /// Validates the configuration and spawns the notifier's drain task, so
    /// it must be called from within a Tokio runtime.
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn RiskStore>,
        detector: Arc<dyn FraudDetector>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let notifier = EventNotifier::new(publisher, config.event_topic.clone());
        Ok(Self {
            aggregator: ScoreAggregator::new(config.weights),
            profiles: ProfileManager::new(store),
            fraud: FraudSignalAdapter::new(detector),
            notifier,
            config,
        })
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Profile reads
    pub fn profiles(&self) -> &ProfileManager {
        &self.profiles
    }

    /// Notification statistics
    pub fn notifier_statistics(&self) -> NotifierStatistics {
        self.notifier.statistics()
    }

    /// Runs one assessment.
    ///
    /// Validation failures are returned before any collaborator is touched.
    /// Load through persistence is bounded by the configured deadline; the
    /// completion event is published afterwards and never fails the call.
    pub async fn assess(
        &self,
        request: AssessmentRequest,
    ) -> Result<AssessmentResponse, AssessmentError> {
        let assessment_id = AssessmentId::generate();
        let customer_id = request.customer_id.clone();
        let started = Instant::now();

        if let Err(source) = request.validate() {
            debug!(
                assessment_id = %assessment_id,
                customer_id = %customer_id,
                error = %source,
                "Rejected assessment request"
            );
            return Err(AssessmentError::Validation {
                assessment_id,
                customer_id,
                source,
            });
        }

        let bounded = tokio::time::timeout(
            self.config.deadline(),
            self.run(assessment_id, Arc::new(request)),
        )
        .await;

        let completed = match bounded {
            Ok(Ok(completed)) => completed,
            Ok(Err(err)) => {
                error!(
                    assessment_id = %assessment_id,
                    customer_id = %customer_id,
                    kind = %err.kind(),
                    error = %err,
                    "Assessment aborted"
                );
                return Err(err);
            }
            Err(_) => {
                let err = AssessmentError::DeadlineExceeded {
                    assessment_id,
                    customer_id,
                    deadline_ms: self.config.deadline_ms,
                };
                error!(
                    assessment_id = %assessment_id,
                    customer_id = %err.customer_id(),
                    deadline_ms = self.config.deadline_ms,
                    "Assessment deadline exceeded"
                );
                return Err(err);
            }
        };

        let Completed { response, profile } = completed;
        self.notifier.notify(AssessmentCompletedEvent {
            assessment_id,
            customer_id: response.customer_id.clone(),
            profile_id: profile.id,
            score: response.score,
            category: response.category,
            confidence: response.confidence,
            assessed_at: response.assessed_at,
        });

        info!(
            assessment_id = %assessment_id,
            customer_id = %response.customer_id,
            score = response.score,
            category = %response.category,
            confidence = response.confidence,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Assessment completed"
        );

        Ok(response)
    }

    async fn run(
        &self,
        assessment_id: AssessmentId,
        request: Arc<AssessmentRequest>,
    ) -> Result<Completed, AssessmentError> {
        let customer_id = &request.customer_id;
        let persistence = |source: StoreError| AssessmentError::Persistence {
            assessment_id,
            customer_id: customer_id.clone(),
            source,
        };

        let _guard = self.profiles.lock_customer(customer_id).await;
        let profile = self
            .profiles
            .load_or_create(customer_id)
            .await
            .map_err(persistence)?;
        let prior_factors = self
            .profiles
            .prior_factor_count(&profile)
            .await
            .map_err(persistence)?;

        let fraud_request = FraudCheckRequest::from_assessment(assessment_id, &request);
        let analysis_task = {
            let request = Arc::clone(&request);
            tokio::task::spawn_blocking(move || {
                analyze_evidence(&EvidenceBundle::from_request(&request))
            })
        };
        let (analysis, fraud) = tokio::join!(analysis_task, self.fraud.evaluate(&fraud_request));

        let analysis = analysis.map_err(|e| AssessmentError::Internal {
            assessment_id,
            customer_id: customer_id.clone(),
            message: format!("evidence analysis task failed: {e}"),
        })?;
        let signal = fraud.map_err(|source| AssessmentError::Collaborator {
            assessment_id,
            customer_id: customer_id.clone(),
            source,
        })?;

        let comprehensive = self.aggregator.aggregate(signal.native_score, &analysis);
        let category = categorize(comprehensive.value);
        let confidence = estimate_confidence(
            analysis.transaction_count,
            analysis.market_present(),
            analysis.external_present(),
            prior_factors,
        );
        let recommendations = recommend(comprehensive.value, signal.native_score, confidence);

        debug!(
            assessment_id = %assessment_id,
            fraud = comprehensive.breakdown.fraud,
            behavioral = comprehensive.breakdown.behavioral,
            market = ?comprehensive.breakdown.market,
            external = ?comprehensive.breakdown.external,
            detector = self.fraud.detector_name(),
            "Sub-scores aggregated"
        );

        let assessed_at = Utc::now();
        let score = RiskScore {
            id: ScoreId::generate(),
            profile_id: profile.id,
            assessment_id,
            score: comprehensive.value,
            category,
            assessed_at,
        };

        let weights = self.aggregator.weights();
        let fraud_factor = self
            .aggregator
            .fraud_factor(signal.native_score, signal.risk_level.as_deref());
        let mut identified = vec![fraud_factor];
        identified.extend(analysis.into_factors());
        let factors: Vec<RiskFactor> = identified
            .into_iter()
            .map(|factor| {
                let weight = weights.weight_for(factor.source);
                factor.into_record(profile.id, assessment_id, weight, assessed_at)
            })
            .collect();

        let profile = self
            .profiles
            .persist_result(&profile, &score, &factors)
            .await
            .map_err(persistence)?;

        Ok(Completed {
            response: AssessmentResponse {
                assessment_id,
                customer_id: customer_id.clone(),
                score: comprehensive.value,
                category,
                confidence,
                recommendations,
                breakdown: comprehensive.breakdown,
                fraud_risk_level: signal.risk_level,
                assessed_at,
            },
            profile,
        })
    }
}
