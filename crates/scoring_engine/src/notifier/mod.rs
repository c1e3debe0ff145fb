//! Best-effort notification of completed assessments.
//!
//! [`EventNotifier::notify`] spawns a detached task per event and returns at
//! once. Publish failures are sent over a channel to a single drain task that
//! logs them; they never reach the caller.

mod bus;

pub use bus::{InMemoryEventBus, PublishedEvent};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scoring_core::types::{AssessmentId, CustomerId, ProfileId, RiskCategory};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Errors raised by an [`EventPublisher`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PublishError {
    /// The event could not be encoded.
    #[error("Failed to encode event: {0}")]
    Encode(String),

    /// The bus rejected or could not accept the event.
    #[error("Event bus unavailable: {0}")]
    Unavailable(String),
}

/// Event emitted after an assessment is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentCompletedEvent {
    /// Assessment identifier
    pub assessment_id: AssessmentId,
    /// Customer identifier
    pub customer_id: CustomerId,
    /// Profile identifier
    pub profile_id: ProfileId,
    /// Comprehensive score
    pub score: f64,
    /// Score category
    pub category: RiskCategory,
    /// Confidence level
    pub confidence: u8,
    /// Assessment timestamp
    pub assessed_at: DateTime<Utc>,
}

/// Asynchronous event bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes an event under a topic and partition key.
    async fn publish(
        &self,
        topic: &str,
        key: &str,
        event: &AssessmentCompletedEvent,
    ) -> Result<(), PublishError>;
}

/// A publish attempt that failed.
#[derive(Debug, Clone)]
struct NotificationFailure {
    assessment_id: AssessmentId,
    customer_id: CustomerId,
    error: PublishError,
}

#[derive(Debug, Default)]
struct Counters {
    dispatched: AtomicUsize,
    published: AtomicUsize,
    failed: AtomicUsize,
}

/// Notifier statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifierStatistics {
    /// Events handed to the notifier
    pub dispatched: usize,
    /// Events accepted by the bus
    pub published: usize,
    /// Events the bus rejected
    pub failed: usize,
}

/// Fire-and-forget event notifier.
#[derive(Clone)]
pub struct EventNotifier {
    publisher: Arc<dyn EventPublisher>,
    topic: Arc<str>,
    failures: mpsc::UnboundedSender<NotificationFailure>,
    counters: Arc<Counters>,
}

impl EventNotifier {
    /// Create a notifier and spawn its failure drain.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(publisher: Arc<dyn EventPublisher>, topic: impl Into<String>) -> Self {
        let topic: String = topic.into();
        let (tx, mut rx) = mpsc::unbounded_channel::<NotificationFailure>();

        tokio::spawn(async move {
            while let Some(failure) = rx.recv().await {
                warn!(
                    assessment_id = %failure.assessment_id,
                    customer_id = %failure.customer_id,
                    error = %failure.error,
                    "Assessment notification failed"
                );
            }
        });

        Self {
            publisher,
            topic: Arc::from(topic),
            failures: tx,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Topic events are published on
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Publishes an event on a detached task.
    ///
    /// The returned handle may be dropped; awaiting it only observes that the
    /// attempt finished.
    pub fn notify(&self, event: AssessmentCompletedEvent) -> JoinHandle<()> {
        self.counters.dispatched.fetch_add(1, Ordering::SeqCst);

        let publisher = Arc::clone(&self.publisher);
        let topic = Arc::clone(&self.topic);
        let failures = self.failures.clone();
        let counters = Arc::clone(&self.counters);

        tokio::spawn(async move {
            let key = event.customer_id.to_string();
            match publisher.publish(&topic, &key, &event).await {
                Ok(()) => {
                    counters.published.fetch_add(1, Ordering::SeqCst);
                    debug!(
                        assessment_id = %event.assessment_id,
                        topic = %topic,
                        "Assessment event published"
                    );
                }
                Err(error) => {
                    counters.failed.fetch_add(1, Ordering::SeqCst);
                    // Closed only at runtime shutdown
                    let _ = failures.send(NotificationFailure {
                        assessment_id: event.assessment_id,
                        customer_id: event.customer_id,
                        error,
                    });
                }
            }
        })
    }

    /// Get statistics
    pub fn statistics(&self) -> NotifierStatistics {
        NotifierStatistics {
            dispatched: self.counters.dispatched.load(Ordering::SeqCst),
            published: self.counters.published.load(Ordering::SeqCst),
            failed: self.counters.failed.load(Ordering::SeqCst),
        }
    }
}
