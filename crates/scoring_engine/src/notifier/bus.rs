//! In-process event bus.

use super::{AssessmentCompletedEvent, EventPublisher, PublishError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;
use tracing::info;

const DEFAULT_CAPACITY: usize = 1024;

/// An event as delivered to bus subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedEvent {
    /// Topic the event was published on
    pub topic: String,
    /// Partition key
    pub key: String,
    /// Event payload
    pub event: AssessmentCompletedEvent,
}

/// Broadcast-based [`EventPublisher`].
///
/// Events published with no subscriber are dropped.
pub struct InMemoryEventBus {
    tx: broadcast::Sender<PublishedEvent>,
    message_count: AtomicUsize,
}

impl InMemoryEventBus {
    /// Create a bus with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a bus whose subscribers may lag by up to `capacity` events
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            message_count: AtomicUsize::new(0),
        }
    }

    /// Subscribe to receive events
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        let rx = self.tx.subscribe();
        info!(subscribers = self.tx.receiver_count(), "New event bus subscription");
        rx
    }

    /// Get subscriber count
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get message count
    pub fn message_count(&self) -> usize {
        self.message_count.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(
        &self,
        topic: &str,
        key: &str,
        event: &AssessmentCompletedEvent,
    ) -> Result<(), PublishError> {
        self.message_count.fetch_add(1, Ordering::SeqCst);

        // Ignore send errors (no subscribers)
        let _ = self.tx.send(PublishedEvent {
            topic: topic.to_string(),
            key: key.to_string(),
            event: event.clone(),
        });
        Ok(())
    }
}
