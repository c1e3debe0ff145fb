//! # scoring_engine: Real-Time Assessment Orchestration
//!
//! ## Layer 2 (Engine) Role
//!
//! scoring_engine sequences the pure computations of `scoring_core` around the
//! external collaborators of a live assessment:
//! - Persistence of profiles, scores and factors (`store`)
//! - The black-box fraud scorer and its signal normalisation (`fraud`)
//! - Best-effort completion events (`notifier`)
//! - Profile lifecycle and per-customer serialisation (`profile`)
//! - The deadline-bounded assessment pipeline (`orchestrator`)
//!
//! ## Usage Examples
//!
//! ```rust
//! use scoring_engine::{
//!     EngineConfig, FixedFraudDetector, InMemoryEventBus, InMemoryRiskStore,
//!     RiskAssessmentEngine,
//! };
//! use scoring_core::types::{AssessmentRequest, RiskCategory};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let engine = RiskAssessmentEngine::new(
//!     EngineConfig::default(),
//!     Arc::new(InMemoryRiskStore::new()),
//!     Arc::new(FixedFraudDetector::new(300.0)),
//!     Arc::new(InMemoryEventBus::new()),
//! )
//! .unwrap();
//!
//! let response = engine.assess(AssessmentRequest::new("CUST-001")).await.unwrap();
//! assert_eq!(response.score, 385.71);
//! assert_eq!(response.category, RiskCategory::Medium);
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod fraud;
pub mod notifier;
pub mod orchestrator;
pub mod profile;
pub mod store;

pub use config::{ConfigError, EngineConfig};
pub use error::{AssessmentError, ErrorKind};
pub use fraud::{
    FixedFraudDetector, FraudCheckRequest, FraudCheckResponse, FraudDetector, FraudError,
    FraudSignal, FraudSignalAdapter, HttpFraudDetector,
};
pub use notifier::{
    AssessmentCompletedEvent, EventNotifier, EventPublisher, InMemoryEventBus,
    NotifierStatistics, PublishError, PublishedEvent,
};
pub use orchestrator::RiskAssessmentEngine;
pub use profile::ProfileManager;
pub use store::{InMemoryRiskStore, RiskStore, StoreError, StoreStatistics};
