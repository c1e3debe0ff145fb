//! # scoring_core: Foundation for Real-Time Risk Scoring
//!
//! ## Layer 1 (Foundation) Role
//!
//! scoring_core is the bottom layer of the risk scoring workspace. Everything in
//! this crate is pure, synchronous computation with no I/O and no shared state:
//! - Identifiers and the durable data model: `RiskProfile`, `RiskScore`, `RiskFactor` (`types`)
//! - Assessment request/response contracts and request validation (`types::assessment`)
//! - Evidence analyzers for transactions, market conditions and external signals (`analysis`)
//! - Weighting, aggregation, confidence, categorisation and recommendations (`scoring`)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              scoring_engine (L2)              │
//! │  profile manager, fraud adapter, notifier,   │
//! │  orchestrator                                │
//! └──────────────────────────────────────────────┘
//!          ↓
//! ┌──────────────────────────────────────────────┐
//! │              scoring_core (L1)                │
//! ├──────────────────────────────────────────────┤
//! │  types/     - ids, records, contracts        │
//! │  analysis/  - behavioral, market, external   │
//! │  scoring/   - weights, aggregator,           │
//! │               confidence, categoriser,       │
//! │               recommender                    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage Examples
//!
//! ```rust
//! use scoring_core::analysis::{analyze_evidence, EvidenceBundle};
//! use scoring_core::scoring::{categorize, ScoreAggregator, ScoringWeights};
//! use scoring_core::types::{RiskCategory, Transaction};
//!
//! let transactions = vec![Transaction::new(1200.0), Transaction::new(800.0)];
//! let evidence = EvidenceBundle::new(&transactions, None, None);
//! let analysis = analyze_evidence(&evidence);
//!
//! let aggregator = ScoreAggregator::new(ScoringWeights::default());
//! let score = aggregator.aggregate(300.0, &analysis);
//!
//! assert!((0.0..=1000.0).contains(&score.value));
//! assert_ne!(categorize(score.value), RiskCategory::Unknown);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analysis;
pub mod scoring;
pub mod types;
