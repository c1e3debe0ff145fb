//! Identifiers, durable records and request/response contracts.
//!
//! This module provides:
//! - `ids`: Strongly-typed identifiers for customers, profiles, assessments and scores
//! - `transaction`: Transaction evidence items
//! - `evidence`: Optional market-condition and external-factor maps
//! - `records`: `RiskProfile`, `RiskScore`, `RiskFactor` and `RiskCategory`
//! - `assessment`: `AssessmentRequest` / `AssessmentResponse` and request validation
//! - `error`: Structured validation errors
//!
//! # Re-exports
//!
//! The commonly used types are re-exported at this module level.

pub mod assessment;
pub mod error;
pub mod evidence;
pub mod ids;
pub mod records;
pub mod transaction;

pub use assessment::{AssessmentRequest, AssessmentResponse, ScoreBreakdown};
pub use error::ValidationError;
pub use evidence::{ExternalFactors, MarketConditions};
pub use ids::{AssessmentId, CustomerId, ProfileId, ScoreId};
pub use records::{DataSource, RiskCategory, RiskFactor, RiskProfile, RiskScore};
pub use transaction::Transaction;
