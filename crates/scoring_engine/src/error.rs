//! Assessment error types.

use crate::fraud::FraudError;
use crate::store::StoreError;
use scoring_core::types::{AssessmentId, CustomerId, ValidationError};
use std::fmt;
use thiserror::Error;

/// Coarse classification of an [`AssessmentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request was malformed
    Validation,
    /// The fraud detector failed
    Collaborator,
    /// The store failed
    Persistence,
    /// The assessment ran past its deadline
    DeadlineExceeded,
    /// An analyzer task failed
    Internal,
}

impl ErrorKind {
    /// Stable snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Collaborator => "collaborator",
            Self::Persistence => "persistence",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single assessment.
///
/// Every variant carries the assessment and customer identifiers so a
/// failure can be correlated with the logs.
#[derive(Debug, Error)]
pub enum AssessmentError {
    /// The request was rejected before any component ran.
    ///
    /// Displays as the validation message alone.
    #[error("{source}")]
    Validation {
        /// Assessment identifier
        assessment_id: AssessmentId,
        /// Customer identifier
        customer_id: CustomerId,
        /// Validation failure
        #[source]
        source: ValidationError,
    },

    /// The fraud detector failed or returned an unusable score.
    #[error("Assessment {assessment_id} for customer '{customer_id}' failed: {source}")]
    Collaborator {
        /// Assessment identifier
        assessment_id: AssessmentId,
        /// Customer identifier
        customer_id: CustomerId,
        /// Fraud detector failure
        #[source]
        source: FraudError,
    },

    /// Loading or persisting the profile failed.
    #[error("Assessment {assessment_id} for customer '{customer_id}' could not be persisted: {source}")]
    Persistence {
        /// Assessment identifier
        assessment_id: AssessmentId,
        /// Customer identifier
        customer_id: CustomerId,
        /// Store failure
        #[source]
        source: StoreError,
    },

    /// The assessment did not complete within its deadline.
    #[error("Assessment {assessment_id} for customer '{customer_id}' exceeded its {deadline_ms} ms deadline")]
    DeadlineExceeded {
        /// Assessment identifier
        assessment_id: AssessmentId,
        /// Customer identifier
        customer_id: CustomerId,
        /// Configured deadline
        deadline_ms: u64,
    },

    /// An analyzer task panicked or was cancelled.
    #[error("Assessment {assessment_id} for customer '{customer_id}' failed internally: {message}")]
    Internal {
        /// Assessment identifier
        assessment_id: AssessmentId,
        /// Customer identifier
        customer_id: CustomerId,
        /// Failure description
        message: String,
    },
}

impl AssessmentError {
    /// Error classification
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Collaborator { .. } => ErrorKind::Collaborator,
            Self::Persistence { .. } => ErrorKind::Persistence,
            Self::DeadlineExceeded { .. } => ErrorKind::DeadlineExceeded,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Whether the caller is at fault
    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Assessment identifier
    pub fn assessment_id(&self) -> AssessmentId {
        match self {
            Self::Validation { assessment_id, .. }
            | Self::Collaborator { assessment_id, .. }
            | Self::Persistence { assessment_id, .. }
            | Self::DeadlineExceeded { assessment_id, .. }
            | Self::Internal { assessment_id, .. } => *assessment_id,
        }
    }

    /// Customer identifier
    pub fn customer_id(&self) -> &CustomerId {
        match self {
            Self::Validation { customer_id, .. }
            | Self::Collaborator { customer_id, .. }
            | Self::Persistence { customer_id, .. }
            | Self::DeadlineExceeded { customer_id, .. }
            | Self::Internal { customer_id, .. } => customer_id,
        }
    }
}
