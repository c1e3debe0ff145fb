//! Request validation errors.

use thiserror::Error;

/// Reasons an assessment request is rejected before any component runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Customer identifier is empty or whitespace.
    #[error("Customer identifier must not be empty")]
    EmptyCustomerId,

    /// A transaction amount is NaN or infinite.
    #[error("Transaction {index} has a non-finite amount: {value}")]
    NonFiniteAmount {
        /// Position in the transaction history
        index: usize,
        /// Offending value
        value: f64,
    },

    /// A market or external indicator is NaN or infinite.
    #[error("Indicator '{field}' is not finite: {value}")]
    NonFiniteIndicator {
        /// Indicator key
        field: &'static str,
        /// Offending value
        value: f64,
    },
}
