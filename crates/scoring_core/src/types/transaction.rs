//! Transaction evidence items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a customer's transaction history.
///
/// Only `amount` and `category` take part in scoring. The identifier and
/// timestamp are carried through for the fraud collaborator.
///
/// # Examples
///
/// ```
/// use scoring_core::types::Transaction;
///
/// let tx = Transaction::new(-250.0).with_category("groceries");
/// assert_eq!(tx.abs_amount(), 250.0);
/// assert_eq!(tx.category.as_deref(), Some("groceries"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Signed amount in currency units
    pub amount: f64,
    /// Optional category tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Optional caller-side transaction identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Optional booking time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Creates an uncategorised transaction.
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            category: None,
            transaction_id: None,
            occurred_at: None,
        }
    }

    /// Sets the category tag.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Absolute amount used by the behavioral statistics.
    #[inline]
    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }
}
