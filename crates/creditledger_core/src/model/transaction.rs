//! Credit transaction domain model.
//!
//! # Responsibility
//! - Define the persisted transaction record and its insert request shape.
//! - Enforce the non-empty-operator invariant on write paths.
//!
//! # Invariants
//! - `id` is assigned by storage, is unique, and is never reused.
//! - A persisted row always carries all four fields.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier assigned by storage on insert.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TransactionId = i64;

/// One recorded credit purchase, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Storage-assigned primary key, monotonic per database.
    pub id: TransactionId,
    /// In-game character the purchase was made for. Never empty.
    pub operator: String,
    /// Free-text description of the purchased item.
    pub item: String,
    /// Credits spent. Negative values are accepted and summed as-is.
    pub amount: i64,
}

/// Insert request for a transaction; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub operator: String,
    pub item: String,
    pub amount: i64,
}

impl NewTransaction {
    pub fn new(operator: impl Into<String>, item: impl Into<String>, amount: i64) -> Self {
        Self {
            operator: operator.into(),
            item: item.into(),
            amount,
        }
    }

    /// Checks the insert request against model invariants.
    ///
    /// Only the operator is constrained; item text and amount are free-form
    /// per the data model.
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.operator.is_empty() {
            return Err(TransactionValidationError::EmptyOperator);
        }
        Ok(())
    }
}

/// Violation of a transaction model invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionValidationError {
    EmptyOperator,
}

impl Display for TransactionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyOperator => write!(f, "operator name must not be empty"),
        }
    }
}

impl Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::{NewTransaction, Transaction, TransactionValidationError};

    #[test]
    fn validate_accepts_populated_operator() {
        let request = NewTransaction::new("Ash", "skin", 500);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_operator() {
        let request = NewTransaction::new("", "skin", 500);
        assert_eq!(
            request.validate().unwrap_err(),
            TransactionValidationError::EmptyOperator
        );
    }

    #[test]
    fn transaction_serializes_with_stable_field_names() {
        let transaction = Transaction {
            id: 7,
            operator: "Thermite".to_string(),
            item: "charm".to_string(),
            amount: 300,
        };

        let json = serde_json::to_value(&transaction).expect("transaction should serialize");
        assert_eq!(json["id"], 7);
        assert_eq!(json["operator"], "Thermite");
        assert_eq!(json["item"], "charm");
        assert_eq!(json["amount"], 300);
    }
}
