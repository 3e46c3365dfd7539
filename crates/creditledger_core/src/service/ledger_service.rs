//! Ledger use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for every ledger operation.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::transaction::{NewTransaction, Transaction, TransactionId};
use crate::repo::credit_repo::{CreditRepository, RepoResult};

/// Use-case service wrapper for ledger operations.
///
/// CSV import feeds the same `add_transaction` path as interactive entry, so
/// both routes share one persistence contract.
pub struct LedgerService<R: CreditRepository> {
    repo: R,
}

impl<R: CreditRepository> LedgerService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records one credit purchase and returns its assigned id.
    pub fn add_transaction(&self, request: &NewTransaction) -> RepoResult<TransactionId> {
        self.repo.add_transaction(request)
    }

    /// Lists every recorded transaction in insertion order.
    pub fn list_transactions(&self) -> RepoResult<Vec<Transaction>> {
        self.repo.list_transactions()
    }

    /// Lists the transactions recorded for one operator, exact match.
    pub fn transactions_by_operator(&self, operator: &str) -> RepoResult<Vec<Transaction>> {
        self.repo.transactions_by_operator(operator)
    }

    /// Returns the operator's single largest purchase, if any.
    pub fn highest_spend(&self, operator: &str) -> RepoResult<Option<Transaction>> {
        self.repo.highest_spend(operator)
    }

    /// Returns the sum of credits spent across all transactions.
    pub fn total_credits(&self) -> RepoResult<i64> {
        self.repo.total_credits()
    }

    /// Deletes every transaction for the named operator; returns the count.
    pub fn delete_by_operator(&self, operator: &str) -> RepoResult<usize> {
        self.repo.delete_by_operator(operator)
    }

    /// Deletes one transaction by id. Returns `false` when the id is absent.
    pub fn delete_by_id(&self, id: TransactionId) -> RepoResult<bool> {
        self.repo.delete_by_id(id)
    }

    /// Deletes all transactions unconditionally; returns the count.
    pub fn clear_all(&self) -> RepoResult<usize> {
        self.repo.clear_all()
    }
}
