//! Core domain logic for the credit ledger.
//! This crate is the single source of truth for persistence invariants.

pub mod csv_io;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use csv_io::{export_transactions, import_transactions, CsvError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::transaction::{
    NewTransaction, Transaction, TransactionId, TransactionValidationError,
};
pub use repo::credit_repo::{
    CreditRepository, RepoError, RepoResult, SqliteCreditRepository,
};
pub use service::ledger_service::LedgerService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
