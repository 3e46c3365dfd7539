//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the ledger.
//! - Isolate SQLite query details from service/session orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `NewTransaction::validate()` before
//!   persistence.
//! - User-supplied values reach SQL exclusively through bound parameters.

pub mod credit_repo;
