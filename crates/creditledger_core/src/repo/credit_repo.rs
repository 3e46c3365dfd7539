//! Credit transaction repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and aggregate APIs over the `credits` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `NewTransaction::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Zero-match deletes are not errors; callers get a count instead.

use crate::db::DbError;
use crate::model::transaction::{
    NewTransaction, Transaction, TransactionId, TransactionValidationError,
};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CREDIT_SELECT_SQL: &str = "SELECT
    id,
    operator,
    item,
    amount
FROM credits";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for transaction persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TransactionValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted transaction data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<TransactionValidationError> for RepoError {
    fn from(value: TransactionValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for credit transaction operations.
pub trait CreditRepository {
    fn add_transaction(&self, request: &NewTransaction) -> RepoResult<TransactionId>;
    fn list_transactions(&self) -> RepoResult<Vec<Transaction>>;
    fn transactions_by_operator(&self, operator: &str) -> RepoResult<Vec<Transaction>>;
    fn highest_spend(&self, operator: &str) -> RepoResult<Option<Transaction>>;
    fn total_credits(&self) -> RepoResult<i64>;
    fn delete_by_operator(&self, operator: &str) -> RepoResult<usize>;
    fn delete_by_id(&self, id: TransactionId) -> RepoResult<bool>;
    fn clear_all(&self) -> RepoResult<usize>;
}

/// SQLite-backed credit transaction repository.
///
/// Borrows the connection owned by the caller; the repository itself holds
/// no global state.
pub struct SqliteCreditRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCreditRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CreditRepository for SqliteCreditRepository<'_> {
    fn add_transaction(&self, request: &NewTransaction) -> RepoResult<TransactionId> {
        request.validate()?;

        self.conn.execute(
            "INSERT INTO credits (operator, item, amount) VALUES (?1, ?2, ?3);",
            params![
                request.operator.as_str(),
                request.item.as_str(),
                request.amount
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list_transactions(&self) -> RepoResult<Vec<Transaction>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CREDIT_SELECT_SQL} ORDER BY id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut transactions = Vec::new();
        while let Some(row) = rows.next()? {
            transactions.push(parse_credit_row(row)?);
        }

        Ok(transactions)
    }

    fn transactions_by_operator(&self, operator: &str) -> RepoResult<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CREDIT_SELECT_SQL}
             WHERE operator = ?1
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query(params![operator])?;
        let mut transactions = Vec::new();
        while let Some(row) = rows.next()? {
            transactions.push(parse_credit_row(row)?);
        }

        Ok(transactions)
    }

    fn highest_spend(&self, operator: &str) -> RepoResult<Option<Transaction>> {
        // Ties on amount resolve to the lowest id so repeated calls agree.
        let mut stmt = self.conn.prepare(&format!(
            "{CREDIT_SELECT_SQL}
             WHERE operator = ?1
             ORDER BY amount DESC, id ASC
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query(params![operator])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_credit_row(row)?));
        }

        Ok(None)
    }

    fn total_credits(&self) -> RepoResult<i64> {
        let total = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM credits;",
            [],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(total)
    }

    fn delete_by_operator(&self, operator: &str) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM credits WHERE operator = ?1;", params![operator])?;
        Ok(changed)
    }

    fn delete_by_id(&self, id: TransactionId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM credits WHERE id = ?1;", params![id])?;
        Ok(changed > 0)
    }

    fn clear_all(&self) -> RepoResult<usize> {
        let changed = self.conn.execute("DELETE FROM credits;", [])?;
        Ok(changed)
    }
}

fn parse_credit_row(row: &Row<'_>) -> RepoResult<Transaction> {
    let transaction = Transaction {
        id: row.get("id")?,
        operator: row.get("operator")?,
        item: row.get("item")?,
        amount: row.get("amount")?,
    };

    if transaction.operator.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty operator in credits row id={}",
            transaction.id
        )));
    }

    Ok(transaction)
}
