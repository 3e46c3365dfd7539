//! Interactive credit ledger entry point.
//!
//! # Responsibility
//! - Resolve database and log locations, honoring env overrides.
//! - Bootstrap logging and storage, then hand control to the session loop.
//!
//! # Invariants
//! - The connection is opened once here and borrowed by the repository for
//!   the process lifetime.
//! - A failed logging bootstrap degrades to an unlogged session; a failed
//!   database open is fatal.

mod output;
mod session;

use creditledger_core::db::open_db;
use creditledger_core::{default_log_level, init_logging, LedgerService, SqliteCreditRepository};
use session::Session;
use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

const DB_PATH_ENV: &str = "CREDITLEDGER_DB";
const LOG_DIR_ENV: &str = "CREDITLEDGER_LOG_DIR";
const DEFAULT_DB_FILE: &str = "credits.db";

fn main() -> ExitCode {
    if let Err(message) = bootstrap_logging() {
        eprintln!("Warning: file logging disabled: {message}");
    }

    let db_path = database_path();
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!(
                "Failed to open credit database {}: {err}",
                db_path.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let service = LedgerService::new(SqliteCreditRepository::new(&conn));
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(service, stdin.lock(), stdout.lock());

    match session.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Session I/O failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn database_path() -> PathBuf {
    env::var_os(DB_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}

fn bootstrap_logging() -> Result<(), String> {
    let log_dir = match env::var_os(LOG_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => env::current_dir()
            .map_err(|err| format!("cannot resolve working directory: {err}"))?
            .join(".creditledger")
            .join("logs"),
    };
    init_logging(default_log_level(), &log_dir)
}
