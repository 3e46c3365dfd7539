//! Interactive menu session over the ledger service.
//!
//! # Responsibility
//! - Read menu selections and field input, dispatching to ledger operations.
//! - Keep malformed numeric input inside local re-prompt loops.
//!
//! # Invariants
//! - Storage and CSV failures are reported and the loop continues; only the
//!   exit selection (or end of input) ends the session.
//! - Log lines carry operation metadata, never user-entered text.

use crate::output;
use chrono::Local;
use creditledger_core::csv_io::{self, CsvError};
use creditledger_core::{CreditRepository, LedgerService, NewTransaction, RepoError};
use log::{error, info};
use std::io::{self, BufRead, Write};
use std::path::Path;

const MENU_PROMPT: &str = "
Please select one of the following options:

1. Add a new credit transaction. ➕
2. See all credit transactions. 📜
3. Find transactions by operator name. 🔍
4. See an operator's highest credit spend. 💵
5. See total credits spent. 💰
6. Delete transactions by name or ID. 👌
7. Export transactions to CSV. 📧
8. Import transactions from CSV. 📥
9. Clear all transactions. 🗑️
10. EXIT. ❌

Please enter the number of your selection: ";

const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One interactive ledger session bound to an input/output pair.
///
/// Generic over reader/writer so scripted sessions run in-process in tests.
pub struct Session<Repo, In, Out>
where
    Repo: CreditRepository,
    In: BufRead,
    Out: Write,
{
    service: LedgerService<Repo>,
    input: In,
    output: Out,
}

impl<Repo, In, Out> Session<Repo, In, Out>
where
    Repo: CreditRepository,
    In: BufRead,
    Out: Write,
{
    pub fn new(service: LedgerService<Repo>, input: In, output: Out) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Runs the menu loop until the exit selection or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        info!("event=session_start module=cli status=ok");

        loop {
            let Some(selection) = self.prompt(MENU_PROMPT)? else {
                break;
            };

            match selection.trim() {
                "1" => self.add_transaction()?,
                "2" => self.view_all_transactions()?,
                "3" => self.find_transactions_by_operator()?,
                "4" => self.highest_credit_spend()?,
                "5" => self.total_credits_spent()?,
                "6" => self.delete_transactions()?,
                "7" => self.export_transactions()?,
                "8" => self.import_transactions()?,
                "9" => self.clear_all_transactions()?,
                "10" => break,
                _ => writeln!(self.output, "Invalid selection. Please try again.")?,
            }
        }

        info!("event=session_end module=cli status=ok");
        Ok(())
    }

    fn add_transaction(&mut self) -> io::Result<()> {
        let Some(operator) = self.prompt("Enter the operator's name: ")? else {
            return Ok(());
        };
        let Some(item) = self.prompt("Enter the item purchased (e.g., skin, charm, pack): ")?
        else {
            return Ok(());
        };
        let Some(amount) = self.prompt_integer(
            "Enter the amount of credits spent: ",
            "Invalid input. Please enter a numeric value for the amount.",
        )?
        else {
            return Ok(());
        };

        let request = NewTransaction::new(operator.as_str(), item.as_str(), amount);
        match self.service.add_transaction(&request) {
            Ok(id) => {
                info!("event=transaction_added module=cli status=ok id={id}");
                writeln!(self.output, "Transaction added for operator '{operator}'.")
            }
            Err(err) => self.report_repo_error("add_transaction", &err),
        }
    }

    fn view_all_transactions(&mut self) -> io::Result<()> {
        match self.service.list_transactions() {
            Ok(transactions) => writeln!(
                self.output,
                "{}",
                output::format_transaction_list(&transactions)
            ),
            Err(err) => self.report_repo_error("list_transactions", &err),
        }
    }

    fn find_transactions_by_operator(&mut self) -> io::Result<()> {
        let Some(operator) = self.prompt("Enter the operator's name: ")? else {
            return Ok(());
        };

        match self.service.transactions_by_operator(&operator) {
            Ok(transactions) => writeln!(
                self.output,
                "{}",
                output::format_operator_transactions(&operator, &transactions)
            ),
            Err(err) => self.report_repo_error("transactions_by_operator", &err),
        }
    }

    fn highest_credit_spend(&mut self) -> io::Result<()> {
        let Some(operator) = self.prompt("Enter the operator's name: ")? else {
            return Ok(());
        };

        match self.service.highest_spend(&operator) {
            Ok(result) => writeln!(
                self.output,
                "{}",
                output::format_highest_spend(&operator, result.as_ref())
            ),
            Err(err) => self.report_repo_error("highest_spend", &err),
        }
    }

    fn total_credits_spent(&mut self) -> io::Result<()> {
        match self.service.total_credits() {
            Ok(total) => writeln!(self.output, "{}", output::format_total_credits(total)),
            Err(err) => self.report_repo_error("total_credits", &err),
        }
    }

    fn delete_transactions(&mut self) -> io::Result<()> {
        let Some(choice) =
            self.prompt("Would you like to delete by (1) Name or (2) ID? Enter 1 or 2: ")?
        else {
            return Ok(());
        };

        match choice.trim() {
            "1" => self.delete_by_operator(),
            "2" => self.delete_by_id(),
            _ => writeln!(self.output, "Invalid choice. Returning to the main menu."),
        }
    }

    fn delete_by_operator(&mut self) -> io::Result<()> {
        let Some(name) =
            self.prompt("Enter the name of the operator to delete transactions for: ")?
        else {
            return Ok(());
        };

        match self.service.delete_by_operator(&name) {
            Ok(0) => writeln!(self.output, "No transactions found for operator '{name}'."),
            Ok(deleted) => {
                info!("event=transactions_deleted module=cli status=ok count={deleted}");
                writeln!(
                    self.output,
                    "Transactions for operator '{name}' have been deleted."
                )
            }
            Err(err) => self.report_repo_error("delete_by_operator", &err),
        }
    }

    fn delete_by_id(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_integer(
            "Enter the ID of the transaction to delete: ",
            "Invalid input. Please enter a numeric value for the transaction ID.",
        )?
        else {
            return Ok(());
        };

        match self.service.delete_by_id(id) {
            Ok(true) => {
                info!("event=transaction_deleted module=cli status=ok id={id}");
                writeln!(self.output, "Transaction with ID '{id}' has been deleted.")
            }
            Ok(false) => writeln!(self.output, "No transaction found with ID '{id}'."),
            Err(err) => self.report_repo_error("delete_by_id", &err),
        }
    }

    fn export_transactions(&mut self) -> io::Result<()> {
        let transactions = match self.service.list_transactions() {
            Ok(transactions) => transactions,
            Err(err) => return self.report_repo_error("list_transactions", &err),
        };

        if transactions.is_empty() {
            return writeln!(self.output, "No transactions to export.");
        }

        let Some(stem) =
            self.prompt("Enter the filename for the exported CSV (without extension): ")?
        else {
            return Ok(());
        };
        let filename = format!("{stem}.csv");
        let exported_at = Local::now().format(EXPORT_TIMESTAMP_FORMAT).to_string();

        match csv_io::export_transactions(Path::new(&filename), &transactions, &exported_at) {
            Ok(()) => {
                info!(
                    "event=csv_export module=cli status=ok rows={}",
                    transactions.len()
                );
                writeln!(self.output, "Transactions exported to {filename}.")
            }
            Err(err) => {
                error!("event=csv_export module=cli status=error error={err}");
                writeln!(self.output, "An error occurred while exporting: {err}")
            }
        }
    }

    fn import_transactions(&mut self) -> io::Result<()> {
        let Some(filename) = self.prompt("Enter the filename of the CSV to import: ")? else {
            return Ok(());
        };

        let requests = match csv_io::import_transactions(Path::new(&filename)) {
            Ok(requests) => requests,
            Err(CsvError::NotFound(_)) => {
                return writeln!(self.output, "File {filename} not found.");
            }
            Err(err) => {
                error!("event=csv_import module=cli status=error error={err}");
                return writeln!(self.output, "An error occurred while importing: {err}");
            }
        };

        for request in &requests {
            if let Err(err) = self.service.add_transaction(request) {
                return self.report_repo_error("import_transactions", &err);
            }
        }

        info!(
            "event=csv_import module=cli status=ok rows={}",
            requests.len()
        );
        writeln!(self.output, "Transactions imported from {filename}.")
    }

    fn clear_all_transactions(&mut self) -> io::Result<()> {
        let Some(confirmation) = self.prompt(
            "Are you sure you want to delete all transactions? This action cannot be undone. (yes/no): ",
        )?
        else {
            return Ok(());
        };

        if !confirmation.trim().eq_ignore_ascii_case("yes") {
            return writeln!(self.output, "Operation canceled.");
        }

        match self.service.clear_all() {
            Ok(deleted) => {
                info!("event=ledger_cleared module=cli status=ok count={deleted}");
                writeln!(self.output, "All transactions have been deleted.")
            }
            Err(err) => self.report_repo_error("clear_all", &err),
        }
    }

    /// Writes a prompt, flushes, and reads one input line.
    ///
    /// Returns `None` at end of input, which callers treat like exit.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Re-prompts until the input parses as an integer.
    fn prompt_integer(&mut self, text: &str, invalid_message: &str) -> io::Result<Option<i64>> {
        loop {
            let Some(line) = self.prompt(text)? else {
                return Ok(None);
            };
            match line.trim().parse::<i64>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "{invalid_message}")?,
            }
        }
    }

    fn report_repo_error(&mut self, operation: &str, err: &RepoError) -> io::Result<()> {
        error!("event=ledger_op module=cli status=error op={operation} error={err}");
        match err {
            RepoError::Validation(inner) => {
                writeln!(self.output, "Invalid transaction: {inner}")
            }
            _ => writeln!(self.output, "Storage error: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use creditledger_core::db::open_db_in_memory;
    use creditledger_core::{CreditRepository, LedgerService, SqliteCreditRepository};
    use rusqlite::Connection;
    use std::io::Cursor;

    fn run_session(conn: &Connection, script: &str) -> String {
        let service = LedgerService::new(SqliteCreditRepository::new(conn));
        let mut transcript = Vec::new();
        let mut session = Session::new(service, Cursor::new(script.as_bytes()), &mut transcript);
        session.run().expect("session I/O should not fail");
        String::from_utf8(transcript).expect("session output should be UTF-8")
    }

    #[test]
    fn invalid_amount_reprompts_and_creates_no_extra_row() {
        let conn = open_db_in_memory().unwrap();
        let transcript = run_session(&conn, "1\nAsh\nskin\nabc\n\n500\n10\n");

        let occurrences = transcript
            .matches("Invalid input. Please enter a numeric value for the amount.")
            .count();
        assert_eq!(occurrences, 2);
        assert!(transcript.contains("Transaction added for operator 'Ash'."));

        let repo = SqliteCreditRepository::new(&conn);
        let all = repo.list_transactions().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount, 500);
    }

    #[test]
    fn empty_operator_is_rejected_without_insert() {
        let conn = open_db_in_memory().unwrap();
        let transcript = run_session(&conn, "1\n\nskin\n500\n10\n");

        assert!(transcript.contains("Invalid transaction: operator name must not be empty"));
        let repo = SqliteCreditRepository::new(&conn);
        assert!(repo.list_transactions().unwrap().is_empty());
    }

    #[test]
    fn unknown_selection_reports_and_loops() {
        let conn = open_db_in_memory().unwrap();
        let transcript = run_session(&conn, "42\n10\n");
        assert!(transcript.contains("Invalid selection. Please try again."));
    }

    #[test]
    fn delete_submenu_rejects_unknown_choice() {
        let conn = open_db_in_memory().unwrap();
        let transcript = run_session(&conn, "6\n3\n10\n");
        assert!(transcript.contains("Invalid choice. Returning to the main menu."));
    }

    #[test]
    fn delete_by_id_retries_until_numeric() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteCreditRepository::new(&conn);
        let id = repo
            .add_transaction(&creditledger_core::NewTransaction::new("Ash", "skin", 500))
            .unwrap();

        let transcript = run_session(&conn, &format!("6\n2\nxyz\n{id}\n10\n"));
        assert!(transcript
            .contains("Invalid input. Please enter a numeric value for the transaction ID."));
        assert!(transcript.contains(&format!("Transaction with ID '{id}' has been deleted.")));
        assert!(repo.list_transactions().unwrap().is_empty());
    }

    #[test]
    fn clear_all_requires_yes_confirmation() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteCreditRepository::new(&conn);
        repo.add_transaction(&creditledger_core::NewTransaction::new("Ash", "skin", 500))
            .unwrap();

        let canceled = run_session(&conn, "9\nno\n10\n");
        assert!(canceled.contains("Operation canceled."));
        assert_eq!(repo.list_transactions().unwrap().len(), 1);

        let confirmed = run_session(&conn, "9\n YES \n10\n");
        assert!(confirmed.contains("All transactions have been deleted."));
        assert!(repo.list_transactions().unwrap().is_empty());
    }

    #[test]
    fn end_of_input_ends_the_session() {
        let conn = open_db_in_memory().unwrap();
        let transcript = run_session(&conn, "");
        assert!(transcript.contains("Please enter the number of your selection:"));
    }
}
