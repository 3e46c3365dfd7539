//! CSV export/import for credit transactions.
//!
//! # Responsibility
//! - Serialize the full ledger to a comma-separated file and read it back.
//! - Keep file-format details out of the repository and session layers.
//!
//! # Invariants
//! - Export writes to a temp file and renames, so a failed export never
//!   leaves a truncated target behind.
//! - Import column layout matches export: the leading id column is skipped,
//!   columns past the amount are ignored.

use crate::model::transaction::{NewTransaction, Transaction};
use csv::{ReaderBuilder, StringRecord, Writer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

const EXPORT_HEADER: [&str; 5] = ["ID", "Operator", "Item", "Amount", "Timestamp"];

// Exported records are ID,Operator,Item,Amount,Timestamp; import reads
// operator/item/amount from columns 1..=3 and ignores the rest.
const MIN_IMPORT_COLUMNS: usize = 4;

pub type CsvResult<T> = Result<T, CsvError>;

/// Failure while reading or writing a transaction CSV file.
#[derive(Debug)]
pub enum CsvError {
    NotFound(PathBuf),
    Io(io::Error),
    Csv(csv::Error),
    Malformed { line: u64, message: String },
}

impl Display for CsvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "file {} not found", path.display()),
            Self::Io(err) => write!(f, "{err}"),
            Self::Csv(err) => write!(f, "{err}"),
            Self::Malformed { line, message } => {
                write!(f, "malformed record on line {line}: {message}")
            }
        }
    }
}

impl Error for CsvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Malformed { .. } => None,
        }
    }
}

impl From<io::Error> for CsvError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for CsvError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Writes all transactions to `path` with an export-time timestamp column.
///
/// The timestamp is supplied by the caller because no creation time is
/// stored; every row of one export carries the same value.
pub fn export_transactions(
    path: impl AsRef<Path>,
    transactions: &[Transaction],
    exported_at: &str,
) -> CsvResult<()> {
    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    {
        let file = File::create(&temp_path)?;
        let mut writer = Writer::from_writer(BufWriter::new(file));

        writer.write_record(EXPORT_HEADER)?;
        for transaction in transactions {
            writer.write_record([
                transaction.id.to_string().as_str(),
                transaction.operator.as_str(),
                transaction.item.as_str(),
                transaction.amount.to_string().as_str(),
                exported_at,
            ])?;
        }
        writer.flush()?;
    }

    std::fs::rename(&temp_path, path)?;
    Ok(())
}

/// Reads a transaction CSV, returning one insert request per data row.
///
/// The header row is skipped. A missing file maps to `CsvError::NotFound`;
/// the first record with too few columns or a non-integer amount aborts the
/// read with `CsvError::Malformed`.
pub fn import_transactions(path: impl AsRef<Path>) -> CsvResult<Vec<NewTransaction>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            CsvError::NotFound(path.to_path_buf())
        } else {
            CsvError::Io(err)
        }
    })?;

    // Flexible: exported files all have five columns, but hand-edited input
    // with extra trailing columns is accepted as long as the first four are
    // present.
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut requests = Vec::new();
    for record in reader.records() {
        let record = record?;
        requests.push(parse_import_record(&record)?);
    }

    Ok(requests)
}

fn parse_import_record(record: &StringRecord) -> CsvResult<NewTransaction> {
    let line = record.position().map_or(0, |position| position.line());

    if record.len() < MIN_IMPORT_COLUMNS {
        return Err(CsvError::Malformed {
            line,
            message: format!(
                "expected at least {MIN_IMPORT_COLUMNS} columns, found {}",
                record.len()
            ),
        });
    }

    let operator = record.get(1).unwrap_or_default();
    let item = record.get(2).unwrap_or_default();
    let amount_text = record.get(3).unwrap_or_default();

    let amount = amount_text
        .trim()
        .parse::<i64>()
        .map_err(|_| CsvError::Malformed {
            line,
            message: format!("amount `{amount_text}` is not an integer"),
        })?;

    Ok(NewTransaction::new(operator, item, amount))
}
