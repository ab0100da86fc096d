//! SQLite sink adapter
//!
//! Persists a batch into one destination table with full-replace semantics:
//! the previous contents of the table are dropped and the batch is written
//! inside a single transaction, so a failed load commits nothing.

use crate::batch::Batch;
use crate::error::LoadError;
use crate::etl::Loader;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, ErrorCode, params};
use std::path::{Path, PathBuf};

/// Loader for a SQLite destination table
///
/// The database path and table name are fixed at construction. Each `load`
/// call opens its own connection, stamps the batch with one wall-clock
/// timestamp, replaces the table, and closes the connection before
/// returning. Persisted columns: `identifier, date, quantity, price, total,
/// source, timestamp` (timestamps as RFC 3339 text, identical for every
/// record of a call).
///
/// # Example
/// ```no_run
/// use tabular_etl::etl::Loader;
/// use tabular_etl::sink::SqliteLoader;
/// use tabular_etl::{Batch, Record, SourceTag};
///
/// # async fn example() -> Result<(), tabular_etl::LoadError> {
/// let loader = SqliteLoader::new("warehouse.db", "sales");
/// let batch = Batch::new(SourceTag::File, vec![Record::new(1, "2024-07-01")]);
/// let count = loader.load(batch).await?;
/// # Ok(())
/// # }
/// ```
pub struct SqliteLoader {
    db_path: PathBuf,
    table: String,
}

impl SqliteLoader {
    pub fn new(db_path: impl AsRef<Path>, table: impl Into<String>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            table: table.into(),
        }
    }

    fn quoted_table(&self) -> String {
        format!("\"{}\"", self.table.replace('"', "\"\""))
    }

    fn map_error(&self, error: rusqlite::Error) -> LoadError {
        match error.sqlite_error_code() {
            Some(
                ErrorCode::CannotOpen
                | ErrorCode::NotADatabase
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked,
            ) => LoadError::DestinationUnreachable {
                message: error.to_string(),
            },
            _ => LoadError::ConstraintViolation {
                table: self.table.clone(),
                message: error.to_string(),
            },
        }
    }

    fn replace_table(&self, batch: &Batch, timestamp: &str) -> Result<usize, LoadError> {
        let mut connection =
            Connection::open(&self.db_path).map_err(|error| self.map_error(error))?;
        let tx = connection
            .transaction()
            .map_err(|error| self.map_error(error))?;

        let table = self.quoted_table();
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TABLE {table} (
                 identifier INTEGER NOT NULL,
                 date TEXT NOT NULL,
                 quantity INTEGER,
                 price REAL,
                 total REAL,
                 source TEXT NOT NULL,
                 timestamp TEXT NOT NULL
             );"
        ))
        .map_err(|error| self.map_error(error))?;

        {
            let mut insert = tx
                .prepare(&format!(
                    "INSERT INTO {table}
                     (identifier, date, quantity, price, total, source, timestamp)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
                ))
                .map_err(|error| self.map_error(error))?;

            for record in batch.records() {
                insert
                    .execute(params![
                        record.identifier,
                        record.date,
                        record.quantity,
                        record.price,
                        record.total,
                        batch.source().as_str(),
                        timestamp,
                    ])
                    .map_err(|error| self.map_error(error))?;
            }
        }

        tx.commit().map_err(|error| self.map_error(error))?;

        Ok(batch.len())
    }
}

#[async_trait]
impl Loader for SqliteLoader {
    async fn load(&self, batch: Batch) -> Result<usize, LoadError> {
        // One wall-clock stamp per call, shared by every record; a batch
        // stamped earlier keeps its original load time
        let loaded_at = batch.loaded_at().unwrap_or_else(Utc::now);
        let batch = batch.stamped(loaded_at);

        log::debug!(
            "Replacing table '{}' in {} with {} record(s)",
            self.table,
            self.db_path.display(),
            batch.len()
        );

        let count = self.replace_table(&batch, &loaded_at.to_rfc3339())?;

        log::info!("Loaded {} record(s) into '{}'", count, self.table);

        Ok(count)
    }
}
