//! SQL source adapter
//!
//! Runs a caller-supplied query read-only against a SQLite database file and
//! maps the result columns `identifier, date, quantity, price` onto records.

use crate::batch::{Batch, Record, SourceTag};
use crate::error::ExtractionError;
use crate::etl::Extractor;

use rusqlite::{Connection, ErrorCode, OpenFlags};
use std::path::{Path, PathBuf};

/// Extractor for relational queries
///
/// The connection is opened read-only for the duration of a single `extract`
/// call and closed before it returns. Rows arrive in query order; NULL
/// `quantity`/`price` columns become missing values. Every record is tagged
/// `sql`.
///
/// # Example
/// ```no_run
/// use tabular_etl::etl::Extractor;
/// use tabular_etl::source::SqlExtractor;
///
/// # async fn example() -> Result<(), tabular_etl::ExtractionError> {
/// let extractor = SqlExtractor::new("source.db", "SELECT * FROM sales");
/// let batch = extractor.extract().await?;
/// # Ok(())
/// # }
/// ```
pub struct SqlExtractor {
    db_path: PathBuf,
    query: String,
}

impl SqlExtractor {
    pub fn new(db_path: impl AsRef<Path>, query: impl Into<String>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            query: query.into(),
        }
    }

    fn run_query(&self) -> Result<Vec<Record>, ExtractionError> {
        let resource = self.db_path.display().to_string();

        let connection =
            Connection::open_with_flags(&self.db_path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
                |error| match error.sqlite_error_code() {
                    Some(ErrorCode::CannotOpen) => ExtractionError::NotFound {
                        resource: resource.clone(),
                    },
                    _ => ExtractionError::Transport {
                        resource: resource.clone(),
                        message: error.to_string(),
                    },
                },
            )?;

        // A query that does not prepare (bad SQL, missing table) is a payload
        // problem, not a transport one
        let mut statement =
            connection
                .prepare(&self.query)
                .map_err(|error| ExtractionError::MalformedPayload {
                    resource: resource.clone(),
                    message: error.to_string(),
                })?;

        let rows = statement
            .query_map([], |row| {
                Ok(Record {
                    identifier: row.get("identifier")?,
                    date: row.get("date")?,
                    quantity: row.get("quantity")?,
                    price: row.get("price")?,
                    total: None,
                })
            })
            .map_err(|error| ExtractionError::Transport {
                resource: resource.clone(),
                message: error.to_string(),
            })?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|error| ExtractionError::MalformedPayload {
                resource,
                message: error.to_string(),
            })
    }
}

impl Extractor for SqlExtractor {
    async fn extract(&self) -> Result<Batch, ExtractionError> {
        log::debug!(
            "Querying {} with '{}'",
            self.db_path.display(),
            self.query
        );

        let records = self.run_query()?;

        log::info!(
            "Extracted {} record(s) from {}",
            records.len(),
            self.db_path.display()
        );

        Ok(Batch::new(SourceTag::Sql, records))
    }
}
