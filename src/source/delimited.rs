//! Delimited-file source adapter
//!
//! Reads records from a local delimited text file (comma-separated by
//! default) with an `identifier, date, quantity, price` header row.

use crate::batch::{Batch, Record, SourceTag};
use crate::error::ExtractionError;
use crate::etl::Extractor;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Extractor for local delimited text files
///
/// Rows are parsed in file order; empty `quantity`/`price` cells become
/// missing values. Every record is tagged `file`.
///
/// # Example
/// ```no_run
/// use tabular_etl::etl::Extractor;
/// use tabular_etl::source::DelimitedExtractor;
///
/// # async fn example() -> Result<(), tabular_etl::ExtractionError> {
/// let extractor = DelimitedExtractor::new("sales.csv");
/// let batch = extractor.extract().await?;
/// println!("read {} records", batch.len());
/// # Ok(())
/// # }
/// ```
pub struct DelimitedExtractor {
    path: PathBuf,
    delimiter: u8,
}

impl DelimitedExtractor {
    /// Create an extractor for a comma-delimited file
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    /// Use a different field delimiter (e.g. `b';'` or `b'\t'`)
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn read_records(&self) -> Result<Vec<Record>, ExtractionError> {
        let resource = self.path.display().to_string();

        let file = std::fs::File::open(&self.path).map_err(|error| match error.kind() {
            ErrorKind::NotFound => ExtractionError::NotFound {
                resource: resource.clone(),
            },
            _ => ExtractionError::Transport {
                resource: resource.clone(),
                message: error.to_string(),
            },
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_reader(file);

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<Record>().enumerate() {
            let record = row.map_err(|error| ExtractionError::MalformedPayload {
                resource: resource.clone(),
                message: format!("row {}: {}", index + 1, error),
            })?;
            records.push(record);
        }

        Ok(records)
    }
}

impl Extractor for DelimitedExtractor {
    async fn extract(&self) -> Result<Batch, ExtractionError> {
        log::debug!("Reading delimited file {}", self.path.display());

        let records = self.read_records()?;

        log::info!(
            "Extracted {} record(s) from {}",
            records.len(),
            self.path.display()
        );

        Ok(Batch::new(SourceTag::File, records))
    }
}
