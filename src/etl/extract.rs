//! Extractor trait for pulling tabular batches out of source media

use crate::batch::Batch;
use crate::error::ExtractionError;

/// Extractor trait for reading one source medium into a [`Batch`]
///
/// Implementors wrap exactly one medium — a delimited file, a JSON endpoint,
/// an XML document, a relational query — with all configuration fixed at
/// construction. An extractor must preserve the row order of its medium, tag
/// the batch with its fixed [`SourceTag`](crate::batch::SourceTag), and fail
/// outright rather than return a partial batch.
///
/// # Example
/// ```no_run
/// use tabular_etl::etl::Extractor;
/// use tabular_etl::{Batch, ExtractionError, Record, SourceTag};
///
/// struct FixtureExtractor;
///
/// impl Extractor for FixtureExtractor {
///     async fn extract(&self) -> Result<Batch, ExtractionError> {
///         let records = vec![Record::new(1, "2024-07-01").with_quantity(10)];
///         Ok(Batch::new(SourceTag::File, records))
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// Extract all records the medium currently holds
    ///
    /// # Errors
    /// Returns an [`ExtractionError`] naming the sub-kind: the resource was
    /// not found, its payload was malformed, or transport to it failed.
    fn extract(&self) -> impl std::future::Future<Output = Result<Batch, ExtractionError>> + Send;
}
