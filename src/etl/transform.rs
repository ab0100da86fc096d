//! Transformer trait for batch-wise mappings

use crate::batch::Batch;
use crate::error::TransformError;

/// Transformer trait for mapping one batch into a new one
///
/// A transformer is pure: it holds no connection to the outside world, takes
/// its input batch by value, and builds a fresh batch rather than mutating
/// rows in place. The contract fixes only the shape; policy (deduplication,
/// fills, derived columns, arbitrary row-wise mappings) belongs to the
/// implementor.
///
/// # Example
/// ```
/// use tabular_etl::etl::Transformer;
/// use tabular_etl::{Batch, Record, SourceTag, TransformError};
///
/// /// Keeps only records that carry a price
/// struct PricedOnly;
///
/// impl Transformer for PricedOnly {
///     fn transform(&self, batch: Batch) -> Result<Batch, TransformError> {
///         let records = batch
///             .records()
///             .iter()
///             .filter(|record| record.price.is_some())
///             .cloned()
///             .collect();
///         Ok(batch.with_records(records))
///     }
/// }
///
/// let batch = Batch::new(SourceTag::File, vec![Record::new(1, "2024-07-01")]);
/// let output = PricedOnly.transform(batch).unwrap();
/// assert!(output.is_empty());
/// ```
pub trait Transformer: Send + Sync {
    /// Map the input batch into a new batch
    ///
    /// # Errors
    /// Returns a [`TransformError`] when the batch cannot satisfy the
    /// transformer's policy (e.g. a required field has no value anywhere).
    fn transform(&self, batch: Batch) -> Result<Batch, TransformError>;
}

/// Identity transformer that passes a batch through unchanged
///
/// Use this when a pipeline slot needs a transformer but the data should
/// flow through as extracted.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTransformer;

impl IdentityTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for IdentityTransformer {
    fn transform(&self, batch: Batch) -> Result<Batch, TransformError> {
        Ok(batch)
    }
}
