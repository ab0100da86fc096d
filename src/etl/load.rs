//! Loader trait for persisting batches to a destination

use crate::batch::Batch;
use crate::error::LoadError;
use async_trait::async_trait;

/// Loader trait for durably persisting one batch
///
/// Implementors write to a destination fixed at construction (e.g. a table
/// in a database file) with full-replace semantics: after a successful call
/// the destination holds exactly the records of this batch. The loader
/// assigns a single wall-clock load timestamp as the call begins, identical
/// across every record of the call.
///
/// # Example
/// ```no_run
/// use async_trait::async_trait;
/// use tabular_etl::etl::Loader;
/// use tabular_etl::{Batch, LoadError};
///
/// struct DiscardLoader;
///
/// #[async_trait]
/// impl Loader for DiscardLoader {
///     async fn load(&self, batch: Batch) -> Result<usize, LoadError> {
///         Ok(batch.len())
///     }
/// }
/// ```
#[async_trait]
pub trait Loader: Send + Sync {
    /// Persist the batch, replacing any prior contents of the destination
    ///
    /// Returns the number of records persisted.
    ///
    /// # Errors
    /// Returns a [`LoadError`] distinguishing an unreachable destination
    /// from a constraint/schema violation. A failed load must not leave the
    /// destination partially overwritten where the store can avoid it.
    async fn load(&self, batch: Batch) -> Result<usize, LoadError>;
}
