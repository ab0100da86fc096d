//! Typed errors for each pipeline stage
//!
//! Each stage raises its own error enum; [`PipelineError`] only tags which
//! stage failed and forwards the message unchanged, so callers can always
//! see both the stage and the sub-kind of a failed run.

/// Errors raised while extracting records from a source medium
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The backing resource (file, endpoint, database, table) does not exist
    #[error("source not found: {resource}")]
    NotFound { resource: String },

    /// The medium was readable but its contents do not parse into records
    #[error("malformed payload from {resource}: {message}")]
    MalformedPayload { resource: String, message: String },

    /// The medium could not be reached or read
    #[error("transport failure reading {resource}: {message}")]
    Transport { resource: String, message: String },
}

/// Errors raised by a transformer over a batch
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// A field needed by the transform is missing from every record
    #[error("field '{field}' is missing from every record in the batch")]
    MissingRequiredField { field: &'static str },

    /// A leading record is missing a field and no earlier record can fill it
    #[error("record {index} is missing '{field}' and no earlier record can fill it")]
    FillDonorUnavailable { field: &'static str, index: usize },
}

/// Errors raised while persisting a batch to the sink
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The destination store could not be opened or written at all
    #[error("destination unreachable: {message}")]
    DestinationUnreachable { message: String },

    /// The store rejected the write (constraint or schema failure)
    #[error("constraint violation writing to '{table}': {message}")]
    ConstraintViolation { table: String, message: String },
}

/// A failed pipeline run: the variant names the stage, the inner error the kind
///
/// `Display` is forwarded from the stage error unmodified.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Load(#[from] LoadError),
}
