//! Tabular ETL
//!
//! A minimal batch ETL pipeline for tabular records: one [`Extractor`] pulls
//! a [`Batch`] out of a source medium, one [`Transformer`] maps it, one
//! [`Loader`] persists it, and a [`Pipeline`](etl::Pipeline) drives the
//! three strictly in sequence. Sources and sinks are interchangeable
//! plug-ins behind single-capability traits; the shipped adapters cover
//! delimited files, JSON-over-HTTP, XML documents, and SQLite in both
//! directions.

pub mod batch;
pub mod error;
pub mod etl;
pub mod sink;
pub mod source;
pub mod transform;

// Re-exports for convenience
pub use batch::{Batch, Record, SourceTag};
pub use error::{ExtractionError, LoadError, PipelineError, TransformError};
pub use etl::{Extractor, IdentityTransformer, Loader, Pipeline, PipelineState, Transformer};
pub use sink::SqliteLoader;
pub use source::{DelimitedExtractor, JsonApiExtractor, SqlExtractor, XmlExtractor};
pub use transform::BasicTransformer;
