//! Source adapters, one per supported medium
//!
//! Each extractor wraps a single medium behind the
//! [`Extractor`](crate::etl::Extractor) contract:
//! - [`DelimitedExtractor`] — local delimited text file
//! - [`JsonApiExtractor`] — HTTP JSON endpoint
//! - [`XmlExtractor`] — local XML document
//! - [`SqlExtractor`] — query against a SQLite database

mod api;
mod delimited;
mod sql;
mod xml;

pub use api::JsonApiExtractor;
pub use delimited::DelimitedExtractor;
pub use sql::SqlExtractor;
pub use xml::XmlExtractor;
