//! Core ETL (Extract, Transform, Load) abstractions
//!
//! This module defines the three single-capability trait contracts and the
//! [`Pipeline`] orchestrator that composes one instance of each into a
//! strictly sequential batch run. Concrete source, transform, and sink
//! implementations live in their own modules and plug in here.

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::{Pipeline, PipelineState};
pub use transform::{IdentityTransformer, Transformer};
