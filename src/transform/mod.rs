//! Concrete transformer implementations
//!
//! Variants are polymorphic over the [`Transformer`](crate::etl::Transformer)
//! contract; [`BasicTransformer`] is the reference normalization/enrichment
//! policy.

mod basic;

pub use basic::BasicTransformer;
