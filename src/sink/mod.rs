//! Sink adapters for durable batch persistence

mod sqlite;

pub use sqlite::SqliteLoader;
