//! Storage module
//!
//! SQLite-based storage layer: authoritative `memories`/`edges` tables, an
//! FTS5 inverted index kept in sync via triggers, and the primitive queries
//! the recall pipeline is built from.

mod migrations;
mod sqlite;

pub use migrations::MIGRATIONS;
pub use sqlite::{sanitize_fts5_query, SqliteStore, StoreError};

/// Storage result type.
pub type Result<T> = std::result::Result<T, StoreError>;
