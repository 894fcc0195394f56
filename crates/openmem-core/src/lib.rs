//! # OpenMem Core
//!
//! Persistent cognitive memory engine for an AI assistant: ingests short
//! textual memories, links them into a directed relationship graph, and
//! answers recall queries with a ranked list of the most relevant memories.
//!
//! ## Pipeline
//!
//! `recall` runs lexical retrieval (BM25 over a durable SQLite store),
//! spreading activation over the edge graph, a weighted competition across
//! activated candidates, and conflict resolution between contradicting
//! memories, before packing the result under a token budget.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use openmem_core::{Engine, EngineConfig};
//!
//! let engine = Engine::new(":memory:", EngineConfig::default()).unwrap();
//! let m = engine.add("Python is a popular programming language", "fact", vec!["Python".into()], 1.0, None).unwrap();
//! let results = engine.recall("Python programming", 5, 2000).unwrap();
//! assert!(results.iter().any(|r| r.memory.id == m.id));
//! ```

pub mod activation;
pub mod conflict;
pub mod config;
pub mod engine;
pub mod model;
pub mod scoring;
pub mod store;

pub use config::EngineConfig;
pub use engine::Engine;
pub use model::{Edge, Memory, MemoryId, MemoryStatus, ScoreComponents, ScoredMemory};
pub use store::{SqliteStore, StoreError};

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
