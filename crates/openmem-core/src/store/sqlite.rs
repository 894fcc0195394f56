//! SQLite storage implementation
//!
//! Durable, single-writer store: authoritative `memories`/`edges` tables
//! plus the FTS5 index `migrations` keeps in sync. One engine, one writer,
//! so a single connection behind a `Mutex` is enough; there's no background
//! work that needs a separate reader connection here.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use crate::model::{Edge, Memory, MemoryStatus};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("memory not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("initialization error: {0}")]
    Init(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// QUERY SANITIZATION
// ============================================================================

/// Turn a raw user query into a safe FTS5 `MATCH` expression: tokenize on
/// whitespace, quote each token as an FTS5 string literal (so punctuation
/// and query metacharacters can't cause syntax errors), join with `OR` for
/// a permissive any-of disjunction. Returns an empty string for an
/// empty/whitespace-only query.
pub fn sanitize_fts5_query(query: &str) -> String {
    let tokens: Vec<String> = query
        .split_whitespace()
        .map(|t| format!("\"{}\"", t.replace('"', "\"\"")))
        .collect();
    tokens.join(" OR ")
}

// ============================================================================
// STORE
// ============================================================================

/// SQLite-backed memory store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    /// Open (or create) a store at `path`. The sentinel `":memory:"` requests
    /// an ephemeral, process-local store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        let conn = if path_ref == Path::new(":memory:") {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = path_ref.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Connection::open(path_ref)?
        };

        // WAL mode requires a real file; harmless no-op on :memory:.
        Self::configure_connection(&conn)?;
        super::migrations::apply_migrations(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Init("connection lock poisoned".into()))
    }

    fn row_to_memory(row: &rusqlite::Row) -> rusqlite::Result<Memory> {
        let entities_json: String = row.get("entities")?;
        let entities: Vec<String> = serde_json::from_str(&entities_json).unwrap_or_default();
        let status: String = row.get("status")?;
        Ok(Memory {
            id: row.get("id")?,
            memory_type: row.get("memory_type")?,
            text: row.get("text")?,
            gist: row.get("gist")?,
            entities,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            last_accessed: row.get("last_accessed")?,
            strength: row.get("strength")?,
            confidence: row.get("confidence")?,
            access_count: row.get("access_count")?,
            status: MemoryStatus::parse_name(&status),
        })
    }

    fn row_to_edge(row: &rusqlite::Row) -> rusqlite::Result<Edge> {
        Ok(Edge {
            id: row.get("id")?,
            source_id: row.get("source_id")?,
            target_id: row.get("target_id")?,
            rel_type: row.get("rel_type")?,
            weight: row.get("weight")?,
            created_at: row.get("created_at")?,
        })
    }

    // ------------------------------------------------------------------
    // Memories
    // ------------------------------------------------------------------

    pub fn add_memory(&self, memory: &Memory) -> Result<()> {
        let entities_json = serde_json::to_string(&memory.entities).unwrap_or_else(|_| "[]".into());
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO memories (
                id, memory_type, text, gist, entities, created_at, updated_at,
                last_accessed, strength, confidence, access_count, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                memory.id,
                memory.memory_type,
                memory.text,
                memory.gist,
                entities_json,
                memory.created_at,
                memory.updated_at,
                memory.last_accessed,
                memory.strength,
                memory.confidence,
                memory.access_count,
                memory.status.as_str(),
            ],
        )?;
        Ok(())
    }

    pub fn get_memory(&self, id: &str) -> Result<Option<Memory>> {
        let conn = self.lock()?;
        conn.query_row("SELECT * FROM memories WHERE id = ?1", params![id], Self::row_to_memory)
            .optional()
            .map_err(StoreError::from)
    }

    pub fn all_memories(&self) -> Result<Vec<Memory>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT * FROM memories")?;
        let rows = stmt.query_map([], Self::row_to_memory)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn update_memory(&self, memory: &Memory) -> Result<()> {
        let entities_json = serde_json::to_string(&memory.entities).unwrap_or_else(|_| "[]".into());
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE memories SET memory_type = ?1, text = ?2, gist = ?3, entities = ?4,
                updated_at = ?5, last_accessed = ?6, strength = ?7, confidence = ?8,
                access_count = ?9, status = ?10
             WHERE id = ?11",
            params![
                memory.memory_type,
                memory.text,
                memory.gist,
                entities_json,
                memory.updated_at,
                memory.last_accessed,
                memory.strength,
                memory.confidence,
                memory.access_count,
                memory.status.as_str(),
                memory.id,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(memory.id.clone()));
        }
        Ok(())
    }

    /// Bump `access_count`, set `last_accessed` and `updated_at` to `now`.
    pub fn update_access(&self, id: &str, now: f64) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE memories SET access_count = access_count + 1,
                last_accessed = ?1, updated_at = ?1 WHERE id = ?2",
            params![now, id],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    pub fn add_edge(&self, edge: &Edge) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO edges (id, source_id, target_id, rel_type, weight, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                edge.id,
                edge.source_id,
                edge.target_id,
                edge.rel_type,
                edge.weight,
                edge.created_at,
            ],
        )?;
        Ok(())
    }

    /// All edges touching `id` in either direction (undirected for traversal).
    pub fn get_edges(&self, id: &str) -> Result<Vec<Edge>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT * FROM edges WHERE source_id = ?1 OR target_id = ?1")?;
        let rows = stmt.query_map(params![id], Self::row_to_edge)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Edge + adjacent memory pairs for `id`, omitting edges whose other
    /// endpoint no longer resolves to a memory.
    pub fn get_neighbors(&self, id: &str) -> Result<Vec<(Edge, Memory)>> {
        let edges = self.get_edges(id)?;
        let mut out = Vec::with_capacity(edges.len());
        for edge in edges {
            let neighbor_id = if edge.source_id == id {
                &edge.target_id
            } else {
                &edge.source_id
            };
            if let Some(neighbor) = self.get_memory(neighbor_id)? {
                out.push((edge, neighbor));
            }
        }
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// BM25-ranked full-text search. Returns `(id, score)` pairs,
    /// higher-is-better, regardless of the underlying FTS5 sign convention.
    /// An empty/whitespace-only query returns an empty result without
    /// touching the database.
    pub fn search_bm25(&self, query: &str, limit: usize) -> Result<Vec<(String, f64)>> {
        let sanitized = sanitize_fts5_query(query);
        if sanitized.is_empty() {
            return Ok(vec![]);
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, bm25(memories_fts) AS rank FROM memories_fts
             WHERE memories_fts MATCH ?1
             ORDER BY rank
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![sanitized, limit as i64], |row| {
            let id: String = row.get(0)?;
            let rank: f64 = row.get(1)?;
            Ok((id, rank))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, rank) = row?;
            // bm25() is lower-is-better and typically negative; flip the sign
            // so callers always see positive, higher-is-better scores.
            out.push((id, (-rank).max(0.0)));
        }
        Ok(out)
    }
}
