//! Engine
//!
//! Top-level entry point wiring the store, spreading activation, competition
//! scoring, and conflict resolution into the `add`/`link`/`recall` surface
//! callers use.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use crate::activation;
use crate::conflict;
use crate::config::{EngineConfig, Weights};
use crate::model::{Edge, Memory, MemoryId, MemoryStatus, ScoredMemory};
use crate::scoring::{self, ALPHA_DECAY};
use crate::store::{Result, SqliteStore};

/// Rough token estimate used to convert `token_budget` into a character
/// budget for packing.
const CHARS_PER_TOKEN: usize = 4;

/// Strength gained per explicit `reinforce` call.
const REINFORCE_STEP: f64 = 0.1;
/// Edge weight used when `supersede` links the new memory back to the old one.
const SUPERSEDE_WEIGHT: f64 = 0.3;
/// Edge weight used when `contradict` links two memories.
const CONTRADICT_WEIGHT: f64 = 0.8;
/// Minimum elapsed time before `decay_all` bothers touching a memory.
const DECAY_MIN_DAYS: f64 = 0.01;
const SECONDS_PER_DAY: f64 = 86_400.0;

fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Summary counters returned by `Engine::stats`.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub memory_count: usize,
    pub edge_count: usize,
    pub avg_strength: f64,
    pub active_count: usize,
    pub superseded_count: usize,
    pub contradicted_count: usize,
}

/// The cognitive memory engine: one store, one set of tunables.
pub struct Engine {
    store: SqliteStore,
    config: EngineConfig,
}

impl Engine {
    /// Open an engine backed by `path` (the sentinel `":memory:"` requests an
    /// ephemeral store), applying migrations if needed.
    pub fn new(path: impl AsRef<Path>, config: EngineConfig) -> Result<Self> {
        let store = SqliteStore::open(path)?;
        Ok(Self { store, config })
    }

    fn weights(&self) -> Weights {
        self.config.weights.unwrap_or_default()
    }

    /// Add a new memory. `memory_type` defaults to `"fact"`, `confidence` to
    /// `1.0` at the call site if the caller omits it; this method takes both
    /// explicitly since it has no notion of "omitted" in Rust.
    pub fn add(
        &self,
        text: impl Into<String>,
        memory_type: impl Into<String>,
        entities: Vec<String>,
        confidence: f64,
        gist: Option<String>,
    ) -> Result<Memory> {
        let now = now_secs();
        let memory = Memory {
            id: Uuid::new_v4().simple().to_string(),
            memory_type: memory_type.into(),
            text: text.into(),
            gist,
            entities,
            created_at: now,
            updated_at: now,
            last_accessed: None,
            strength: 1.0,
            confidence: confidence.clamp(0.0, 1.0),
            access_count: 0,
            status: MemoryStatus::Active,
        };
        self.store.add_memory(&memory)?;
        Ok(memory)
    }

    /// Create an edge between two memories. `rel_type` defaults to
    /// `"mentions"`, `weight` to `0.5`, at the call site.
    pub fn link(&self, source_id: &str, target_id: &str, rel_type: impl Into<String>, weight: f64) -> Result<Edge> {
        let edge = Edge {
            id: Uuid::new_v4().simple().to_string(),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            rel_type: rel_type.into(),
            weight,
            created_at: now_secs(),
        };
        self.store.add_edge(&edge)?;
        Ok(edge)
    }

    /// Recall memories relevant to `query`.
    ///
    /// Pipeline: BM25 seed retrieval → spreading activation → competition
    /// scoring → conflict resolution → token-budgeted packing. Bumps
    /// `access_count`/`last_accessed` on every memory returned.
    pub fn recall(&self, query: &str, top_k: usize, token_budget: usize) -> Result<Vec<ScoredMemory>> {
        let now = now_secs();

        let bm25_hits = self.store.search_bm25(query, top_k * 4)?;
        tracing::debug!(hits = bm25_hits.len(), "recall: bm25 seed retrieval");
        if bm25_hits.is_empty() {
            return Ok(vec![]);
        }

        let max_score = bm25_hits.iter().map(|(_, s)| *s).fold(0.0, f64::max);
        let max_score = if max_score == 0.0 { 1.0 } else { max_score };
        let seed_activations: HashMap<MemoryId, f64> =
            bm25_hits.into_iter().map(|(id, score)| (id, score / max_score)).collect();

        let activations = activation::spread(&seed_activations, &self.store, self.config.max_hops, self.config.decay_per_hop)?;
        tracing::debug!(activated = activations.len(), "recall: spreading activation");

        let mut memories: HashMap<MemoryId, Memory> = HashMap::new();
        for id in activations.keys() {
            if let Some(mem) = self.store.get_memory(id)? {
                if !mem.is_deleted() {
                    memories.insert(id.clone(), mem);
                }
            }
        }

        let scored = scoring::compete(&activations, &memories, &self.weights(), now);
        let scored = conflict::resolve(scored, &self.store, now)?;
        tracing::debug!(candidates = scored.len(), "recall: competition and conflict resolution");

        let char_budget = token_budget * CHARS_PER_TOKEN;
        let mut packed: Vec<ScoredMemory> = Vec::new();
        let mut used_chars = 0usize;
        for sm in scored {
            let text_len = sm.memory.text.len();
            if used_chars + text_len > char_budget && !packed.is_empty() {
                break;
            }
            used_chars += text_len;
            packed.push(sm);
            if packed.len() >= top_k {
                break;
            }
        }

        for sm in &packed {
            self.store.update_access(&sm.memory.id, now)?;
        }

        tracing::info!(query, returned = packed.len(), "recall complete");
        Ok(packed)
    }

    /// Boost a memory's strength by reinforcement and bump its access stats.
    /// A silent no-op if `memory_id` is unknown.
    pub fn reinforce(&self, memory_id: &str) -> Result<()> {
        let Some(mut mem) = self.store.get_memory(memory_id)? else {
            return Ok(());
        };
        let now = now_secs();
        mem.strength = (mem.strength + REINFORCE_STEP).min(1.0);
        mem.access_count += 1;
        mem.last_accessed = Some(now);
        mem.updated_at = now;
        self.store.update_memory(&mem)?;
        Ok(())
    }

    /// Mark `old_id` as superseded and link `new_id -> old_id` with
    /// `same_as`. Does not validate that `new_id` exists: the edge insert's
    /// foreign-key check is the only enforcement point, matching `link`'s
    /// general no-pre-check contract.
    pub fn supersede(&self, old_id: &str, new_id: &str) -> Result<()> {
        if let Some(mut old) = self.store.get_memory(old_id)? {
            old.status = MemoryStatus::Superseded;
            old.updated_at = now_secs();
            self.store.update_memory(&old)?;
        }
        self.link(new_id, old_id, "same_as", SUPERSEDE_WEIGHT)?;
        Ok(())
    }

    /// Link two memories as mutually contradicting.
    pub fn contradict(&self, id_a: &str, id_b: &str) -> Result<()> {
        self.link(id_a, id_b, "contradicts", CONTRADICT_WEIGHT)?;
        Ok(())
    }

    /// Apply natural strength decay to every memory whose `updated_at` is at
    /// least `DECAY_MIN_DAYS` old. Not transactional across memories; each
    /// row commits independently.
    pub fn decay_all(&self) -> Result<()> {
        let now = now_secs();
        let memories = self.store.all_memories()?;
        let mut decayed = 0usize;
        for mut mem in memories {
            let days = (now - mem.updated_at) / SECONDS_PER_DAY;
            if days < DECAY_MIN_DAYS {
                continue;
            }
            let decay = (-ALPHA_DECAY * days).exp();
            mem.strength = (mem.strength * decay).clamp(0.0, 1.0);
            self.store.update_memory(&mem)?;
            decayed += 1;
        }
        tracing::info!(decayed, "decay_all complete");
        Ok(())
    }

    /// Summary statistics over the whole store, regardless of status.
    pub fn stats(&self) -> Result<Stats> {
        let memories = self.store.all_memories()?;
        let mut unique_edges: HashMap<String, ()> = HashMap::new();
        for mem in &memories {
            for edge in self.store.get_edges(&mem.id)? {
                unique_edges.insert(edge.id, ());
            }
        }

        let strengths: Vec<f64> = memories.iter().map(|m| m.strength).collect();
        let avg_strength = if strengths.is_empty() {
            0.0
        } else {
            strengths.iter().sum::<f64>() / strengths.len() as f64
        };

        Ok(Stats {
            memory_count: memories.len(),
            edge_count: unique_edges.len(),
            avg_strength,
            active_count: memories.iter().filter(|m| m.status == MemoryStatus::Active).count(),
            superseded_count: memories.iter().filter(|m| m.status == MemoryStatus::Superseded).count(),
            contradicted_count: memories.iter().filter(|m| m.status == MemoryStatus::Contradicted).count(),
        })
    }
}
