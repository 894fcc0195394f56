//! Edge - a typed, weighted relationship between two memories

use serde::{Deserialize, Serialize};

use super::memory::MemoryId;

/// A directed relationship between two memories.
///
/// Edges are undirected for traversal (`Store::get_neighbors` yields the
/// other endpoint regardless of direction) but direction is preserved in
/// storage and display. Duplicate edges are permitted; the graph may have
/// multi-edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source_id: MemoryId,
    pub target_id: MemoryId,
    pub rel_type: String,
    pub weight: f64,
    pub created_at: f64,
}
