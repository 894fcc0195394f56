//! Spreading activation
//!
//! Propagates activation outward from a set of seed memories (typically
//! BM25 hits) across the edge graph, decaying per hop, so memories related
//! to a lexical match but not themselves matching the query text can still
//! surface during recall.

use std::collections::{HashMap, HashSet};

use crate::model::MemoryId;
use crate::store::SqliteStore;

/// Spread `seed_activations` across the graph for up to `max_hops` hops,
/// decaying by `decay_per_hop` per hop. A candidate's activation is the max
/// over all paths that reach it — never lowered once set, including for
/// seeds, which keep their seed value even if a cheaper path would have
/// produced less. Stops early once a hop's frontier produces no new or
/// improved activations. `max_hops = 0` returns the seeds unchanged.
pub fn spread(
    seed_activations: &HashMap<MemoryId, f64>,
    store: &SqliteStore,
    max_hops: u32,
    decay_per_hop: f64,
) -> crate::store::Result<HashMap<MemoryId, f64>> {
    let mut activations = seed_activations.clone();
    let mut frontier: HashSet<MemoryId> = seed_activations.keys().cloned().collect();

    for hop in 0..max_hops {
        let mut next_frontier: HashSet<MemoryId> = HashSet::new();
        for node_id in &frontier {
            let node_activation = activations[node_id];
            for (edge, neighbor) in store.get_neighbors(node_id)? {
                let spread_value = node_activation * edge.weight * decay_per_hop.powi(hop as i32 + 1);
                let current = activations.get(&neighbor.id).copied().unwrap_or(0.0);
                if spread_value > current {
                    activations.insert(neighbor.id.clone(), spread_value);
                    next_frontier.insert(neighbor.id);
                }
            }
        }
        frontier = next_frontier;
        if frontier.is_empty() {
            break;
        }
    }

    Ok(activations)
}
