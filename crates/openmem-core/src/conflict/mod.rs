//! Conflict resolution
//!
//! Scans a scored result set for `contradicts` edges between memories that
//! both made the cut, and demotes whichever side is weaker.

use std::collections::HashSet;

use crate::model::{MemoryId, ScoredMemory};
use crate::scoring::recency_score;
use crate::store::SqliteStore;

/// Score multiplier applied to the loser of a `contradicts` pair.
const DEMOTION_MULTIPLIER: f64 = 0.3;

/// Demote the weaker side of every `contradicts` edge connecting two
/// memories present in `scored`. Strength is `strength * confidence *
/// recency`; ties favor the edge's target side (the `b` in `a -> b`). Each
/// memory is demoted at most once even if it loses multiple contradicts
/// edges. Returns a re-sorted copy; input with fewer than two entries is
/// returned unchanged.
pub fn resolve(scored: Vec<ScoredMemory>, store: &SqliteStore, now: f64) -> crate::store::Result<Vec<ScoredMemory>> {
    if scored.len() < 2 {
        return Ok(scored);
    }

    let id_set: HashSet<MemoryId> = scored.iter().map(|s| s.memory.id.clone()).collect();
    let mut demoted: HashSet<MemoryId> = HashSet::new();

    for sm in &scored {
        for edge in store.get_edges(&sm.memory.id)? {
            if edge.rel_type != "contradicts" {
                continue;
            }
            let other_id = if edge.source_id == sm.memory.id {
                edge.target_id.clone()
            } else {
                edge.source_id.clone()
            };
            if !id_set.contains(&other_id) || demoted.contains(&other_id) || demoted.contains(&sm.memory.id) {
                continue;
            }

            let other = scored.iter().find(|s| s.memory.id == other_id).expect("in id_set");
            let rank_a = sm.memory.strength * sm.memory.confidence * recency_score(&sm.memory, now);
            let rank_b = other.memory.strength * other.memory.confidence * recency_score(&other.memory, now);

            let loser_id = if rank_a >= rank_b { other.memory.id.clone() } else { sm.memory.id.clone() };
            demoted.insert(loser_id);
        }
    }

    let mut result: Vec<ScoredMemory> = scored
        .into_iter()
        .map(|mut sm| {
            if demoted.contains(&sm.memory.id) {
                sm.score *= DEMOTION_MULTIPLIER;
                sm.components.conflict_demoted = true;
            }
            sm
        })
        .collect();

    result.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    Ok(result)
}
