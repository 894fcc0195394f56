//! Competition scoring
//!
//! Turns raw post-spread activation into a ranked list of `ScoredMemory`,
//! combining normalized activation and strength with un-normalized recency
//! and confidence, then applying a status penalty.

use std::collections::HashMap;

use crate::config::Weights;
use crate::model::{Memory, MemoryId, MemoryStatus, ScoreComponents, ScoredMemory};

/// Recency half-life constant: `exp(-LAMBDA_RECENCY * days_elapsed)`, tuned
/// for a roughly two-week half-life.
pub const LAMBDA_RECENCY: f64 = 0.05;
/// Natural strength decay rate used both here (for display) and in
/// `Engine::decay_all`.
pub const ALPHA_DECAY: f64 = 0.01;
/// Reinforcement exponent applied to `(1 + access_count)`.
pub const BETA_REINFORCE: f64 = 0.1;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Multiplicative penalty applied to a memory's competition score based on
/// its status. Statuses outside this table (including `deleted`, which
/// never reaches `compete` because recall filters it earlier) score 1.0.
pub fn status_penalty(status: MemoryStatus) -> f64 {
    match status {
        MemoryStatus::Active => 1.0,
        MemoryStatus::Superseded => 0.5,
        MemoryStatus::Contradicted => 0.3,
        MemoryStatus::Deleted => 1.0,
    }
}

/// Exponential recency decay from `last_accessed` if set, else `created_at`.
/// Negative elapsed time (a stored timestamp after `now`) clamps to 0 so the
/// score never exceeds 1.
pub fn recency_score(memory: &Memory, now: f64) -> f64 {
    let t_ref = memory.last_accessed.unwrap_or(memory.created_at);
    let days_elapsed = ((now - t_ref) / SECONDS_PER_DAY).max(0.0);
    (-LAMBDA_RECENCY * days_elapsed).exp()
}

/// Strength with reinforcement from access count and natural decay since
/// creation, clamped to `[0, 1]`.
pub fn strength_score(memory: &Memory, now: f64) -> f64 {
    let days_since_creation = (now - memory.created_at) / SECONDS_PER_DAY;
    let raw = memory.strength
        * (1.0 + memory.access_count as f64).powf(BETA_REINFORCE)
        * (-ALPHA_DECAY * days_since_creation).exp();
    raw.clamp(0.0, 1.0)
}

/// Min-max normalize to `[0, 1]`. An empty map returns empty; a map whose
/// values are all equal returns `1.0` for every key (rather than dividing by
/// a zero span).
fn normalize(values: &HashMap<MemoryId, f64>) -> HashMap<MemoryId, f64> {
    if values.is_empty() {
        return HashMap::new();
    }
    let max_v = values.values().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min_v = values.values().cloned().fold(f64::INFINITY, f64::min);
    let span = max_v - min_v;
    if span == 0.0 {
        return values.keys().map(|k| (k.clone(), 1.0)).collect();
    }
    values
        .iter()
        .map(|(k, v)| (k.clone(), (v - min_v) / span))
        .collect()
}

/// Score and rank activated memories. `memories` need not cover every key in
/// `activations`; ids without a loaded memory are silently skipped. Returns
/// results sorted by descending score.
pub fn compete(
    activations: &HashMap<MemoryId, f64>,
    memories: &HashMap<MemoryId, Memory>,
    weights: &Weights,
    now: f64,
) -> Vec<ScoredMemory> {
    if activations.is_empty() {
        return vec![];
    }

    let raw_activation: HashMap<MemoryId, f64> = activations
        .iter()
        .filter(|(mid, _)| memories.contains_key(*mid))
        .map(|(mid, v)| (mid.clone(), *v))
        .collect();

    let raw_recency: HashMap<MemoryId, f64> = raw_activation
        .keys()
        .map(|mid| (mid.clone(), recency_score(&memories[mid], now)))
        .collect();
    let raw_strength: HashMap<MemoryId, f64> = raw_activation
        .keys()
        .map(|mid| (mid.clone(), strength_score(&memories[mid], now)))
        .collect();

    let norm_activation = normalize(&raw_activation);
    let norm_strength = normalize(&raw_strength);

    let mut results: Vec<ScoredMemory> = raw_activation
        .keys()
        .map(|mid| {
            let mem = memories[mid].clone();
            let components = ScoreComponents {
                activation: norm_activation[mid],
                recency: raw_recency[mid],
                strength: norm_strength[mid],
                confidence: mem.confidence,
                conflict_demoted: false,
            };
            let mut score = weights.activation * components.activation
                + weights.recency * components.recency
                + weights.strength * components.strength
                + weights.confidence * components.confidence;
            score *= status_penalty(mem.status);

            ScoredMemory {
                activation: raw_activation[mid],
                score,
                memory: mem,
                components,
            }
        })
        .collect();

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results
}
