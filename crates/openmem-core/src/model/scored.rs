//! ScoredMemory - transient recall result

use serde::{Deserialize, Serialize};

use super::memory::Memory;

/// Named breakdown of a competition score's components, for observability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponents {
    /// Normalized activation in `[0, 1]`.
    pub activation: f64,
    /// Recency score in `[0, 1]` (not normalized against the candidate set).
    pub recency: f64,
    /// Normalized strength in `[0, 1]`.
    pub strength: f64,
    /// Confidence as stored on the memory (not normalized).
    pub confidence: f64,
    /// Set by conflict resolution when this memory lost a `contradicts` pair.
    pub conflict_demoted: bool,
}

/// A memory scored and ranked during one `recall` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredMemory {
    pub memory: Memory,
    /// Raw (un-normalized) post-spread activation.
    pub activation: f64,
    /// Final competition score, after the status penalty and any conflict
    /// demotion.
    pub score: f64,
    pub components: ScoreComponents,
}
