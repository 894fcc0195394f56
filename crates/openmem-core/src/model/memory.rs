//! Memory - the fundamental unit of remembered content

use serde::{Deserialize, Serialize};

/// Opaque 128-bit identifier, rendered as a UUID v4 hex string.
pub type MemoryId = String;

/// Lifecycle status of a memory.
///
/// Unlike `memory_type`, this is a closed vocabulary: every status a memory
/// can reach is produced by the engine itself (`add`, `supersede`,
/// `contradict`), never supplied verbatim by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemoryStatus {
    #[default]
    Active,
    Superseded,
    Contradicted,
    Deleted,
}

impl MemoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryStatus::Active => "active",
            MemoryStatus::Superseded => "superseded",
            MemoryStatus::Contradicted => "contradicted",
            MemoryStatus::Deleted => "deleted",
        }
    }

    /// Parse from a stored string. Unknown values fall back to `Active` so
    /// that scoring's status penalty treats them as 1.0, the default for
    /// any status it doesn't recognize.
    pub fn parse_name(s: &str) -> Self {
        match s {
            "active" => MemoryStatus::Active,
            "superseded" => MemoryStatus::Superseded,
            "contradicted" => MemoryStatus::Contradicted,
            "deleted" => MemoryStatus::Deleted,
            _ => MemoryStatus::Active,
        }
    }
}

impl std::fmt::Display for MemoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of remembered content.
///
/// `memory_type` is an open vocabulary on purpose: a free string, accepted
/// and preserved but carrying no special semantics. Callers are free to
/// invent their own categories alongside
/// `fact | decision | preference | incident | plan | constraint`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: MemoryId,
    pub memory_type: String,
    pub text: String,
    pub gist: Option<String>,
    pub entities: Vec<String>,
    pub created_at: f64,
    pub updated_at: f64,
    pub last_accessed: Option<f64>,
    pub strength: f64,
    pub confidence: f64,
    pub access_count: i64,
    pub status: MemoryStatus,
}

impl Memory {
    /// True once `status` excludes the memory from retrieval.
    pub fn is_deleted(&self) -> bool {
        self.status == MemoryStatus::Deleted
    }
}
