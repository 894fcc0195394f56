//! Engine configuration
//!
//! Weight maps, decay constants, and the chars-per-token heuristic live on
//! values passed at construction rather than module-level globals.

use std::collections::HashMap;
use std::path::PathBuf;

/// Environment variable the surrounding CLI/tool server reads to locate the
/// database. The engine itself never reads this directly — `from_env` is a
/// convenience for whichever out-of-scope front-end wants it.
pub const OPENMEM_DB_ENV: &str = "OPENMEM_DB";

/// Competition weights for `scoring::compete`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub activation: f64,
    pub recency: f64,
    pub strength: f64,
    pub confidence: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            activation: 0.5,
            recency: 0.2,
            strength: 0.2,
            confidence: 0.1,
        }
    }
}

impl Weights {
    /// Build from a sparse override map, falling back to defaults for any
    /// key the caller omits.
    pub fn with_overrides(overrides: &HashMap<String, f64>) -> Self {
        let mut w = Weights::default();
        if let Some(v) = overrides.get("activation") {
            w.activation = *v;
        }
        if let Some(v) = overrides.get("recency") {
            w.recency = *v;
        }
        if let Some(v) = overrides.get("strength") {
            w.strength = *v;
        }
        if let Some(v) = overrides.get("confidence") {
            w.confidence = *v;
        }
        w
    }
}

/// Engine-wide tunables, fixed at construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Breadth limit for spreading activation.
    pub max_hops: u32,
    /// Per-hop multiplicative decay applied during spreading activation.
    pub decay_per_hop: f64,
    /// Competition weights; `None` uses `Weights::default()` at call time.
    pub weights: Option<Weights>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_hops: 2,
            decay_per_hop: 0.5,
            weights: None,
        }
    }
}

/// Resolve the database path the way the surrounding CLI/tool server would:
/// `OPENMEM_DB` if set, otherwise `~/.openmem/memories.db`. Ensures the
/// parent directory exists.
///
/// Not called by `Engine` itself — `Engine::new` takes an explicit path (or
/// the `":memory:"` sentinel) so the core library never depends on process
/// environment.
pub fn db_path_from_env() -> std::io::Result<PathBuf> {
    let path = match std::env::var(OPENMEM_DB_ENV) {
        Ok(v) if !v.is_empty() => PathBuf::from(v),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".openmem")
            .join("memories.db"),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(path)
}
