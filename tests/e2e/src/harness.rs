//! Test engine manager
//!
//! Provides isolated, temp-directory-backed `Engine` instances for
//! integration tests.

use openmem_core::{Engine, EngineConfig};
use tempfile::TempDir;

/// Manager for a test engine backed by an on-disk temp database.
///
/// The temp directory is kept alive for the manager's lifetime and removed
/// on drop; `Engine::new` with the `":memory:"` sentinel is used directly by
/// most tests instead, since a fresh on-disk path only matters when a test
/// needs a real file to decay, reopen, or inspect on disk.
pub struct TestEngineManager {
    pub engine: Engine,
    _temp_dir: TempDir,
}

impl TestEngineManager {
    /// Create a new test engine in a fresh temporary directory.
    pub fn new_temp() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let db_path = temp_dir.path().join("test_openmem.db");
        let engine = Engine::new(&db_path, config).expect("failed to open test engine");
        Self {
            engine,
            _temp_dir: temp_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_engine_starts_empty() {
        let db = TestEngineManager::new_temp();
        let stats = db.engine.stats().unwrap();
        assert_eq!(stats.memory_count, 0);
    }
}
