//! Integration tests for the top-level `Engine` API.

use openmem_core::{Engine, EngineConfig, MemoryStatus};
use openmem_e2e_tests::harness::TestEngineManager;

#[test]
fn add_and_recall() {
    let engine = Engine::new(":memory:", EngineConfig::default()).unwrap();
    engine
        .add("Python is a popular programming language", "fact", vec!["Python".into()], 1.0, None)
        .unwrap();
    engine
        .add("JavaScript runs in the browser", "fact", vec!["JavaScript".into()], 1.0, None)
        .unwrap();

    let results = engine.recall("Python programming", 5, 2_000).unwrap();
    assert!(!results.is_empty());
    assert!(results[0].memory.text.contains("Python"));
}

#[test]
fn linked_memories_boost_via_spreading_activation() {
    let engine = Engine::new(":memory:", EngineConfig::default()).unwrap();
    let m1 = engine
        .add(
            "We chose SQLite over Postgres for simplicity",
            "decision",
            vec!["SQLite".into(), "Postgres".into()],
            1.0,
            None,
        )
        .unwrap();
    let m2 = engine
        .add("Postgres has better concurrent write support", "fact", vec!["Postgres".into()], 1.0, None)
        .unwrap();
    engine.link(&m1.id, &m2.id, "supports", 0.8).unwrap();

    let results = engine.recall("Why did we pick SQLite?", 5, 2_000).unwrap();
    assert!(results.iter().any(|r| r.memory.id == m1.id));
}

#[test]
fn recall_respects_top_k() {
    let engine = Engine::new(":memory:", EngineConfig::default()).unwrap();
    for i in 0..20 {
        engine
            .add(format!("Memory number {i} about testing recall limits"), "fact", vec![], 1.0, None)
            .unwrap();
    }
    let results = engine.recall("testing recall", 3, 2_000).unwrap();
    assert!(results.len() <= 3);
}

#[test]
fn recall_respects_token_budget() {
    let engine = Engine::new(":memory:", EngineConfig::default()).unwrap();
    for i in 0..20 {
        engine
            .add(format!("Memory {i}: some moderately long text about topic X and Y"), "fact", vec![], 1.0, None)
            .unwrap();
    }
    let results = engine.recall("topic", 20, 50).unwrap();
    assert!(results.len() < 20);
}

#[test]
fn reinforce_bumps_access_count_and_keeps_strength_in_range() {
    let engine = Engine::new(":memory:", EngineConfig::default()).unwrap();
    let m = engine.add("reinforceable memory", "fact", vec![], 0.8, None).unwrap();

    engine.reinforce(&m.id).unwrap();
    let results = engine.recall("reinforceable memory", 1, 2_000).unwrap();
    assert_eq!(results[0].memory.access_count, 1);
    assert!(results[0].memory.strength <= 1.0);
}

#[test]
fn reinforce_unknown_id_is_silent_noop() {
    let engine = Engine::new(":memory:", EngineConfig::default()).unwrap();
    assert!(engine.reinforce("does-not-exist").is_ok());
}

#[test]
fn supersede_marks_old_as_superseded_and_penalizes_it() {
    let engine = Engine::new(":memory:", EngineConfig::default()).unwrap();
    let old = engine.add("The API uses v1 endpoints", "fact", vec![], 1.0, None).unwrap();
    let new = engine.add("The API has been upgraded to v2 endpoints", "fact", vec![], 1.0, None).unwrap();
    engine.supersede(&old.id, &new.id).unwrap();

    let results = engine.recall("API endpoints", 5, 2_000).unwrap();
    if results.len() >= 2 {
        let score_old = results.iter().find(|r| r.memory.id == old.id).map(|r| r.score);
        let score_new = results.iter().find(|r| r.memory.id == new.id).map(|r| r.score);
        if let (Some(so), Some(sn)) = (score_old, score_new) {
            assert!(sn > so);
        }
    }
}

#[test]
fn contradict_penalizes_lower_confidence_side() {
    let engine = Engine::new(":memory:", EngineConfig::default()).unwrap();
    let a = engine.add("The system uses REST", "decision", vec![], 0.9, None).unwrap();
    let b = engine.add("The system uses GraphQL", "decision", vec![], 0.5, None).unwrap();
    engine.contradict(&a.id, &b.id).unwrap();

    let results = engine.recall("system API protocol", 5, 2_000).unwrap();
    if results.len() >= 2 {
        let ids: Vec<_> = results.iter().map(|r| r.memory.id.clone()).collect();
        if ids.contains(&a.id) && ids.contains(&b.id) {
            let score_a = results.iter().find(|r| r.memory.id == a.id).unwrap().score;
            let score_b = results.iter().find(|r| r.memory.id == b.id).unwrap().score;
            assert!(score_a > score_b);
        }
    }
}

#[test]
fn decay_all_leaves_fresh_memories_effectively_untouched() {
    let db = TestEngineManager::new_temp();
    db.engine.add("decayable memory", "fact", vec![], 1.0, None).unwrap();

    db.engine.decay_all().unwrap();
    let stats = db.engine.stats().unwrap();
    assert_eq!(stats.memory_count, 1);
    assert!((stats.avg_strength - 1.0).abs() < 1e-6);
}

#[test]
fn stats_reports_memory_and_edge_counts() {
    let engine = Engine::new(":memory:", EngineConfig::default()).unwrap();
    let m1 = engine.add("first memory", "fact", vec![], 1.0, None).unwrap();
    let m2 = engine.add("second memory", "fact", vec![], 1.0, None).unwrap();
    engine.link(&m1.id, &m2.id, "supports", 0.5).unwrap();

    let stats = engine.stats().unwrap();
    assert_eq!(stats.memory_count, 2);
    assert_eq!(stats.edge_count, 1);
    assert_eq!(stats.active_count, 2);
}

#[test]
fn empty_recall_returns_empty_vec() {
    let engine = Engine::new(":memory:", EngineConfig::default()).unwrap();
    assert!(engine.recall("nothing here", 5, 2_000).unwrap().is_empty());
}

#[test]
fn access_count_bumped_on_successful_recall() {
    let engine = Engine::new(":memory:", EngineConfig::default()).unwrap();
    let m = engine.add("findable memory about bananas", "fact", vec![], 1.0, None).unwrap();
    assert_eq!(m.access_count, 0);

    let results = engine.recall("bananas", 5, 2_000).unwrap();
    assert!(!results.is_empty());
    assert!(results[0].memory.access_count >= 1);
}

#[test]
fn full_pipeline_smoke_test() {
    let engine = Engine::new(":memory:", EngineConfig::default()).unwrap();
    let m1 = engine
        .add(
            "We chose SQLite over Postgres for simplicity",
            "decision",
            vec!["SQLite".into(), "Postgres".into()],
            1.0,
            None,
        )
        .unwrap();
    let m2 = engine
        .add("Postgres has better concurrent write support", "fact", vec!["Postgres".into()], 1.0, None)
        .unwrap();
    let m3 = engine.add("The team prefers simple tools over complex ones", "preference", vec![], 1.0, None).unwrap();
    engine.link(&m1.id, &m2.id, "supports", 0.5).unwrap();
    engine.link(&m1.id, &m3.id, "supports", 0.5).unwrap();

    let results = engine.recall("Why did we pick SQLite?", 5, 2_000).unwrap();
    assert!(!results.is_empty());
    assert!(results.iter().any(|r| r.memory.text.contains("SQLite")));

    for window in results.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
}

#[test]
fn superseded_status_survives_round_trip() {
    let engine = Engine::new(":memory:", EngineConfig::default()).unwrap();
    let old = engine.add("old fact", "fact", vec![], 1.0, None).unwrap();
    let new = engine.add("new fact", "fact", vec![], 1.0, None).unwrap();
    engine.supersede(&old.id, &new.id).unwrap();

    // Re-add a memory and re-check via a fresh recall to confirm status persists.
    let results = engine.recall("old fact", 5, 2_000).unwrap();
    let found = results.iter().find(|r| r.memory.id == old.id);
    if let Some(r) = found {
        assert_eq!(r.memory.status, MemoryStatus::Superseded);
    }
}

#[test]
fn engine_survives_reopen_at_same_path() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let db_path = temp_dir.path().join("reopen_test.db");

    {
        let engine = Engine::new(&db_path, EngineConfig::default()).unwrap();
        engine.add("durable fact", "fact", vec![], 1.0, None).unwrap();
    }

    let engine = Engine::new(&db_path, EngineConfig::default()).unwrap();
    let stats = engine.stats().unwrap();
    assert_eq!(stats.memory_count, 1);
    let results = engine.recall("durable fact", 5, 2_000).unwrap();
    assert!(!results.is_empty());
}
