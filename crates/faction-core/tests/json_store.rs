//! File store persistence across engine runs

use faction_core::setup;
use faction_core::store::json::{EVENTS_FILE, WORLD_FILE};
use faction_core::{JsonFileStore, TurnEngine, WorldStore};
use faction_events::{EventId, Resources};
use tempfile::TempDir;

#[test]
fn test_engine_run_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let (factions, events) = {
        let mut store = JsonFileStore::open(dir.path()).unwrap();
        setup::seed_world(&mut store, &Resources::default()).unwrap();

        let mut engine = TurnEngine::with_seed(store, 77);
        for _ in 0..6 {
            let outcome = engine.run_turn().unwrap();
            assert!(outcome.is_clean());
        }
        let store = engine.into_store();
        (
            store.list_all_factions().unwrap(),
            store.list_events().unwrap(),
        )
    };

    assert!(dir.path().join(WORLD_FILE).exists());
    assert!(dir.path().join(EVENTS_FILE).exists());

    let store = JsonFileStore::open(dir.path()).unwrap();
    assert_eq!(store.current_turn().unwrap(), 6);
    assert_eq!(store.list_all_factions().unwrap(), factions);
    assert_eq!(store.list_events().unwrap(), events);
    assert_eq!(store.events_for_turn(5).unwrap().len(), events.iter().filter(|e| e.turn == 5).count());
}

#[test]
fn test_reopened_world_keeps_counting() {
    let dir = TempDir::new().unwrap();
    let appended = {
        let mut store = JsonFileStore::open(dir.path()).unwrap();
        setup::seed_world(&mut store, &Resources::default()).unwrap();
        let mut engine = TurnEngine::with_seed(store, 5).with_decay_chance(0.0);
        engine.run_turn().unwrap().events.len() as u64
    };

    let mut engine = TurnEngine::with_seed(JsonFileStore::open(dir.path()).unwrap(), 5)
        .with_decay_chance(0.0);
    let outcome = engine.run_turn().unwrap();
    assert_eq!(outcome.turn, 1);
    assert_eq!(outcome.events[0].id, Some(EventId(appended + 1)));
}
