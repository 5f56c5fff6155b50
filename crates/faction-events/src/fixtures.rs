//! Sample data fixtures for testing.
//!
//! This module provides ready-made test data for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // faction-events = { path = "../faction-events", features = ["test-fixtures"] }
//!
//! use faction_events::fixtures;
//!
//! let world = fixtures::sample_world();
//! let events = fixtures::sample_events();
//! ```

use crate::{Alignment, Faction, FactionId, FactionType, Resources, WorldEvent, WorldSnapshot};

/// Returns the sample world from the fixtures file.
///
/// Contains 5 factions (4 active, the Ashfang Horde inactive), 2
/// relationships, and a turn counter of 4.
pub fn sample_world() -> WorldSnapshot {
    let json = include_str!("../tests/fixtures/sample_world.json");
    serde_json::from_str(json).expect("Failed to parse sample_world.json")
}

/// Returns sample events from the fixtures file.
///
/// Contains 3 events from turn 3: a recruitment, a raid, and a decay event.
pub fn sample_events() -> Vec<WorldEvent> {
    let jsonl = include_str!("../tests/fixtures/sample_events.jsonl");
    jsonl
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            WorldEvent::from_jsonl(l).unwrap_or_else(|e| {
                panic!("Failed to parse event line: {}\nError: {}", l, e)
            })
        })
        .collect()
}

/// Builds an active, neutral faction with exact resources.
pub fn faction(id: u32, name: &str, gold: u32, troops: u32, magic: u32, influence: u32) -> Faction {
    Faction::new(FactionId(id), name, FactionType::Clan, Alignment::TrueNeutral)
        .with_resources(Resources::new(gold, troops, magic, influence))
}

/// Builds an active faction with a chosen alignment and exact resources.
pub fn aligned_faction(id: u32, name: &str, alignment: Alignment, resources: Resources) -> Faction {
    Faction::new(FactionId(id), name, FactionType::Kingdom, alignment).with_resources(resources)
}

/// Builds a faction whose strength is exactly `strength`, held entirely in troops.
pub fn faction_with_strength(id: u32, name: &str, strength: u32) -> Faction {
    faction(id, name, 0, strength, 0, 0)
}
