//! Snapshot Types
//!
//! Serialization structs for the persisted world state.
//!
//! A snapshot captures everything except the event log: factions,
//! relationships, the turn counter, and the id counters stores use to hand out
//! new identities.

use serde::{Deserialize, Serialize};

use crate::{Faction, FactionId, Relationship};

/// Format version written into every snapshot
pub const SNAPSHOT_VERSION: u32 = 1;

/// Next identities to hand out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounters {
    pub next_faction_id: u32,
    pub next_relationship_id: u32,
    pub next_event_id: u64,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self {
            next_faction_id: 1,
            next_relationship_id: 1,
            next_event_id: 1,
        }
    }
}

/// Persisted world state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub current_turn: u64,
    #[serde(default)]
    pub counters: IdCounters,
    #[serde(default)]
    pub factions: Vec<Faction>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl Default for WorldSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            current_turn: 0,
            counters: IdCounters::default(),
            factions: Vec::new(),
            relationships: Vec::new(),
        }
    }
}

impl WorldSnapshot {
    pub fn faction(&self, id: FactionId) -> Option<&Faction> {
        self.factions.iter().find(|f| f.id == id)
    }

    pub fn active_factions(&self) -> impl Iterator<Item = &Faction> {
        self.factions.iter().filter(|f| f.active)
    }

    /// Sum of every active faction's strength
    pub fn total_strength(&self) -> u64 {
        self.active_factions().map(Faction::strength).sum()
    }
}
