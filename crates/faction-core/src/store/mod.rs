//! World Persistence
//!
//! The read/write contract the turn engine and the administrative operations
//! consume, plus two implementations: an in-process [`MemoryStore`] and a
//! directory-backed [`JsonFileStore`].

pub mod event_log;
pub mod json;
pub mod memory;

use std::path::PathBuf;

use faction_events::{
    EventId, Faction, FactionDraft, FactionId, Relationship, RelationshipId, WorldEvent,
};
use thiserror::Error;

pub use event_log::EventLog;
pub use json::JsonFileStore;
pub use memory::MemoryStore;

/// Errors reported by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed world data in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed event on line {line} of {path}: {source}")]
    MalformedEvent {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown faction {0}")]
    UnknownFaction(FactionId),
    #[error("unknown relationship {0}")]
    UnknownRelationship(RelationshipId),
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error("write rejected: {0}")]
    Rejected(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence collaborator for factions, relationships, events, and the turn
/// counter.
///
/// Reads take `&self`; every write takes `&mut self` and either fully applies
/// or returns an error.
pub trait WorldStore {
    /// Active factions, ordered by id
    fn list_active_factions(&self) -> StoreResult<Vec<Faction>>;

    /// Every faction including inactive ones, ordered by id
    fn list_all_factions(&self) -> StoreResult<Vec<Faction>>;

    fn get_faction(&self, id: FactionId) -> StoreResult<Option<Faction>>;

    /// Store a new faction and assign its id
    fn insert_faction(&mut self, draft: FactionDraft) -> StoreResult<Faction>;

    /// Overwrite the stored faction with the same id, or insert it under that id
    fn save_or_update_faction(&mut self, faction: &Faction) -> StoreResult<()>;

    /// Remove a faction permanently
    fn delete_faction(&mut self, id: FactionId) -> StoreResult<()>;

    /// Store a new relationship and assign its id
    fn append_relationship(&mut self, relationship: &Relationship) -> StoreResult<RelationshipId>;

    fn list_relationships(&self) -> StoreResult<Vec<Relationship>>;

    /// Overwrite type and strength of a stored relationship
    fn update_relationship(&mut self, relationship: &Relationship) -> StoreResult<()>;

    /// Append to the event log and assign the event's id
    fn append_world_event(&mut self, event: &WorldEvent) -> StoreResult<EventId>;

    /// The whole event log, newest turn first (append order reversed)
    fn list_events(&self) -> StoreResult<Vec<WorldEvent>>;

    /// Events of one turn in the order they were appended
    fn events_for_turn(&self, turn: u64) -> StoreResult<Vec<WorldEvent>> {
        let mut events: Vec<_> = self
            .list_events()?
            .into_iter()
            .filter(|e| e.turn == turn)
            .collect();
        events.reverse();
        Ok(events)
    }

    fn current_turn(&self) -> StoreResult<u64>;

    /// Increment the turn counter by one and return the new value
    fn advance_turn(&mut self) -> StoreResult<u64>;
}

impl<S: WorldStore + ?Sized> WorldStore for &mut S {
    fn list_active_factions(&self) -> StoreResult<Vec<Faction>> {
        (**self).list_active_factions()
    }

    fn list_all_factions(&self) -> StoreResult<Vec<Faction>> {
        (**self).list_all_factions()
    }

    fn get_faction(&self, id: FactionId) -> StoreResult<Option<Faction>> {
        (**self).get_faction(id)
    }

    fn insert_faction(&mut self, draft: FactionDraft) -> StoreResult<Faction> {
        (**self).insert_faction(draft)
    }

    fn save_or_update_faction(&mut self, faction: &Faction) -> StoreResult<()> {
        (**self).save_or_update_faction(faction)
    }

    fn delete_faction(&mut self, id: FactionId) -> StoreResult<()> {
        (**self).delete_faction(id)
    }

    fn append_relationship(&mut self, relationship: &Relationship) -> StoreResult<RelationshipId> {
        (**self).append_relationship(relationship)
    }

    fn list_relationships(&self) -> StoreResult<Vec<Relationship>> {
        (**self).list_relationships()
    }

    fn update_relationship(&mut self, relationship: &Relationship) -> StoreResult<()> {
        (**self).update_relationship(relationship)
    }

    fn append_world_event(&mut self, event: &WorldEvent) -> StoreResult<EventId> {
        (**self).append_world_event(event)
    }

    fn list_events(&self) -> StoreResult<Vec<WorldEvent>> {
        (**self).list_events()
    }

    fn events_for_turn(&self, turn: u64) -> StoreResult<Vec<WorldEvent>> {
        (**self).events_for_turn(turn)
    }

    fn current_turn(&self) -> StoreResult<u64> {
        (**self).current_turn()
    }

    fn advance_turn(&mut self) -> StoreResult<u64> {
        (**self).advance_turn()
    }
}
