//! Directory-backed Store
//!
//! A world directory holds `world.json` (factions, relationships, turn
//! counter, id counters) and `events.jsonl` (the append-only event log).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use faction_events::{
    EventId, Faction, FactionDraft, FactionId, Relationship, RelationshipId, WorldEvent,
    WorldSnapshot,
};
use tracing::{debug, info};

use super::{EventLog, MemoryStore, StoreError, StoreResult, WorldStore};

pub const WORLD_FILE: &str = "world.json";
pub const EVENTS_FILE: &str = "events.jsonl";

/// World store persisted as files in one directory
pub struct JsonFileStore {
    dir: PathBuf,
    world: MemoryStore,
    log: EventLog,
}

impl JsonFileStore {
    /// Open the world in `dir`, creating an empty one if nothing is there yet
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let snapshot = read_snapshot(&dir.join(WORLD_FILE))?;
        let events = EventLog::read_all(dir.join(EVENTS_FILE))?;
        info!(
            "Opened world at {} (turn {}, {} factions, {} events)",
            dir.display(),
            snapshot.current_turn,
            snapshot.factions.len(),
            events.len()
        );

        let world = MemoryStore::from_snapshot(snapshot, events);
        let log = EventLog::open(dir.join(EVENTS_FILE))?;
        Ok(Self { dir, world, log })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn snapshot(&self) -> &WorldSnapshot {
        self.world.snapshot()
    }

    /// Apply a write to the in-memory world and persist it, or leave both
    /// untouched on failure. Writes never touch the event log, so only the
    /// snapshot is kept for rollback.
    fn write<T>(&mut self, op: impl FnOnce(&mut MemoryStore) -> StoreResult<T>) -> StoreResult<T> {
        let before = self.world.snapshot().clone();
        let result = op(&mut self.world).and_then(|value| {
            self.persist_world()?;
            Ok(value)
        });
        if result.is_err() {
            self.world.restore_snapshot(before);
        }
        result
    }

    /// Write `world.json` through a temporary file so a crash never leaves a
    /// half-written world behind
    pub fn persist_world(&self) -> StoreResult<()> {
        let path = self.dir.join(WORLD_FILE);
        let tmp = self.dir.join(format!("{}.tmp", WORLD_FILE));
        let json = serde_json::to_string_pretty(self.world.snapshot()).map_err(|source| {
            StoreError::Malformed {
                path: path.clone(),
                source,
            }
        })?;

        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("Saved {}", path.display());
        Ok(())
    }
}

fn read_snapshot(path: &Path) -> StoreResult<WorldSnapshot> {
    match fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(WorldSnapshot::default()),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl WorldStore for JsonFileStore {
    fn list_active_factions(&self) -> StoreResult<Vec<Faction>> {
        self.world.list_active_factions()
    }

    fn list_all_factions(&self) -> StoreResult<Vec<Faction>> {
        self.world.list_all_factions()
    }

    fn get_faction(&self, id: FactionId) -> StoreResult<Option<Faction>> {
        self.world.get_faction(id)
    }

    fn insert_faction(&mut self, draft: FactionDraft) -> StoreResult<Faction> {
        self.write(|world| world.insert_faction(draft))
    }

    fn save_or_update_faction(&mut self, faction: &Faction) -> StoreResult<()> {
        self.write(|world| world.save_or_update_faction(faction))
    }

    fn delete_faction(&mut self, id: FactionId) -> StoreResult<()> {
        self.write(|world| world.delete_faction(id))
    }

    fn append_relationship(&mut self, relationship: &Relationship) -> StoreResult<RelationshipId> {
        self.write(|world| world.append_relationship(relationship))
    }

    fn list_relationships(&self) -> StoreResult<Vec<Relationship>> {
        self.world.list_relationships()
    }

    fn update_relationship(&mut self, relationship: &Relationship) -> StoreResult<()> {
        self.write(|world| world.update_relationship(relationship))
    }

    /// Event ids are recovered from the log itself on reopen, so only the log
    /// file is written here
    fn append_world_event(&mut self, event: &WorldEvent) -> StoreResult<EventId> {
        let id = self.world.append_world_event(event)?;
        if let Err(e) = self.log.append(&event.clone().with_id(id)) {
            self.world.rollback_event(id);
            return Err(e);
        }
        Ok(id)
    }

    fn list_events(&self) -> StoreResult<Vec<WorldEvent>> {
        self.world.list_events()
    }

    fn events_for_turn(&self, turn: u64) -> StoreResult<Vec<WorldEvent>> {
        self.world.events_for_turn(turn)
    }

    fn current_turn(&self) -> StoreResult<u64> {
        self.world.current_turn()
    }

    fn advance_turn(&mut self) -> StoreResult<u64> {
        self.write(|world| world.advance_turn())
    }
}
