//! In-process Store
//!
//! Keeps the whole world in memory. Used directly by tests and as the working
//! state behind [`super::JsonFileStore`].

use std::cmp::Reverse;
use std::collections::HashSet;

use faction_events::{
    EventId, Faction, FactionDraft, FactionId, Relationship, RelationshipId, WorldEvent,
    WorldSnapshot,
};

use super::{StoreError, StoreResult, WorldStore};

/// Writes and reads the store has been told to refuse
#[derive(Debug, Clone, Default)]
struct Faults {
    rejected_factions: HashSet<FactionId>,
    reject_events: bool,
    reject_advance: bool,
    reject_reads: bool,
}

/// World store held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: WorldSnapshot,
    events: Vec<WorldEvent>,
    faults: Faults,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a persisted snapshot and its event log
    pub fn from_snapshot(mut snapshot: WorldSnapshot, events: Vec<WorldEvent>) -> Self {
        snapshot.factions.sort_by_key(|f| f.id);
        let mut store = Self {
            snapshot,
            events,
            faults: Faults::default(),
        };
        store.repair_counters();
        store
    }

    /// Store pre-built factions under their own ids
    pub fn with_factions(factions: impl IntoIterator<Item = Faction>) -> Self {
        let mut store = Self::new();
        for faction in factions {
            store.put_faction(faction);
        }
        store
    }

    pub fn snapshot(&self) -> &WorldSnapshot {
        &self.snapshot
    }

    /// Events in append order
    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn set_current_turn(&mut self, turn: u64) {
        self.snapshot.current_turn = turn;
    }

    /// Refuse every save of this faction from now on
    pub fn reject_saves_for(&mut self, id: FactionId) {
        self.faults.rejected_factions.insert(id);
    }

    pub fn reject_event_appends(&mut self) {
        self.faults.reject_events = true;
    }

    pub fn reject_turn_advance(&mut self) {
        self.faults.reject_advance = true;
    }

    pub fn reject_reads(&mut self) {
        self.faults.reject_reads = true;
    }

    pub fn clear_faults(&mut self) {
        self.faults = Faults::default();
    }

    /// Put back a snapshot taken before a failed write. Events are kept.
    pub(crate) fn restore_snapshot(&mut self, snapshot: WorldSnapshot) {
        self.snapshot = snapshot;
    }

    /// Undo the most recent append if it carries `id`
    pub(crate) fn rollback_event(&mut self, id: EventId) {
        if self.events.last().and_then(|e| e.id) == Some(id) {
            self.events.pop();
            self.snapshot.counters.next_event_id = id.0;
        }
    }

    fn check_reads(&self) -> StoreResult<()> {
        if self.faults.reject_reads {
            return Err(StoreError::Rejected("reads disabled".to_string()));
        }
        Ok(())
    }

    fn faction_index(&self, id: FactionId) -> Result<usize, usize> {
        self.snapshot.factions.binary_search_by_key(&id, |f| f.id)
    }

    fn put_faction(&mut self, faction: Faction) {
        let counters = &mut self.snapshot.counters;
        counters.next_faction_id = counters.next_faction_id.max(faction.id.0.saturating_add(1));
        match self.faction_index(faction.id) {
            Ok(index) => self.snapshot.factions[index] = faction,
            Err(index) => self.snapshot.factions.insert(index, faction),
        }
    }

    /// Make sure counters never hand out an id already in use
    fn repair_counters(&mut self) {
        let counters = &mut self.snapshot.counters;
        if let Some(max) = self.snapshot.factions.iter().map(|f| f.id.0).max() {
            counters.next_faction_id = counters.next_faction_id.max(max.saturating_add(1));
        }
        if let Some(max) = self.snapshot.relationships.iter().filter_map(|r| r.id).map(|id| id.0).max() {
            counters.next_relationship_id = counters.next_relationship_id.max(max.saturating_add(1));
        }
        if let Some(max) = self.events.iter().filter_map(|e| e.id).map(|id| id.0).max() {
            counters.next_event_id = counters.next_event_id.max(max.saturating_add(1));
        }
    }
}

impl WorldStore for MemoryStore {
    fn list_active_factions(&self) -> StoreResult<Vec<Faction>> {
        self.check_reads()?;
        Ok(self.snapshot.active_factions().cloned().collect())
    }

    fn list_all_factions(&self) -> StoreResult<Vec<Faction>> {
        self.check_reads()?;
        Ok(self.snapshot.factions.clone())
    }

    fn get_faction(&self, id: FactionId) -> StoreResult<Option<Faction>> {
        self.check_reads()?;
        Ok(self.snapshot.faction(id).cloned())
    }

    fn insert_faction(&mut self, draft: FactionDraft) -> StoreResult<Faction> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::InvalidRecord("faction name is empty".to_string()));
        }
        let id = FactionId(self.snapshot.counters.next_faction_id);
        let faction = draft.into_faction(id);
        self.put_faction(faction.clone());
        Ok(faction)
    }

    fn save_or_update_faction(&mut self, faction: &Faction) -> StoreResult<()> {
        if self.faults.rejected_factions.contains(&faction.id) {
            return Err(StoreError::Rejected(format!("save of faction {}", faction.id)));
        }
        if faction.name.trim().is_empty() {
            return Err(StoreError::InvalidRecord("faction name is empty".to_string()));
        }
        self.put_faction(faction.clone());
        Ok(())
    }

    fn delete_faction(&mut self, id: FactionId) -> StoreResult<()> {
        let index = self
            .faction_index(id)
            .map_err(|_| StoreError::UnknownFaction(id))?;
        self.snapshot.factions.remove(index);
        self.snapshot.relationships.retain(|r| !r.involves(id));
        Ok(())
    }

    fn append_relationship(&mut self, relationship: &Relationship) -> StoreResult<RelationshipId> {
        if relationship.faction1 == relationship.faction2 {
            return Err(StoreError::InvalidRecord(format!(
                "faction {} cannot have a relationship with itself",
                relationship.faction1
            )));
        }
        for id in [relationship.faction1, relationship.faction2] {
            if self.faction_index(id).is_err() {
                return Err(StoreError::UnknownFaction(id));
            }
        }

        let id = RelationshipId(self.snapshot.counters.next_relationship_id);
        self.snapshot.counters.next_relationship_id += 1;

        let mut stored = relationship.clone();
        stored.id = Some(id);
        self.snapshot.relationships.push(stored);
        Ok(id)
    }

    fn list_relationships(&self) -> StoreResult<Vec<Relationship>> {
        self.check_reads()?;
        Ok(self.snapshot.relationships.clone())
    }

    fn update_relationship(&mut self, relationship: &Relationship) -> StoreResult<()> {
        let id = relationship
            .id
            .ok_or_else(|| StoreError::InvalidRecord("relationship has no id".to_string()))?;
        let stored = self
            .snapshot
            .relationships
            .iter_mut()
            .find(|r| r.id == Some(id))
            .ok_or(StoreError::UnknownRelationship(id))?;
        stored.relationship_type = relationship.relationship_type;
        stored.set_strength(relationship.strength());
        Ok(())
    }

    fn append_world_event(&mut self, event: &WorldEvent) -> StoreResult<EventId> {
        if self.faults.reject_events {
            return Err(StoreError::Rejected(format!(
                "event append for faction {}",
                event.faction_id
            )));
        }
        let id = EventId(self.snapshot.counters.next_event_id);
        self.snapshot.counters.next_event_id += 1;
        self.events.push(event.clone().with_id(id));
        Ok(id)
    }

    fn list_events(&self) -> StoreResult<Vec<WorldEvent>> {
        self.check_reads()?;
        let mut events = self.events.clone();
        events.sort_by_key(|e| Reverse((e.turn, e.id)));
        Ok(events)
    }

    fn current_turn(&self) -> StoreResult<u64> {
        self.check_reads()?;
        Ok(self.snapshot.current_turn)
    }

    fn advance_turn(&mut self) -> StoreResult<u64> {
        if self.faults.reject_advance {
            return Err(StoreError::Rejected("turn advance".to_string()));
        }
        self.snapshot.current_turn += 1;
        Ok(self.snapshot.current_turn)
    }
}
