//! World Event Types
//!
//! The narrated, append-only log of what happened during each turn.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ActionKind, FactionId, Timestamp};

/// Store-assigned event identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "evt_{:08}", self.0)
    }
}

/// One entry in the world's event log.
///
/// Once appended to a store an event is never changed or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldEvent {
    /// Assigned by the store on append
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    /// Turn during which the event happened
    pub turn: u64,
    /// Acting faction
    pub faction_id: FactionId,
    pub action: ActionKind,
    pub description: String,
    pub timestamp: Timestamp,
    /// Second participant, for actions that have one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_faction_id: Option<FactionId>,
}

impl WorldEvent {
    /// Create an event stamped with the current wall-clock time
    pub fn new(
        turn: u64,
        faction_id: FactionId,
        action: ActionKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            turn,
            faction_id,
            action,
            description: description.into(),
            timestamp: Timestamp::now(),
            target_faction_id: None,
        }
    }

    pub fn with_target(mut self, target: FactionId) -> Self {
        self.target_faction_id = Some(target);
        self
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_id(mut self, id: EventId) -> Self {
        self.id = Some(id);
        self
    }

    /// True if `faction` acted in or was targeted by this event
    pub fn involves(&self, faction: FactionId) -> bool {
        self.faction_id == faction || self.target_faction_id == Some(faction)
    }

    /// Serializes the event to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

impl fmt::Display for WorldEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Turn {}] {} - {}", self.turn, self.action.label(), self.description)
    }
}
