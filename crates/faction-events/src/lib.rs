//! Shared entity and event types for the faction simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod action;
pub mod event;
pub mod faction;
pub mod relationship;
pub mod snapshot;
pub mod timestamp;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

use std::fmt;

pub use action::ActionKind;
pub use event::{EventId, WorldEvent};
pub use faction::{
    Alignment, EthicalAxis, Faction, FactionDraft, FactionId, FactionType, MoralAxis, Resource,
    Resources,
};
pub use relationship::{
    Relationship, RelationshipId, RelationshipType, MAX_RELATIONSHIP_STRENGTH,
    MIN_RELATIONSHIP_STRENGTH,
};
pub use snapshot::{IdCounters, WorldSnapshot, SNAPSHOT_VERSION};
pub use timestamp::Timestamp;

/// Error parsing one of the named enumerations from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNameError {
    pub what: &'static str,
    pub input: String,
}

impl ParseNameError {
    pub(crate) fn new(what: &'static str, input: &str) -> Self {
        Self {
            what,
            input: input.to_string(),
        }
    }
}

impl fmt::Display for ParseNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: '{}'", self.what, self.input)
    }
}

impl std::error::Error for ParseNameError {}

/// Lowercase, with spaces and dashes folded to underscores
pub(crate) fn normalize_name(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}
