//! Administrative Operations
//!
//! Manual edits to the world made outside of a turn: creating and editing
//! factions, adjusting resources and relationships, and logging custom
//! events. Interventions can also be described in JSON files and applied in
//! one step.

use std::fs;
use std::path::Path;

use faction_events::{
    ActionKind, Alignment, Faction, FactionDraft, FactionId, FactionType, Relationship,
    RelationshipId, RelationshipType, Resource, Resources, WorldEvent,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::store::{StoreError, WorldStore};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("faction name must not be empty")]
    EmptyName,
    #[error("event description must not be empty")]
    EmptyDescription,
    #[error("no faction with id {0}")]
    NoSuchFaction(FactionId),
    #[error("no relationship with id {0}")]
    NoSuchRelationship(RelationshipId),
    #[error("faction {0} cannot have a relationship with itself")]
    SelfRelationship(FactionId),
    #[error("could not read intervention file {path}: {source}")]
    InterventionIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid intervention file {path}: {source}")]
    InterventionParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type AdminResult<T> = Result<T, AdminError>;

/// A faction draft carrying the configured starting resources
pub fn draft(
    name: impl Into<String>,
    faction_type: FactionType,
    alignment: Alignment,
    starting: &Resources,
) -> FactionDraft {
    FactionDraft::new(name, faction_type, alignment).with_resources(*starting)
}

/// Store a new faction; its name is trimmed and must not be empty
pub fn create_faction<S: WorldStore + ?Sized>(
    store: &mut S,
    mut draft: FactionDraft,
) -> AdminResult<Faction> {
    draft.name = clean_name(&draft.name)?;
    let faction = store.insert_faction(draft)?;
    info!(faction = %faction.name, id = %faction.id, "Faction created");
    Ok(faction)
}

/// Fields of a faction that can be edited by hand
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionEdit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction_type: Option<FactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

pub fn edit_faction<S: WorldStore + ?Sized>(
    store: &mut S,
    id: FactionId,
    edit: FactionEdit,
) -> AdminResult<Faction> {
    let mut faction = load_faction(store, id)?;
    if let Some(name) = edit.name {
        faction.name = clean_name(&name)?;
    }
    if let Some(faction_type) = edit.faction_type {
        faction.faction_type = faction_type;
    }
    if let Some(alignment) = edit.alignment {
        faction.alignment = alignment;
    }
    store.save_or_update_faction(&faction)?;
    Ok(faction)
}

/// Change one resource by a signed amount and log the intervention.
///
/// Returns the updated faction and the logged event.
pub fn adjust_resource<S: WorldStore + ?Sized>(
    store: &mut S,
    id: FactionId,
    resource: Resource,
    amount: i64,
) -> AdminResult<(Faction, WorldEvent)> {
    let mut faction = load_faction(store, id)?;
    faction.adjust(resource, amount);
    store.save_or_update_faction(&faction)?;

    let turn = store.current_turn()?;
    let event = WorldEvent::new(
        turn,
        faction.id,
        ActionKind::GatherResources,
        format!(
            "DM intervention: {} {} modified by {:+}",
            faction.name, resource, amount
        ),
    );
    let event_id = store.append_world_event(&event)?;
    info!(faction = %faction.name, %resource, amount, "Resource adjusted");
    Ok((faction, event.with_id(event_id)))
}

/// Soft-delete (`active = false`) or restore a faction
pub fn set_active<S: WorldStore + ?Sized>(
    store: &mut S,
    id: FactionId,
    active: bool,
) -> AdminResult<Faction> {
    let mut faction = load_faction(store, id)?;
    faction.active = active;
    store.save_or_update_faction(&faction)?;
    info!(faction = %faction.name, active, "Faction activity changed");
    Ok(faction)
}

/// Remove a faction permanently
pub fn delete_faction<S: WorldStore + ?Sized>(store: &mut S, id: FactionId) -> AdminResult<()> {
    match store.delete_faction(id) {
        Err(StoreError::UnknownFaction(id)) => Err(AdminError::NoSuchFaction(id)),
        other => Ok(other?),
    }
}

/// Create a relationship between two distinct existing factions
pub fn create_relationship<S: WorldStore + ?Sized>(
    store: &mut S,
    faction1: FactionId,
    faction2: FactionId,
    relationship_type: RelationshipType,
    strength: i32,
) -> AdminResult<Relationship> {
    if faction1 == faction2 {
        return Err(AdminError::SelfRelationship(faction1));
    }
    load_faction(store, faction1)?;
    load_faction(store, faction2)?;

    let mut relationship = Relationship::new(faction1, faction2, relationship_type, strength);
    relationship.id = Some(store.append_relationship(&relationship)?);
    Ok(relationship)
}

/// Shift a relationship's strength (clamped) and optionally change its type
pub fn adjust_relationship<S: WorldStore + ?Sized>(
    store: &mut S,
    id: RelationshipId,
    delta: i32,
    relationship_type: Option<RelationshipType>,
) -> AdminResult<Relationship> {
    let mut relationship = store
        .list_relationships()?
        .into_iter()
        .find(|r| r.id == Some(id))
        .ok_or(AdminError::NoSuchRelationship(id))?;
    relationship.adjust_strength(delta);
    if let Some(relationship_type) = relationship_type {
        relationship.relationship_type = relationship_type;
    }
    store.update_relationship(&relationship)?;
    Ok(relationship)
}

/// Append a hand-written event for a faction at the current turn
pub fn log_event<S: WorldStore + ?Sized>(
    store: &mut S,
    faction_id: FactionId,
    action: ActionKind,
    description: &str,
) -> AdminResult<WorldEvent> {
    let description = description.trim();
    if description.is_empty() {
        return Err(AdminError::EmptyDescription);
    }
    load_faction(store, faction_id)?;

    let event = WorldEvent::new(store.current_turn()?, faction_id, action, description);
    let id = store.append_world_event(&event)?;
    Ok(event.with_id(id))
}

fn load_faction<S: WorldStore + ?Sized>(store: &S, id: FactionId) -> AdminResult<Faction> {
    store.get_faction(id)?.ok_or(AdminError::NoSuchFaction(id))
}

fn clean_name(name: &str) -> AdminResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AdminError::EmptyName);
    }
    Ok(name.to_string())
}

/// Types of interventions that can be applied from a file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InterventionType {
    AdjustResource {
        faction_id: FactionId,
        resource: Resource,
        amount: i64,
    },
    SetActive {
        faction_id: FactionId,
        active: bool,
    },
    EditFaction {
        faction_id: FactionId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        faction_type: Option<FactionType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alignment: Option<Alignment>,
    },
    AdjustRelationship {
        relationship_id: RelationshipId,
        delta: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        relationship_type: Option<RelationshipType>,
    },
    LogEvent {
        faction_id: FactionId,
        action: ActionKind,
        description: String,
    },
}

/// A complete intervention request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    /// Description of why this intervention is being made
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub intervention: InterventionType,
}

impl Intervention {
    /// Read an intervention from a JSON file
    pub fn load(path: impl AsRef<Path>) -> AdminResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| AdminError::InterventionIo {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| AdminError::InterventionParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply to the store; returns the event it logged, if any
    pub fn apply<S: WorldStore + ?Sized>(&self, store: &mut S) -> AdminResult<Option<WorldEvent>> {
        if let Some(reason) = &self.reason {
            info!("Applying intervention: {}", reason);
        }
        match &self.intervention {
            InterventionType::AdjustResource {
                faction_id,
                resource,
                amount,
            } => adjust_resource(store, *faction_id, *resource, *amount).map(|(_, e)| Some(e)),
            InterventionType::SetActive { faction_id, active } => {
                set_active(store, *faction_id, *active).map(|_| None)
            }
            InterventionType::EditFaction {
                faction_id,
                name,
                faction_type,
                alignment,
            } => {
                let edit = FactionEdit {
                    name: name.clone(),
                    faction_type: *faction_type,
                    alignment: *alignment,
                };
                edit_faction(store, *faction_id, edit).map(|_| None)
            }
            InterventionType::AdjustRelationship {
                relationship_id,
                delta,
                relationship_type,
            } => adjust_relationship(store, *relationship_id, *delta, *relationship_type)
                .map(|_| None),
            InterventionType::LogEvent {
                faction_id,
                action,
                description,
            } => log_event(store, *faction_id, *action, description).map(Some),
        }
    }
}
