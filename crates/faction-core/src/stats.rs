//! World Statistics
//!
//! A read-only overview of the world computed from a store.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use faction_events::{
    ActionKind, Alignment, FactionId, FactionType, RelationshipType, Resources,
};

use crate::store::{StoreResult, WorldStore};

/// One row of the strength ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactionRanking {
    pub rank: usize,
    pub id: FactionId,
    pub name: String,
    pub faction_type: FactionType,
    pub alignment: Alignment,
    pub strength: u64,
}

/// Overall world statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldOverview {
    pub current_turn: u64,
    pub total_factions: usize,
    pub active_factions: usize,
    pub relationship_count: usize,
    pub event_count: usize,
    /// Active factions by strength, strongest first, ties by id
    pub rankings: Vec<FactionRanking>,
    /// Every relationship type, including those with no relationships
    pub relationships_by_type: BTreeMap<RelationshipType, usize>,
    pub factions_by_type: BTreeMap<FactionType, usize>,
    pub factions_by_alignment: BTreeMap<Alignment, usize>,
    pub events_by_action: BTreeMap<ActionKind, usize>,
    /// Summed over active factions
    pub total_resources: Resources,
}

impl WorldOverview {
    pub fn from_store<S: WorldStore + ?Sized>(store: &S) -> StoreResult<Self> {
        let factions = store.list_all_factions()?;
        let relationships = store.list_relationships()?;
        let events = store.list_events()?;

        let mut active: Vec<_> = factions.iter().filter(|f| f.active).collect();
        active.sort_by(|a, b| b.strength().cmp(&a.strength()).then(a.id.cmp(&b.id)));

        let rankings = active
            .iter()
            .enumerate()
            .map(|(index, f)| FactionRanking {
                rank: index + 1,
                id: f.id,
                name: f.name.clone(),
                faction_type: f.faction_type,
                alignment: f.alignment,
                strength: f.strength(),
            })
            .collect();

        let mut relationships_by_type: BTreeMap<_, _> =
            RelationshipType::all().iter().map(|t| (*t, 0)).collect();
        for relationship in &relationships {
            *relationships_by_type
                .entry(relationship.relationship_type)
                .or_insert(0) += 1;
        }

        let mut factions_by_type = BTreeMap::new();
        let mut factions_by_alignment = BTreeMap::new();
        let mut total_resources = Resources::new(0, 0, 0, 0);
        for faction in &active {
            *factions_by_type.entry(faction.faction_type).or_insert(0) += 1;
            *factions_by_alignment.entry(faction.alignment).or_insert(0) += 1;
            let r = &faction.resources;
            total_resources.gold = total_resources.gold.saturating_add(r.gold);
            total_resources.troops = total_resources.troops.saturating_add(r.troops);
            total_resources.magic = total_resources.magic.saturating_add(r.magic);
            total_resources.influence = total_resources.influence.saturating_add(r.influence);
        }

        let mut events_by_action = BTreeMap::new();
        for event in &events {
            *events_by_action.entry(event.action).or_insert(0) += 1;
        }

        Ok(Self {
            current_turn: store.current_turn()?,
            total_factions: factions.len(),
            active_factions: active.len(),
            relationship_count: relationships.len(),
            event_count: events.len(),
            rankings,
            relationships_by_type,
            factions_by_type,
            factions_by_alignment,
            events_by_action,
            total_resources,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for WorldOverview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== WORLD OVERVIEW ===")?;
        writeln!(f, "Turn: {}", self.current_turn)?;
        writeln!(
            f,
            "Factions: {} ({} active)",
            self.total_factions, self.active_factions
        )?;
        writeln!(f, "Relationships: {}", self.relationship_count)?;
        writeln!(f, "Events: {}", self.event_count)?;

        writeln!(f, "\n--- Power Rankings ---")?;
        for row in &self.rankings {
            writeln!(
                f,
                "{:>2}. {} ({}, {}) - Strength: {}",
                row.rank, row.name, row.faction_type, row.alignment, row.strength
            )?;
        }

        writeln!(f, "\n--- Relationships ---")?;
        for (kind, count) in &self.relationships_by_type {
            writeln!(f, "{}: {}", kind, count)?;
        }

        writeln!(f, "\n--- Faction Types ---")?;
        for (kind, count) in &self.factions_by_type {
            writeln!(f, "{}: {}", kind, count)?;
        }

        writeln!(f, "\n--- Alignments ---")?;
        for (alignment, count) in &self.factions_by_alignment {
            writeln!(f, "{}: {}", alignment, count)?;
        }

        let r = &self.total_resources;
        writeln!(f, "\n--- Total Resources ---")?;
        write!(
            f,
            "Gold: {}, Troops: {}, Magic: {}, Influence: {}",
            r.gold, r.troops, r.magic, r.influence
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use faction_events::fixtures;

    fn overview() -> WorldOverview {
        let store = MemoryStore::from_snapshot(fixtures::sample_world(), fixtures::sample_events());
        WorldOverview::from_store(&store).unwrap()
    }

    #[test]
    fn test_counts() {
        let overview = overview();
        assert_eq!(overview.current_turn, 4);
        assert_eq!(overview.total_factions, 5);
        assert_eq!(overview.active_factions, 4);
        assert_eq!(overview.relationship_count, 2);
        assert_eq!(overview.event_count, 3);
        assert_eq!(overview.events_by_action.get(&ActionKind::Raid), Some(&1));
    }

    #[test]
    fn test_rankings_sorted_strongest_first() {
        let overview = overview();
        assert_eq!(overview.rankings.len(), 4);
        for pair in overview.rankings.windows(2) {
            assert!(pair[0].strength >= pair[1].strength);
        }
        assert!(overview.rankings.iter().all(|r| r.id != FactionId(5)));
        assert_eq!(overview.rankings[0].rank, 1);
    }

    #[test]
    fn test_every_relationship_type_listed() {
        let overview = overview();
        assert_eq!(overview.relationships_by_type.len(), 6);
        let total: usize = overview.relationships_by_type.values().sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_ties_ranked_by_id() {
        let store = MemoryStore::with_factions(vec![
            fixtures::faction_with_strength(4, "Later", 50),
            fixtures::faction_with_strength(2, "Earlier", 50),
        ]);
        let overview = WorldOverview::from_store(&store).unwrap();
        let names: Vec<_> = overview.rankings.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Earlier", "Later"]);
        assert_eq!(overview.total_resources.troops, 100);
    }

    #[test]
    fn test_display_and_json() {
        let overview = overview();
        let text = overview.to_string();
        assert!(text.starts_with("=== WORLD OVERVIEW ==="));
        assert!(text.contains("At War: 0"));

        let json: serde_json::Value = serde_json::from_str(&overview.to_json().unwrap()).unwrap();
        assert_eq!(json["active_factions"], 4);
        assert_eq!(json["relationships_by_type"]["at_war"], 0);
    }
}
