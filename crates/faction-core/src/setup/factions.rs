//! Sample Factions
//!
//! A small ready-made world: five factions across the alignment chart and a
//! few standing relationships between them.

use faction_events::{Alignment, Faction, FactionDraft, FactionType, RelationshipType, Resources};

use crate::admin::{self, AdminResult};
use crate::store::WorldStore;

/// Drafts for the sample world. Factions without a distinct profile get the
/// configured starting resources.
pub fn sample_factions(starting: &Resources) -> Vec<FactionDraft> {
    vec![
        // === VALORIA ===
        // An old kingdom, wealthy and well garrisoned
        FactionDraft::new("Kingdom of Valoria", FactionType::Kingdom, Alignment::LawfulGood)
            .with_resources(Resources::new(180, 80, 10, 30)),
        // === RED HAND ===
        // Sellswords who go where the gold is
        admin::draft(
            "Red Hand Mercenaries",
            FactionType::Mercenary,
            Alignment::ChaoticNeutral,
            starting,
        ),
        // === THE VEIL ===
        // A secretive circle of mages with little coin and many spells
        FactionDraft::new("Circle of the Veil", FactionType::Cult, Alignment::NeutralEvil)
            .with_resources(Resources::new(60, 20, 45, 15)),
        // === GILDED SAILS ===
        // Merchant princes of the southern ports
        FactionDraft::new(
            "Gilded Sails Company",
            FactionType::TradingCompany,
            Alignment::LawfulNeutral,
        )
        .with_resources(Resources::new(260, 30, 5, 40)),
        // === ASHFANG ===
        // A raiding horde from the badlands
        admin::draft(
            "Ashfang Horde",
            FactionType::MonsterHorde,
            Alignment::ChaoticEvil,
            starting,
        ),
    ]
}

/// Relationships of the sample world, by index into [`sample_factions`]
const SAMPLE_RELATIONSHIPS: [(usize, usize, RelationshipType, i32); 4] = [
    (0, 3, RelationshipType::Allied, 70),
    (0, 4, RelationshipType::AtWar, -90),
    (1, 3, RelationshipType::Friendly, 25),
    (2, 0, RelationshipType::Hostile, -55),
];

/// Insert the sample factions and their relationships into `store`
pub fn seed_world<S: WorldStore + ?Sized>(
    store: &mut S,
    starting: &Resources,
) -> AdminResult<Vec<Faction>> {
    let mut created = Vec::new();
    for draft in sample_factions(starting) {
        created.push(admin::create_faction(store, draft)?);
    }

    for (a, b, relationship_type, strength) in SAMPLE_RELATIONSHIPS {
        admin::create_relationship(store, created[a].id, created[b].id, relationship_type, strength)?;
    }

    tracing::info!(
        factions = created.len(),
        relationships = SAMPLE_RELATIONSHIPS.len(),
        "Seeded sample world"
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_sample_factions_varied() {
        let drafts = sample_factions(&Resources::default());
        assert_eq!(drafts.len(), 5);
        assert!(drafts.iter().any(|d| d.alignment.is_lawful()));
        assert!(drafts.iter().any(|d| d.alignment.is_chaotic()));

        let mut types: Vec<_> = drafts.iter().map(|d| d.faction_type).collect();
        types.dedup();
        assert_eq!(types.len(), 5);
    }

    #[test]
    fn test_default_profile_uses_starting_resources() {
        let starting = Resources {
            gold: 5,
            troops: 6,
            magic: 7,
            influence: 8,
        };
        let drafts = sample_factions(&starting);
        let red_hand = drafts
            .iter()
            .find(|d| d.name == "Red Hand Mercenaries")
            .unwrap();
        assert_eq!(red_hand.resources, Resources::new(5, 6, 7, 8));
    }

    #[test]
    fn test_seed_world() {
        let mut store = MemoryStore::new();
        let created = seed_world(&mut store, &Resources::default()).unwrap();

        assert_eq!(created.len(), 5);
        assert_eq!(store.list_active_factions().unwrap().len(), 5);

        let relationships = store.list_relationships().unwrap();
        assert_eq!(relationships.len(), 4);
        assert!(relationships.iter().all(|r| r.faction1 != r.faction2));
    }
}
