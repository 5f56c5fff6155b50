//! Action Selection
//!
//! Builds each faction's weight table from its standing among the active
//! factions and draws one action from it.

use faction_events::{ActionKind, Faction};
use rand::Rng;

use crate::actions::{weights, WeightTable};

/// Mean strength of the active factions, rounded down.
///
/// An empty set averages to [`weights::DEFAULT_AVERAGE_STRENGTH`].
pub fn average_strength(active: &[Faction]) -> u64 {
    if active.is_empty() {
        return weights::DEFAULT_AVERAGE_STRENGTH;
    }
    let total: u64 = active.iter().map(Faction::strength).sum();
    total / active.len() as u64
}

/// Action weights for `faction` given the current active factions
pub fn weight_table(faction: &Faction, active: &[Faction]) -> WeightTable {
    let average = average_strength(active) as f64;
    let strength = faction.strength() as f64;
    let is_strong = strength > average * weights::STRONG_RATIO;
    let is_weak = strength < average * weights::WEAK_RATIO;
    let low_resources = faction.gold() < weights::LOW_GOLD_THRESHOLD;

    let mut table = WeightTable::new();
    if low_resources {
        table.add(ActionKind::GatherResources, weights::GATHER_POOR);
        table.add(ActionKind::Raid, weights::RAID_POOR);
    } else {
        table.add(ActionKind::GatherResources, weights::GATHER_BASE);
        table.add(ActionKind::Raid, weights::RAID_BASE);
    }

    if is_strong {
        table.add(ActionKind::Attack, weights::STRONG_ATTACK_BONUS);
        table.add(ActionKind::ExpandInfluence, weights::STRONG_EXPAND_BONUS);
    } else if is_weak {
        table.add(ActionKind::FormAlliance, weights::WEAK_ALLIANCE_BONUS);
        table.add(ActionKind::Fortify, weights::WEAK_FORTIFY_BONUS);
    }

    table.add(ActionKind::RecruitTroops, weights::RECRUIT_BASE);
    table.add(ActionKind::StudyMagic, weights::STUDY_BASE);
    table.add(ActionKind::Trade, weights::TRADE_BASE);

    if faction.alignment.is_chaotic() {
        table.add(ActionKind::Attack, weights::CHAOTIC_ATTACK_BONUS);
        table.add(ActionKind::Raid, weights::CHAOTIC_RAID_BONUS);
    } else if faction.alignment.is_lawful() {
        table.add(ActionKind::Trade, weights::LAWFUL_TRADE_BONUS);
        table.add(ActionKind::FormAlliance, weights::LAWFUL_ALLIANCE_BONUS);
    }

    table
}

/// Pick this turn's action for `faction`. Makes exactly one draw.
pub fn choose<R: Rng + ?Sized>(faction: &Faction, active: &[Faction], rng: &mut R) -> ActionKind {
    weight_table(faction, active).draw(rng)
}
