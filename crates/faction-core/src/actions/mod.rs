//! Faction Actions
//!
//! Weight tables the chooser draws from and the per-kind effects the executor
//! applies.

pub mod effects;

use faction_events::ActionKind;
use rand::Rng;

pub use effects::{costs, effect_for, Effect, EffectFn};

/// Weight constants for the action chooser
pub mod weights {
    /// Gather weight when gold is low
    pub const GATHER_POOR: u32 = 40;
    /// Raid weight when gold is low
    pub const RAID_POOR: u32 = 30;
    /// Gather weight otherwise
    pub const GATHER_BASE: u32 = 15;
    /// Raid weight otherwise
    pub const RAID_BASE: u32 = 10;

    pub const STRONG_ATTACK_BONUS: u32 = 25;
    pub const STRONG_EXPAND_BONUS: u32 = 20;

    pub const WEAK_ALLIANCE_BONUS: u32 = 25;
    pub const WEAK_FORTIFY_BONUS: u32 = 20;

    pub const RECRUIT_BASE: u32 = 15;
    pub const STUDY_BASE: u32 = 10;
    pub const TRADE_BASE: u32 = 10;

    pub const CHAOTIC_ATTACK_BONUS: u32 = 15;
    pub const CHAOTIC_RAID_BONUS: u32 = 10;

    pub const LAWFUL_TRADE_BONUS: u32 = 10;
    pub const LAWFUL_ALLIANCE_BONUS: u32 = 10;

    /// Gold below this counts as low resources
    pub const LOW_GOLD_THRESHOLD: u32 = 50;
    /// Strength above this multiple of the average counts as strong
    pub const STRONG_RATIO: f64 = 1.2;
    /// Strength below this multiple of the average counts as weak
    pub const WEAK_RATIO: f64 = 0.7;
    /// Average strength assumed when there are no factions to average
    pub const DEFAULT_AVERAGE_STRENGTH: u64 = 100;
}

/// Ordered action weights.
///
/// Entries keep the order in which each kind was first added; the weighted
/// draw walks them in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightTable {
    entries: Vec<(ActionKind, u32)>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to the kind's accumulated weight, creating the entry if absent
    pub fn add(&mut self, kind: ActionKind, weight: u32) {
        match self.entries.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, w)) => *w = w.saturating_add(weight),
            None => self.entries.push((kind, weight)),
        }
    }

    /// Weight of `kind`; unlisted kinds weigh zero
    pub fn weight(&self, kind: ActionKind) -> u32 {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, w)| *w)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, w)| u64::from(*w)).sum()
    }

    pub fn entries(&self) -> &[(ActionKind, u32)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Draw one kind with probability proportional to its weight.
    ///
    /// Makes exactly one draw when the total is positive and none otherwise.
    /// Falls back to gathering resources if nothing can be drawn.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> ActionKind {
        let total = self.total();
        if total == 0 {
            return ActionKind::GatherResources;
        }

        let roll = rng.gen_range(0..total);
        let mut running = 0u64;
        for (kind, weight) in &self.entries {
            running += u64::from(*weight);
            if running > roll {
                return *kind;
            }
        }

        ActionKind::GatherResources
    }
}

impl FromIterator<(ActionKind, u32)> for WeightTable {
    fn from_iter<I: IntoIterator<Item = (ActionKind, u32)>>(iter: I) -> Self {
        let mut table = WeightTable::new();
        for (kind, weight) in iter {
            table.add(kind, weight);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_add_accumulates_in_first_insertion_order() {
        let mut table = WeightTable::new();
        table.add(ActionKind::GatherResources, 15);
        table.add(ActionKind::Raid, 10);
        table.add(ActionKind::GatherResources, 5);

        assert_eq!(
            table.entries(),
            &[(ActionKind::GatherResources, 20), (ActionKind::Raid, 10)]
        );
        assert_eq!(table.total(), 30);
        assert_eq!(table.weight(ActionKind::Spy), 0);
    }

    #[test]
    fn test_weighted_draw_proportions() {
        let mut rng = SmallRng::seed_from_u64(12345);
        let table: WeightTable = [(ActionKind::Trade, 10), (ActionKind::Attack, 90)]
            .into_iter()
            .collect();

        let mut trades = 0;
        let mut attacks = 0;
        for _ in 0..1000 {
            match table.draw(&mut rng) {
                ActionKind::Trade => trades += 1,
                ActionKind::Attack => attacks += 1,
                other => panic!("drew unlisted kind {:?}", other),
            }
        }

        // Attack should be selected ~90% of the time
        assert!(attacks > trades * 5);
    }

    #[test]
    fn test_zero_weight_never_drawn() {
        let mut rng = SmallRng::seed_from_u64(7);
        let table: WeightTable = [
            (ActionKind::Spy, 0),
            (ActionKind::Trade, 3),
            (ActionKind::Fortify, 5),
        ]
        .into_iter()
        .collect();

        for _ in 0..5000 {
            assert_ne!(table.draw(&mut rng), ActionKind::Spy);
        }
    }

    #[test]
    fn test_empty_table_falls_back_to_gather() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(WeightTable::new().draw(&mut rng), ActionKind::GatherResources);

        let zeros: WeightTable = [(ActionKind::Attack, 0)].into_iter().collect();
        assert_eq!(zeros.draw(&mut rng), ActionKind::GatherResources);
    }
}
