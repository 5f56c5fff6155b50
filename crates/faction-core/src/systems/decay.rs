//! Internal Decay
//!
//! Independent misfortune rolled for every active faction after the main
//! actions of a turn.

use faction_events::{ActionKind, Faction, WorldEvent};
use rand::Rng;

/// Default probability that a faction decays in a turn
pub const DECAY_CHANCE: f64 = 0.1;

pub const DISASTERS: [&str; 5] = [
    "suffered from internal corruption",
    "faced a minor rebellion",
    "experienced crop failure",
    "dealt with a plague outbreak",
    "weathered a harsh winter",
];

/// Gold change is GOLD_SWING_OFFSET - rand[0, GOLD_SWING)
pub const GOLD_SWING: i64 = 20;
pub const GOLD_SWING_OFFSET: i64 = 10;
/// Troop change is TROOP_SWING_OFFSET - rand[0, TROOP_SWING)
pub const TROOP_SWING: i64 = 10;
pub const TROOP_SWING_OFFSET: i64 = 5;

/// A faction after decay and the event describing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecayOutcome {
    pub faction: Faction,
    pub event: WorldEvent,
}

/// Roll for decay with probability `chance`; apply it if the roll hits
pub fn maybe_decay<R: Rng + ?Sized>(
    faction: &Faction,
    turn: u64,
    chance: f64,
    rng: &mut R,
) -> Option<DecayOutcome> {
    if rng.gen::<f64>() < chance {
        Some(apply_decay(faction, turn, rng))
    } else {
        None
    }
}

/// Pick a disaster and apply its resource swing
pub fn apply_decay<R: Rng + ?Sized>(faction: &Faction, turn: u64, rng: &mut R) -> DecayOutcome {
    let disaster = DISASTERS[rng.gen_range(0..DISASTERS.len())];
    let gold_delta = GOLD_SWING_OFFSET - rng.gen_range(0..GOLD_SWING);
    let troop_delta = TROOP_SWING_OFFSET - rng.gen_range(0..TROOP_SWING);

    let mut next = faction.clone();
    next.add_gold(gold_delta);
    next.add_troops(troop_delta);

    tracing::debug!(
        faction = %faction.name,
        gold_delta,
        troop_delta,
        "decay: {}",
        disaster
    );

    let event = WorldEvent::new(
        turn,
        faction.id,
        ActionKind::InternalDecay,
        format!("{} {}.", faction.name, disaster),
    );
    DecayOutcome {
        faction: next,
        event,
    }
}
