//! Action Execution
//!
//! Applies a chosen action and narrates it as a world event.

use faction_events::{ActionKind, Faction, WorldEvent};
use rand::Rng;

use crate::actions::effect_for;

/// New faction values and the event produced by one action.
///
/// The caller persists `target` (when present) before `actor`, then the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub actor: Faction,
    pub target: Option<Faction>,
    pub event: WorldEvent,
}

/// Execute `kind` for `faction` during `turn`
pub fn execute<R: Rng>(
    faction: &Faction,
    kind: ActionKind,
    active: &[Faction],
    turn: u64,
    rng: &mut R,
) -> ActionOutcome {
    let effect = effect_for::<R>(kind)(faction, active, rng);

    let mut event = WorldEvent::new(
        turn,
        faction.id,
        kind,
        format!("{} {}", faction.name, effect.narration),
    );
    if let Some(target) = &effect.target {
        event = event.with_target(target.id);
    }

    ActionOutcome {
        actor: effect.actor,
        target: effect.target,
        event,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faction_events::{fixtures, FactionId};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_event_is_narrated_with_name() {
        let mut rng = SmallRng::seed_from_u64(3);
        let faction = fixtures::faction(1, "Iron Crown", 10, 50, 0, 0);
        let outcome = execute(&faction, ActionKind::RecruitTroops, &[], 7, &mut rng);

        assert_eq!(outcome.actor, faction);
        assert_eq!(outcome.event.turn, 7);
        assert_eq!(outcome.event.faction_id, FactionId(1));
        assert_eq!(outcome.event.action, ActionKind::RecruitTroops);
        assert_eq!(
            outcome.event.description,
            "Iron Crown attempted to recruit troops but lacked funds."
        );
        assert_eq!(outcome.event.target_faction_id, None);
        assert_eq!(outcome.event.id, None);
    }

    #[test]
    fn test_targeted_event_carries_target() {
        let mut rng = SmallRng::seed_from_u64(3);
        let raider = fixtures::faction(1, "Red Hand", 0, 60, 0, 0);
        let victim = fixtures::faction(2, "Veil", 30, 5, 0, 0);
        let active = vec![raider.clone(), victim];

        let outcome = execute(&raider, ActionKind::Raid, &active, 0, &mut rng);
        assert_eq!(outcome.event.target_faction_id, Some(FactionId(2)));
        assert_eq!(outcome.target.map(|t| t.gold()), Some(15));
        assert_eq!(outcome.actor.gold(), 15);
        assert_eq!(
            outcome.event.description,
            "Red Hand raided Veil, stealing 15 gold!"
        );
    }

    #[test]
    fn test_failed_raid_has_no_target() {
        let mut rng = SmallRng::seed_from_u64(3);
        let raider = fixtures::faction(1, "Red Hand", 100, 50, 0, 0);
        let broke = fixtures::faction(2, "Broke", 0, 10, 0, 0);
        let outcome = execute(&raider, ActionKind::Raid, &[raider.clone(), broke], 0, &mut rng);
        assert!(outcome.target.is_none());
        assert_eq!(outcome.event.target_faction_id, None);
    }
}
