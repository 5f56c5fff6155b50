//! Action Effects
//!
//! One pure effect function per action kind. An effect reads the acting
//! faction and the active factions, draws from the random stream, and returns
//! the new faction values together with the narration. Nothing is written
//! here.

use std::ops::Range;

use faction_events::{ActionKind, Faction};
use rand::Rng;

/// Cost and yield constants for each action
pub mod costs {
    use super::Range;

    pub const GATHER_GOLD: Range<u32> = 20..50;

    pub const RECRUIT_COST: u32 = 30;
    pub const RECRUIT_TROOPS: Range<u32> = 10..25;

    pub const EXPAND_COST: u32 = 20;
    pub const EXPAND_INFLUENCE: Range<u32> = 5..13;

    pub const STUDY_COST: u32 = 25;
    pub const STUDY_MAGIC: Range<u32> = 3..8;

    pub const FORTIFY_COST: u32 = 15;
    pub const FORTIFY_TROOPS: Range<u32> = 5..15;

    pub const TRADE_COST: u32 = 10;
    pub const TRADE_INFLUENCE: Range<u32> = 3..8;

    /// Attack damage is strength / ATTACK_STRENGTH_DIVISOR plus this roll
    pub const ATTACK_DAMAGE_ROLL: Range<u64> = 0..20;
    pub const ATTACK_STRENGTH_DIVISOR: u64 = 5;
    /// The attacker loses damage / ATTACK_RECOIL_DIVISOR troops
    pub const ATTACK_RECOIL_DIVISOR: u64 = 3;

    /// Most gold a single raid can take
    pub const RAID_MAX_LOOT: u32 = 40;
}

/// Result of applying one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effect {
    /// New value of the acting faction
    pub actor: Faction,
    /// New value of the second participant, when there is one
    pub target: Option<Faction>,
    /// What happened, phrased to follow the actor's name
    pub narration: String,
}

impl Effect {
    fn unchanged(actor: &Faction, narration: impl Into<String>) -> Self {
        Self {
            actor: actor.clone(),
            target: None,
            narration: narration.into(),
        }
    }
}

/// Signature shared by every effect
pub type EffectFn<R> = fn(&Faction, &[Faction], &mut R) -> Effect;

/// Effect function for an action kind
pub fn effect_for<R: Rng>(kind: ActionKind) -> EffectFn<R> {
    match kind {
        ActionKind::GatherResources => gather_resources::<R>,
        ActionKind::RecruitTroops => recruit_troops::<R>,
        ActionKind::ExpandInfluence => expand_influence::<R>,
        ActionKind::StudyMagic => study_magic::<R>,
        ActionKind::Fortify => fortify::<R>,
        ActionKind::Trade => trade::<R>,
        ActionKind::Attack => attack::<R>,
        ActionKind::Raid => raid::<R>,
        ActionKind::FormAlliance => form_alliance::<R>,
        ActionKind::BreakAlliance
        | ActionKind::Spy
        | ActionKind::Sabotage
        | ActionKind::InternalDecay => contemplate::<R>,
    }
}

/// Weakest active faction other than `actor`, first encountered on ties
pub fn attack_target<'a>(actor: &Faction, active: &'a [Faction]) -> Option<&'a Faction> {
    active
        .iter()
        .filter(|f| f.id != actor.id)
        .min_by_key(|f| f.strength())
}

/// Weakest active faction other than `actor` that has any gold
pub fn raid_target<'a>(actor: &Faction, active: &'a [Faction]) -> Option<&'a Faction> {
    active
        .iter()
        .filter(|f| f.id != actor.id && f.gold() > 0)
        .min_by_key(|f| f.strength())
}

fn gather_resources<R: Rng>(actor: &Faction, _active: &[Faction], rng: &mut R) -> Effect {
    let gained = rng.gen_range(costs::GATHER_GOLD);
    let mut next = actor.clone();
    next.add_gold(i64::from(gained));
    Effect {
        actor: next,
        target: None,
        narration: format!("gathered resources, gaining {} gold.", gained),
    }
}

fn recruit_troops<R: Rng>(actor: &Faction, _active: &[Faction], rng: &mut R) -> Effect {
    if actor.gold() < costs::RECRUIT_COST {
        return Effect::unchanged(actor, "attempted to recruit troops but lacked funds.");
    }
    let recruited = rng.gen_range(costs::RECRUIT_TROOPS);
    let mut next = actor.clone();
    next.add_troops(i64::from(recruited));
    next.add_gold(-i64::from(costs::RECRUIT_COST));
    Effect {
        actor: next,
        target: None,
        narration: format!(
            "recruited {} troops for {} gold.",
            recruited,
            costs::RECRUIT_COST
        ),
    }
}

fn expand_influence<R: Rng>(actor: &Faction, _active: &[Faction], rng: &mut R) -> Effect {
    if actor.gold() < costs::EXPAND_COST {
        return Effect::unchanged(actor, "attempted to expand influence but lacked funds.");
    }
    let gained = rng.gen_range(costs::EXPAND_INFLUENCE);
    let mut next = actor.clone();
    next.add_influence(i64::from(gained));
    next.add_gold(-i64::from(costs::EXPAND_COST));
    Effect {
        actor: next,
        target: None,
        narration: format!("expanded their influence by {}.", gained),
    }
}

fn study_magic<R: Rng>(actor: &Faction, _active: &[Faction], rng: &mut R) -> Effect {
    if actor.gold() < costs::STUDY_COST {
        return Effect::unchanged(actor, "attempted to study magic but lacked funds.");
    }
    let gained = rng.gen_range(costs::STUDY_MAGIC);
    let mut next = actor.clone();
    next.add_magic(i64::from(gained));
    next.add_gold(-i64::from(costs::STUDY_COST));
    Effect {
        actor: next,
        target: None,
        narration: format!("studied arcane arts, gaining {} magic.", gained),
    }
}

fn fortify<R: Rng>(actor: &Faction, _active: &[Faction], rng: &mut R) -> Effect {
    if actor.gold() < costs::FORTIFY_COST {
        return Effect::unchanged(actor, "attempted to fortify but lacked funds.");
    }
    let added = rng.gen_range(costs::FORTIFY_TROOPS);
    let mut next = actor.clone();
    next.add_troops(i64::from(added));
    next.add_gold(-i64::from(costs::FORTIFY_COST));
    Effect {
        actor: next,
        target: None,
        narration: format!("fortified their defenses, adding {} troops.", added),
    }
}

fn trade<R: Rng>(actor: &Faction, _active: &[Faction], rng: &mut R) -> Effect {
    if actor.gold() < costs::TRADE_COST {
        return Effect::unchanged(actor, "sought trade partners but had nothing to offer.");
    }
    let gained = rng.gen_range(costs::TRADE_INFLUENCE);
    let mut next = actor.clone();
    next.add_gold(-i64::from(costs::TRADE_COST));
    next.add_influence(i64::from(gained));
    Effect {
        actor: next,
        target: None,
        narration: format!("engaged in trade, boosting their reputation by {}.", gained),
    }
}

fn attack<R: Rng>(actor: &Faction, active: &[Faction], rng: &mut R) -> Effect {
    let Some(target) = attack_target(actor, active) else {
        return Effect::unchanged(actor, "prepared for battle but found no worthy opponents.");
    };

    let damage = actor.strength() / costs::ATTACK_STRENGTH_DIVISOR
        + rng.gen_range(costs::ATTACK_DAMAGE_ROLL);
    let damage = i64::try_from(damage).unwrap_or(i64::MAX);

    let mut defender = target.clone();
    defender.add_troops(-damage);
    let mut next = actor.clone();
    next.add_troops(-(damage / costs::ATTACK_RECOIL_DIVISOR as i64));

    Effect {
        actor: next,
        narration: format!("attacked {}, dealing {} casualties!", target.name, damage),
        target: Some(defender),
    }
}

fn raid<R: Rng>(actor: &Faction, active: &[Faction], _rng: &mut R) -> Effect {
    let Some(target) = raid_target(actor, active) else {
        return Effect::unchanged(actor, "scouted for raids but found nothing of value.");
    };

    let stolen = (target.gold() / 2).min(costs::RAID_MAX_LOOT);
    let mut victim = target.clone();
    victim.add_gold(-i64::from(stolen));
    let mut next = actor.clone();
    next.add_gold(i64::from(stolen));

    Effect {
        actor: next,
        narration: format!("raided {}, stealing {} gold!", target.name, stolen),
        target: Some(victim),
    }
}

fn form_alliance<R: Rng>(actor: &Faction, _active: &[Faction], _rng: &mut R) -> Effect {
    Effect::unchanged(actor, "sent diplomatic envoys seeking allies.")
}

fn contemplate<R: Rng>(actor: &Faction, _active: &[Faction], _rng: &mut R) -> Effect {
    Effect::unchanged(actor, "contemplated their next move.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use faction_events::fixtures;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn apply(kind: ActionKind, actor: &Faction, active: &[Faction]) -> Effect {
        let mut rng = SmallRng::seed_from_u64(99);
        effect_for::<SmallRng>(kind)(actor, active, &mut rng)
    }

    #[test]
    fn test_gather_adds_gold_in_range() {
        let actor = fixtures::faction(1, "Miners", 0, 10, 0, 0);
        let effect = apply(ActionKind::GatherResources, &actor, &[]);
        assert!(costs::GATHER_GOLD.contains(&effect.actor.gold()));
        assert!(effect.narration.starts_with("gathered resources, gaining "));
    }

    #[test]
    fn test_recruit_spends_gold() {
        let actor = fixtures::faction(1, "Legion", 100, 50, 0, 0);
        let effect = apply(ActionKind::RecruitTroops, &actor, &[]);
        assert_eq!(effect.actor.gold(), 70);
        let recruited = effect.actor.troops() - 50;
        assert!(costs::RECRUIT_TROOPS.contains(&recruited));
        assert_eq!(
            effect.narration,
            format!("recruited {} troops for 30 gold.", recruited)
        );
    }

    #[test]
    fn test_costed_actions_fail_without_gold() {
        let cases = [
            (ActionKind::RecruitTroops, 29, "attempted to recruit troops but lacked funds."),
            (ActionKind::ExpandInfluence, 19, "attempted to expand influence but lacked funds."),
            (ActionKind::StudyMagic, 24, "attempted to study magic but lacked funds."),
            (ActionKind::Fortify, 14, "attempted to fortify but lacked funds."),
            (ActionKind::Trade, 9, "sought trade partners but had nothing to offer."),
        ];
        for (kind, gold, text) in cases {
            let actor = fixtures::faction(1, "Paupers", gold, 10, 1, 1);
            let effect = apply(kind, &actor, &[]);
            assert_eq!(effect.actor, actor, "{:?} changed state", kind);
            assert_eq!(effect.narration, text);
            assert!(effect.target.is_none());
        }
    }

    #[test]
    fn test_failed_cost_check_draws_nothing() {
        let actor = fixtures::faction(1, "Paupers", 0, 10, 0, 0);
        let mut rng = SmallRng::seed_from_u64(5);
        let mut untouched = SmallRng::seed_from_u64(5);
        effect_for::<SmallRng>(ActionKind::StudyMagic)(&actor, &[], &mut rng);
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn test_costed_actions_succeed_at_exact_cost() {
        let cases = [
            (ActionKind::ExpandInfluence, costs::EXPAND_COST),
            (ActionKind::StudyMagic, costs::STUDY_COST),
            (ActionKind::Fortify, costs::FORTIFY_COST),
            (ActionKind::Trade, costs::TRADE_COST),
        ];
        for (kind, cost) in cases {
            let actor = fixtures::faction(1, "Exact", cost, 10, 0, 0);
            let effect = apply(kind, &actor, &[]);
            assert_eq!(effect.actor.gold(), 0, "{:?}", kind);
            assert!(effect.actor.strength() > actor.strength() - 2, "{:?}", kind);
            assert!(!effect.narration.contains("lacked"));
            assert!(!effect.narration.contains("nothing to offer"));
        }
    }

    #[test]
    fn test_attack_hits_weakest_opponent() {
        let f1 = fixtures::faction_with_strength(1, "F1", 80);
        let f2 = fixtures::faction_with_strength(2, "F2", 40);
        let f3 = fixtures::faction_with_strength(3, "F3", 60);
        let active = vec![f1.clone(), f2, f3];

        let effect = apply(ActionKind::Attack, &f1, &active);
        let target = effect.target.expect("attack found no target");
        assert_eq!(target.name, "F2");

        // damage = 80 / 5 + [0, 20), so 40 troops drop to 5..=24
        assert!((5..25).contains(&target.troops()));
        let damage = 40 - target.troops();
        assert_eq!(effect.actor.troops(), 80 - damage / 3);
        assert_eq!(
            effect.narration,
            format!("attacked F2, dealing {} casualties!", damage)
        );
    }

    #[test]
    fn test_attack_tie_prefers_first_encountered() {
        let actor = fixtures::faction_with_strength(1, "A", 100);
        let active = vec![
            actor.clone(),
            fixtures::faction_with_strength(7, "First", 30),
            fixtures::faction_with_strength(3, "Second", 30),
        ];
        assert_eq!(attack_target(&actor, &active).map(|f| f.name.as_str()), Some("First"));
    }

    #[test]
    fn test_attack_alone_finds_no_opponent() {
        let actor = fixtures::faction_with_strength(1, "Alone", 100);
        let effect = apply(ActionKind::Attack, &actor, &[actor.clone()]);
        assert_eq!(effect.actor, actor);
        assert_eq!(
            effect.narration,
            "prepared for battle but found no worthy opponents."
        );
    }

    #[test]
    fn test_raid_steals_half_capped() {
        let actor = fixtures::faction(1, "Raiders", 0, 100, 0, 0);
        let rich = fixtures::faction(2, "Rich", 300, 5, 0, 0);
        let effect = apply(ActionKind::Raid, &actor, &[actor.clone(), rich]);
        assert_eq!(effect.actor.gold(), 40);
        assert_eq!(effect.target.map(|t| t.gold()), Some(260));

        let modest = fixtures::faction(3, "Modest", 30, 5, 0, 0);
        let effect = apply(ActionKind::Raid, &actor, &[actor.clone(), modest]);
        assert_eq!(effect.actor.gold(), 15);
        assert_eq!(effect.narration, "raided Modest, stealing 15 gold!");
    }

    #[test]
    fn test_raid_skips_penniless_factions() {
        let actor = fixtures::faction(1, "Raiders", 100, 50, 0, 0);
        let broke = fixtures::faction(2, "Broke", 0, 10, 0, 0);
        let effect = apply(ActionKind::Raid, &actor, &[actor.clone(), broke]);
        assert_eq!(effect.actor, actor);
        assert!(effect.target.is_none());
        assert_eq!(effect.narration, "scouted for raids but found nothing of value.");
    }

    #[test]
    fn test_narration_only_kinds() {
        let actor = fixtures::faction(1, "Quiet", 100, 50, 10, 20);
        let effect = apply(ActionKind::FormAlliance, &actor, &[]);
        assert_eq!(effect.actor, actor);
        assert_eq!(effect.narration, "sent diplomatic envoys seeking allies.");

        for kind in [ActionKind::BreakAlliance, ActionKind::Spy, ActionKind::Sabotage] {
            let effect = apply(kind, &actor, &[]);
            assert_eq!(effect.actor, actor);
            assert_eq!(effect.narration, "contemplated their next move.");
        }
    }
}
