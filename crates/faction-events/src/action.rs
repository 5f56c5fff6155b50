//! Action Vocabulary
//!
//! The closed set of things a faction may attempt in a turn.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{normalize_name, ParseNameError};

/// Kind of action a faction takes (or suffers) during a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    GatherResources,
    RecruitTroops,
    ExpandInfluence,
    StudyMagic,
    Attack,
    Raid,
    FormAlliance,
    BreakAlliance,
    Trade,
    Fortify,
    Spy,
    Sabotage,
    InternalDecay,
}

impl ActionKind {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::GatherResources => "Gather Resources",
            ActionKind::RecruitTroops => "Recruit Troops",
            ActionKind::ExpandInfluence => "Expand Influence",
            ActionKind::StudyMagic => "Study Magic",
            ActionKind::Attack => "Attack Enemy",
            ActionKind::Raid => "Raid",
            ActionKind::FormAlliance => "Form Alliance",
            ActionKind::BreakAlliance => "Break Alliance",
            ActionKind::Trade => "Trade",
            ActionKind::Fortify => "Fortify",
            ActionKind::Spy => "Spy",
            ActionKind::Sabotage => "Sabotage",
            ActionKind::InternalDecay => "Internal Decay",
        }
    }

    /// Flavor text
    pub fn flavor(&self) -> &'static str {
        match self {
            ActionKind::GatherResources => "Collect gold and materials",
            ActionKind::RecruitTroops => "Train new soldiers",
            ActionKind::ExpandInfluence => "Spread political reach",
            ActionKind::StudyMagic => "Research arcane knowledge",
            ActionKind::Attack => "Launch military assault",
            ActionKind::Raid => "Quick strike for resources",
            ActionKind::FormAlliance => "Establish diplomatic ties",
            ActionKind::BreakAlliance => "End diplomatic agreement",
            ActionKind::Trade => "Exchange resources with allies",
            ActionKind::Fortify => "Strengthen defenses",
            ActionKind::Spy => "Gather intelligence",
            ActionKind::Sabotage => "Undermine enemy operations",
            ActionKind::InternalDecay => "Suffer from corruption/rebellion",
        }
    }

    /// Actions that pick a second faction as their target
    pub fn is_targeted(&self) -> bool {
        matches!(self, ActionKind::Attack | ActionKind::Raid)
    }

    pub fn all() -> &'static [ActionKind] {
        &[
            ActionKind::GatherResources,
            ActionKind::RecruitTroops,
            ActionKind::ExpandInfluence,
            ActionKind::StudyMagic,
            ActionKind::Attack,
            ActionKind::Raid,
            ActionKind::FormAlliance,
            ActionKind::BreakAlliance,
            ActionKind::Trade,
            ActionKind::Fortify,
            ActionKind::Spy,
            ActionKind::Sabotage,
            ActionKind::InternalDecay,
        ]
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ActionKind {
    type Err = ParseNameError;

    /// Accepts snake_case, kebab-case or the display label ("attack" also
    /// matches "Attack Enemy").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        ActionKind::all()
            .iter()
            .copied()
            .find(|kind| {
                normalize_name(kind.label()) == wanted
                    || serde_name(*kind).map_or(false, |name| name == wanted)
            })
            .ok_or_else(|| ParseNameError::new("action kind", s))
    }
}

fn serde_name(kind: ActionKind) -> Option<String> {
    serde_json::to_value(kind)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_is_closed() {
        assert_eq!(ActionKind::all().len(), 13);
        for kind in ActionKind::all() {
            assert!(!kind.label().is_empty());
            assert!(!kind.flavor().is_empty());
        }
    }

    #[test]
    fn test_targeted_kinds() {
        let targeted: Vec<_> = ActionKind::all().iter().filter(|k| k.is_targeted()).collect();
        assert_eq!(targeted, vec![&ActionKind::Attack, &ActionKind::Raid]);
    }

    #[test]
    fn test_parse_action_kind() {
        assert_eq!("attack".parse::<ActionKind>().unwrap(), ActionKind::Attack);
        assert_eq!("Attack Enemy".parse::<ActionKind>().unwrap(), ActionKind::Attack);
        assert_eq!("gather-resources".parse::<ActionKind>().unwrap(), ActionKind::GatherResources);
        assert_eq!("internal_decay".parse::<ActionKind>().unwrap(), ActionKind::InternalDecay);
        assert!("dance".parse::<ActionKind>().is_err());
    }
}
