//! Relationship Types
//!
//! Standing between two factions.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{normalize_name, FactionId, ParseNameError};

/// Lowest relationship strength (open war)
pub const MIN_RELATIONSHIP_STRENGTH: i32 = -100;
/// Highest relationship strength (strong alliance)
pub const MAX_RELATIONSHIP_STRENGTH: i32 = 100;

/// Store-assigned relationship identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipId(pub u32);

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of standing, ordered from warmest to coldest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Allied,
    Friendly,
    Neutral,
    Unfriendly,
    Hostile,
    AtWar,
}

impl RelationshipType {
    pub fn display_name(&self) -> &'static str {
        match self {
            RelationshipType::Allied => "Allied",
            RelationshipType::Friendly => "Friendly",
            RelationshipType::Neutral => "Neutral",
            RelationshipType::Unfriendly => "Unfriendly",
            RelationshipType::Hostile => "Hostile",
            RelationshipType::AtWar => "At War",
        }
    }

    pub fn all() -> &'static [RelationshipType] {
        &[
            RelationshipType::Allied,
            RelationshipType::Friendly,
            RelationshipType::Neutral,
            RelationshipType::Unfriendly,
            RelationshipType::Hostile,
            RelationshipType::AtWar,
        ]
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for RelationshipType {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        RelationshipType::all()
            .iter()
            .copied()
            .find(|t| normalize_name(t.display_name()) == wanted)
            .ok_or_else(|| ParseNameError::new("relationship type", s))
    }
}

/// A relationship between two distinct factions.
///
/// `strength` stays within [-100, 100]; every write clamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Assigned by the store on append
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RelationshipId>,
    pub faction1: FactionId,
    pub faction2: FactionId,
    pub relationship_type: RelationshipType,
    #[serde(deserialize_with = "deserialize_strength")]
    strength: i32,
}

impl Relationship {
    pub fn new(
        faction1: FactionId,
        faction2: FactionId,
        relationship_type: RelationshipType,
        strength: i32,
    ) -> Self {
        Self {
            id: None,
            faction1,
            faction2,
            relationship_type,
            strength: clamp_strength(strength as i64),
        }
    }

    pub fn strength(&self) -> i32 {
        self.strength
    }

    pub fn set_strength(&mut self, strength: i32) {
        self.strength = clamp_strength(strength as i64);
    }

    pub fn adjust_strength(&mut self, delta: i32) {
        self.strength = clamp_strength(self.strength as i64 + delta as i64);
    }

    /// True if the relationship joins `a` and `b` in either order
    pub fn connects(&self, a: FactionId, b: FactionId) -> bool {
        (self.faction1 == a && self.faction2 == b) || (self.faction1 == b && self.faction2 == a)
    }

    pub fn involves(&self, faction: FactionId) -> bool {
        self.faction1 == faction || self.faction2 == faction
    }

    /// The other side of the relationship, if `faction` is one of its ends
    pub fn other(&self, faction: FactionId) -> Option<FactionId> {
        if self.faction1 == faction {
            Some(self.faction2)
        } else if self.faction2 == faction {
            Some(self.faction1)
        } else {
            None
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Relationship: Faction {} <-> Faction {} [{}: {}]",
            self.faction1, self.faction2, self.relationship_type, self.strength
        )
    }
}

fn deserialize_strength<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    Ok(clamp_strength(raw))
}

fn clamp_strength(value: i64) -> i32 {
    value.clamp(MIN_RELATIONSHIP_STRENGTH as i64, MAX_RELATIONSHIP_STRENGTH as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps() {
        let rel = Relationship::new(FactionId(1), FactionId(2), RelationshipType::AtWar, -250);
        assert_eq!(rel.strength(), -100);
        let rel = Relationship::new(FactionId(1), FactionId(2), RelationshipType::Allied, 101);
        assert_eq!(rel.strength(), 100);
    }

    #[test]
    fn test_adjust_clamps_without_overflow() {
        let mut rel = Relationship::new(FactionId(1), FactionId(2), RelationshipType::Neutral, 90);
        rel.adjust_strength(25);
        assert_eq!(rel.strength(), 100);
        rel.adjust_strength(i32::MIN);
        assert_eq!(rel.strength(), -100);
        rel.set_strength(-3);
        assert_eq!(rel.strength(), -3);
    }

    #[test]
    fn test_connects_is_unordered() {
        let rel = Relationship::new(FactionId(3), FactionId(8), RelationshipType::Hostile, -40);
        assert!(rel.connects(FactionId(8), FactionId(3)));
        assert!(!rel.connects(FactionId(8), FactionId(4)));
        assert_eq!(rel.other(FactionId(3)), Some(FactionId(8)));
        assert_eq!(rel.other(FactionId(5)), None);
    }

    #[test]
    fn test_type_order_and_parse() {
        assert!(RelationshipType::Allied < RelationshipType::AtWar);
        assert_eq!("at war".parse::<RelationshipType>().unwrap(), RelationshipType::AtWar);
        assert_eq!("at_war".parse::<RelationshipType>().unwrap(), RelationshipType::AtWar);
        assert!("frenemies".parse::<RelationshipType>().is_err());
    }

    #[test]
    fn test_deserialize_keeps_stored_strength() {
        let json = r#"{"id":4,"faction1":1,"faction2":2,"relationship_type":"friendly","strength":35}"#;
        let rel: Relationship = serde_json::from_str(json).unwrap();
        assert_eq!(rel.id, Some(RelationshipId(4)));
        assert_eq!(rel.strength(), 35);

        let json = r#"{"faction1":1,"faction2":2,"relationship_type":"allied","strength":900}"#;
        let rel: Relationship = serde_json::from_str(json).unwrap();
        assert_eq!(rel.strength(), 100);
    }
}
