//! Faction Types
//!
//! Factions, their categories and alignments, and the resource counters the
//! simulation moves around.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{normalize_name, ParseNameError};

/// Store-assigned faction identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactionId(pub u32);

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FactionId {
    fn from(id: u32) -> Self {
        FactionId(id)
    }
}

/// Faction category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactionType {
    Kingdom,
    Guild,
    Clan,
    Cult,
    Mercenary,
    MonsterHorde,
    TradingCompany,
    ReligiousOrder,
}

impl FactionType {
    pub fn display_name(&self) -> &'static str {
        match self {
            FactionType::Kingdom => "Kingdom",
            FactionType::Guild => "Guild",
            FactionType::Clan => "Clan",
            FactionType::Cult => "Cult",
            FactionType::Mercenary => "Mercenary Company",
            FactionType::MonsterHorde => "Monster Horde",
            FactionType::TradingCompany => "Trading Company",
            FactionType::ReligiousOrder => "Religious Order",
        }
    }

    pub fn all() -> &'static [FactionType] {
        &[
            FactionType::Kingdom,
            FactionType::Guild,
            FactionType::Clan,
            FactionType::Cult,
            FactionType::Mercenary,
            FactionType::MonsterHorde,
            FactionType::TradingCompany,
            FactionType::ReligiousOrder,
        ]
    }
}

impl fmt::Display for FactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for FactionType {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        FactionType::all()
            .iter()
            .copied()
            .find(|t| {
                normalize_name(t.display_name()) == wanted
                    || normalize_name(&format!("{:?}", t)) == wanted.replace('_', "")
            })
            .ok_or_else(|| ParseNameError::new("faction type", s))
    }
}

/// Ethical axis of an alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EthicalAxis {
    Lawful,
    Neutral,
    Chaotic,
}

/// Moral axis of an alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoralAxis {
    Good,
    Neutral,
    Evil,
}

/// One of the nine classic alignments
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    LawfulGood,
    NeutralGood,
    ChaoticGood,
    LawfulNeutral,
    TrueNeutral,
    ChaoticNeutral,
    LawfulEvil,
    NeutralEvil,
    ChaoticEvil,
}

impl Alignment {
    pub fn ethical(&self) -> EthicalAxis {
        match self {
            Alignment::LawfulGood | Alignment::LawfulNeutral | Alignment::LawfulEvil => {
                EthicalAxis::Lawful
            }
            Alignment::NeutralGood | Alignment::TrueNeutral | Alignment::NeutralEvil => {
                EthicalAxis::Neutral
            }
            Alignment::ChaoticGood | Alignment::ChaoticNeutral | Alignment::ChaoticEvil => {
                EthicalAxis::Chaotic
            }
        }
    }

    pub fn moral(&self) -> MoralAxis {
        match self {
            Alignment::LawfulGood | Alignment::NeutralGood | Alignment::ChaoticGood => {
                MoralAxis::Good
            }
            Alignment::LawfulNeutral | Alignment::TrueNeutral | Alignment::ChaoticNeutral => {
                MoralAxis::Neutral
            }
            Alignment::LawfulEvil | Alignment::NeutralEvil | Alignment::ChaoticEvil => {
                MoralAxis::Evil
            }
        }
    }

    pub fn is_lawful(&self) -> bool {
        self.ethical() == EthicalAxis::Lawful
    }

    pub fn is_chaotic(&self) -> bool {
        self.ethical() == EthicalAxis::Chaotic
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Alignment::LawfulGood => "Lawful Good",
            Alignment::NeutralGood => "Neutral Good",
            Alignment::ChaoticGood => "Chaotic Good",
            Alignment::LawfulNeutral => "Lawful Neutral",
            Alignment::TrueNeutral => "True Neutral",
            Alignment::ChaoticNeutral => "Chaotic Neutral",
            Alignment::LawfulEvil => "Lawful Evil",
            Alignment::NeutralEvil => "Neutral Evil",
            Alignment::ChaoticEvil => "Chaotic Evil",
        }
    }

    pub fn all() -> &'static [Alignment] {
        &[
            Alignment::LawfulGood,
            Alignment::NeutralGood,
            Alignment::ChaoticGood,
            Alignment::LawfulNeutral,
            Alignment::TrueNeutral,
            Alignment::ChaoticNeutral,
            Alignment::LawfulEvil,
            Alignment::NeutralEvil,
            Alignment::ChaoticEvil,
        ]
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Alignment {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Alignment::all()
            .iter()
            .copied()
            .find(|a| normalize_name(a.display_name()) == wanted)
            .ok_or_else(|| ParseNameError::new("alignment", s))
    }
}

/// The four resource counters a faction holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Gold,
    Troops,
    Magic,
    Influence,
}

impl Resource {
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Gold => "gold",
            Resource::Troops => "troops",
            Resource::Magic => "magic",
            Resource::Influence => "influence",
        }
    }

    pub fn all() -> &'static [Resource] {
        &[Resource::Gold, Resource::Troops, Resource::Magic, Resource::Influence]
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Resource::all()
            .iter()
            .copied()
            .find(|r| r.name() == wanted)
            .ok_or_else(|| ParseNameError::new("resource", s))
    }
}

/// Resource counters for a faction.
///
/// Counters never go below zero: every signed adjustment floors at zero.
/// Counters missing from serialized data take their starting values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub gold: u32,
    pub troops: u32,
    pub magic: u32,
    pub influence: u32,
}

impl Resources {
    pub const STARTING: Resources = Resources {
        gold: 100,
        troops: 50,
        magic: 10,
        influence: 20,
    };

    pub fn new(gold: u32, troops: u32, magic: u32, influence: u32) -> Self {
        Self { gold, troops, magic, influence }
    }

    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Gold => self.gold,
            Resource::Troops => self.troops,
            Resource::Magic => self.magic,
            Resource::Influence => self.influence,
        }
    }

    /// Apply a signed change, clamping at zero (and at `u32::MAX`)
    pub fn adjust(&mut self, resource: Resource, delta: i64) {
        let slot = match resource {
            Resource::Gold => &mut self.gold,
            Resource::Troops => &mut self.troops,
            Resource::Magic => &mut self.magic,
            Resource::Influence => &mut self.influence,
        };
        *slot = clamp_counter((*slot as i64).saturating_add(delta));
    }

    /// troops + gold/10 + 2*magic + influence
    pub fn strength(&self) -> u64 {
        self.troops as u64 + (self.gold / 10) as u64 + 2 * self.magic as u64 + self.influence as u64
    }
}

impl Default for Resources {
    fn default() -> Self {
        Resources::STARTING
    }
}

fn clamp_counter(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

/// A single faction in the world
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    pub faction_type: FactionType,
    pub alignment: Alignment,
    pub resources: Resources,
    /// Inactive factions are skipped by the simulation but stay readable
    pub active: bool,
}

impl Faction {
    pub fn new(
        id: impl Into<FactionId>,
        name: impl Into<String>,
        faction_type: FactionType,
        alignment: Alignment,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            faction_type,
            alignment,
            resources: Resources::STARTING,
            active: true,
        }
    }

    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = resources;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn gold(&self) -> u32 {
        self.resources.gold
    }

    pub fn troops(&self) -> u32 {
        self.resources.troops
    }

    pub fn magic(&self) -> u32 {
        self.resources.magic
    }

    pub fn influence(&self) -> u32 {
        self.resources.influence
    }

    /// Derived score, recomputed on every call
    pub fn strength(&self) -> u64 {
        self.resources.strength()
    }

    pub fn is_alive(&self) -> bool {
        self.active && self.strength() > 0
    }

    pub fn adjust(&mut self, resource: Resource, delta: i64) {
        self.resources.adjust(resource, delta);
    }

    pub fn add_gold(&mut self, delta: i64) {
        self.adjust(Resource::Gold, delta);
    }

    pub fn add_troops(&mut self, delta: i64) {
        self.adjust(Resource::Troops, delta);
    }

    pub fn add_magic(&mut self, delta: i64) {
        self.adjust(Resource::Magic, delta);
    }

    pub fn add_influence(&mut self, delta: i64) {
        self.adjust(Resource::Influence, delta);
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - Strength: {} [Gold: {}, Troops: {}, Magic: {}, Influence: {}]",
            self.name,
            self.faction_type,
            self.strength(),
            self.gold(),
            self.troops(),
            self.magic(),
            self.influence()
        )
    }
}

/// A faction that has not been stored yet and therefore has no id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionDraft {
    pub name: String,
    pub faction_type: FactionType,
    pub alignment: Alignment,
    pub resources: Resources,
    pub active: bool,
}

impl FactionDraft {
    pub fn new(name: impl Into<String>, faction_type: FactionType, alignment: Alignment) -> Self {
        Self {
            name: name.into(),
            faction_type,
            alignment,
            resources: Resources::STARTING,
            active: true,
        }
    }

    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = resources;
        self
    }

    pub fn into_faction(self, id: FactionId) -> Faction {
        Faction {
            id,
            name: self.name,
            faction_type: self.faction_type,
            alignment: self.alignment,
            resources: self.resources,
            active: self.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_resources() {
        let faction = Faction::new(1, "Iron Crown", FactionType::Kingdom, Alignment::LawfulNeutral);
        assert_eq!(faction.resources, Resources::new(100, 50, 10, 20));
        assert!(faction.active);
    }

    #[test]
    fn test_strength_formula() {
        let faction = Faction::new(1, "Ashen Cult", FactionType::Cult, Alignment::ChaoticEvil)
            .with_resources(Resources::new(109, 50, 10, 20));
        // 50 + 10 + 20 + 20
        assert_eq!(faction.strength(), 100);
    }

    #[test]
    fn test_adjust_floors_at_zero() {
        let mut faction = Faction::new(1, "Ashen Cult", FactionType::Cult, Alignment::ChaoticEvil);
        faction.add_troops(-500);
        faction.add_gold(-1);
        assert_eq!(faction.troops(), 0);
        assert_eq!(faction.gold(), 99);

        faction.adjust(Resource::Magic, i64::MIN / 2);
        assert_eq!(faction.magic(), 0);
    }

    #[test]
    fn test_adjust_saturates_at_top() {
        let mut resources = Resources::new(u32::MAX - 1, 0, 0, 0);
        resources.adjust(Resource::Gold, 10);
        assert_eq!(resources.gold, u32::MAX);
    }

    #[test]
    fn test_is_alive() {
        let broke = Faction::new(1, "Dust", FactionType::Clan, Alignment::TrueNeutral)
            .with_resources(Resources::new(9, 0, 0, 0));
        assert!(!broke.is_alive());

        let sleeping = Faction::new(2, "Sleepers", FactionType::Clan, Alignment::TrueNeutral).inactive();
        assert!(!sleeping.is_alive());
    }

    #[test]
    fn test_alignment_axes() {
        assert_eq!(Alignment::ChaoticGood.ethical(), EthicalAxis::Chaotic);
        assert_eq!(Alignment::ChaoticGood.moral(), MoralAxis::Good);
        assert_eq!(Alignment::TrueNeutral.ethical(), EthicalAxis::Neutral);
        assert_eq!(Alignment::TrueNeutral.moral(), MoralAxis::Neutral);
        assert!(Alignment::LawfulEvil.is_lawful());
        assert!(!Alignment::NeutralEvil.is_chaotic());

        let lawful = Alignment::all().iter().filter(|a| a.is_lawful()).count();
        assert_eq!(lawful, 3);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("chaotic_evil".parse::<Alignment>().unwrap(), Alignment::ChaoticEvil);
        assert_eq!("True Neutral".parse::<Alignment>().unwrap(), Alignment::TrueNeutral);
        assert_eq!("monster-horde".parse::<FactionType>().unwrap(), FactionType::MonsterHorde);
        assert_eq!("Mercenary Company".parse::<FactionType>().unwrap(), FactionType::Mercenary);
        assert_eq!("mercenary".parse::<FactionType>().unwrap(), FactionType::Mercenary);
        assert_eq!("Gold".parse::<Resource>().unwrap(), Resource::Gold);
        assert!("dragonflight".parse::<FactionType>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Alignment::ChaoticNeutral).unwrap();
        assert_eq!(json, "\"chaotic_neutral\"");
        let json = serde_json::to_string(&FactionId(7)).unwrap();
        assert_eq!(json, "7");
    }
}
