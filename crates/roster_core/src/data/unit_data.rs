//! Unit data structures for catalogue unit definitions.

use serde::{Deserialize, Serialize};

use super::rule_data::SpecialRule;

/// A weapon or item carried by a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadoutEntry {
    /// Weapon or item name.
    pub name: String,

    /// Number of copies carried across the unit.
    #[serde(default = "default_count")]
    pub count: u32,

    /// Range in inches (melee weapons and items have none).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<u32>,

    /// Attack count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attacks: Option<u32>,

    /// Weapon special rules, or the rules an item confers.
    #[serde(default)]
    pub special_rules: Vec<SpecialRule>,
}

impl LoadoutEntry {
    /// Create a weapon entry without profile details.
    #[must_use]
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
            range: None,
            attacks: None,
            special_rules: Vec::new(),
        }
    }

    /// Set the range and attacks.
    #[must_use]
    pub fn with_profile(mut self, range: Option<u32>, attacks: u32) -> Self {
        self.range = range;
        self.attacks = Some(attacks);
        self
    }
}

/// Catalogue unit definition.
///
/// # Example RON
///
/// ```ron
/// UnitData(
///     id: "battle_brothers",
///     name: "Battle Brothers",
///     size: 5,
///     cost: 100,
///     quality: 3,
///     defense: 4,
///     equipment: [LoadoutEntry(name: "Rifle", count: 5, range: Some(24), attacks: Some(1))],
///     special_rules: [SpecialRule(name: "Fearless")],
///     upgrades: ["squad_weapons", "sergeant"],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitData {
    /// Unique identifier within the army book.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Model count before upgrades.
    #[serde(default = "default_count")]
    pub size: u32,

    /// Point cost before upgrades.
    pub cost: u32,

    /// Quality roll threshold.
    pub quality: u8,

    /// Defense roll threshold.
    pub defense: u8,

    /// Starting loadout.
    #[serde(default)]
    pub equipment: Vec<LoadoutEntry>,

    /// Innate special rules.
    #[serde(default)]
    pub special_rules: Vec<SpecialRule>,

    /// Upgrade package uids available to this unit.
    #[serde(default)]
    pub upgrades: Vec<String>,
}

impl UnitData {
    /// Check if this unit has a special rule with the given name.
    #[must_use]
    pub fn has_rule(&self, name: &str) -> bool {
        self.special_rules.iter().any(|r| r.is_named(name))
    }
}

/// Default count for entries that do not specify one.
const fn default_count() -> u32 {
    1
}
