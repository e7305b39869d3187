//! Upgrade definitions: slots on a unit offering a set of related options.

use serde::{Deserialize, Serialize};

use super::rule_data::SpecialRule;

/// Selection semantics declared by the army book for an upgrade.
///
/// Unknown values in catalogue data deserialize to [`UpgradeType::Unrecognized`]
/// so that one bad upgrade does not prevent the whole book from loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeType {
    /// Zero or one option.
    SingleOptional,
    /// Exactly one option.
    SingleRequired,
    /// Any subset of the options.
    Multiple,
    /// A count per option.
    Counted,
    /// A type this engine does not know how to present.
    #[serde(other)]
    Unrecognized,
}

/// How many models of the unit an upgrade applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Affects {
    /// The whole unit.
    #[default]
    All,
    /// A fixed number of models.
    Models(u32),
    /// Each model may take it individually.
    AnyModel,
}

/// A named upgrade slot.
///
/// # Example RON
///
/// ```ron
/// Upgrade(
///     id: "sergeant_weapon",
///     label: "Sergeant may replace Pistol:",
///     kind: SingleOptional,
///     affects: Models(1),
///     replace_what: ["Pistol"],
///     options: [
///         UpgradeOption(id: "plasma_pistol", label: "Plasma Pistol", cost: 5, gains: [...]),
///     ],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upgrade {
    /// Identifier, unique within the army book.
    pub id: String,

    /// Text shown above the options.
    pub label: String,

    /// Selection semantics.
    pub kind: UpgradeType,

    /// Options in display order.
    #[serde(default)]
    pub options: Vec<UpgradeOption>,

    /// Models affected by each selection.
    #[serde(default)]
    pub affects: Affects,

    /// Maximum number of selections across all options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<u32>,

    /// Loadout entries removed when an option is taken.
    #[serde(default)]
    pub replace_what: Vec<String>,

    /// Upgrades that must already have a selection.
    #[serde(default)]
    pub requires: Vec<String>,

    /// Upgrades that must not have a selection.
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl Upgrade {
    /// Find an option by id.
    #[must_use]
    pub fn option(&self, id: &str) -> Option<&UpgradeOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Whether "nothing selected" is an allowed state.
    #[must_use]
    pub fn allows_none(&self) -> bool {
        self.kind != UpgradeType::SingleRequired
    }
}

/// One selectable choice of an upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeOption {
    /// Identifier, unique within its upgrade.
    pub id: String,

    /// Display label.
    pub label: String,

    /// Point cost per selection.
    #[serde(default)]
    pub cost: u32,

    /// What the unit gains.
    #[serde(default)]
    pub gains: Vec<UpgradeGain>,

    /// Maximum count for counted upgrades.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<u32>,

    /// Models added to the unit per selection.
    #[serde(default)]
    pub added_models: u32,
}

impl UpgradeOption {
    /// Whether this option costs nothing.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.cost == 0
    }

    /// Cost label as shown next to the control.
    #[must_use]
    pub fn cost_label(&self) -> String {
        if self.is_free() {
            "Free".to_string()
        } else {
            format!("{}pts", self.cost)
        }
    }
}

/// Something granted to a unit by a selected option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeGain {
    /// A special rule.
    Rule(SpecialRule),
    /// A weapon added to the loadout.
    Weapon(WeaponGain),
    /// An item added to the loadout, itself carrying rules.
    Item(ItemGain),
}

impl UpgradeGain {
    /// Name used for display grouping.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Rule(rule) => &rule.name,
            Self::Weapon(weapon) => &weapon.name,
            Self::Item(item) => &item.name,
        }
    }
}

/// A weapon profile granted by an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponGain {
    /// Weapon name.
    pub name: String,

    /// Copies granted per selection.
    #[serde(default = "default_count")]
    pub count: u32,

    /// Range in inches (melee weapons have none).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<u32>,

    /// Attack count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attacks: Option<u32>,

    /// Weapon special rules.
    #[serde(default)]
    pub special_rules: Vec<SpecialRule>,
}

/// An item granted by an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGain {
    /// Item name.
    pub name: String,

    /// Copies granted per selection.
    #[serde(default = "default_count")]
    pub count: u32,

    /// What the item confers.
    #[serde(default)]
    pub content: Vec<ItemContent>,
}

/// An entry inside an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemContent {
    /// A special rule conferred to the bearer.
    Rule(SpecialRule),
    /// A defense bonus.
    Defense(i32),
}

impl ItemContent {
    /// The content expressed as a unit rule.
    #[must_use]
    pub fn as_rule(&self) -> SpecialRule {
        match self {
            Self::Rule(rule) => rule.clone(),
            Self::Defense(rating) => SpecialRule::rated("Defense", format!("{rating:+}")),
        }
    }
}

/// Default count for gains that do not specify one.
const fn default_count() -> u32 {
    1
}
