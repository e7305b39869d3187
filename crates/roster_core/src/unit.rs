//! Units placed on a roster and the record of their applied upgrades.

use serde::{Deserialize, Serialize};

use crate::data::{Affects, LoadoutEntry, SpecialRule, UnitData, Upgrade, UpgradeGain, UpgradeOption};
use crate::ids::{SelectionId, SortId};

/// One instance of a catalogue unit placed on the roster.
///
/// Serialized with camelCase field names; this is the record exchanged with
/// persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedUnit {
    /// Unique id within the roster.
    pub selection_id: SelectionId,

    /// Army book the unit was taken from.
    pub army_id: String,

    /// Catalogue unit id within the army book.
    pub unit_id: String,

    /// Catalogue name.
    pub name: String,

    /// Player-chosen name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,

    /// Quality roll threshold.
    pub quality: u8,

    /// Defense roll threshold.
    pub defense: u8,

    /// Model count before upgrades.
    #[serde(default = "default_size")]
    pub size: u32,

    /// Point cost before upgrades.
    pub cost: u32,

    /// Base loadout before upgrades.
    #[serde(default)]
    pub loadout: Vec<LoadoutEntry>,

    /// Innate special rules.
    #[serde(default)]
    pub special_rules: Vec<SpecialRule>,

    /// Applied upgrades in order of first application.
    #[serde(default)]
    pub applied_upgrades: Vec<AppliedUpgrade>,

    /// Host unit this unit is joined to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_to_unit: Option<SelectionId>,

    /// Display order among root units.
    #[serde(default)]
    pub sort_id: SortId,
}

/// Default model count for records that predate the field.
const fn default_size() -> u32 {
    1
}

impl SelectedUnit {
    /// Instantiate a catalogue unit.
    #[must_use]
    pub fn from_catalogue(
        army_id: impl Into<String>,
        data: &UnitData,
        selection_id: SelectionId,
        sort_id: SortId,
    ) -> Self {
        Self {
            selection_id,
            army_id: army_id.into(),
            unit_id: data.id.clone(),
            name: data.name.clone(),
            custom_name: None,
            quality: data.quality,
            defense: data.defense,
            size: data.size,
            cost: data.cost,
            loadout: data.equipment.clone(),
            special_rules: data.special_rules.clone(),
            applied_upgrades: Vec::new(),
            join_to_unit: None,
            sort_id,
        }
    }

    /// Custom name if set, catalogue name otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.custom_name.as_deref().unwrap_or(&self.name)
    }

    /// Check if the unit has an innate rule with the given name.
    #[must_use]
    pub fn has_rule(&self, name: &str) -> bool {
        self.special_rules.iter().any(|r| r.is_named(name))
    }

    /// Whether the unit declares a host.
    #[must_use]
    pub const fn is_joined(&self) -> bool {
        self.join_to_unit.is_some()
    }

    /// The applied record for an upgrade.
    #[must_use]
    pub fn applied(&self, upgrade_id: &str) -> Option<&AppliedUpgrade> {
        self.applied_upgrades.iter().find(|a| a.upgrade_id == upgrade_id)
    }

    /// Mutable access to the applied record for an upgrade.
    pub fn applied_mut(&mut self, upgrade_id: &str) -> Option<&mut AppliedUpgrade> {
        self.applied_upgrades
            .iter_mut()
            .find(|a| a.upgrade_id == upgrade_id)
    }

    /// Count of an option, zero when not applied.
    #[must_use]
    pub fn option_count(&self, upgrade_id: &str, option_id: &str) -> u32 {
        self.applied(upgrade_id)
            .and_then(|a| a.option(option_id))
            .map_or(0, |o| o.count)
    }

    /// Every applied option across every upgrade.
    pub fn applied_options(&self) -> impl Iterator<Item = &AppliedOption> {
        self.applied_upgrades.iter().flat_map(|a| a.options.iter())
    }

    /// Drop upgrade records with no options left.
    pub(crate) fn prune_empty_upgrades(&mut self) {
        self.applied_upgrades.retain(|a| !a.options.is_empty());
    }
}

/// Options currently selected for one upgrade.
///
/// Captures the catalogue data the derivations need (replacements and the
/// affected model count) at the time the first option was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedUpgrade {
    /// Upgrade id.
    pub upgrade_id: String,

    /// Models affected by each selection.
    #[serde(default)]
    pub affects: Affects,

    /// Loadout entries replaced by each selection.
    #[serde(default)]
    pub replaces: Vec<String>,

    /// Selected options.
    pub options: Vec<AppliedOption>,
}

impl AppliedUpgrade {
    /// Start an empty record for an upgrade.
    #[must_use]
    pub fn for_upgrade(upgrade: &Upgrade) -> Self {
        Self {
            upgrade_id: upgrade.id.clone(),
            affects: upgrade.affects,
            replaces: upgrade.replace_what.clone(),
            options: Vec::new(),
        }
    }

    /// Find a selected option.
    #[must_use]
    pub fn option(&self, option_id: &str) -> Option<&AppliedOption> {
        self.options.iter().find(|o| o.option_id == option_id)
    }

    /// Total selections across options.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.options.iter().fold(0, |total, o| total.saturating_add(o.count))
    }
}

/// A selected option with its multiplicity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedOption {
    /// Option id.
    pub option_id: String,

    /// Label at the time of selection.
    #[serde(default)]
    pub label: String,

    /// Cost per selection.
    #[serde(default)]
    pub cost: u32,

    /// Times selected; always 1 outside counted upgrades.
    #[serde(default = "default_size")]
    pub count: u32,

    /// Models added per selection.
    #[serde(default)]
    pub added_models: u32,

    /// Gains per selection.
    #[serde(default)]
    pub gains: Vec<UpgradeGain>,
}

impl AppliedOption {
    /// Record a first selection of a catalogue option.
    #[must_use]
    pub fn from_option(option: &UpgradeOption) -> Self {
        Self {
            option_id: option.id.clone(),
            label: option.label.clone(),
            cost: option.cost,
            count: 1,
            added_models: option.added_models,
            gains: option.gains.clone(),
        }
    }

    /// Cost contributed by all selections of this option.
    #[must_use]
    pub const fn total_cost(&self) -> u32 {
        self.cost.saturating_mul(self.count)
    }
}
