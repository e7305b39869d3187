//! Effective loadout of a unit after upgrades.

use crate::data::{LoadoutEntry, UpgradeGain};
use crate::upgrades::models_affected;
use crate::unit::SelectedUnit;

/// The unit's loadout with replacements and gains from applied upgrades.
///
/// For each applied option, in application order, every entry named in the
/// upgrade's replacements loses one copy per affected model (never going
/// below zero; empty entries are dropped), then the option's weapons and
/// items are added, one set per affected model.
#[must_use]
pub fn effective_loadout(unit: &SelectedUnit) -> Vec<LoadoutEntry> {
    let mut loadout = unit.loadout.clone();

    for applied in &unit.applied_upgrades {
        let per_selection = models_affected(unit, applied.affects);
        for option in &applied.options {
            let times = per_selection.saturating_mul(option.count);

            for replaced in &applied.replaces {
                remove_copies(&mut loadout, replaced, times);
            }

            for gain in &option.gains {
                match gain {
                    UpgradeGain::Rule(_) => {}
                    UpgradeGain::Weapon(weapon) => loadout.push(LoadoutEntry {
                        name: weapon.name.clone(),
                        count: weapon.count.saturating_mul(times),
                        range: weapon.range,
                        attacks: weapon.attacks,
                        special_rules: weapon.special_rules.clone(),
                    }),
                    UpgradeGain::Item(item) => loadout.push(LoadoutEntry {
                        name: item.name.clone(),
                        count: item.count.saturating_mul(times),
                        range: None,
                        attacks: None,
                        special_rules: item.content.iter().map(|c| c.as_rule()).collect(),
                    }),
                }
            }
        }
    }

    loadout.retain(|entry| entry.count > 0);
    loadout
}

fn remove_copies(loadout: &mut [LoadoutEntry], name: &str, mut copies: u32) {
    for entry in loadout.iter_mut().filter(|e| e.name == name) {
        if copies == 0 {
            break;
        }
        let taken = entry.count.min(copies);
        entry.count -= taken;
        copies -= taken;
    }
}

/// Summary such as `"2x Rifle, Pistol"`, grouping entries by name.
#[must_use]
pub fn loadout_summary(entries: &[LoadoutEntry]) -> String {
    let mut groups: Vec<(&str, u32)> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|(name, _)| *name == entry.name) {
            Some((_, count)) => *count = count.saturating_add(entry.count),
            None => groups.push((entry.name.as_str(), entry.count)),
        }
    }

    groups
        .into_iter()
        .map(|(name, count)| {
            if count > 1 {
                format!("{count}x {name}")
            } else {
                name.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
