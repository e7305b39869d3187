//! Special rule aggregation.
//!
//! Merges a unit's innate rules with rules granted by its upgrades and
//! collapses repeats into one entry with a multiplier.

use std::fmt;

use crate::data::{SpecialRule, UpgradeGain};
use crate::unit::SelectedUnit;

/// Rules granted by the unit's applied upgrades, in application order.
///
/// Rule gains contribute directly and items contribute their content.
/// Weapon rules describe the weapon, not the unit, and are not included.
/// A counted option contributes its rules once per count.
#[must_use]
pub fn all_upgraded_rules(unit: &SelectedUnit) -> Vec<SpecialRule> {
    let mut rules = Vec::new();
    for option in unit.applied_options() {
        for _ in 0..option.count {
            for gain in &option.gains {
                match gain {
                    UpgradeGain::Rule(rule) => rules.push(rule.clone()),
                    UpgradeGain::Weapon(_) => {}
                    UpgradeGain::Item(item) => {
                        rules.extend(item.content.iter().map(|content| content.as_rule()));
                    }
                }
            }
        }
    }
    rules
}

/// One distinct rule with the number of times it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEntry {
    /// The rule.
    pub rule: SpecialRule,
    /// Occurrences.
    pub count: u32,
}

impl fmt::Display for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count > 1 {
            write!(f, "{}x ", self.count)?;
        }
        write!(f, "{}", self.rule)
    }
}

/// Group rules by name and rating, preserving first appearance.
#[must_use]
pub fn group_rules(rules: impl IntoIterator<Item = SpecialRule>) -> Vec<RuleEntry> {
    let mut entries: Vec<RuleEntry> = Vec::new();
    for rule in rules {
        match entries.iter_mut().find(|entry| entry.rule == rule) {
            Some(entry) => entry.count += 1,
            None => entries.push(RuleEntry { rule, count: 1 }),
        }
    }
    entries
}

/// The full rule list of a unit: innate rules followed by upgraded ones.
#[must_use]
pub fn aggregate_rules(unit: &SelectedUnit) -> Vec<RuleEntry> {
    group_rules(
        unit.special_rules
            .iter()
            .cloned()
            .chain(all_upgraded_rules(unit)),
    )
}

/// Comma-separated rule list for display.
#[must_use]
pub fn rules_label(entries: &[RuleEntry]) -> String {
    entries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
