//! Upgrade rules engine.
//!
//! Derives the control semantics of an upgrade, answers whether an option
//! is applied or may be applied, and applies/removes options on a unit.
//!
//! All functions operate on a single [`SelectedUnit`] and the catalogue
//! [`Upgrade`] in question. The roster resolves ids and commits the
//! modified unit only when the operation succeeds.

use tracing::{debug, warn};

use crate::cost::unit_size;
use crate::data::{Affects, Catalogue, Upgrade, UpgradeOption, UpgradeType};
use crate::error::{Result, RosterError};
use crate::unit::{AppliedOption, AppliedUpgrade, SelectedUnit};

/// How an upgrade is presented and what selection semantics it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlType {
    /// At most one option; optional upgrades have an implicit "None".
    Radio,
    /// Independent toggles.
    Check,
    /// Integer stepper per option.
    UpDown,
}

/// Derive the control type of an upgrade.
///
/// # Errors
///
/// Returns [`RosterError::Configuration`] for an unrecognized upgrade type.
pub fn control_type(upgrade: &Upgrade) -> Result<ControlType> {
    match upgrade.kind {
        UpgradeType::SingleOptional | UpgradeType::SingleRequired => Ok(ControlType::Radio),
        UpgradeType::Multiple => Ok(ControlType::Check),
        UpgradeType::Counted => Ok(ControlType::UpDown),
        UpgradeType::Unrecognized => {
            warn!(upgrade = %upgrade.id, "Upgrade has an unrecognized type");
            Err(RosterError::Configuration {
                upgrade: upgrade.id.clone(),
                message: "unrecognized upgrade type".to_string(),
            })
        }
    }
}

/// Outcome of an apply or remove request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeChange {
    /// The option was added or its count incremented.
    Applied,
    /// The option was removed or its count decremented.
    Removed,
    /// The request was a no-op (already applied, at max, nothing to remove).
    Unchanged,
    /// The option is not valid for selection right now.
    Rejected,
}

impl UpgradeChange {
    /// Whether the unit was modified.
    #[must_use]
    pub const fn is_modified(self) -> bool {
        matches!(self, Self::Applied | Self::Removed)
    }
}

/// Whether an option is applied.
///
/// Passing `None` asks about the "None" row of a radio group: it is applied
/// when no option of the upgrade is.
#[must_use]
pub fn is_applied(unit: &SelectedUnit, upgrade: &Upgrade, option: Option<&UpgradeOption>) -> bool {
    match option {
        Some(option) => unit.option_count(&upgrade.id, &option.id) > 0,
        None => unit
            .applied(&upgrade.id)
            .map_or(true, |applied| applied.options.is_empty()),
    }
}

/// Number of models each selection of an upgrade affects.
#[must_use]
pub fn models_affected(unit: &SelectedUnit, affects: Affects) -> u32 {
    match affects {
        Affects::All => unit_size(unit),
        Affects::Models(n) => n,
        Affects::AnyModel => 1,
    }
}

/// Maximum number of selections across all options of an upgrade, if capped.
///
/// An explicit `select` wins; otherwise the cap comes from how many models
/// the unit has available for the upgrade.
#[must_use]
pub fn selection_limit(unit: &SelectedUnit, upgrade: &Upgrade) -> Option<u32> {
    if let Some(select) = upgrade.select {
        return Some(select);
    }
    match upgrade.affects {
        Affects::All => None,
        Affects::Models(0) => None,
        Affects::Models(n) => Some(unit_size(unit) / n),
        Affects::AnyModel => Some(unit_size(unit)),
    }
}

/// Maximum count of one option of a counted upgrade.
#[must_use]
pub fn option_max(unit: &SelectedUnit, upgrade: &Upgrade, option: &UpgradeOption) -> u32 {
    option
        .max_count
        .or_else(|| selection_limit(unit, upgrade))
        .unwrap_or(1)
}

/// Total selections taken from an upgrade.
#[must_use]
pub fn selections_taken(unit: &SelectedUnit, upgrade: &Upgrade) -> u32 {
    unit.applied(&upgrade.id).map_or(0, AppliedUpgrade::total_count)
}

/// Whether the upgrade's prerequisites and exclusions hold for the unit.
#[must_use]
pub fn prerequisites_met(unit: &SelectedUnit, upgrade: &Upgrade) -> bool {
    let has_selection = |id: &String| {
        unit.applied(id)
            .is_some_and(|applied| !applied.options.is_empty())
    };
    upgrade.requires.iter().all(has_selection) && !upgrade.excludes.iter().any(has_selection)
}

/// Whether an option may be selected (or, for counted upgrades, incremented).
///
/// An option that is already applied on a radio or check control is valid:
/// selecting it again changes nothing. Upgrades with an unrecognized type
/// are never valid.
#[must_use]
pub fn is_valid(unit: &SelectedUnit, upgrade: &Upgrade, option: &UpgradeOption) -> bool {
    let Ok(control) = control_type(upgrade) else {
        return false;
    };
    if !prerequisites_met(unit, upgrade) {
        return false;
    }

    let has_capacity = || {
        selection_limit(unit, upgrade).map_or(true, |limit| selections_taken(unit, upgrade) < limit)
    };

    match control {
        ControlType::Radio => true,
        ControlType::Check => is_applied(unit, upgrade, Some(option)) || has_capacity(),
        ControlType::UpDown => {
            unit.option_count(&upgrade.id, &option.id) < option_max(unit, upgrade, option)
                && has_capacity()
        }
    }
}

/// Apply an option to a unit.
///
/// - Radio: every other applied option of the upgrade is removed first.
///   Re-applying the applied option is [`UpgradeChange::Unchanged`].
/// - Check: adds the option if it is valid; siblings are untouched.
/// - UpDown: increments the count. At the option's maximum this is
///   [`UpgradeChange::Unchanged`], not an error.
///
/// # Errors
///
/// Returns [`RosterError::OptionNotFound`] if the option does not belong to
/// the upgrade, or [`RosterError::Configuration`] if the upgrade type is
/// unrecognized. The unit is not modified on error.
pub fn apply_upgrade(
    unit: &mut SelectedUnit,
    upgrade: &Upgrade,
    option: &UpgradeOption,
) -> Result<UpgradeChange> {
    let control = control_type(upgrade)?;
    if upgrade.option(&option.id).is_none() {
        return Err(RosterError::OptionNotFound {
            upgrade_id: upgrade.id.clone(),
            option_id: option.id.clone(),
        });
    }

    let change = match control {
        ControlType::Radio => {
            if is_applied(unit, upgrade, Some(option)) {
                UpgradeChange::Unchanged
            } else if !prerequisites_met(unit, upgrade) {
                UpgradeChange::Rejected
            } else {
                // Siblings are dropped in place so the record keeps its position.
                if let Some(applied) = unit.applied_mut(&upgrade.id) {
                    applied.options.clear();
                }
                record_option(unit, upgrade, option);
                UpgradeChange::Applied
            }
        }
        ControlType::Check => {
            if is_applied(unit, upgrade, Some(option)) {
                UpgradeChange::Unchanged
            } else if !is_valid(unit, upgrade, option) {
                UpgradeChange::Rejected
            } else {
                record_option(unit, upgrade, option);
                UpgradeChange::Applied
            }
        }
        ControlType::UpDown => {
            if unit.option_count(&upgrade.id, &option.id) >= option_max(unit, upgrade, option) {
                UpgradeChange::Unchanged
            } else if !is_valid(unit, upgrade, option) {
                UpgradeChange::Rejected
            } else {
                record_option(unit, upgrade, option);
                UpgradeChange::Applied
            }
        }
    };

    debug!(
        unit = %unit.selection_id,
        upgrade = %upgrade.id,
        option = %option.id,
        ?change,
        "Apply upgrade"
    );
    Ok(change)
}

/// Remove an option from a unit, or decrement its count.
///
/// Passing `None` clears every option of the upgrade. Removal ignores
/// validity so that units in an invalid state can always be repaired. A
/// single-required upgrade is never left without a selection; switching is
/// done through [`apply_upgrade`].
pub fn remove_upgrade(
    unit: &mut SelectedUnit,
    upgrade: &Upgrade,
    option_id: Option<&str>,
) -> UpgradeChange {
    let change = remove_option(unit, &upgrade.id, option_id, upgrade.allows_none());
    debug!(
        unit = %unit.selection_id,
        upgrade = %upgrade.id,
        option = option_id.unwrap_or("<all>"),
        ?change,
        "Remove upgrade"
    );
    change
}

/// Remove by ids alone, for upgrades no longer present in the catalogue.
pub(crate) fn remove_option(
    unit: &mut SelectedUnit,
    upgrade_id: &str,
    option_id: Option<&str>,
    allows_none: bool,
) -> UpgradeChange {
    let Some(applied) = unit.applied(upgrade_id) else {
        return UpgradeChange::Unchanged;
    };

    match option_id {
        None => {
            if applied.options.is_empty() || !allows_none {
                return UpgradeChange::Unchanged;
            }
            if let Some(applied) = unit.applied_mut(upgrade_id) {
                applied.options.clear();
            }
            unit.prune_empty_upgrades();
            UpgradeChange::Removed
        }
        Some(option_id) => {
            let Some(option) = applied.option(option_id) else {
                return UpgradeChange::Unchanged;
            };
            let last_selection = option.count <= 1 && applied.total_count() <= 1;
            if last_selection && !allows_none {
                return UpgradeChange::Unchanged;
            }
            take_option(unit, upgrade_id, option_id);
            UpgradeChange::Removed
        }
    }
}

/// Select the first option of every single-required upgrade that has none.
pub fn initialize_required<'a>(
    unit: &mut SelectedUnit,
    upgrades: impl IntoIterator<Item = &'a Upgrade>,
) {
    for upgrade in upgrades {
        if upgrade.kind != UpgradeType::SingleRequired || !is_applied(unit, upgrade, None) {
            continue;
        }
        if let Some(first) = upgrade.options.first() {
            record_option(unit, upgrade, first);
        }
    }
}

/// Add one selection of an option.
fn record_option(unit: &mut SelectedUnit, upgrade: &Upgrade, option: &UpgradeOption) {
    if unit.applied(&upgrade.id).is_none() {
        unit.applied_upgrades.push(AppliedUpgrade::for_upgrade(upgrade));
    }
    let Some(applied) = unit.applied_mut(&upgrade.id) else {
        return;
    };
    match applied.options.iter_mut().find(|o| o.option_id == option.id) {
        Some(existing) => existing.count = existing.count.saturating_add(1),
        None => applied.options.push(AppliedOption::from_option(option)),
    }
}

/// Remove one selection of an option.
///
/// At zero the option record is dropped, and an upgrade record with no
/// options is dropped too.
fn take_option(unit: &mut SelectedUnit, upgrade_id: &str, option_id: &str) {
    if let Some(applied) = unit.applied_mut(upgrade_id) {
        if let Some(pos) = applied.options.iter().position(|o| o.option_id == option_id) {
            let option = &mut applied.options[pos];
            if option.count <= 1 {
                applied.options.remove(pos);
            } else {
                option.count -= 1;
            }
        }
    }
    unit.prune_empty_upgrades();
}

/// Options grouped by label for display, in first-appearance order.
///
/// Grouping is cosmetic: each option is still tracked independently.
#[must_use]
pub fn group_options_by_label(upgrade: &Upgrade) -> Vec<(&str, Vec<&UpgradeOption>)> {
    let mut groups: Vec<(&str, Vec<&UpgradeOption>)> = Vec::new();
    for option in &upgrade.options {
        match groups.iter_mut().find(|(label, _)| *label == option.label) {
            Some((_, members)) => members.push(option),
            None => groups.push((option.label.as_str(), vec![option])),
        }
    }
    groups
}

/// A problem with the upgrades currently applied to a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeIssue {
    /// Upgrade concerned.
    pub upgrade_id: String,
    /// Option concerned, if the issue is about one option.
    pub option_id: Option<String>,
    /// What is wrong.
    pub kind: IssueKind,
}

/// Kinds of [`UpgradeIssue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// The upgrade is no longer offered to the unit.
    UnknownUpgrade,
    /// The option no longer exists in the upgrade.
    UnknownOption,
    /// The upgrade type is not recognized; the upgrade is inert.
    Unrecognized,
    /// More selections than the upgrade allows.
    OverLimit,
    /// Prerequisites or exclusions are violated.
    Prerequisites,
    /// A single-required upgrade has no selection.
    MissingRequired,
}

/// Check a unit's applied upgrades against the catalogue.
///
/// Invalid selections are reported, never dropped.
#[must_use]
pub fn audit_unit(unit: &SelectedUnit, catalogue: &impl Catalogue) -> Vec<UpgradeIssue> {
    let mut issues = Vec::new();
    let upgrades = catalogue.unit_upgrades(&unit.army_id, &unit.unit_id);
    let issue = |upgrade_id: &str, option_id: Option<&str>, kind| UpgradeIssue {
        upgrade_id: upgrade_id.to_string(),
        option_id: option_id.map(str::to_string),
        kind,
    };

    for applied in &unit.applied_upgrades {
        let Some(upgrade) = upgrades.iter().find(|u| u.id == applied.upgrade_id) else {
            issues.push(issue(&applied.upgrade_id, None, IssueKind::UnknownUpgrade));
            continue;
        };
        if upgrade.kind == UpgradeType::Unrecognized {
            issues.push(issue(&upgrade.id, None, IssueKind::Unrecognized));
            continue;
        }
        for option in &applied.options {
            match upgrade.option(&option.option_id) {
                None => issues.push(issue(&upgrade.id, Some(&option.option_id), IssueKind::UnknownOption)),
                Some(def) if upgrade.kind == UpgradeType::Counted
                    && option.count > option_max(unit, upgrade, def) =>
                {
                    issues.push(issue(&upgrade.id, Some(&option.option_id), IssueKind::OverLimit));
                }
                Some(_) => {}
            }
        }
        if selection_limit(unit, upgrade).is_some_and(|limit| applied.total_count() > limit) {
            issues.push(issue(&upgrade.id, None, IssueKind::OverLimit));
        }
        if !applied.options.is_empty() && !prerequisites_met(unit, upgrade) {
            issues.push(issue(&upgrade.id, None, IssueKind::Prerequisites));
        }
    }

    for upgrade in &upgrades {
        if upgrade.kind == UpgradeType::SingleRequired && is_applied(unit, upgrade, None) {
            issues.push(issue(&upgrade.id, None, IssueKind::MissingRequired));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::calculate_unit_total;
    use crate::data::{ArmyBook, LoadoutEntry, UnitData, UpgradePackage};
    use crate::ids::{SelectionId, SortId};

    fn option(id: &str, cost: u32) -> UpgradeOption {
        UpgradeOption {
            id: id.to_string(),
            label: id.to_uppercase(),
            cost,
            gains: vec![],
            max_count: None,
            added_models: 0,
        }
    }

    fn upgrade(id: &str, kind: UpgradeType, options: Vec<UpgradeOption>) -> Upgrade {
        Upgrade {
            id: id.to_string(),
            label: id.to_string(),
            kind,
            options,
            affects: Affects::All,
            select: None,
            replace_what: vec![],
            requires: vec![],
            excludes: vec![],
        }
    }

    fn unit(cost: u32, size: u32) -> SelectedUnit {
        let data = UnitData {
            id: "squad".to_string(),
            name: "Squad".to_string(),
            size,
            cost,
            quality: 4,
            defense: 4,
            equipment: vec![LoadoutEntry::new("Rifle", size)],
            special_rules: vec![],
            upgrades: vec![],
        };
        SelectedUnit::from_catalogue("book", &data, SelectionId::new("a"), SortId(0))
    }

    #[test]
    fn test_control_type_mapping() {
        let mk = |kind| upgrade("u", kind, vec![]);
        assert_eq!(control_type(&mk(UpgradeType::SingleOptional)).unwrap(), ControlType::Radio);
        assert_eq!(control_type(&mk(UpgradeType::SingleRequired)).unwrap(), ControlType::Radio);
        assert_eq!(control_type(&mk(UpgradeType::Multiple)).unwrap(), ControlType::Check);
        assert_eq!(control_type(&mk(UpgradeType::Counted)).unwrap(), ControlType::UpDown);
        assert!(matches!(
            control_type(&mk(UpgradeType::Unrecognized)),
            Err(RosterError::Configuration { .. })
        ));
    }

    #[test]
    fn test_radio_swaps_and_removes() {
        let mut u = unit(100, 1);
        let up = upgrade("gear", UpgradeType::SingleOptional, vec![option("a", 10), option("b", 20)]);

        assert!(is_applied(&u, &up, None));
        assert_eq!(apply_upgrade(&mut u, &up, &up.options[0]).unwrap(), UpgradeChange::Applied);
        assert_eq!(calculate_unit_total(&u), 110);

        assert_eq!(apply_upgrade(&mut u, &up, &up.options[1]).unwrap(), UpgradeChange::Applied);
        assert!(!is_applied(&u, &up, Some(&up.options[0])));
        assert_eq!(calculate_unit_total(&u), 120);

        assert_eq!(remove_upgrade(&mut u, &up, None), UpgradeChange::Removed);
        assert_eq!(calculate_unit_total(&u), 100);
        assert!(u.applied_upgrades.is_empty());
    }

    #[test]
    fn test_radio_reapply_is_unchanged() {
        let mut u = unit(100, 1);
        let up = upgrade("gear", UpgradeType::SingleOptional, vec![option("a", 10)]);
        apply_upgrade(&mut u, &up, &up.options[0]).unwrap();
        let before = u.clone();
        assert_eq!(apply_upgrade(&mut u, &up, &up.options[0]).unwrap(), UpgradeChange::Unchanged);
        assert_eq!(u, before);
    }

    #[test]
    fn test_single_required_keeps_one_selection() {
        let mut u = unit(100, 1);
        let up = upgrade("weapon", UpgradeType::SingleRequired, vec![option("a", 0), option("b", 5)]);
        initialize_required(&mut u, [&up]);
        assert!(is_applied(&u, &up, Some(&up.options[0])));

        assert_eq!(remove_upgrade(&mut u, &up, Some("a")), UpgradeChange::Unchanged);
        assert_eq!(remove_upgrade(&mut u, &up, None), UpgradeChange::Unchanged);

        apply_upgrade(&mut u, &up, &up.options[1]).unwrap();
        assert!(is_applied(&u, &up, Some(&up.options[1])));
        assert_eq!(u.applied("weapon").unwrap().options.len(), 1);
    }

    #[test]
    fn test_check_respects_select_cap() {
        let mut u = unit(100, 5);
        let mut up = upgrade("extras", UpgradeType::Multiple, vec![option("a", 5), option("b", 5), option("c", 5)]);
        up.select = Some(2);

        apply_upgrade(&mut u, &up, &up.options[0]).unwrap();
        apply_upgrade(&mut u, &up, &up.options[1]).unwrap();
        assert!(!is_valid(&u, &up, &up.options[2]));
        assert!(is_valid(&u, &up, &up.options[0]));
        assert_eq!(apply_upgrade(&mut u, &up, &up.options[2]).unwrap(), UpgradeChange::Rejected);
        assert_eq!(calculate_unit_total(&u), 110);
    }

    #[test]
    fn test_check_affects_models_cap() {
        let mut u = unit(100, 5);
        let mut up = upgrade("pairs", UpgradeType::Multiple, vec![option("a", 5), option("b", 5), option("c", 5)]);
        up.affects = Affects::Models(2);

        // 5 models allow two selections affecting two models each.
        assert_eq!(selection_limit(&u, &up), Some(2));
        apply_upgrade(&mut u, &up, &up.options[0]).unwrap();
        apply_upgrade(&mut u, &up, &up.options[1]).unwrap();
        assert!(!is_valid(&u, &up, &up.options[2]));
    }

    #[test]
    fn test_counted_bounds() {
        let mut u = unit(100, 5);
        let mut opt = option("frag", 5);
        opt.max_count = Some(2);
        let up = upgrade("grenades", UpgradeType::Counted, vec![opt]);

        assert_eq!(apply_upgrade(&mut u, &up, &up.options[0]).unwrap(), UpgradeChange::Applied);
        assert_eq!(apply_upgrade(&mut u, &up, &up.options[0]).unwrap(), UpgradeChange::Applied);
        assert_eq!(apply_upgrade(&mut u, &up, &up.options[0]).unwrap(), UpgradeChange::Unchanged);
        assert_eq!(u.option_count("grenades", "frag"), 2);
        assert_eq!(calculate_unit_total(&u), 110);

        assert_eq!(remove_upgrade(&mut u, &up, Some("frag")), UpgradeChange::Removed);
        assert_eq!(u.option_count("grenades", "frag"), 1);
        assert_eq!(remove_upgrade(&mut u, &up, Some("frag")), UpgradeChange::Removed);
        assert!(u.applied("grenades").is_none());
        assert_eq!(remove_upgrade(&mut u, &up, Some("frag")), UpgradeChange::Unchanged);
    }

    #[test]
    fn test_counted_any_model_uses_unit_size() {
        let u = unit(100, 3);
        let mut up = upgrade("grenades", UpgradeType::Counted, vec![option("frag", 5)]);
        up.affects = Affects::AnyModel;
        assert_eq!(option_max(&u, &up, &up.options[0]), 3);
    }

    #[test]
    fn test_prerequisites_and_exclusions() {
        let mut u = unit(100, 1);
        let mount = upgrade("mount", UpgradeType::SingleOptional, vec![option("horse", 10)]);
        let mut lance = upgrade("lance", UpgradeType::SingleOptional, vec![option("lance", 5)]);
        lance.requires = vec!["mount".to_string()];
        let mut wings = upgrade("wings", UpgradeType::SingleOptional, vec![option("wings", 15)]);
        wings.excludes = vec!["mount".to_string()];

        assert!(!is_valid(&u, &lance, &lance.options[0]));
        assert_eq!(apply_upgrade(&mut u, &lance, &lance.options[0]).unwrap(), UpgradeChange::Rejected);
        assert!(is_valid(&u, &wings, &wings.options[0]));

        apply_upgrade(&mut u, &mount, &mount.options[0]).unwrap();
        assert!(is_valid(&u, &lance, &lance.options[0]));
        assert!(!is_valid(&u, &wings, &wings.options[0]));
    }

    #[test]
    fn test_apply_foreign_option_is_not_found() {
        let mut u = unit(100, 1);
        let up = upgrade("gear", UpgradeType::SingleOptional, vec![option("a", 10)]);
        let err = apply_upgrade(&mut u, &up, &option("z", 1)).unwrap_err();
        assert!(err.is_not_found());
        assert!(u.applied_upgrades.is_empty());
    }

    #[test]
    fn test_unrecognized_upgrade_is_inert() {
        let mut u = unit(100, 1);
        let up = upgrade("odd", UpgradeType::Unrecognized, vec![option("a", 10)]);
        assert!(!is_valid(&u, &up, &up.options[0]));
        assert!(apply_upgrade(&mut u, &up, &up.options[0]).is_err());
        assert_eq!(calculate_unit_total(&u), 100);
    }

    #[test]
    fn test_group_options_by_label() {
        let mut a = option("a1", 5);
        a.label = "Grenade".to_string();
        let mut b = option("a2", 5);
        b.label = "Grenade".to_string();
        let up = upgrade("g", UpgradeType::Multiple, vec![a, option("c", 1), b]);

        let groups = group_options_by_label(&up);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Grenade");
        assert_eq!(groups[0].1.len(), 2);
    }
    fn book_with(sections: Vec<Upgrade>) -> ArmyBook {
        ArmyBook {
            uid: "book".to_string(),
            name: "Book".to_string(),
            game_system: "gf".to_string(),
            units: vec![UnitData {
                id: "squad".to_string(),
                name: "Squad".to_string(),
                size: 5,
                cost: 100,
                quality: 4,
                defense: 4,
                equipment: vec![],
                special_rules: vec![],
                upgrades: vec!["A".to_string()],
            }],
            upgrade_packages: vec![UpgradePackage {
                uid: "A".to_string(),
                hint: "A".to_string(),
                sections,
            }],
        }
    }

    fn has_issue(issues: &[UpgradeIssue], upgrade_id: &str, option_id: Option<&str>, kind: IssueKind) -> bool {
        issues
            .iter()
            .any(|i| i.upgrade_id == upgrade_id && i.option_id.as_deref() == option_id && i.kind == kind)
    }

    #[test]
    fn test_audit_flags_counted_option_over_limit_after_models_removed() {
        let mut u = unit(100, 5);
        let mut launcher = upgrade("weapons", UpgradeType::Counted, vec![option("launcher", 5)]);
        launcher.affects = Affects::AnyModel;
        let mut brother = option("brother", 20);
        brother.max_count = Some(5);
        brother.added_models = 1;
        let extra = upgrade("extra", UpgradeType::Counted, vec![brother]);
        let book = book_with(vec![launcher.clone(), extra.clone()]);

        apply_upgrade(&mut u, &extra, &extra.options[0]).unwrap();
        apply_upgrade(&mut u, &extra, &extra.options[0]).unwrap();
        for _ in 0..7 {
            apply_upgrade(&mut u, &launcher, &launcher.options[0]).unwrap();
        }
        assert_eq!(remove_upgrade(&mut u, &extra, None), UpgradeChange::Removed);

        assert_eq!(u.option_count("weapons", "launcher"), 7);
        assert_eq!(calculate_unit_total(&u), 135);
        assert!(!is_valid(&u, &launcher, &launcher.options[0]));
        let issues = audit_unit(&u, &book);
        assert!(has_issue(&issues, "weapons", Some("launcher"), IssueKind::OverLimit), "{issues:?}");
        assert!(has_issue(&issues, "weapons", None, IssueKind::OverLimit), "{issues:?}");
    }

    #[test]
    fn test_audit_flags_broken_prerequisite_but_keeps_selection() {
        let mut u = unit(100, 5);
        let weapon = upgrade("weapon", UpgradeType::SingleOptional, vec![option("pistol", 5)]);
        let mut mount = upgrade("mount", UpgradeType::SingleOptional, vec![option("bike", 30)]);
        mount.requires = vec!["weapon".to_string()];
        let book = book_with(vec![weapon.clone(), mount.clone()]);

        apply_upgrade(&mut u, &weapon, &weapon.options[0]).unwrap();
        apply_upgrade(&mut u, &mount, &mount.options[0]).unwrap();
        assert!(audit_unit(&u, &book).is_empty());

        remove_upgrade(&mut u, &weapon, None);
        assert_eq!(u.option_count("mount", "bike"), 1);
        assert_eq!(calculate_unit_total(&u), 130);
        let issues = audit_unit(&u, &book);
        assert_eq!(issues.len(), 1);
        assert!(has_issue(&issues, "mount", None, IssueKind::Prerequisites));
    }

    #[test]
    fn test_audit_flags_option_dropped_from_catalogue() {
        let mut u = unit(100, 5);
        let old = upgrade("gear", UpgradeType::Multiple, vec![option("medkit", 5), option("relic", 15)]);
        apply_upgrade(&mut u, &old, &old.options[1]).unwrap();

        let book = book_with(vec![upgrade("gear", UpgradeType::Multiple, vec![option("medkit", 5)])]);
        let issues = audit_unit(&u, &book);
        assert!(has_issue(&issues, "gear", Some("relic"), IssueKind::UnknownOption), "{issues:?}");
        assert_eq!(u.option_count("gear", "relic"), 1);
        assert_eq!(calculate_unit_total(&u), 115);
    }

    #[test]
    fn test_audit_flags_missing_required_selection() {
        let mut u = unit(100, 5);
        let weapon = upgrade("weapon", UpgradeType::SingleRequired, vec![option("rifle", 0), option("carbine", 5)]);
        let book = book_with(vec![weapon.clone()]);

        let issues = audit_unit(&u, &book);
        assert_eq!(issues.len(), 1);
        assert!(has_issue(&issues, "weapon", None, IssueKind::MissingRequired));

        initialize_required(&mut u, [&weapon]);
        assert!(audit_unit(&u, &book).is_empty());
    }
}
