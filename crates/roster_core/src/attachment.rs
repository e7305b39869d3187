//! Attachment resolution: which units are joined to which host.
//!
//! A unit is a root when it declares no host, or when its host is no longer
//! on the roster. Orphans degrade to roots; resolution never fails.

use crate::cost::{calculate_unit_total, unit_size};
use crate::ids::SelectionId;
use crate::unit::SelectedUnit;

/// Units whose `join_to_unit` is the host's id, in roster order.
#[must_use]
pub fn attached_units<'a>(units: &'a [SelectedUnit], host: &SelectedUnit) -> Vec<&'a SelectedUnit> {
    units
        .iter()
        .filter(|u| u.join_to_unit.as_ref() == Some(&host.selection_id))
        .collect()
}

/// Whether a unit is displayed as its own root.
#[must_use]
pub fn is_root(units: &[SelectedUnit], unit: &SelectedUnit) -> bool {
    match &unit.join_to_unit {
        None => true,
        Some(host) => !units.iter().any(|u| &u.selection_id == host),
    }
}

/// Root units ordered by sort key; ties keep roster order.
#[must_use]
pub fn root_units(units: &[SelectedUnit]) -> Vec<&SelectedUnit> {
    let mut roots: Vec<&SelectedUnit> = units.iter().filter(|u| is_root(units, u)).collect();
    roots.sort_by_key(|u| u.sort_id);
    roots
}

/// Why a unit may not join a host, if it may not.
///
/// Joins are one level deep: the host must be a root and the joining unit
/// must not host others. This also rules out cycles.
#[must_use]
pub fn join_refusal(units: &[SelectedUnit], unit: &SelectionId, host: &SelectionId) -> Option<&'static str> {
    if unit == host {
        return Some("a unit cannot join itself");
    }
    let Some(host_unit) = units.iter().find(|u| &u.selection_id == host) else {
        return Some("host is not on the roster");
    };
    if host_unit.is_joined() && !is_root(units, host_unit) {
        return Some("host is itself joined to another unit");
    }
    if units.iter().any(|u| u.join_to_unit.as_ref() == Some(unit)) {
        return Some("unit already has units joined to it");
    }
    None
}

/// Positions of units whose join breaks the one-level rule: a self-join, or
/// a join to a present host that is not a root.
///
/// Severing every returned join leaves a valid roster, since severing only
/// turns units into roots.
#[must_use]
pub fn nested_joins(units: &[SelectedUnit]) -> Vec<usize> {
    units
        .iter()
        .enumerate()
        .filter(|(_, unit)| {
            unit.join_to_unit
                .as_ref()
                .and_then(|host| units.iter().find(|u| &u.selection_id == host))
                .is_some_and(|host| !is_root(units, host))
        })
        .map(|(i, _)| i)
        .collect()
}

/// A host and the units joined to it.
#[derive(Debug, Clone)]
pub struct UnitGroup<'a> {
    /// The root unit.
    pub host: &'a SelectedUnit,
    /// Joined units carrying the leader rule.
    pub heroes: Vec<&'a SelectedUnit>,
    /// All other joined units.
    pub other_joined: Vec<&'a SelectedUnit>,
}

impl<'a> UnitGroup<'a> {
    /// Resolve the group around a host.
    #[must_use]
    pub fn resolve(units: &'a [SelectedUnit], host: &'a SelectedUnit, leader_rule: &str) -> Self {
        let (heroes, other_joined) = attached_units(units, host)
            .into_iter()
            .partition(|u| u.has_rule(leader_rule));
        Self {
            host,
            heroes,
            other_joined,
        }
    }

    /// Whether anything is joined to the host.
    #[must_use]
    pub fn has_joined(&self) -> bool {
        !self.heroes.is_empty() || !self.other_joined.is_empty()
    }

    /// Joined units, heroes first.
    pub fn joined(&self) -> impl Iterator<Item = &'a SelectedUnit> + '_ {
        self.heroes.iter().chain(&self.other_joined).copied()
    }

    /// All members in display order: heroes, host, other joined.
    pub fn members(&self) -> impl Iterator<Item = &'a SelectedUnit> + '_ {
        self.heroes
            .iter()
            .copied()
            .chain(std::iter::once(self.host))
            .chain(self.other_joined.iter().copied())
    }

    /// Models across host and all joined units.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.members().fold(0, |size, u| size.saturating_add(unit_size(u)))
    }

    /// Sum of each member's own total.
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.members()
            .fold(0, |total, u| total.saturating_add(calculate_unit_total(u)))
    }

    /// Heading such as `"Captain & Battle Brothers [6]"`.
    #[must_use]
    pub fn title(&self) -> String {
        match self.heroes.first() {
            Some(hero) => format!(
                "{} & {} [{}]",
                hero.display_name(),
                self.host.display_name(),
                self.size()
            ),
            None => format!("{} [{}]", self.host.display_name(), self.size()),
        }
    }
}

/// Groups for every root unit, in display order.
#[must_use]
pub fn root_groups<'a>(units: &'a [SelectedUnit], leader_rule: &str) -> Vec<UnitGroup<'a>> {
    root_units(units)
        .into_iter()
        .map(|host| UnitGroup::resolve(units, host, leader_rule))
        .collect()
}

/// Root groups of one army book.
#[derive(Debug, Clone)]
pub struct ArmySection<'a> {
    /// Army book uid.
    pub army_id: &'a str,
    /// Groups in display order.
    pub groups: Vec<UnitGroup<'a>>,
}

/// Root groups bucketed by army book, books in first-appearance order.
#[must_use]
pub fn army_sections<'a>(units: &'a [SelectedUnit], leader_rule: &str) -> Vec<ArmySection<'a>> {
    let mut sections: Vec<ArmySection<'a>> = Vec::new();
    for group in root_groups(units, leader_rule) {
        let army_id = group.host.army_id.as_str();
        match sections.iter_mut().find(|s| s.army_id == army_id) {
            Some(section) => section.groups.push(group),
            None => sections.push(ArmySection {
                army_id,
                groups: vec![group],
            }),
        }
    }
    sections
}
