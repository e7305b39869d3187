//! The roster: ordered units, the selected unit, and the operations that
//! edit them.
//!
//! Every operation is atomic. Changes to a unit are made on a copy which is
//! written back only when the operation succeeds, so an error always leaves
//! the roster exactly as it was.

use std::collections::HashSet;

use tracing::{debug, error, warn};

use crate::attachment::{self, ArmySection, UnitGroup};
use crate::config::RosterConfig;
use crate::cost::{self, PointsStatus};
use crate::data::Catalogue;
use crate::duplication;
use crate::error::{Result, RosterError};
use crate::ids::{SelectionId, SelectionIdGenerator, SortId};
use crate::unit::SelectedUnit;
use crate::upgrades::{self, UpgradeChange, UpgradeIssue};

/// A removed unit, kept by the caller to undo the removal.
///
/// Consumed by [`Roster::restore_unit`]. Not `Clone`: a removal can be
/// undone at most once.
#[derive(Debug)]
pub struct RemovedUnit {
    unit: SelectedUnit,
    index: usize,
}

impl RemovedUnit {
    /// The unit that was removed.
    #[must_use]
    pub const fn unit(&self) -> &SelectedUnit {
        &self.unit
    }

    /// Position the unit had in the roster.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

/// Clear every join that breaks the one-level rule.
fn sever_nested_joins(units: &mut [SelectedUnit]) {
    for i in attachment::nested_joins(units) {
        let unit = &mut units[i];
        warn!(unit = %unit.selection_id, host = ?unit.join_to_unit, "Severing nested or self join");
        unit.join_to_unit = None;
    }
}

/// An army roster being composed.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    name: String,
    units: Vec<SelectedUnit>,
    selected_unit_id: Option<SelectionId>,
    points_limit: Option<u32>,
    ids: SelectionIdGenerator,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create an empty roster using configured defaults.
    #[must_use]
    pub fn with_config(name: impl Into<String>, config: &RosterConfig) -> Self {
        let mut roster = Self::new(name);
        roster.points_limit = config.default_points_limit;
        roster
    }

    /// Build a roster from existing unit records, e.g. a loaded save.
    ///
    /// Self-joins and joins to a unit that is itself joined are severed
    /// (logged) so that attachment stays one level deep; joins to absent
    /// hosts are kept and resolve as orphans. Ids referenced by those joins
    /// are never issued to new units.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::IdentityCollision`] if two records share an id.
    pub fn from_units(
        name: impl Into<String>,
        mut units: Vec<SelectedUnit>,
        points_limit: Option<u32>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for unit in &units {
            if !seen.insert(&unit.selection_id) {
                return Err(RosterError::IdentityCollision(unit.selection_id.clone()));
            }
        }

        sever_nested_joins(&mut units);

        let ids = SelectionIdGenerator::resume_after(
            units
                .iter()
                .flat_map(|u| std::iter::once(&u.selection_id).chain(u.join_to_unit.as_ref())),
        );
        Ok(Self {
            name: name.into(),
            units,
            selected_unit_id: None,
            points_limit,
            ids,
        })
    }

    /// Roster name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the roster.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// All units in roster order.
    #[must_use]
    pub fn units(&self) -> &[SelectedUnit] {
        &self.units
    }

    /// Number of units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the roster has no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Find a unit by id.
    #[must_use]
    pub fn unit(&self, id: &SelectionId) -> Option<&SelectedUnit> {
        self.units.iter().find(|u| &u.selection_id == id)
    }

    /// Position of a unit in roster order.
    #[must_use]
    pub fn index_of(&self, id: &SelectionId) -> Option<usize> {
        self.units.iter().position(|u| &u.selection_id == id)
    }

    fn require_index(&self, id: &SelectionId) -> Result<usize> {
        self.index_of(id)
            .ok_or_else(|| RosterError::UnitNotFound(id.clone()))
    }

    /// Id of the unit focused for editing.
    #[must_use]
    pub const fn selected_unit_id(&self) -> Option<&SelectionId> {
        self.selected_unit_id.as_ref()
    }

    /// The unit focused for editing.
    #[must_use]
    pub fn selected_unit(&self) -> Option<&SelectedUnit> {
        self.selected_unit_id.as_ref().and_then(|id| self.unit(id))
    }

    /// Points cap, if any.
    #[must_use]
    pub const fn points_limit(&self) -> Option<u32> {
        self.points_limit
    }

    /// Set or clear the points cap.
    pub fn set_points_limit(&mut self, limit: Option<u32>) {
        self.points_limit = limit;
    }

    /// Grand total of every unit, joined or not.
    #[must_use]
    pub fn points(&self) -> u32 {
        cost::roster_total(&self.units)
    }

    /// Total compared with the points cap.
    #[must_use]
    pub fn points_status(&self) -> PointsStatus {
        PointsStatus::evaluate(self.points(), self.points_limit)
    }

    /// Root groups in display order.
    #[must_use]
    pub fn root_groups(&self, config: &RosterConfig) -> Vec<UnitGroup<'_>> {
        attachment::root_groups(&self.units, &config.leader_rule)
    }

    /// Root groups bucketed by army book.
    #[must_use]
    pub fn sections(&self, config: &RosterConfig) -> Vec<ArmySection<'_>> {
        attachment::army_sections(&self.units, &config.leader_rule)
    }

    /// Units joined to a host.
    #[must_use]
    pub fn attached_units(&self, host: &SelectionId) -> Vec<&SelectedUnit> {
        match self.unit(host) {
            Some(host) => attachment::attached_units(&self.units, host),
            None => Vec::new(),
        }
    }

    fn next_sort_id(&self) -> SortId {
        self.units
            .iter()
            .map(|u| u.sort_id)
            .max()
            .map_or(SortId(0), SortId::next)
    }

    fn taken_ids(&self) -> HashSet<&SelectionId> {
        self.units.iter().map(|u| &u.selection_id).collect()
    }

    /// Insert units, checking that every id is still unique.
    fn insert_units(&mut self, index: usize, new_units: Vec<SelectedUnit>) -> Result<Vec<SelectionId>> {
        let mut taken = self.taken_ids();
        for unit in &new_units {
            if !taken.insert(&unit.selection_id) {
                error!(unit = %unit.selection_id, "Generated a selection id that is already in use");
                return Err(RosterError::IdentityCollision(unit.selection_id.clone()));
            }
        }

        let index = index.min(self.units.len());
        let ids: Vec<SelectionId> = new_units.iter().map(|u| u.selection_id.clone()).collect();
        self.units.splice(index..index, new_units);
        Ok(ids)
    }

    /// Add a unit from the catalogue at the end of the roster.
    ///
    /// Single-required upgrades start with their first option selected.
    pub fn add_unit(
        &mut self,
        catalogue: &impl Catalogue,
        army_id: &str,
        unit_id: &str,
    ) -> Result<SelectionId> {
        if catalogue.army_book(army_id).is_none() {
            return Err(RosterError::ArmyBookNotFound(army_id.to_string()));
        }
        let data = catalogue.unit_data(army_id, unit_id).ok_or_else(|| {
            RosterError::CatalogueUnitNotFound {
                army_id: army_id.to_string(),
                unit_id: unit_id.to_string(),
            }
        })?;

        let taken: HashSet<&SelectionId> = self.units.iter().map(|u| &u.selection_id).collect();
        let id = self.ids.generate(&taken);
        let mut unit = SelectedUnit::from_catalogue(army_id, data, id, self.next_sort_id());
        upgrades::initialize_required(&mut unit, catalogue.unit_upgrades(army_id, unit_id));

        debug!(unit = %unit.selection_id, army = army_id, catalogue_unit = unit_id, "Add unit");
        let index = self.units.len();
        let mut ids = self.insert_units(index, vec![unit])?;
        Ok(ids.remove(0))
    }

    /// Insert copies of unit records at a position.
    ///
    /// The copies get fresh ids; joins among them are rewired. A copy whose
    /// join would nest (its host is itself joined) is severed and becomes a
    /// root. `index` is clamped to the roster length.
    pub fn add_units(&mut self, units: &[SelectedUnit], index: usize) -> Result<Vec<SelectionId>> {
        let sources: Vec<&SelectedUnit> = units.iter().collect();
        let taken: HashSet<&SelectionId> = self.units.iter().map(|u| &u.selection_id).collect();
        let clones = duplication::duplicate_units(&sources, &mut self.ids, &taken);
        debug!(count = clones.len(), index, "Add units");
        let ids = self.insert_units(index, clones)?;
        sever_nested_joins(&mut self.units);
        Ok(ids)
    }

    /// Remove a unit.
    ///
    /// Units joined to it stay on the roster and become roots. Returns the
    /// record needed to undo the removal.
    pub fn remove_unit(&mut self, id: &SelectionId) -> Result<RemovedUnit> {
        let index = self.require_index(id)?;
        let unit = self.units.remove(index);
        if self.selected_unit_id.as_ref() == Some(id) {
            self.selected_unit_id = None;
        }
        debug!(unit = %id, index, "Remove unit");
        Ok(RemovedUnit { unit, index })
    }

    /// Undo a removal by re-inserting the unit at its former position.
    ///
    /// Units orphaned by the removal rejoin the restored unit. Joins made in
    /// the meantime that would now nest are severed: the restored unit's own
    /// join when its host has since joined another unit, and joins to an
    /// orphan that the restore turns back into a joined unit.
    pub fn restore_unit(&mut self, removed: RemovedUnit) -> Result<()> {
        debug!(unit = %removed.unit.selection_id, index = removed.index, "Restore unit");
        self.insert_units(removed.index, vec![removed.unit])?;
        sever_nested_joins(&mut self.units);
        Ok(())
    }

    /// Focus a unit for editing, or clear the focus.
    pub fn select_unit(&mut self, id: Option<&SelectionId>) -> Result<()> {
        if let Some(id) = id {
            self.require_index(id)?;
        }
        self.selected_unit_id = id.cloned();
        Ok(())
    }

    /// Set or clear a unit's custom name.
    pub fn rename_unit(&mut self, id: &SelectionId, custom_name: Option<String>) -> Result<()> {
        let index = self.require_index(id)?;
        self.units[index].custom_name = custom_name.filter(|name| !name.trim().is_empty());
        Ok(())
    }

    /// Join a unit to a host.
    pub fn join_unit(&mut self, id: &SelectionId, host: &SelectionId) -> Result<()> {
        let index = self.require_index(id)?;
        if let Some(reason) = attachment::join_refusal(&self.units, id, host) {
            return Err(RosterError::InvalidJoin {
                unit: id.clone(),
                host: host.clone(),
                reason,
            });
        }
        debug!(unit = %id, host = %host, "Join unit");
        self.units[index].join_to_unit = Some(host.clone());
        Ok(())
    }

    /// Detach a unit from its host.
    pub fn unjoin_unit(&mut self, id: &SelectionId) -> Result<()> {
        let index = self.require_index(id)?;
        self.units[index].join_to_unit = None;
        Ok(())
    }

    /// Apply an upgrade option to a unit.
    pub fn apply_upgrade(
        &mut self,
        catalogue: &impl Catalogue,
        unit_id: &SelectionId,
        upgrade_id: &str,
        option_id: &str,
    ) -> Result<UpgradeChange> {
        let index = self.require_index(unit_id)?;
        let unit = &self.units[index];
        let upgrade = catalogue
            .find_upgrade(&unit.army_id, &unit.unit_id, upgrade_id)
            .ok_or_else(|| RosterError::UpgradeNotFound {
                unit: unit_id.clone(),
                upgrade_id: upgrade_id.to_string(),
            })?;
        let option = upgrade
            .option(option_id)
            .ok_or_else(|| RosterError::OptionNotFound {
                upgrade_id: upgrade_id.to_string(),
                option_id: option_id.to_string(),
            })?;

        let mut staged = unit.clone();
        let change = upgrades::apply_upgrade(&mut staged, upgrade, option)?;
        self.units[index] = staged;
        Ok(change)
    }

    /// Remove an upgrade option from a unit, or every option of the upgrade
    /// when `option_id` is `None`.
    ///
    /// An upgrade that has disappeared from the catalogue can still be
    /// removed by id so that stale records can be cleaned up.
    pub fn remove_upgrade(
        &mut self,
        catalogue: &impl Catalogue,
        unit_id: &SelectionId,
        upgrade_id: &str,
        option_id: Option<&str>,
    ) -> Result<UpgradeChange> {
        let index = self.require_index(unit_id)?;
        let unit = &self.units[index];
        let mut staged = unit.clone();

        let change = match catalogue.find_upgrade(&unit.army_id, &unit.unit_id, upgrade_id) {
            Some(upgrade) => upgrades::remove_upgrade(&mut staged, upgrade, option_id),
            None if unit.applied(upgrade_id).is_some() => {
                warn!(unit = %unit_id, upgrade = upgrade_id, "Removing upgrade unknown to the catalogue");
                upgrades::remove_option(&mut staged, upgrade_id, option_id, true)
            }
            None => {
                return Err(RosterError::UpgradeNotFound {
                    unit: unit_id.clone(),
                    upgrade_id: upgrade_id.to_string(),
                })
            }
        };

        self.units[index] = staged;
        Ok(change)
    }

    /// Duplicate units, inserting the clones right after the last id given.
    ///
    /// Repeated ids are ignored. Returns the clones' ids in order.
    pub fn duplicate_units(&mut self, ids: &[SelectionId]) -> Result<Vec<SelectionId>> {
        let mut seen = HashSet::new();
        let mut sources = Vec::new();
        let mut last = None;
        for id in ids {
            if seen.insert(id) {
                let index = self.require_index(id)?;
                last = Some(index);
                sources.push(self.units[index].clone());
            }
        }
        let Some(last) = last else {
            return Ok(Vec::new());
        };
        self.add_units(&sources, last + 1)
    }

    /// Duplicate one unit.
    pub fn duplicate_unit(&mut self, id: &SelectionId) -> Result<SelectionId> {
        let mut ids = self.duplicate_units(std::slice::from_ref(id))?;
        Ok(ids.remove(0))
    }

    /// Duplicate a host together with every unit joined to it.
    pub fn duplicate_group(&mut self, host: &SelectionId) -> Result<Vec<SelectionId>> {
        self.require_index(host)?;
        let mut ids = vec![host.clone()];
        ids.extend(self.attached_units(host).into_iter().map(|u| u.selection_id.clone()));
        self.duplicate_units(&ids)
    }

    /// Check every unit's applied upgrades against the catalogue.
    #[must_use]
    pub fn audit(&self, catalogue: &impl Catalogue) -> Vec<(SelectionId, UpgradeIssue)> {
        self.units
            .iter()
            .flat_map(|unit| {
                upgrades::audit_unit(unit, catalogue)
                    .into_iter()
                    .map(|issue| (unit.selection_id.clone(), issue))
            })
            .collect()
    }
}
