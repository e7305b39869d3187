//! Proptest strategies for roster editing.
//!
//! These strategies generate random but reproducible edit sequences for
//! property-based testing of roster invariants.

use proptest::prelude::*;
use proptest::sample::Index;
use roster_core::data::{ArmyBook, Catalogue};
use roster_core::roster::{RemovedUnit, Roster};

/// One edit a user could make to a roster.
///
/// Units, upgrades and options are picked by [`Index`] so that a sequence
/// stays meaningful whatever the roster contains when it runs.
#[derive(Debug, Clone)]
pub enum RosterOp {
    /// Add a catalogue unit.
    Add(Index),
    /// Remove a unit, keeping the undo record.
    Remove(Index),
    /// Undo one of the removals still held.
    Restore(Index),
    /// Apply an option of one of the unit's upgrades.
    Apply {
        /// Unit pick.
        unit: Index,
        /// Upgrade pick.
        upgrade: Index,
        /// Option pick.
        option: Index,
    },
    /// Remove one option, or the whole upgrade when `option` is `None`.
    RemoveUpgrade {
        /// Unit pick.
        unit: Index,
        /// Upgrade pick.
        upgrade: Index,
        /// Option pick.
        option: Option<Index>,
    },
    /// Join one unit to another.
    Join(Index, Index),
    /// Detach a unit.
    Unjoin(Index),
    /// Duplicate a single unit.
    Duplicate(Index),
    /// Duplicate a host with its joined units.
    DuplicateGroup(Index),
}

impl RosterOp {
    /// Run the edit against a roster.
    ///
    /// Edits that the engine refuses are ignored; the point is to drive the
    /// roster through arbitrary reachable states. Removals push their undo
    /// record onto `undo`; restores take one back out.
    pub fn run(&self, roster: &mut Roster, book: &ArmyBook, undo: &mut Vec<RemovedUnit>) {
        let pick = |roster: &Roster, index: &Index| {
            (!roster.is_empty()).then(|| roster.units()[index.index(roster.len())].selection_id.clone())
        };

        match self {
            Self::Add(index) => {
                let unit = &book.units[index.index(book.units.len())];
                let _ = roster.add_unit(book, &book.uid, &unit.id);
            }
            Self::Remove(index) => {
                if let Some(id) = pick(roster, index) {
                    if let Ok(removed) = roster.remove_unit(&id) {
                        undo.push(removed);
                    }
                }
            }
            Self::Restore(index) => {
                if !undo.is_empty() {
                    let removed = undo.remove(index.index(undo.len()));
                    let _ = roster.restore_unit(removed);
                }
            }
            Self::Apply {
                unit,
                upgrade,
                option,
            } => {
                let Some(id) = pick(roster, unit) else { return };
                let Some((upgrade_id, options)) = upgrade_pick(roster, book, &id, upgrade) else {
                    return;
                };
                if options.is_empty() {
                    return;
                }
                let option_id = options[option.index(options.len())].clone();
                let _ = roster.apply_upgrade(book, &id, &upgrade_id, &option_id);
            }
            Self::RemoveUpgrade {
                unit,
                upgrade,
                option,
            } => {
                let Some(id) = pick(roster, unit) else { return };
                let Some((upgrade_id, options)) = upgrade_pick(roster, book, &id, upgrade) else {
                    return;
                };
                let option_id = match option {
                    Some(_) if options.is_empty() => return,
                    Some(index) => Some(options[index.index(options.len())].as_str()),
                    None => None,
                };
                let _ = roster.remove_upgrade(book, &id, &upgrade_id, option_id);
            }
            Self::Join(unit, host) => {
                if let (Some(id), Some(host)) = (pick(roster, unit), pick(roster, host)) {
                    let _ = roster.join_unit(&id, &host);
                }
            }
            Self::Unjoin(index) => {
                if let Some(id) = pick(roster, index) {
                    let _ = roster.unjoin_unit(&id);
                }
            }
            Self::Duplicate(index) => {
                if let Some(id) = pick(roster, index) {
                    let _ = roster.duplicate_unit(&id);
                }
            }
            Self::DuplicateGroup(index) => {
                if let Some(id) = pick(roster, index) {
                    let _ = roster.duplicate_group(&id);
                }
            }
        }
    }
}

fn upgrade_pick(
    roster: &Roster,
    book: &ArmyBook,
    id: &roster_core::ids::SelectionId,
    index: &Index,
) -> Option<(String, Vec<String>)> {
    let unit = roster.unit(id)?;
    let upgrades = book.unit_upgrades(&unit.army_id, &unit.unit_id);
    if upgrades.is_empty() {
        return None;
    }
    let upgrade = upgrades[index.index(upgrades.len())];
    Some((
        upgrade.id.clone(),
        upgrade.options.iter().map(|o| o.id.clone()).collect(),
    ))
}

/// Generate any single edit.
pub fn arb_roster_op() -> impl Strategy<Value = RosterOp> {
    prop_oneof![
        3 => any::<Index>().prop_map(RosterOp::Add),
        1 => any::<Index>().prop_map(RosterOp::Remove),
        1 => any::<Index>().prop_map(RosterOp::Restore),
        4 => (any::<Index>(), any::<Index>(), any::<Index>())
            .prop_map(|(unit, upgrade, option)| RosterOp::Apply { unit, upgrade, option }),
        2 => (any::<Index>(), any::<Index>(), proptest::option::of(any::<Index>()))
            .prop_map(|(unit, upgrade, option)| RosterOp::RemoveUpgrade { unit, upgrade, option }),
        2 => (any::<Index>(), any::<Index>()).prop_map(|(a, b)| RosterOp::Join(a, b)),
        1 => any::<Index>().prop_map(RosterOp::Unjoin),
        1 => any::<Index>().prop_map(RosterOp::Duplicate),
        1 => any::<Index>().prop_map(RosterOp::DuplicateGroup),
    ]
}

/// Generate a sequence of edits.
pub fn arb_op_sequence(max_len: usize) -> impl Strategy<Value = Vec<RosterOp>> {
    proptest::collection::vec(arb_roster_op(), 0..max_len)
}

/// Generate a count of counted-upgrade increments to attempt.
pub fn arb_increment_count() -> impl Strategy<Value = u32> {
    0u32..12u32
}
