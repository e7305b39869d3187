//! Army book data combining all unit and upgrade definitions of one catalogue source.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::unit_data::UnitData;
use super::upgrade_data::{Upgrade, UpgradeType};
use crate::error::{Result, RosterError};

/// A group of upgrades shared by one or more units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradePackage {
    /// Identifier referenced from [`UnitData::upgrades`].
    pub uid: String,

    /// Short label shown in the upgrade panel (e.g. "A").
    #[serde(default)]
    pub hint: String,

    /// Upgrades in display order.
    pub sections: Vec<Upgrade>,
}

/// Complete army book definition.
///
/// # Example RON
///
/// ```ron
/// ArmyBook(
///     uid: "grimdark_marines",
///     name: "Battle Brothers",
///     game_system: "gf",
///     units: [...],
///     upgrade_packages: [...],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmyBook {
    /// Book identifier, stored on every unit taken from it.
    pub uid: String,

    /// Display name.
    pub name: String,

    /// Game system this book belongs to.
    #[serde(default)]
    pub game_system: String,

    /// All units available in this book.
    pub units: Vec<UnitData>,

    /// All upgrade packages referenced by the units.
    #[serde(default)]
    pub upgrade_packages: Vec<UpgradePackage>,
}

impl ArmyBook {
    /// Find a unit by its ID.
    #[must_use]
    pub fn get_unit(&self, id: &str) -> Option<&UnitData> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Find an upgrade package by its uid.
    #[must_use]
    pub fn get_package(&self, uid: &str) -> Option<&UpgradePackage> {
        self.upgrade_packages.iter().find(|p| p.uid == uid)
    }

    /// All upgrades available to a unit, in package then section order.
    ///
    /// Package references that do not resolve are skipped; [`ArmyBook::validate`]
    /// reports them.
    pub fn upgrades_for<'a>(&'a self, unit: &'a UnitData) -> impl Iterator<Item = &'a Upgrade> {
        unit.upgrades
            .iter()
            .filter_map(|uid| self.get_package(uid))
            .flat_map(|package| package.sections.iter())
    }

    /// Validate internal consistency of the book.
    ///
    /// Checks for:
    /// - Unit and upgrade ids are unique
    /// - Package references from units are valid
    /// - Upgrade types are recognized and required upgrades have options
    /// - Option ids are unique and counted caps are positive
    /// - Prerequisite and exclusion references are valid
    ///
    /// Returns a list of validation errors.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut unit_ids = HashSet::new();
        for unit in &self.units {
            if !unit_ids.insert(unit.id.as_str()) {
                errors.push(format!("Duplicate unit id '{}'", unit.id));
            }
            for package_uid in &unit.upgrades {
                if self.get_package(package_uid).is_none() {
                    errors.push(format!(
                        "Unit '{}' references unknown upgrade package '{}'",
                        unit.id, package_uid
                    ));
                }
            }
        }

        let mut upgrade_ids = HashSet::new();
        for upgrade in self.upgrade_packages.iter().flat_map(|p| &p.sections) {
            if !upgrade_ids.insert(upgrade.id.as_str()) {
                errors.push(format!("Duplicate upgrade id '{}'", upgrade.id));
            }
        }

        for upgrade in self.upgrade_packages.iter().flat_map(|p| &p.sections) {
            if upgrade.kind == UpgradeType::Unrecognized {
                errors.push(format!("Upgrade '{}' has an unrecognized type", upgrade.id));
            }
            if upgrade.kind == UpgradeType::SingleRequired && upgrade.options.is_empty() {
                errors.push(format!("Required upgrade '{}' has no options", upgrade.id));
            }

            let mut option_ids = HashSet::new();
            for option in &upgrade.options {
                if !option_ids.insert(option.id.as_str()) {
                    errors.push(format!(
                        "Upgrade '{}' has duplicate option '{}'",
                        upgrade.id, option.id
                    ));
                }
                if option.max_count == Some(0) {
                    errors.push(format!(
                        "Option '{}' of upgrade '{}' has a zero max count",
                        option.id, upgrade.id
                    ));
                }
            }

            for other in upgrade.requires.iter().chain(&upgrade.excludes) {
                if !upgrade_ids.contains(other.as_str()) {
                    errors.push(format!(
                        "Upgrade '{}' refers to unknown upgrade '{}'",
                        upgrade.id, other
                    ));
                }
            }
        }

        errors
    }
}

/// Read access to catalogue definitions.
///
/// The engine never holds on to a catalogue; every operation that needs one
/// takes it as a parameter. Implementations must not change while a roster
/// is being edited against them.
pub trait Catalogue {
    /// Find an army book by uid.
    fn army_book(&self, uid: &str) -> Option<&ArmyBook>;

    /// Find a unit definition.
    fn unit_data(&self, army_id: &str, unit_id: &str) -> Option<&UnitData> {
        self.army_book(army_id)?.get_unit(unit_id)
    }

    /// All upgrades available to a unit definition.
    fn unit_upgrades(&self, army_id: &str, unit_id: &str) -> Vec<&Upgrade> {
        match self.army_book(army_id) {
            Some(book) => book
                .get_unit(unit_id)
                .map(|unit| book.upgrades_for(unit).collect())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Find one upgrade available to a unit definition.
    fn find_upgrade(&self, army_id: &str, unit_id: &str, upgrade_id: &str) -> Option<&Upgrade> {
        self.unit_upgrades(army_id, unit_id)
            .into_iter()
            .find(|u| u.id == upgrade_id)
    }
}

impl Catalogue for ArmyBook {
    fn army_book(&self, uid: &str) -> Option<&ArmyBook> {
        (self.uid == uid).then_some(self)
    }
}

/// Registry containing every loaded army book.
///
/// A roster may mix units from several books.
#[derive(Debug, Clone, Default)]
pub struct ArmyBookRegistry {
    books: BTreeMap<String, ArmyBook>,
}

impl ArmyBookRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an army book.
    ///
    /// # Errors
    ///
    /// Returns an error if a book with the same uid is already registered.
    pub fn register(&mut self, book: ArmyBook) -> Result<()> {
        if self.books.contains_key(&book.uid) {
            return Err(RosterError::DuplicateArmyBook(book.uid));
        }
        self.books.insert(book.uid.clone(), book);
        Ok(())
    }

    /// Check if a book is registered.
    #[must_use]
    pub fn contains(&self, uid: &str) -> bool {
        self.books.contains_key(uid)
    }

    /// All registered books in uid order.
    pub fn books(&self) -> impl Iterator<Item = &ArmyBook> {
        self.books.values()
    }

    /// Number of registered books.
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether no book is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl Catalogue for ArmyBookRegistry {
    fn army_book(&self, uid: &str) -> Option<&ArmyBook> {
        self.books.get(uid)
    }
}
