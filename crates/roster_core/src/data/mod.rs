//! Data structures for army catalogues.
//!
//! This module contains pure data structures that define army books,
//! units, upgrades, and special rules. All structs are designed to be
//! deserialized from RON files.
//!
//! **Note:** This module contains no IO - it only defines data types.
//! File loading is handled by `roster_tools` or the embedding application.

mod army_book;
mod rule_data;
mod unit_data;
mod upgrade_data;

pub use army_book::{ArmyBook, ArmyBookRegistry, Catalogue, UpgradePackage};
pub use rule_data::SpecialRule;
pub use unit_data::{LoadoutEntry, UnitData};
pub use upgrade_data::{
    Affects, ItemContent, ItemGain, Upgrade, UpgradeGain, UpgradeOption, UpgradeType, WeaponGain,
};
