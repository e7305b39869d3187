//! # Roster Core
//!
//! Roster composition and upgrade-rules engine for tabletop wargames.
//!
//! This crate contains **only** pure roster logic:
//! - No file IO
//! - No rendering
//! - No ambient state (catalogue and roster are passed explicitly)
//!
//! This separation enables:
//! - Headless validation tooling
//! - Deterministic property testing
//! - Embedding behind any persistence or UI layer
//!
//! ## Crate Structure
//!
//! - [`data`] - Army book definitions loaded from RON
//! - [`roster`] - The ordered unit list and its edit operations
//! - [`upgrades`] - Upgrade control types, validity and apply/remove
//! - [`cost`] - Points derivations
//! - [`attachment`] - Join resolution and unit groups
//! - [`save`] - Save record exchanged with the persistence layer

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod attachment;
pub mod config;
pub mod cost;
pub mod data;
pub mod duplication;
pub mod error;
pub mod ids;
pub mod loadout;
pub mod roster;
pub mod rules;
pub mod save;
pub mod unit;
pub mod upgrades;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::attachment::{ArmySection, UnitGroup};
    pub use crate::config::RosterConfig;
    pub use crate::cost::{calculate_unit_total, unit_size, PointsStatus};
    pub use crate::data::{
        Affects, ArmyBook, ArmyBookRegistry, Catalogue, SpecialRule, UnitData, Upgrade,
        UpgradeGain, UpgradeOption, UpgradeType,
    };
    pub use crate::error::{Result, RosterError};
    pub use crate::ids::{SelectionId, SortId};
    pub use crate::roster::{RemovedUnit, Roster};
    pub use crate::rules::RuleEntry;
    pub use crate::save::{LoadedRoster, SaveData, SaveStatus};
    pub use crate::unit::{AppliedOption, AppliedUpgrade, SelectedUnit};
    pub use crate::upgrades::{ControlType, IssueKind, UpgradeChange, UpgradeIssue};
}
