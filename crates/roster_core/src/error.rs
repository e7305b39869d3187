//! Error types for the roster engine.

use thiserror::Error;

use crate::ids::SelectionId;

/// Result type alias using [`RosterError`].
pub type Result<T> = std::result::Result<T, RosterError>;

/// Top-level error type for all roster operations.
///
/// Every variant aborts only the operation that produced it; the roster is
/// left in its last good state.
#[derive(Debug, Error)]
pub enum RosterError {
    /// No unit with this selection id is on the roster.
    #[error("Unit not found: {0}")]
    UnitNotFound(SelectionId),

    /// The army book is not part of the loaded catalogue.
    #[error("Army book not found: {0}")]
    ArmyBookNotFound(String),

    /// An army book with this uid is already registered.
    #[error("Duplicate army book: {0}")]
    DuplicateArmyBook(String),

    /// The army book has no unit definition with this id.
    #[error("Unit '{unit_id}' not found in army book '{army_id}'")]
    CatalogueUnitNotFound {
        /// Army book that was searched.
        army_id: String,
        /// Missing catalogue unit id.
        unit_id: String,
    },

    /// The unit's catalogue definition offers no such upgrade.
    #[error("Upgrade '{upgrade_id}' not available to unit {unit}")]
    UpgradeNotFound {
        /// Unit the upgrade was requested for.
        unit: SelectionId,
        /// Missing upgrade id.
        upgrade_id: String,
    },

    /// The upgrade has no option with this id.
    #[error("Option '{option_id}' not found in upgrade '{upgrade_id}'")]
    OptionNotFound {
        /// Upgrade that was searched.
        upgrade_id: String,
        /// Missing option id.
        option_id: String,
    },

    /// Catalogue data the engine does not understand.
    #[error("Invalid catalogue data for upgrade '{upgrade}': {message}")]
    Configuration {
        /// Upgrade carrying the bad data.
        upgrade: String,
        /// What was wrong with it.
        message: String,
    },

    /// A join would reference a missing host, the unit itself, or form a cycle.
    #[error("Unit {unit} cannot join {host}: {reason}")]
    InvalidJoin {
        /// Unit being joined.
        unit: SelectionId,
        /// Requested host.
        host: SelectionId,
        /// Why the join was refused.
        reason: &'static str,
    },

    /// Two units on the roster would share a selection id.
    ///
    /// Fresh ids are generated for every inserted unit, so this indicates a
    /// generator bug rather than bad input.
    #[error("Selection id collision: {0}")]
    IdentityCollision(SelectionId),

    /// A save record could not be parsed.
    #[error("Failed to parse save data: {0}")]
    SaveParse(#[from] serde_json::Error),

    /// Engine configuration could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),
}

impl RosterError {
    /// Whether this error is one of the "identifier not found" family.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnitNotFound(_)
                | Self::ArmyBookNotFound(_)
                | Self::CatalogueUnitNotFound { .. }
                | Self::UpgradeNotFound { .. }
                | Self::OptionNotFound { .. }
        )
    }
}
