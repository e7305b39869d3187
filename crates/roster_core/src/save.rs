//! Save record exchanged with the persistence service.
//!
//! The engine does not read or write files. It converts a [`Roster`] to and
//! from the record that the persistence layer stores, and tolerates records
//! written by older versions.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::roster::Roster;
use crate::unit::SelectedUnit;

/// Save format version written by this engine.
pub const SAVE_VERSION: u32 = 2;

/// The roster part of a save record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecord {
    /// Roster name.
    #[serde(default)]
    pub name: String,

    /// Creation timestamp (milliseconds since the Unix epoch); identifies the list.
    #[serde(default)]
    pub creation_time: u64,

    /// Points cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_limit: Option<u32>,

    /// Units in roster order.
    #[serde(default)]
    pub units: Vec<SelectedUnit>,
}

/// A complete save record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    /// Format version; records from before versioning read as 0.
    #[serde(default)]
    pub save_version: u32,

    /// Game system of the roster.
    #[serde(default)]
    pub game_system: String,

    /// Army books the roster draws from.
    #[serde(default)]
    pub army_ids: Vec<String>,

    /// The roster.
    #[serde(default)]
    pub list: ListRecord,

    /// Roster total at save time, for listing saves without loading them.
    #[serde(default)]
    pub list_points: u32,

    /// Last modification timestamp (milliseconds since the Unix epoch).
    #[serde(default)]
    pub modified: u64,
}

/// Whether a loaded record is in the current format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// Written by the current format version.
    Current,
    /// Written by an older format; fields may be missing. The roster still
    /// renders and computes costs.
    Outdated {
        /// Version found in the record.
        version: u32,
    },
}

/// A roster restored from a save record.
#[derive(Debug, Clone)]
pub struct LoadedRoster {
    /// The restored roster.
    pub roster: Roster,
    /// Format status of the record.
    pub status: SaveStatus,
    /// Creation timestamp carried over from the record.
    pub creation_time: u64,
}

impl SaveData {
    /// Build a record from a roster.
    #[must_use]
    pub fn from_roster(
        roster: &Roster,
        game_system: impl Into<String>,
        creation_time: u64,
        modified: u64,
    ) -> Self {
        let mut army_ids: Vec<String> = Vec::new();
        for unit in roster.units() {
            if !army_ids.contains(&unit.army_id) {
                army_ids.push(unit.army_id.clone());
            }
        }

        Self {
            save_version: SAVE_VERSION,
            game_system: game_system.into(),
            army_ids,
            list: ListRecord {
                name: roster.name().to_string(),
                creation_time,
                points_limit: roster.points_limit(),
                units: roster.units().to_vec(),
            },
            list_points: roster.points(),
            modified,
        }
    }

    /// Format status of this record.
    #[must_use]
    pub const fn status(&self) -> SaveStatus {
        if self.save_version >= SAVE_VERSION {
            SaveStatus::Current
        } else {
            SaveStatus::Outdated {
                version: self.save_version,
            }
        }
    }

    /// Restore the roster.
    ///
    /// Outdated records load with a [`SaveStatus::Outdated`] flag rather
    /// than failing.
    pub fn into_roster(self) -> Result<LoadedRoster> {
        let status = self.status();
        if let SaveStatus::Outdated { version } = status {
            warn!(version, current = SAVE_VERSION, list = %self.list.name, "Loading outdated save");
        }
        let roster = Roster::from_units(self.list.name, self.list.units, self.list.points_limit)?;
        Ok(LoadedRoster {
            roster,
            status,
            creation_time: self.list.creation_time,
        })
    }

    /// Parse a record from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the record to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
