//! Point cost and model count derivations.
//!
//! Everything here is recomputed from the unit records on each call; no
//! totals are stored.

use crate::unit::SelectedUnit;

/// Total cost of one unit: base cost plus every applied option times its count.
#[must_use]
pub fn calculate_unit_total(unit: &SelectedUnit) -> u32 {
    unit.applied_options()
        .fold(unit.cost, |total, option| total.saturating_add(option.total_cost()))
}

/// Model count of one unit, including models added by upgrades.
#[must_use]
pub fn unit_size(unit: &SelectedUnit) -> u32 {
    unit.applied_options()
        .fold(unit.size, |size, option| {
            size.saturating_add(option.added_models.saturating_mul(option.count))
        })
}

/// Grand total of a roster.
///
/// Every unit contributes its own total exactly once, whether it is a root
/// or joined to a host.
#[must_use]
pub fn roster_total<'a>(units: impl IntoIterator<Item = &'a SelectedUnit>) -> u32 {
    units
        .into_iter()
        .fold(0, |total, unit| total.saturating_add(calculate_unit_total(unit)))
}

/// Roster total compared with its points limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsStatus {
    /// No limit is set.
    Unlimited,
    /// Total is at or below the limit.
    Within {
        /// Points left before the limit.
        remaining: u32,
    },
    /// Total exceeds the limit.
    Over {
        /// Points above the limit.
        by: u32,
    },
}

impl PointsStatus {
    /// Compare a total with an optional limit.
    #[must_use]
    pub const fn evaluate(total: u32, limit: Option<u32>) -> Self {
        match limit {
            None => Self::Unlimited,
            Some(limit) if total > limit => Self::Over { by: total - limit },
            Some(limit) => Self::Within {
                remaining: limit - total,
            },
        }
    }

    /// Whether the roster is over its limit.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Over { .. })
    }
}

/// Heading text such as `"1250/2000pts"`.
#[must_use]
pub fn points_label(total: u32, limit: Option<u32>) -> String {
    match limit {
        Some(limit) => format!("{total}/{limit}pts"),
        None => format!("{total}pts"),
    }
}
