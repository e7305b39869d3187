//! Selection identities and display ordering.
//!
//! Every unit placed on a roster gets a [`SelectionId`] that is unique for
//! the lifetime of the editing session. Ids are generated from a monotonic
//! counter, so an id released by a removal is never handed out again.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a unit on a roster.
///
/// Stored as a string so that records written by other tools (which use
/// random string ids) load without conversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionId(String);

impl SelectionId {
    /// Wrap an existing id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SelectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Generator of session-unique selection ids.
///
/// The generator never repeats a value it has issued and skips any value
/// already present in the roster it is generating for.
#[derive(Debug, Clone, Default)]
pub struct SelectionIdGenerator {
    next: u64,
}

impl SelectionIdGenerator {
    /// Create a generator starting at the first id.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Create a generator that will not issue any id in `existing` or any
    /// generated-looking id below the highest one found there.
    #[must_use]
    pub fn resume_after<'a>(existing: impl IntoIterator<Item = &'a SelectionId>) -> Self {
        let next = existing
            .into_iter()
            .filter_map(|id| id.0.strip_prefix('u'))
            .filter_map(|hex| u64::from_str_radix(hex, 16).ok())
            .max()
            .map_or(0, |highest| highest.saturating_add(1));
        Self { next }
    }

    /// Produce an id not contained in `taken`.
    pub fn generate(&mut self, taken: &HashSet<&SelectionId>) -> SelectionId {
        loop {
            let candidate = SelectionId(format!("u{:x}", self.next));
            self.next += 1;
            if !taken.contains(&candidate) {
                return candidate;
            }
        }
    }
}

/// Display sort key for root units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortId(pub u32);

impl SortId {
    /// The key following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}
