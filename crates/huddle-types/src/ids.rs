//! Identifiers: history commit IDs and one-based list indices.

use core::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a snapshot committed to the history.
///
/// Uses UUID v7 (time-ordered) so commit IDs sort in commit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommitId(pub Uuid);

impl CommitId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for CommitId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for CommitId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A one-based position in a displayed list.
///
/// Commands address people, events and polls by the index the user sees,
/// which starts at 1. Zero is unrepresentable; deserializing `0` fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Index(NonZeroUsize);

impl Index {
    /// Build an index from a one-based position. Returns `None` for `0`.
    pub const fn from_one_based(position: usize) -> Option<Self> {
        match NonZeroUsize::new(position) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Build an index from a zero-based offset. Returns `None` on overflow.
    pub const fn from_zero_based(offset: usize) -> Option<Self> {
        match offset.checked_add(1) {
            Some(position) => Self::from_one_based(position),
            None => None,
        }
    }

    /// The one-based position as shown to the user.
    pub const fn one_based(self) -> usize {
        self.0.get()
    }

    /// The zero-based offset into a list.
    pub const fn zero_based(self) -> usize {
        self.0.get().saturating_sub(1)
    }
}

impl core::fmt::Display for Index {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
