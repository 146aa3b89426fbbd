//! Territory groups on the circular board.
//!
//! ## Anchors
//!
//! The board has `N` fixed slots arranged in a circle. An island covers
//! `size` consecutive slots starting at `anchor`, so island `A` sits
//! immediately before island `B` when `(A.anchor + A.size) % N == B.anchor`.
//! Merging never moves slots around; it only widens one island over the
//! slots of its neighbours.

use serde::{Deserialize, Serialize};

use crate::core::{Faction, ResourceCounts};

/// A territory group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Island {
    /// First slot covered (0..N).
    pub anchor: u8,

    /// Number of slots covered (>= 1).
    pub size: u8,

    pub resources: ResourceCounts,

    /// Controlling faction. `None` until the first tower is placed.
    pub faction: Option<Faction>,

    /// Towers of `faction` standing here.
    pub towers: u8,

    /// Block tokens waiting to cancel a conquest evaluation.
    pub blocks: u8,
}

impl Island {
    /// A fresh single-slot island.
    #[must_use]
    pub fn new(anchor: u8) -> Self {
        Self {
            anchor,
            size: 1,
            resources: ResourceCounts::new(),
            faction: None,
            towers: 0,
            blocks: 0,
        }
    }

    /// Whether `self` ends exactly where `other` starts on a board of `board_size` slots.
    #[must_use]
    pub fn is_before(&self, other: &Island, board_size: u8) -> bool {
        (self.anchor + self.size) % board_size == other.anchor
    }

    /// Whether the two islands may merge: same controlling faction, and one
    /// immediately before the other.
    #[must_use]
    pub fn can_merge_with(&self, other: &Island, board_size: u8) -> bool {
        match (self.faction, other.faction) {
            (Some(a), Some(b)) if a == b => {
                self.is_before(other, board_size) || other.is_before(self, board_size)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(anchor: u8, size: u8, faction: Faction) -> Island {
        Island {
            anchor,
            size,
            faction: Some(faction),
            towers: size,
            ..Island::new(anchor)
        }
    }

    #[test]
    fn test_is_before_wraps() {
        let last = Island::new(11);
        let first = Island::new(0);

        assert!(last.is_before(&first, 12));
        assert!(!first.is_before(&last, 12));
    }

    #[test]
    fn test_is_before_respects_size() {
        let wide = Island { size: 3, ..Island::new(4) };

        assert!(wide.is_before(&Island::new(7), 12));
        assert!(!wide.is_before(&Island::new(5), 12));
    }

    #[test]
    fn test_can_merge_requires_same_faction() {
        let a = owned(0, 1, Faction::Black);
        let b = owned(1, 1, Faction::Black);
        let c = owned(1, 1, Faction::White);

        assert!(a.can_merge_with(&b, 12));
        assert!(b.can_merge_with(&a, 12));
        assert!(!a.can_merge_with(&c, 12));
        assert!(!a.can_merge_with(&Island::new(1), 12));
    }
}
