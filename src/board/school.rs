//! Per-player board.

use serde::{Deserialize, Serialize};

use crate::core::{Capacity, ResourceCounts, RuleSet};

/// A player's board.
///
/// The entrance is bounded by the rule set's entrance size, the hall by
/// the per-type hall capacity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Units waiting to be moved this round.
    pub entrance: ResourceCounts,

    /// Settled units; they decide type ownership.
    pub hall: ResourceCounts,

    /// Towers not yet placed on islands.
    pub towers: u8,
}

impl Board {
    #[must_use]
    pub fn entrance_capacity(rules: &RuleSet) -> Capacity {
        Capacity::Total(rules.entrance_size)
    }

    #[must_use]
    pub fn hall_capacity(rules: &RuleSet) -> Capacity {
        Capacity::PerResource(rules.hall_capacity)
    }
}
