//! Special cards in play.

use serde::{Deserialize, Serialize};

use super::definition::CharacterKind;
use crate::core::{Capacity, ResourceCounts};

/// A special card in an expert match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialCard {
    pub kind: CharacterKind,

    /// Current cost in coins.
    pub cost: u8,

    /// Whether the card has been used this match. The first use raises the
    /// cost by one, permanently.
    pub used: bool,

    /// On-card units, for kinds with a reservoir.
    pub reservoir: Option<ResourceCounts>,

    /// Block tokens still on the card, for kinds that have them.
    pub blocks: Option<u8>,
}

impl SpecialCard {
    /// A fresh card with empty reservoirs. Reservoirs are filled at setup.
    #[must_use]
    pub fn new(kind: CharacterKind) -> Self {
        let spec = kind.spec();
        Self {
            kind,
            cost: spec.base_cost,
            used: false,
            reservoir: (spec.reservoir > 0).then(ResourceCounts::new),
            blocks: (spec.blocks > 0).then_some(spec.blocks),
        }
    }

    /// Capacity of the on-card reservoir.
    #[must_use]
    pub fn reservoir_capacity(&self) -> Capacity {
        Capacity::Total(self.kind.spec().reservoir)
    }

    /// Record a successful use. Returns true on the first use, when the
    /// cost goes up by one.
    pub fn mark_used(&mut self) -> bool {
        if self.used {
            return false;
        }
        self.used = true;
        self.cost += 1;
        true
    }
}
