//! Turn-order cards.
//!
//! Every player starts with the same ten assistants. The value decides the
//! action order (lower acts first); the steps bound how far the shared
//! marker may advance on that player's turn.

use serde::{Deserialize, Serialize};

/// Number of assistants in a fresh hand.
pub const DECK_SIZE: u8 = 10;

/// A turn-order card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assistant {
    /// Turn-order value (1-10, unique within a hand).
    pub value: u8,

    /// Maximum marker steps when this card was played.
    pub steps: u8,
}

impl Assistant {
    /// The assistant with the given value. Steps are `(value + 1) / 2`.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self {
            value,
            steps: (value + 1) / 2,
        }
    }

    /// A full hand, ordered by value.
    #[must_use]
    pub fn deck() -> Vec<Assistant> {
        (1..=DECK_SIZE).map(Assistant::new).collect()
    }
}
