//! Special card kinds and their static data.
//!
//! Each kind carries a [`CharacterSpec`]: base cost, reservoir sizes, the
//! exchange limit for swap effects, and the manifest of context fields the
//! effect needs. The effect subsystem validates the manifest generically
//! before dispatching, so individual effects can rely on their fields.

use serde::{Deserialize, Serialize};

use crate::effects::ContextField;

/// Tag of a special card kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterKind {
    /// Move a unit from the card onto an island.
    Monk,
    /// Type-ownership ties favor the mover this turn.
    Farmer,
    /// Resolve conquest on a chosen island out of turn.
    Herald,
    /// +2 marker steps this turn.
    Postman,
    /// Put a block token on an island.
    Herbalist,
    /// Towers don't count for influence this turn.
    Centaur,
    /// Swap up to 3 units between the card and the entrance.
    Jester,
    /// +2 influence for the mover's faction this turn.
    Knight,
    /// One resource type doesn't count for influence this turn.
    Mushroom,
    /// Swap up to 2 units between the entrance and the hall.
    Minstrel,
    /// Move a unit from the card into the hall.
    Princess,
    /// Every player returns up to 3 units of a type from the hall to the pool.
    Thief,
}

impl CharacterKind {
    /// Every kind.
    pub const ALL: [CharacterKind; 12] = [
        CharacterKind::Monk,
        CharacterKind::Farmer,
        CharacterKind::Herald,
        CharacterKind::Postman,
        CharacterKind::Herbalist,
        CharacterKind::Centaur,
        CharacterKind::Jester,
        CharacterKind::Knight,
        CharacterKind::Mushroom,
        CharacterKind::Minstrel,
        CharacterKind::Princess,
        CharacterKind::Thief,
    ];

    /// Static data for this kind.
    #[must_use]
    pub const fn spec(self) -> CharacterSpec {
        use ContextField::{Card, Destinations, Group, Resource, Sources};

        match self {
            CharacterKind::Monk => CharacterSpec::new(1).reservoir(4).fields(&[Card, Resource, Group]),
            CharacterKind::Farmer => CharacterSpec::new(2),
            CharacterKind::Herald => CharacterSpec::new(3).fields(&[Group]),
            CharacterKind::Postman => CharacterSpec::new(1),
            CharacterKind::Herbalist => CharacterSpec::new(2).blocks(4).fields(&[Card, Group]),
            CharacterKind::Centaur => CharacterSpec::new(3),
            CharacterKind::Jester => CharacterSpec::new(1)
                .reservoir(6)
                .exchange(3)
                .fields(&[Card, Sources, Destinations]),
            CharacterKind::Knight => CharacterSpec::new(2),
            CharacterKind::Mushroom => CharacterSpec::new(3).fields(&[Resource]),
            CharacterKind::Minstrel => CharacterSpec::new(1).exchange(2).fields(&[Sources, Destinations]),
            CharacterKind::Princess => CharacterSpec::new(2).reservoir(4).fields(&[Card, Resource]),
            CharacterKind::Thief => CharacterSpec::new(3).fields(&[Resource]),
        }
    }
}

/// Static data of a special card kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterSpec {
    /// Cost before the first use.
    pub base_cost: u8,

    /// Size of the on-card resource reservoir (0 = none).
    pub reservoir: u8,

    /// Size of the block-token reservoir (0 = none).
    pub blocks: u8,

    /// Maximum units per side for swap effects.
    pub exchange_limit: usize,

    /// Context fields the effect requires.
    pub fields: &'static [ContextField],
}

impl CharacterSpec {
    const fn new(base_cost: u8) -> Self {
        Self {
            base_cost,
            reservoir: 0,
            blocks: 0,
            exchange_limit: 0,
            fields: &[],
        }
    }

    const fn reservoir(mut self, size: u8) -> Self {
        self.reservoir = size;
        self
    }

    const fn blocks(mut self, count: u8) -> Self {
        self.blocks = count;
        self
    }

    const fn exchange(mut self, limit: usize) -> Self {
        self.exchange_limit = limit;
        self
    }

    const fn fields(mut self, fields: &'static [ContextField]) -> Self {
        self.fields = fields;
        self
    }
}
