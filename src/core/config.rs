//! Match configuration.
//!
//! A match is declared with a fixed player count and expert flag. Everything
//! else that depends on the player count (towers, entrance size, cloud
//! capacity, moves per turn) is derived into a [`RuleSet`].
//!
//! ```
//! use isle_engine::core::MatchConfig;
//!
//! let config = MatchConfig::new(3).expert().with_seed(7);
//! assert_eq!(config.rules.towers, 6);
//! assert_eq!(config.rules.entrance_size, 9);
//! assert!(config.expert);
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::CharacterKind;

/// Number of fixed territory slots on the shared board.
pub const BOARD_SIZE: u8 = 12;

/// Hall slots per resource type.
pub const HALL_CAPACITY: u8 = 10;

/// Units per type put in the pool before the initial island draw.
pub const SETUP_UNITS_PER_RESOURCE: u8 = 2;

/// Units per type added to the pool after the initial island draw.
pub const POOL_UNITS_PER_RESOURCE: u8 = 24;

/// Coins in the shared stock at the start of an expert match.
pub const COIN_SUPPLY: u8 = 20;

/// Special cards in play per expert match.
pub const CHARACTERS_IN_PLAY: usize = 3;

/// Rule constants derived from the player count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Towers in each leader's reserve.
    pub towers: u8,
    /// Units drawn into each entrance at setup.
    pub entrance_size: u8,
    /// Units per cloud per round.
    pub cloud_capacity: u8,
    /// Units each player must move per turn.
    pub moves_per_turn: u8,
    pub board_size: u8,
    pub hall_capacity: u8,
}

impl RuleSet {
    /// Rules for a 2-4 player match.
    #[must_use]
    pub fn for_players(player_count: usize) -> Self {
        let (towers, entrance_size, cloud_capacity, moves_per_turn) = match player_count {
            3 => (6, 9, 4, 4),
            _ => (8, 7, 3, 3),
        };
        Self {
            towers,
            entrance_size,
            cloud_capacity,
            moves_per_turn,
            board_size: BOARD_SIZE,
            hall_capacity: HALL_CAPACITY,
        }
    }
}

/// Configuration fixed when a match is declared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub player_count: usize,

    /// Expert matches add coins and special cards.
    pub expert: bool,

    /// RNG seed for the match.
    pub seed: u64,

    /// Special cards to use instead of a random draw.
    pub characters: Option<[CharacterKind; CHARACTERS_IN_PLAY]>,

    pub rules: RuleSet,
}

impl MatchConfig {
    /// Create a standard (non-expert) configuration.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        assert!((2..=4).contains(&player_count), "Player count must be 2-4");

        Self {
            player_count,
            expert: false,
            seed: 0,
            characters: None,
            rules: RuleSet::for_players(player_count),
        }
    }

    /// Enable expert mode.
    #[must_use]
    pub fn expert(mut self) -> Self {
        self.expert = true;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fix the special cards in play (implies expert mode).
    #[must_use]
    pub fn with_characters(mut self, characters: [CharacterKind; CHARACTERS_IN_PLAY]) -> Self {
        self.expert = true;
        self.characters = Some(characters);
        self
    }

    /// Whether teams of two share a faction.
    #[must_use]
    pub fn teams(&self) -> bool {
        self.player_count == 4
    }
}
