//! Core types: players, resources, state, errors, RNG, configuration.
//!
//! This module holds the passive data of a match. Behavior lives in
//! `rules` (stateless operations), `effects` and `stage`.

pub mod player;
pub mod resource;
pub mod rng;
pub mod config;
pub mod error;
pub mod state;

pub use player::{Faction, Player, PlayerId, PlayerMap, Wizard};
pub use resource::{Capacity, Resource, ResourceCounts};
pub use rng::{GameRng, GameRngState};
pub use config::{MatchConfig, RuleSet, BOARD_SIZE, CHARACTERS_IN_PLAY, COIN_SUPPLY, HALL_CAPACITY};
pub use error::{IllegalMove, MatchError};
pub use state::{Checkpoint, ExpertAttributes, Match, MatchState, Modifiers};
