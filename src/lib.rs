//! # isle-engine
//!
//! Authoritative rule engine for a 2-4 player island-conquest board game.
//!
//! Players take turns placing units, moving a shared marker around a ring of
//! islands, conquering islands by influence and merging adjacent islands of
//! the same faction. Expert matches add coins and special cards.
//!
//! ## Design Principles
//!
//! 1. **Explicit State**: Every rule operation takes the match state as an
//!    argument. Nothing is global.
//!
//! 2. **Fail Before Mutating**: Operations validate stage, turn and rules
//!    first. The executor still snapshots every command so a failure
//!    anywhere rolls the match back.
//!
//! 3. **Cheap Snapshots**: Islands and players live in `im` persistent
//!    vectors, so cloning a match is cheap and rollback is discarding the
//!    mutated copy.
//!
//! ## Modules
//!
//! - `core`: Players, resources, state, errors, RNG, configuration
//! - `board`: Islands and per-player boards
//! - `cards`: Assistants and special cards
//! - `rules`: Turn order, ownership, influence, merging, victory
//! - `effects`: Special-card effects
//! - `stage`: The stage machine
//! - `executor`: Command execution with rollback
//!
//! ## Example
//!
//! ```
//! use isle_engine::{Command, Executor, Faction, MatchConfig, Stage, Wizard};
//!
//! let mut executor = Executor::new(MatchConfig::new(2).with_seed(42));
//! for (nickname, faction, wizard) in [("ada", Faction::Black, Wizard::Druid), ("bo", Faction::White, Wizard::Sage)] {
//!     executor.execute(None, Command::AddPlayer { nickname: nickname.into(), faction, wizard });
//! }
//!
//! let state = executor.state();
//! assert_eq!(state.stage, Stage::PlanningPhase);
//! assert_eq!(state.total_group_size(), 12);
//! ```

pub mod core;
pub mod board;
pub mod cards;
pub mod rules;
pub mod effects;
pub mod stage;
pub mod executor;

// Re-export commonly used types
pub use crate::core::{
    Capacity, Checkpoint, Faction, GameRng, GameRngState, IllegalMove, Match, MatchConfig,
    MatchError, MatchState, Player, PlayerId, Resource, ResourceCounts, RuleSet, Wizard,
};

pub use crate::board::{Board, Island};

pub use crate::cards::{Assistant, CharacterKind, SpecialCard};

pub use crate::rules::{Conquest, EndCondition, MatchResult};

pub use crate::effects::{ContextField, EffectContext, EffectResolver};

pub use crate::stage::Stage;

pub use crate::executor::{Command, Executor, LastMove, Outcome, Rejection};
