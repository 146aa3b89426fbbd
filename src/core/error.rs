//! Error types for match operations.
//!
//! Two failure kinds reach callers:
//! - [`MatchError::WrongStage`]: an operation was invoked outside the one stage
//!   it is legal in. Well-behaved collaborators never trigger it.
//! - [`MatchError::Illegal`]: the stage is right but a game rule is violated.
//!
//! [`MatchError::Invariant`] marks an internal defect (a broken invariant
//! detected mid-operation). It is surfaced rather than panicking so the
//! executor can roll the match back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::{Faction, PlayerId, Wizard};
use super::resource::Resource;
use crate::cards::CharacterKind;
use crate::effects::ContextField;
use crate::stage::Stage;

/// Failure of a match operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("`{operation}` is not legal during {stage}")]
    WrongStage {
        operation: &'static str,
        stage: Stage,
    },

    #[error(transparent)]
    Illegal(#[from] IllegalMove),

    #[error("invariant violated: {0}")]
    Invariant(&'static str),
}

impl MatchError {
    /// The reason reported to the acting side.
    ///
    /// Wrong-stage and invariant failures are downgraded to a generic notice.
    #[must_use]
    pub fn reason(&self) -> IllegalMove {
        match self {
            MatchError::Illegal(reason) => *reason,
            MatchError::WrongStage { .. } | MatchError::Invariant(_) => IllegalMove::NotAllowedNow,
        }
    }
}

/// A domain rule violation.
///
/// Serializable so it can travel inside a rejection notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum IllegalMove {
    #[error("move not allowed right now")]
    NotAllowedNow,

    #[error("not your turn")]
    NotYourTurn,

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("match is full")]
    MatchFull,

    #[error("nickname is empty or already taken")]
    NicknameUnavailable,

    #[error("faction {0:?} is not available")]
    FactionUnavailable(Faction),

    #[error("wizard {0:?} is already taken")]
    WizardTaken(Wizard),

    #[error("assistant {0} is not in hand")]
    CardNotInHand(u8),

    #[error("assistant {0} was already played this round")]
    CardAlreadyPlayed(u8),

    #[error("no {0} unit available")]
    ResourceMissing(Resource),

    #[error("no room for another {0} unit")]
    CapacityExceeded(Resource),

    #[error("island {0} does not exist")]
    NoSuchGroup(usize),

    #[error("cloud {0} does not exist")]
    NoSuchSource(usize),

    #[error("cloud {0} is empty")]
    SourceEmpty(usize),

    #[error("cannot move {steps} steps (allowed 1..={max})")]
    InvalidSteps { steps: u8, max: u8 },

    #[error("special cards require an expert match")]
    NotExpertMatch,

    #[error("{0:?} is not in play")]
    CharacterNotInPlay(CharacterKind),

    #[error("a special card was already played this turn")]
    CharacterAlreadyPlayed,

    #[error("costs {cost} coins but only {coins} available")]
    InsufficientCoins { cost: u8, coins: u8 },

    #[error("missing required field {0:?}")]
    MissingField(ContextField),

    #[error("exchange sides differ: {sources} vs {destinations}")]
    ExchangeMismatch { sources: usize, destinations: usize },

    #[error("exchange of {requested} exceeds limit {max}")]
    ExchangeTooLarge { requested: usize, max: usize },

    #[error("no block tokens left on the card")]
    NoBlockTokens,
}
