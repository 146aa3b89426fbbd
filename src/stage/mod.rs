//! Stage machine: legal call order for every match operation.
//!
//! ## Stages
//!
//! ```text
//! AwaitingPlayers -> Preparation -> RoundSetup -> PlanningPhase (x players)
//!   -> ActionMoveResources (x moves) -> ActionAdvanceMarker
//!   -> [ActionCollectFromSource] -> ActionEndTurn -> (next player | RoundEnd)
//!   -> RoundSetup ...                                      -> GameOver
//! ```
//!
//! Every operation on [`Match`](crate::core::Match) is legal in exactly one
//! stage (special-card play: any action stage). The game-over check runs
//! before every transition, so a match can end mid-round.
//!
//! - `transition`: the pure transition table
//! - `machine`: the operations themselves

mod machine;
mod transition;

pub use transition::next_stage;

use serde::{Deserialize, Serialize};

/// Stage of a match. Ordered; `GameOver` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    AwaitingPlayers,
    Preparation,
    RoundSetup,
    PlanningPhase,
    ActionMoveResources,
    ActionAdvanceMarker,
    ActionCollectFromSource,
    ActionEndTurn,
    RoundEnd,
    GameOver,
}

impl Stage {
    /// Stages during which the current player may play a special card.
    #[must_use]
    pub fn is_action(self) -> bool {
        matches!(
            self,
            Stage::ActionMoveResources
                | Stage::ActionAdvanceMarker
                | Stage::ActionCollectFromSource
                | Stage::ActionEndTurn
        )
    }

    /// Stages driven by the server rather than by a player command.
    #[must_use]
    pub fn is_automatic(self) -> bool {
        matches!(self, Stage::Preparation | Stage::RoundSetup | Stage::RoundEnd)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
