//! The normal transition table.
//!
//! `next_stage` only decides where the match goes next; entering a stage
//! (building queues, resetting counters) is done by the machine. The
//! game-over short-circuit is applied by the caller before consulting
//! this table.

use crate::core::MatchState;

use super::Stage;

/// The stage that normally follows the current one.
///
/// - PlanningPhase repeats while players remain in the planning queue
/// - ActionMoveResources repeats while the mover has units left to move
/// - ActionAdvanceMarker skips collection when every cloud is empty
/// - ActionEndTurn hands over to the next player or closes the round
#[must_use]
pub fn next_stage(state: &MatchState) -> Stage {
    let players_remain = state.turn_index < state.queue.len();

    match state.stage {
        Stage::AwaitingPlayers => Stage::Preparation,
        Stage::Preparation => Stage::RoundSetup,
        Stage::RoundSetup => Stage::PlanningPhase,
        Stage::PlanningPhase if players_remain => Stage::PlanningPhase,
        Stage::PlanningPhase => Stage::ActionMoveResources,
        Stage::ActionMoveResources if state.moves_left > 0 => Stage::ActionMoveResources,
        Stage::ActionMoveResources => Stage::ActionAdvanceMarker,
        Stage::ActionAdvanceMarker if state.clouds.iter().any(|c| !c.is_empty()) => {
            Stage::ActionCollectFromSource
        }
        Stage::ActionAdvanceMarker => Stage::ActionEndTurn,
        Stage::ActionCollectFromSource => Stage::ActionEndTurn,
        Stage::ActionEndTurn if players_remain => Stage::ActionMoveResources,
        Stage::ActionEndTurn => Stage::RoundEnd,
        Stage::RoundEnd => Stage::RoundSetup,
        Stage::GameOver => Stage::GameOver,
    }
}
