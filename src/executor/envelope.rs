//! Snapshot, execute, commit or roll back.
//!
//! [`Executor::execute`] clones the match (cheap: islands and players are
//! persistent vectors), runs one stage-machine operation plus any automatic
//! stages it unlocks, and on failure puts the clone back. A rejected command
//! leaves the match exactly as it was, RNG position included.

use crate::core::{Checkpoint, IllegalMove, Match, MatchConfig, MatchError, MatchState, PlayerId};
use crate::effects::EffectContext;

use super::command::{Command, LastMove, Outcome, Rejection};

/// Serializes commands against one match.
#[derive(Clone, Debug)]
pub struct Executor {
    game: Match,
}

impl Executor {
    /// Declare a new match.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self {
            game: Match::new(config),
        }
    }

    /// Resume from a checkpoint (for example one decoded from storage).
    #[must_use]
    pub fn restore(checkpoint: Checkpoint) -> Self {
        Self {
            game: Match::from_checkpoint(checkpoint),
        }
    }

    #[must_use]
    pub fn game(&self) -> &Match {
        &self.game
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.game.state
    }

    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        self.game.checkpoint()
    }

    /// Run one command. `actor` is `None` only for a join.
    pub fn execute(&mut self, actor: Option<PlayerId>, command: Command) -> Outcome {
        let snapshot = self.game.clone();

        match self.apply(actor, &command) {
            Ok(player) => {
                tracing::info!(%player, command = command.name(), stage = %self.game.state.stage, "command applied");
                let state = self.game.state.clone();
                match command {
                    Command::LeaveMatch => Outcome::ForceEnd { leaver: player, state },
                    command => Outcome::MoveApplied {
                        state,
                        last_move: LastMove::Played { player, command },
                    },
                }
            }
            Err(err) => {
                self.game = snapshot;
                match &err {
                    MatchError::Illegal(reason) => {
                        tracing::warn!(?actor, command = command.name(), %reason, "command rejected");
                    }
                    MatchError::WrongStage { .. } | MatchError::Invariant(_) => {
                        tracing::error!(?actor, command = command.name(), error = %err, "command failed");
                    }
                }
                Outcome::MoveApplied {
                    state: self.game.state.clone(),
                    last_move: LastMove::Rejected(Rejection {
                        player: actor,
                        reason: err.reason(),
                    }),
                }
            }
        }
    }

    fn apply(&mut self, actor: Option<PlayerId>, command: &Command) -> Result<PlayerId, MatchError> {
        let player = match (command, actor) {
            (
                Command::AddPlayer {
                    nickname,
                    faction,
                    wizard,
                },
                _,
            ) => self.game.add_player(nickname, *faction, *wizard)?,
            (_, Some(player)) => {
                self.dispatch(player, command)?;
                player
            }
            (_, None) => return Err(IllegalMove::NotAllowedNow.into()),
        };

        if !self.game.state.is_over() {
            self.game.run_automatic_stages()?;
        }
        Ok(player)
    }

    fn dispatch(&mut self, player: PlayerId, command: &Command) -> Result<(), MatchError> {
        let game = &mut self.game;
        match command {
            Command::AddPlayer { .. } => Err(MatchError::Invariant("join dispatched as a player command")),
            Command::PlayAssistant { value } => game.play_assistant(player, *value),
            Command::MoveToHall { resource } => game.move_to_hall(player, *resource),
            Command::MoveToIsland { resource, group } => game.move_to_island(player, *resource, *group),
            Command::MoveMarker { steps } => game.move_marker(player, *steps),
            Command::CollectFromCloud { cloud } => game.collect_from_cloud(player, *cloud),
            Command::PlayCharacter {
                kind,
                resource,
                group,
                sources,
                destinations,
            } => {
                let ctx = EffectContext {
                    resource: *resource,
                    group: *group,
                    sources: sources.clone(),
                    destinations: destinations.clone(),
                    ..EffectContext::new(player)
                };
                game.play_character(player, *kind, ctx)
            }
            Command::EndTurn => game.end_turn(player),
            Command::LeaveMatch => game.leave(player),
        }
    }
}
