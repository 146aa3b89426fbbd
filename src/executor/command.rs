//! Inbound commands and outbound notices.

use serde::{Deserialize, Serialize};

use crate::cards::CharacterKind;
use crate::core::{Faction, IllegalMove, MatchState, PlayerId, Resource, Wizard};
use crate::effects::Units;

/// A request from a participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    AddPlayer {
        nickname: String,
        faction: Faction,
        wizard: Wizard,
    },
    PlayAssistant {
        value: u8,
    },
    MoveToHall {
        resource: Resource,
    },
    MoveToIsland {
        resource: Resource,
        group: usize,
    },
    MoveMarker {
        steps: u8,
    },
    CollectFromCloud {
        cloud: usize,
    },
    PlayCharacter {
        kind: CharacterKind,
        resource: Option<Resource>,
        group: Option<usize>,
        sources: Option<Units>,
        destinations: Option<Units>,
    },
    EndTurn,
    LeaveMatch,
}

impl Command {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddPlayer { .. } => "add_player",
            Command::PlayAssistant { .. } => "play_assistant",
            Command::MoveToHall { .. } => "move_to_hall",
            Command::MoveToIsland { .. } => "move_to_island",
            Command::MoveMarker { .. } => "move_marker",
            Command::CollectFromCloud { .. } => "collect_from_cloud",
            Command::PlayCharacter { .. } => "play_character",
            Command::EndTurn => "end_turn",
            Command::LeaveMatch => "leave_match",
        }
    }
}

/// Who was refused, and why.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// `None` for a refused join.
    pub player: Option<PlayerId>,
    pub reason: IllegalMove,
}

/// What the last command did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LastMove {
    Played { player: PlayerId, command: Command },
    Rejected(Rejection),
}

/// Result of one command, ready to broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The command was applied or refused; `state` is current either way.
    MoveApplied { state: MatchState, last_move: LastMove },

    /// A participant left and the match is over.
    ForceEnd { leaver: PlayerId, state: MatchState },
}

impl Outcome {
    #[must_use]
    pub fn state(&self) -> &MatchState {
        match self {
            Outcome::MoveApplied { state, .. } | Outcome::ForceEnd { state, .. } => state,
        }
    }

    /// The rejection carried by this outcome, if any.
    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Outcome::MoveApplied {
                last_move: LastMove::Rejected(rejection),
                ..
            } => Some(*rejection),
            _ => None,
        }
    }
}
