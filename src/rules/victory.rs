//! End-of-match detection and winner computation.
//!
//! The match ends as soon as any of these holds:
//! - the ring has collapsed to 3 islands or fewer
//! - a faction leader has placed every tower
//! - at a round boundary: the pool is empty, or some player has no
//!   assistants left
//!
//! The winner is the faction with the most towers on islands; ties go to
//! the faction owning more resource types; a remaining tie is a draw.

use serde::{Deserialize, Serialize};

use crate::core::{Faction, MatchState, PlayerId};

/// Minimum number of islands for the match to continue.
pub const MIN_ISLANDS: usize = 4;

/// Result of a finished match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    /// Single winning faction.
    Winner(Faction),
    /// Tied on towers and type ownership.
    Draw,
    /// A participant left mid-match.
    Abandoned { leaver: PlayerId },
}

impl MatchResult {
    /// Check if a faction won.
    #[must_use]
    pub fn is_winner(&self, faction: Faction) -> bool {
        matches!(self, MatchResult::Winner(f) if *f == faction)
    }
}

/// Why a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndCondition {
    Collapse,
    TowersExhausted(Faction),
    PoolEmpty,
    HandExhausted(PlayerId),
}

/// The first end condition that holds, if any.
///
/// Pool and hand conditions only count at a round boundary.
#[must_use]
pub fn end_condition(state: &MatchState, round_boundary: bool) -> Option<EndCondition> {
    if state.islands.len() < MIN_ISLANDS {
        return Some(EndCondition::Collapse);
    }

    let exhausted = state
        .players
        .iter()
        .find(|(_, p)| p.leader && p.board.towers == 0)
        .map(|(_, p)| p.faction);
    if let Some(faction) = exhausted {
        return Some(EndCondition::TowersExhausted(faction));
    }

    if round_boundary {
        if state.pool.is_empty() {
            return Some(EndCondition::PoolEmpty);
        }
        if let Some((id, _)) = state.players.iter().find(|(_, p)| p.hand.is_empty()) {
            return Some(EndCondition::HandExhausted(id));
        }
    }
    None
}

/// Compute the result from the current board.
#[must_use]
pub fn compute_result(state: &MatchState) -> MatchResult {
    let mut ranking: Vec<(Faction, u32, usize)> = state
        .factions()
        .into_iter()
        .map(|f| (f, state.towers_placed(f), state.ownership_count(f)))
        .collect();
    ranking.sort_by(|a, b| (b.1, b.2).cmp(&(a.1, a.2)));

    match ranking.as_slice() {
        [] => MatchResult::Draw,
        [(only, _, _)] => MatchResult::Winner(*only),
        [first, second, ..] if (first.1, first.2) == (second.1, second.2) => MatchResult::Draw,
        [first, ..] => MatchResult::Winner(first.0),
    }
}
