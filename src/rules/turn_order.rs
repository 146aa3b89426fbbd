//! Planning and action order.
//!
//! ## Planning order
//!
//! Starts with a chosen player and walks the clockwise seating from there,
//! wrapping once. Round 1 starts with a random seat; later rounds start with
//! whoever acted first in the previous round.
//!
//! ## Action order
//!
//! Each (player, value) pair is inserted before the first entry with a
//! strictly greater value. Equal values keep their planning order.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::core::{GameRng, IllegalMove, MatchError, MatchState, PlayerId};

/// Clockwise order starting at `start`.
///
/// ```
/// use isle_engine::core::PlayerId;
/// use isle_engine::rules::planning_order;
///
/// let seating = [PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)];
/// let order = planning_order(&seating, PlayerId::new(2));
/// assert_eq!(order, vec![PlayerId::new(2), PlayerId::new(0), PlayerId::new(1)]);
/// ```
#[must_use]
pub fn planning_order(seating: &[PlayerId], start: PlayerId) -> Vec<PlayerId> {
    let offset = seating.iter().position(|&p| p == start).unwrap_or(0);
    seating
        .iter()
        .cycle()
        .skip(offset)
        .take(seating.len())
        .copied()
        .collect()
}

/// The player who opens this round's planning.
///
/// On the first round a seat is drawn at random; afterwards the first
/// player of the previous action order (still in `state.queue`) opens.
pub fn planning_start(state: &MatchState, rng: &mut GameRng) -> Option<PlayerId> {
    if state.round <= 1 || state.queue.is_empty() {
        rng.choose(&state.seating).copied()
    } else {
        state.queue.first().copied()
    }
}

/// Build the action order from planning order and played values.
///
/// Fails with an invariant error if a player appears twice.
pub fn action_order(played: &[(PlayerId, u8)]) -> Result<Vec<PlayerId>, MatchError> {
    let mut queue: Vec<(PlayerId, u8)> = Vec::with_capacity(played.len());
    let mut seen = FxHashSet::default();

    for &(player, value) in played {
        if !seen.insert(player) {
            tracing::error!(%player, "duplicate player while building action order");
            return Err(MatchError::Invariant("duplicate player in action order"));
        }
        let at = queue
            .iter()
            .position(|&(_, v)| v > value)
            .unwrap_or(queue.len());
        queue.insert(at, (player, value));
    }

    Ok(queue.into_iter().map(|(p, _)| p).collect())
}

/// Values already played this round, in planning order.
#[must_use]
pub fn played_this_round(state: &MatchState) -> SmallVec<[u8; 4]> {
    state.queue[..state.turn_index.min(state.queue.len())]
        .iter()
        .filter_map(|&p| state.players.get(p)?.last_played)
        .map(|card| card.value)
        .collect()
}

/// Check that `value` may be played from `hand` given this round's plays.
///
/// A value someone else already played is only allowed when every card
/// left in hand was already played this round.
pub fn check_playable(hand: &[u8], played: &[u8], value: u8) -> Result<(), IllegalMove> {
    if !hand.contains(&value) {
        return Err(IllegalMove::CardNotInHand(value));
    }
    if played.contains(&value) && hand.iter().any(|v| !played.contains(v)) {
        return Err(IllegalMove::CardAlreadyPlayed(value));
    }
    Ok(())
}
