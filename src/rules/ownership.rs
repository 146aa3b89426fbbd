//! Type ownership and hall bookkeeping.
//!
//! Type ownership goes to the player with the strictly largest hall count
//! of a resource. The current owner keeps it while still holding the
//! maximum. A tie among challengers leaves it unawarded, unless the
//! tie-break modifier is active and the mover is among the tied players.
//!
//! Settling a unit in the hall can also pay a coin (3rd, 6th and 9th slot
//! of a type, expert matches only, while the stock lasts).

use smallvec::SmallVec;

use crate::board::Board;
use crate::core::{IllegalMove, MatchState, PlayerId, Resource};

/// Recompute ownership of `resource` after a hall change made by `mover`.
pub fn update_ownership(state: &mut MatchState, resource: Resource, mover: PlayerId) {
    let counts: SmallVec<[(PlayerId, u8); 4]> = state
        .players
        .iter()
        .map(|(id, p)| (id, p.board.hall.get(resource)))
        .collect();

    let best = counts.iter().map(|&(_, n)| n).max().unwrap_or(0);
    if best == 0 {
        return;
    }

    let leaders: SmallVec<[PlayerId; 4]> = counts
        .iter()
        .filter(|&&(_, n)| n == best)
        .map(|&(id, _)| id)
        .collect();
    let favor_mover = state.modifiers().tie_favors_mover && leaders.contains(&mover);
    let current = state.ownership[resource.index()];

    let owner = match current {
        _ if favor_mover => Some(mover),
        Some(owner) if leaders.contains(&owner) => Some(owner),
        _ if leaders.len() == 1 => Some(leaders[0]),
        _ => None,
    };

    if owner != current {
        tracing::debug!(%resource, ?current, ?owner, "type ownership changed");
    }
    state.ownership[resource.index()] = owner;
}

/// Recompute ownership of every resource type.
pub fn update_all(state: &mut MatchState, mover: PlayerId) {
    for resource in Resource::ALL {
        update_ownership(state, resource, mover);
    }
}

/// Put one unit into a player's hall, paying a coin on the 3rd/6th/9th slot
/// and updating ownership.
pub fn settle(state: &mut MatchState, player: PlayerId, resource: Resource) -> Result<(), IllegalMove> {
    let capacity = Board::hall_capacity(state.rules());
    let hall = &mut state.player_mut(player)?.board.hall;
    hall.try_add(resource, capacity)?;
    let count = hall.get(resource);

    if count % 3 == 0 {
        award_coin(state, player)?;
    }
    update_ownership(state, resource, player);
    Ok(())
}

/// Move one coin from the stock to a player, if the match is expert and
/// the stock is not empty.
pub fn award_coin(state: &mut MatchState, player: PlayerId) -> Result<(), IllegalMove> {
    let Some(expert) = state.expert.as_mut() else {
        return Ok(());
    };
    if expert.stock == 0 {
        return Ok(());
    }
    expert.stock -= 1;
    state.player_mut(player)?.coins += 1;
    Ok(())
}
