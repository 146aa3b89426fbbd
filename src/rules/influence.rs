//! Influence and conquest.
//!
//! ## Influence strategies
//!
//! How a faction's influence on an island is counted depends on the active
//! modifiers, so counting is behind the [`InfluenceStrategy`] trait:
//! - [`Standard`]: one point per unit whose type the faction owns, plus one
//!   per tower of the faction on the island
//! - [`IgnoreMarkers`]: units only
//! - [`IgnoreResource`]: like standard, minus one resource type
//!
//! A flat bonus for the mover's faction is added on top of any strategy.
//!
//! ## Conquest
//!
//! A blocked island consumes one block token (returned to its card) and is
//! not evaluated. Otherwise the strictly most influential faction takes the
//! island; a tie changes nothing. Conquest swaps towers: the old
//! controller's go back to its leader, the new controller places up to the
//! island's size from its leader's reserve.

use smallvec::SmallVec;

use crate::board::Island;
use crate::core::{Faction, MatchError, MatchState, Modifiers, Resource};

/// Counts one faction's influence on one island.
pub trait InfluenceStrategy {
    fn influence(&self, state: &MatchState, island: &Island, faction: Faction) -> u32;
}

/// Units weighted by type ownership, plus towers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Standard;

/// Units weighted by type ownership; towers don't count.
#[derive(Clone, Copy, Debug, Default)]
pub struct IgnoreMarkers;

/// Standard counting with one resource type left out.
#[derive(Clone, Copy, Debug)]
pub struct IgnoreResource(pub Resource);

fn unit_influence(state: &MatchState, island: &Island, faction: Faction, skip: Option<Resource>) -> u32 {
    island
        .resources
        .iter()
        .filter(|&(r, _)| Some(r) != skip && state.owner_faction(r) == Some(faction))
        .map(|(_, n)| u32::from(n))
        .sum()
}

fn tower_influence(island: &Island, faction: Faction) -> u32 {
    if island.faction == Some(faction) {
        u32::from(island.towers)
    } else {
        0
    }
}

impl InfluenceStrategy for Standard {
    fn influence(&self, state: &MatchState, island: &Island, faction: Faction) -> u32 {
        unit_influence(state, island, faction, None) + tower_influence(island, faction)
    }
}

impl InfluenceStrategy for IgnoreMarkers {
    fn influence(&self, state: &MatchState, island: &Island, faction: Faction) -> u32 {
        unit_influence(state, island, faction, None)
    }
}

impl InfluenceStrategy for IgnoreResource {
    fn influence(&self, state: &MatchState, island: &Island, faction: Faction) -> u32 {
        unit_influence(state, island, faction, Some(self.0)) + tower_influence(island, faction)
    }
}

/// Pick the counting strategy for the active modifiers.
#[must_use]
pub fn strategy_for(modifiers: &Modifiers) -> Box<dyn InfluenceStrategy> {
    if modifiers.ignore_markers {
        Box::new(IgnoreMarkers)
    } else if let Some(resource) = modifiers.ignored_resource {
        Box::new(IgnoreResource(resource))
    } else {
        Box::new(Standard)
    }
}

/// Influence of every faction on an island, including the mover's bonus.
#[must_use]
pub fn faction_scores(state: &MatchState, island: &Island) -> SmallVec<[(Faction, u32); 3]> {
    let modifiers = state.modifiers();
    let strategy = strategy_for(&modifiers);
    let mover_faction = state
        .current_player()
        .and_then(|p| state.players.get(p))
        .map(|p| p.faction);

    state
        .factions()
        .into_iter()
        .map(|faction| {
            let mut score = strategy.influence(state, island, faction);
            if Some(faction) == mover_faction {
                score += u32::from(modifiers.bonus_influence);
            }
            (faction, score)
        })
        .collect()
}

/// The faction with strictly the highest score, if any.
#[must_use]
pub fn dominant_faction(scores: &[(Faction, u32)]) -> Option<Faction> {
    let best = scores.iter().map(|&(_, s)| s).max()?;
    let mut leaders = scores.iter().filter(|&&(_, s)| s == best);
    let (faction, _) = *leaders.next()?;
    leaders.next().is_none().then_some(faction)
}

/// Result of a conquest evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conquest {
    /// A block token was consumed instead.
    Blocked,
    /// Controller unchanged (tie, or the controller is still dominant).
    Unchanged,
    /// The island changed hands.
    Conquered {
        from: Option<Faction>,
        to: Faction,
        towers: u8,
    },
}

/// Evaluate conquest on the island at `index`.
pub fn resolve_conquest(state: &mut MatchState, index: usize) -> Result<Conquest, MatchError> {
    let island = state.island(index)?.clone();

    if island.blocks > 0 {
        state.island_mut(index)?.blocks -= 1;
        return_block_token(state);
        tracing::debug!(anchor = island.anchor, "conquest blocked");
        return Ok(Conquest::Blocked);
    }

    let scores = faction_scores(state, &island);
    let Some(winner) = dominant_faction(&scores) else {
        return Ok(Conquest::Unchanged);
    };
    if island.faction == Some(winner) {
        return Ok(Conquest::Unchanged);
    }

    if let Some(previous) = island.faction {
        let leader = state
            .leader(previous)
            .ok_or(MatchError::Invariant("controlling faction has no leader"))?;
        state.players[leader].board.towers += island.towers;
    }

    let leader = state
        .leader(winner)
        .ok_or(MatchError::Invariant("dominant faction has no leader"))?;
    let reserve = &mut state.players[leader].board.towers;
    let placed = island.size.min(*reserve);
    *reserve -= placed;

    let target = state.island_mut(index)?;
    target.faction = Some(winner);
    target.towers = placed;

    tracing::debug!(anchor = island.anchor, from = ?island.faction, to = ?winner, placed, "island conquered");
    Ok(Conquest::Conquered {
        from: island.faction,
        to: winner,
        towers: placed,
    })
}

/// Put a consumed block token back on the card that owns block tokens.
fn return_block_token(state: &mut MatchState) {
    let Some(expert) = state.expert.as_mut() else {
        return;
    };
    if let Some(blocks) = expert.cards.iter_mut().find_map(|c| c.blocks.as_mut()) {
        *blocks += 1;
    }
}
