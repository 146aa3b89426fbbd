//! Island merging.
//!
//! Two islands merge when they share a controlling faction and one sits
//! immediately before the other on the ring. After a conquest the whole
//! ring is scanned: islands are walked in anchor order, with the first
//! island appended again to catch the wrap-around pair, and every island
//! taking part in a mergeable pair joins the merge set.
//!
//! Only the neighbours of the island that just changed can become
//! mergeable, so the set has 0, 2 or 3 members. A three-way merge folds the
//! adjacent pair first and then the remaining island.

use smallvec::SmallVec;

use crate::board::Island;
use crate::core::{MatchError, MatchState};

/// Positions (into `state.islands`) of every island in a mergeable pair.
#[must_use]
pub fn merge_candidates(state: &MatchState) -> SmallVec<[usize; 3]> {
    let board_size = state.rules().board_size;
    let mut order: SmallVec<[usize; 12]> = (0..state.islands.len()).collect();
    order.sort_by_key(|&i| state.islands[i].anchor);

    let mut found = SmallVec::new();
    if order.len() < 2 {
        return found;
    }
    order.push(order[0]);

    for pair in order.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a != b && state.islands[a].can_merge_with(&state.islands[b], board_size) {
            for idx in [a, b] {
                if !found.contains(&idx) {
                    found.push(idx);
                }
            }
        }
    }
    found
}

/// Fold two adjacent islands of the same faction into one.
pub fn merge_pair(a: &Island, b: &Island, board_size: u8) -> Result<Island, MatchError> {
    if a.faction != b.faction {
        return Err(MatchError::Invariant("merging islands of different factions"));
    }
    let (first, second) = if a.is_before(b, board_size) {
        (a, b)
    } else if b.is_before(a, board_size) {
        (b, a)
    } else {
        return Err(MatchError::Invariant("merging islands that are not adjacent"));
    };

    let mut merged = first.clone();
    merged.size += second.size;
    merged.resources.absorb(&second.resources);
    merged.towers += second.towers;
    merged.blocks += second.blocks;
    Ok(merged)
}

/// Merge every mergeable group on the board.
///
/// Returns the position of the merged island, or `None` if nothing merged.
/// The shared marker follows onto the merged island.
pub fn merge_islands(state: &mut MatchState) -> Result<Option<usize>, MatchError> {
    let candidates = merge_candidates(state);
    if candidates.is_empty() {
        return Ok(None);
    }
    if candidates.len() > 3 {
        return Err(MatchError::Invariant("merge set larger than three islands"));
    }

    let board_size = state.rules().board_size;
    let members: SmallVec<[Island; 3]> = candidates.iter().map(|&i| state.islands[i].clone()).collect();

    let merged = match members.as_slice() {
        [a, b] => merge_pair(a, b, board_size)?,
        [a, b, c] => {
            let (pair, rest) = if a.can_merge_with(b, board_size) {
                (merge_pair(a, b, board_size)?, c)
            } else if b.can_merge_with(c, board_size) {
                (merge_pair(b, c, board_size)?, a)
            } else {
                (merge_pair(a, c, board_size)?, b)
            };
            merge_pair(&pair, rest, board_size)?
        }
        _ => return Err(MatchError::Invariant("merge set with a single island")),
    };

    let marker_absorbed = members.iter().any(|i| i.anchor == state.marker);
    let mut islands: Vec<Island> = state
        .islands
        .iter()
        .enumerate()
        .filter(|(idx, _)| !candidates.contains(idx))
        .map(|(_, island)| island.clone())
        .collect();
    islands.push(merged.clone());
    islands.sort_by_key(|i| i.anchor);
    state.islands = islands.into_iter().collect();

    if marker_absorbed {
        state.marker = merged.anchor;
    }

    tracing::debug!(
        anchor = merged.anchor,
        size = merged.size,
        merged = members.len(),
        remaining = state.islands.len(),
        "islands merged"
    );
    Ok(state.islands.iter().position(|i| i.anchor == merged.anchor))
}
