//! Bounded all-or-nothing exchanges between two containers.
//!
//! Units are removed one at a time while tracking what actually left each
//! container. The first failed removal or insertion puts everything back,
//! so on error both containers are exactly as they were.

use crate::core::{Capacity, IllegalMove, Resource, ResourceCounts};

/// Remove every unit in `units`, or none of them.
fn take_each(counts: &mut ResourceCounts, units: &[Resource]) -> Result<(), IllegalMove> {
    for (done, &unit) in units.iter().enumerate() {
        if let Err(err) = counts.try_remove(unit) {
            restore(counts, &units[..done]);
            return Err(err);
        }
    }
    Ok(())
}

/// Insert every unit in `units`, or none of them.
fn put_each(counts: &mut ResourceCounts, capacity: Capacity, units: &[Resource]) -> Result<(), IllegalMove> {
    for (done, &unit) in units.iter().enumerate() {
        if let Err(err) = counts.try_add(unit, capacity) {
            for &placed in &units[..done] {
                counts.remove_up_to(placed, 1);
            }
            return Err(err);
        }
    }
    Ok(())
}

fn restore(counts: &mut ResourceCounts, units: &[Resource]) {
    for &unit in units {
        counts.add(unit, 1);
    }
}

/// Swap `from_left` (taken out of `left`) with `from_right` (taken out of
/// `right`). Both sides must name the same number of units, at most `limit`.
pub fn exchange(
    left: &mut ResourceCounts,
    left_capacity: Capacity,
    right: &mut ResourceCounts,
    right_capacity: Capacity,
    from_left: &[Resource],
    from_right: &[Resource],
    limit: usize,
) -> Result<(), IllegalMove> {
    if from_left.len() != from_right.len() {
        return Err(IllegalMove::ExchangeMismatch {
            sources: from_left.len(),
            destinations: from_right.len(),
        });
    }
    if from_left.len() > limit {
        return Err(IllegalMove::ExchangeTooLarge {
            requested: from_left.len(),
            max: limit,
        });
    }

    take_each(left, from_left)?;
    if let Err(err) = take_each(right, from_right) {
        restore(left, from_left);
        return Err(err);
    }
    if let Err(err) = put_each(right, right_capacity, from_left) {
        restore(right, from_right);
        restore(left, from_left);
        return Err(err);
    }
    if let Err(err) = put_each(left, left_capacity, from_right) {
        for &unit in from_left {
            right.remove_up_to(unit, 1);
        }
        restore(right, from_right);
        restore(left, from_left);
        return Err(err);
    }
    Ok(())
}
