//! Resource types and per-type counters.
//!
//! Every container in the game (bag, entrances, halls, islands, clouds,
//! card reservoirs) stores its units as a fixed array of per-type counts.
//! Capacity belongs to the container, not to the counts, so limits are
//! passed in as a [`Capacity`] when adding.
//!
//! ```
//! use isle_engine::core::{Capacity, Resource, ResourceCounts};
//!
//! let mut hall = ResourceCounts::new();
//! hall.try_add(Resource::Red, Capacity::PerResource(1)).unwrap();
//! assert!(hall.try_add(Resource::Red, Capacity::PerResource(1)).is_err());
//! assert_eq!(hall[Resource::Red], 1);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Index;

use super::error::IllegalMove;

/// A resource type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resource {
    Green,
    Red,
    Yellow,
    Pink,
    Blue,
}

impl Resource {
    /// Number of resource types.
    pub const COUNT: usize = 5;

    /// All resource types in index order.
    pub const ALL: [Resource; Resource::COUNT] = [
        Resource::Green,
        Resource::Red,
        Resource::Yellow,
        Resource::Pink,
        Resource::Blue,
    ];

    /// Index into per-type arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resource::Green => "green",
            Resource::Red => "red",
            Resource::Yellow => "yellow",
            Resource::Pink => "pink",
            Resource::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// Upper bound of a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capacity {
    /// No limit (bag, islands).
    Unbounded,
    /// Limit on the total number of units (entrance, card reservoir).
    Total(u8),
    /// Limit per resource type (hall).
    PerResource(u8),
}

impl Capacity {
    /// Whether one more unit of `resource` fits into `counts`.
    #[must_use]
    pub fn admits(self, counts: &ResourceCounts, resource: Resource) -> bool {
        match self {
            Capacity::Unbounded => true,
            Capacity::Total(max) => counts.total() < u32::from(max),
            Capacity::PerResource(max) => counts.get(resource) < max,
        }
    }
}

/// Per-type unit counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceCounts([u8; Resource::COUNT]);

impl ResourceCounts {
    /// Empty counts.
    #[must_use]
    pub const fn new() -> Self {
        Self([0; Resource::COUNT])
    }

    /// `n` units of every type.
    #[must_use]
    pub const fn uniform(n: u8) -> Self {
        Self([n; Resource::COUNT])
    }

    /// Count of one type.
    #[must_use]
    pub fn get(&self, resource: Resource) -> u8 {
        self.0[resource.index()]
    }

    /// Total number of units.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&n| u32::from(n)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    /// Add units without a capacity check.
    pub fn add(&mut self, resource: Resource, n: u8) {
        self.0[resource.index()] += n;
    }

    /// Add one unit, failing if the container is full.
    pub fn try_add(&mut self, resource: Resource, capacity: Capacity) -> Result<(), IllegalMove> {
        if !capacity.admits(self, resource) {
            return Err(IllegalMove::CapacityExceeded(resource));
        }
        self.0[resource.index()] += 1;
        Ok(())
    }

    /// Remove one unit, failing if none is present.
    pub fn try_remove(&mut self, resource: Resource) -> Result<(), IllegalMove> {
        let slot = &mut self.0[resource.index()];
        if *slot == 0 {
            return Err(IllegalMove::ResourceMissing(resource));
        }
        *slot -= 1;
        Ok(())
    }

    /// Remove up to `n` units of a type, returning how many were removed.
    pub fn remove_up_to(&mut self, resource: Resource, n: u8) -> u8 {
        let slot = &mut self.0[resource.index()];
        let taken = (*slot).min(n);
        *slot -= taken;
        taken
    }

    /// Empty the container, returning what it held.
    pub fn take_all(&mut self) -> ResourceCounts {
        std::mem::take(self)
    }

    /// Add every unit of `other`.
    pub fn absorb(&mut self, other: &ResourceCounts) {
        for (slot, n) in self.0.iter_mut().zip(other.0) {
            *slot += n;
        }
    }

    /// Iterate over `(type, count)` pairs, including zero counts.
    pub fn iter(&self) -> impl Iterator<Item = (Resource, u8)> + '_ {
        Resource::ALL.iter().map(move |&r| (r, self.get(r)))
    }

    /// The resource of the `n`th unit when units are laid out in type order.
    #[must_use]
    pub fn nth_unit(&self, mut n: u32) -> Option<Resource> {
        for (resource, count) in self.iter() {
            let count = u32::from(count);
            if n < count {
                return Some(resource);
            }
            n -= count;
        }
        None
    }
}

impl Index<Resource> for ResourceCounts {
    type Output = u8;

    fn index(&self, resource: Resource) -> &Self::Output {
        &self.0[resource.index()]
    }
}

impl FromIterator<Resource> for ResourceCounts {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        let mut counts = Self::new();
        for resource in iter {
            counts.add(resource, 1);
        }
        counts
    }
}
