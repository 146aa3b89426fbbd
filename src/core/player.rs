//! Player identification, seating data, and per-player storage.
//!
//! ## PlayerId
//!
//! Seat index in join order. With 2-4 players a `u8` is plenty.
//!
//! ## PlayerMap
//!
//! Per-player storage backed by `im::Vector`, so cloning the whole match for
//! a rollback snapshot shares structure instead of copying every board.
//! Players join one at a time, so the map grows with [`PlayerMap::push`].

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

use crate::board::Board;
use crate::cards::Assistant;

/// Player identifier (0-based seat index in join order).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Tower color a player (or team) fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Faction {
    Black,
    White,
    Grey,
}

/// Card back a player picks at join time. Unique per match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wizard {
    Druid,
    King,
    Witch,
    Sage,
}

/// A seated player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub nickname: String,
    pub faction: Faction,
    pub wizard: Wizard,

    /// Whether this player holds the faction's towers. In 4-player matches
    /// only the first player of each faction does.
    pub leader: bool,

    /// Unplayed assistants.
    pub hand: SmallVec<[Assistant; 10]>,

    /// Most recently played assistant.
    pub last_played: Option<Assistant>,

    /// Coins (expert matches only, 0 otherwise).
    pub coins: u8,

    pub board: Board,
}

impl Player {
    /// Create a player with a full assistant deck and an empty board.
    #[must_use]
    pub fn new(id: PlayerId, nickname: impl Into<String>, faction: Faction, wizard: Wizard) -> Self {
        Self {
            id,
            nickname: nickname.into(),
            faction,
            wizard,
            leader: false,
            hand: Assistant::deck().into_iter().collect(),
            last_played: None,
            coins: 0,
            board: Board::default(),
        }
    }

    /// Remove an assistant from hand and record it as last played.
    ///
    /// Returns false if the card was not in hand.
    pub fn play(&mut self, value: u8) -> bool {
        match self.hand.iter().position(|card| card.value == value) {
            Some(pos) => {
                self.last_played = Some(self.hand.remove(pos));
                true
            }
            None => false,
        }
    }
}

/// Per-player storage with O(1) clone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMap<T: Clone> {
    data: Vector<T>,
}

impl<T: Clone> PlayerMap<T> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vector::new() }
    }

    /// Append the entry for the next seat and return its ID.
    pub fn push(&mut self, value: T) -> PlayerId {
        let id = PlayerId(self.data.len() as u8);
        self.data.push_back(value);
        id
    }

    /// Number of seated players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a player's entry, if seated.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    /// Get a mutable entry, if seated.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.data.get_mut(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T: Clone> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T: Clone> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}
