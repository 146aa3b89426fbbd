//! Match state: the authoritative data aggregate.
//!
//! ## MatchState
//!
//! Everything observers may see, serialized and broadcast after every
//! committed command:
//! - Stage, round, turn pointers and queues
//! - Seating, players and their boards
//! - Islands, shared marker, clouds, pool, type ownership
//! - Expert attributes (coins, special cards, turn-scoped modifiers)
//! - The recorded result once the match is over
//!
//! ## Match
//!
//! `MatchState` plus the RNG. Stage-machine operations run on `Match`.
//! Islands and players live in `im` persistent vectors, so cloning a
//! `Match` for a rollback snapshot is cheap and rollback is simply
//! discarding the mutated copy.
//!
//! ## Invariant
//!
//! The sizes of all islands always sum to the board size.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::config::{MatchConfig, RuleSet};
use super::error::{IllegalMove, MatchError};
use super::player::{Faction, Player, PlayerId, PlayerMap};
use super::resource::{Resource, ResourceCounts};
use super::rng::{GameRng, GameRngState};
use crate::board::Island;
use crate::cards::{CharacterKind, SpecialCard};
use crate::rules::MatchResult;
use crate::stage::Stage;

/// Turn-scoped modifiers set by special cards.
///
/// Cleared exactly when the current player's turn ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Towers don't count for influence.
    pub ignore_markers: bool,

    /// This resource type doesn't count for influence.
    pub ignored_resource: Option<Resource>,

    /// Extra influence for the mover's faction.
    pub bonus_influence: u8,

    /// Extra marker steps for the mover.
    pub bonus_steps: u8,

    /// Type-ownership ties go to the mover.
    pub tie_favors_mover: bool,
}

/// State present only in expert matches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertAttributes {
    /// Shared coin stock.
    pub stock: u8,

    /// The special cards in play.
    pub cards: SmallVec<[SpecialCard; 3]>,

    pub modifiers: Modifiers,

    /// Whether the current player already used a special card this turn.
    pub card_played: bool,
}

impl ExpertAttributes {
    /// Position of a card kind among the cards in play.
    #[must_use]
    pub fn card_index(&self, kind: CharacterKind) -> Option<usize> {
        self.cards.iter().position(|card| card.kind == kind)
    }
}

/// Authoritative state of one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    config: MatchConfig,

    pub stage: Stage,

    /// Round number (0 before the first round starts).
    pub round: u32,

    /// Position in `queue` of the player whose turn it is.
    pub turn_index: usize,

    /// Planning order during planning, action order afterwards. At round
    /// setup it still holds the previous round's action order.
    pub queue: Vec<PlayerId>,

    /// Clockwise seating (join order).
    pub seating: Vec<PlayerId>,

    pub players: PlayerMap<Player>,

    /// Islands, sorted by anchor.
    pub islands: Vector<Island>,

    /// Anchor of the island holding the shared marker.
    pub marker: u8,

    pub clouds: SmallVec<[ResourceCounts; 4]>,

    /// The bag.
    pub pool: ResourceCounts,

    /// Type ownership (professors), by resource index.
    pub ownership: [Option<PlayerId>; Resource::COUNT],

    /// Units the current player still has to move this turn.
    pub moves_left: u8,

    pub expert: Option<ExpertAttributes>,

    /// Set once the match is over.
    pub result: Option<MatchResult>,
}

impl MatchState {
    /// Create a match awaiting players. The board starts as N single-slot islands.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        let islands = (0..config.rules.board_size).map(Island::new).collect();
        let clouds = (0..config.player_count).map(|_| ResourceCounts::new()).collect();
        let expert = config.expert.then(ExpertAttributes::default);

        Self {
            config,
            stage: Stage::AwaitingPlayers,
            round: 0,
            turn_index: 0,
            queue: Vec::new(),
            seating: Vec::new(),
            players: PlayerMap::new(),
            islands,
            marker: 0,
            clouds,
            pool: ResourceCounts::new(),
            ownership: [None; Resource::COUNT],
            moves_left: 0,
            expert,
            result: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.config.rules
    }

    /// Whether the match is over.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.stage == Stage::GameOver
    }

    // === Players ===

    /// The player whose turn it is, if any.
    #[must_use]
    pub fn current_player(&self) -> Option<PlayerId> {
        self.queue.get(self.turn_index).copied()
    }

    /// Look up a seated player.
    pub fn player(&self, id: PlayerId) -> Result<&Player, IllegalMove> {
        self.players.get(id).ok_or(IllegalMove::UnknownPlayer(id))
    }

    /// Look up a seated player mutably.
    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, IllegalMove> {
        self.players.get_mut(id).ok_or(IllegalMove::UnknownPlayer(id))
    }

    /// Fail unless `id` is the player whose turn it is.
    pub fn ensure_current(&self, id: PlayerId) -> Result<(), IllegalMove> {
        if self.current_player() == Some(id) {
            Ok(())
        } else {
            Err(IllegalMove::NotYourTurn)
        }
    }

    /// Distinct factions in seating order.
    #[must_use]
    pub fn factions(&self) -> SmallVec<[Faction; 3]> {
        let mut factions = SmallVec::new();
        for (_, player) in self.players.iter() {
            if !factions.contains(&player.faction) {
                factions.push(player.faction);
            }
        }
        factions
    }

    /// The player holding a faction's towers.
    #[must_use]
    pub fn leader(&self, faction: Faction) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|(_, p)| p.faction == faction && p.leader)
            .map(|(id, _)| id)
    }

    /// Faction of the type owner of `resource`, if owned.
    #[must_use]
    pub fn owner_faction(&self, resource: Resource) -> Option<Faction> {
        let owner = self.ownership[resource.index()]?;
        self.players.get(owner).map(|p| p.faction)
    }

    /// Number of resource types owned by players of `faction`.
    #[must_use]
    pub fn ownership_count(&self, faction: Faction) -> usize {
        Resource::ALL
            .iter()
            .filter(|&&r| self.owner_faction(r) == Some(faction))
            .count()
    }

    /// Towers of `faction` standing on islands.
    #[must_use]
    pub fn towers_placed(&self, faction: Faction) -> u32 {
        self.islands
            .iter()
            .filter(|i| i.faction == Some(faction))
            .map(|i| u32::from(i.towers))
            .sum()
    }

    // === Islands ===

    /// Look up an island by position.
    pub fn island(&self, index: usize) -> Result<&Island, IllegalMove> {
        self.islands.get(index).ok_or(IllegalMove::NoSuchGroup(index))
    }

    /// Look up an island mutably.
    pub fn island_mut(&mut self, index: usize) -> Result<&mut Island, IllegalMove> {
        self.islands.get_mut(index).ok_or(IllegalMove::NoSuchGroup(index))
    }

    /// Position of the island holding the shared marker.
    pub fn marker_index(&self) -> Result<usize, MatchError> {
        self.islands
            .iter()
            .position(|i| i.anchor == self.marker)
            .ok_or(MatchError::Invariant("marker is not on any island anchor"))
    }

    /// Sum of island sizes. Always equals the board size.
    #[must_use]
    pub fn total_group_size(&self) -> u32 {
        self.islands.iter().map(|i| u32::from(i.size)).sum()
    }

    /// Positions of islands carrying block tokens.
    #[must_use]
    pub fn blocked_groups(&self) -> Vec<usize> {
        self.islands
            .iter()
            .enumerate()
            .filter(|(_, i)| i.blocks > 0)
            .map(|(idx, _)| idx)
            .collect()
    }

    // === Expert ===

    /// Active modifiers (all off in standard matches).
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.expert.as_ref().map(|e| e.modifiers).unwrap_or_default()
    }

    /// Expert attributes, failing in standard matches.
    pub fn expert_mut(&mut self) -> Result<&mut ExpertAttributes, IllegalMove> {
        self.expert.as_mut().ok_or(IllegalMove::NotExpertMatch)
    }

    // === Serialization ===

    /// Encode for broadcast.
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode a broadcast snapshot.
    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

/// A match: authoritative state plus its RNG.
#[derive(Clone, Debug)]
pub struct Match {
    pub state: MatchState,
    pub rng: GameRng,
}

impl Match {
    /// Declare a new match.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            state: MatchState::new(config),
            rng,
        }
    }

    /// Capture state and RNG position.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            state: self.state.clone(),
            rng: self.rng.state(),
        }
    }

    /// Rebuild a match from a (possibly deserialized) checkpoint.
    #[must_use]
    pub fn from_checkpoint(checkpoint: Checkpoint) -> Self {
        Self {
            state: checkpoint.state,
            rng: GameRng::from_state(&checkpoint.rng),
        }
    }
}

/// Full restorable copy of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub state: MatchState,
    pub rng: GameRngState,
}

impl Checkpoint {
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}
