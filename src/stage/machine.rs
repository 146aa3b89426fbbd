//! Stage-machine operations on [`Match`].
//!
//! Every operation first checks the stage it is legal in, then the acting
//! player, then the game rules, and only then mutates. It finishes by
//! attempting a transition, which runs the game-over check before
//! consulting the transition table.
//!
//! ```
//! use isle_engine::core::{Faction, Match, MatchConfig, Wizard};
//! use isle_engine::stage::Stage;
//!
//! let mut game = Match::new(MatchConfig::new(2).with_seed(11));
//! game.add_player("ada", Faction::Black, Wizard::Druid).unwrap();
//! game.add_player("bo", Faction::White, Wizard::Witch).unwrap();
//! game.run_automatic_stages().unwrap();
//!
//! assert_eq!(game.state.stage, Stage::PlanningPhase);
//! assert_eq!(game.state.round, 1);
//! ```

use smallvec::SmallVec;

use super::{next_stage, Stage};
use crate::cards::{CharacterKind, SpecialCard};
use crate::core::config::{POOL_UNITS_PER_RESOURCE, SETUP_UNITS_PER_RESOURCE};
use crate::core::{
    Faction, IllegalMove, Match, MatchError, Player, PlayerId, Resource, ResourceCounts, Wizard,
    CHARACTERS_IN_PLAY, COIN_SUPPLY,
};
use crate::effects::{EffectContext, EffectResolver};
use crate::rules::{
    action_order, check_playable, compute_result, end_condition, merge_islands, planning_order,
    planning_start, played_this_round, resolve_conquest, settle, MatchResult,
};

/// Players per faction in team matches.
const TEAM_SIZE: usize = 2;

impl Match {
    fn expect_stage(&self, operation: &'static str, stage: Stage) -> Result<(), MatchError> {
        if self.state.stage == stage {
            Ok(())
        } else {
            Err(MatchError::WrongStage {
                operation,
                stage: self.state.stage,
            })
        }
    }

    // === Joining ===

    /// Seat a new player. Fills the match in join order; the last seat
    /// moves the match into preparation.
    pub fn add_player(&mut self, nickname: &str, faction: Faction, wizard: Wizard) -> Result<PlayerId, MatchError> {
        self.expect_stage("add_player", Stage::AwaitingPlayers)?;

        let config = self.state.config();
        let (capacity, teams) = (config.player_count, config.teams());
        let players = &self.state.players;

        if players.len() >= capacity {
            return Err(IllegalMove::MatchFull.into());
        }
        if nickname.is_empty() || players.iter().any(|(_, p)| p.nickname == nickname) {
            return Err(IllegalMove::NicknameUnavailable.into());
        }
        if players.iter().any(|(_, p)| p.wizard == wizard) {
            return Err(IllegalMove::WizardTaken(wizard).into());
        }

        let members = players.iter().filter(|(_, p)| p.faction == faction).count();
        let available = match faction {
            Faction::Grey => capacity == 3 && members == 0,
            _ if teams => members < TEAM_SIZE,
            _ => members == 0,
        };
        if !available {
            return Err(IllegalMove::FactionUnavailable(faction).into());
        }

        let id = PlayerId::new(players.len() as u8);
        let mut player = Player::new(id, nickname, faction, wizard);
        if members == 0 {
            player.leader = true;
            player.board.towers = self.state.rules().towers;
        }
        self.state.players.push(player);
        self.state.seating.push(id);

        tracing::info!(player = %id, nickname, ?faction, ?wizard, "player joined");
        if self.state.players.len() == capacity {
            self.transition()?;
        }
        Ok(id)
    }

    // === Automatic stages ===

    /// Place the marker, seed islands, fill the pool and entrances, and set
    /// up coins and special cards in expert matches.
    pub fn prepare(&mut self) -> Result<(), MatchError> {
        self.expect_stage("prepare", Stage::Preparation)?;

        let board_size = self.state.rules().board_size;
        let marker = self.rng.gen_range_usize(0..usize::from(board_size)) as u8;
        let opposite = (marker + board_size / 2) % board_size;
        self.state.marker = marker;

        self.state.pool = ResourceCounts::uniform(SETUP_UNITS_PER_RESOURCE);
        for index in 0..self.state.islands.len() {
            let anchor = self.state.islands[index].anchor;
            if anchor == marker || anchor == opposite {
                continue;
            }
            let unit = self.draw()?;
            self.state.islands[index].resources.add(unit, 1);
        }
        self.state.pool.absorb(&ResourceCounts::uniform(POOL_UNITS_PER_RESOURCE));

        let entrance_size = self.state.rules().entrance_size;
        for id in self.state.seating.clone() {
            for _ in 0..entrance_size {
                let unit = self.draw()?;
                self.state.players[id].board.entrance.add(unit, 1);
            }
        }

        if self.state.config().expert {
            self.prepare_expert();
        }

        tracing::debug!(marker, pool = self.state.pool.total(), "match prepared");
        self.transition()?;
        Ok(())
    }

    fn prepare_expert(&mut self) {
        let kinds: SmallVec<[CharacterKind; CHARACTERS_IN_PLAY]> = match self.state.config().characters {
            Some(kinds) => kinds.into_iter().collect(),
            None => {
                let mut all = CharacterKind::ALL;
                self.rng.shuffle(&mut all);
                all[..CHARACTERS_IN_PLAY].iter().copied().collect()
            }
        };

        let mut cards: SmallVec<[SpecialCard; 3]> = SmallVec::new();
        for kind in kinds {
            let mut card = SpecialCard::new(kind);
            if let Some(reservoir) = card.reservoir.as_mut() {
                for _ in 0..kind.spec().reservoir {
                    if let Some(unit) = self.rng.draw_from(&mut self.state.pool) {
                        reservoir.add(unit, 1);
                    }
                }
            }
            cards.push(card);
        }

        if let Some(expert) = self.state.expert.as_mut() {
            expert.stock = COIN_SUPPLY;
            expert.cards = cards;
            for (_, player) in self.state.players.iter_mut() {
                player.coins = 1;
                expert.stock -= 1;
            }
        }
    }

    /// Start a round: fill the clouds and build the planning queue.
    pub fn setup_round(&mut self) -> Result<(), MatchError> {
        self.expect_stage("setup_round", Stage::RoundSetup)?;
        self.state.round += 1;

        let capacity = self.state.rules().cloud_capacity;
        for index in 0..self.state.clouds.len() {
            for _ in 0..capacity {
                match self.rng.draw_from(&mut self.state.pool) {
                    Some(unit) => self.state.clouds[index].add(unit, 1),
                    None => break,
                }
            }
        }

        let start = planning_start(&self.state, &mut self.rng)
            .ok_or(MatchError::Invariant("round started with nobody seated"))?;
        self.state.queue = planning_order(&self.state.seating, start);
        self.state.turn_index = 0;

        tracing::debug!(round = self.state.round, %start, "round set up");
        self.transition()?;
        Ok(())
    }

    /// Close the round. The end-of-round conditions are checked here.
    pub fn end_round(&mut self) -> Result<(), MatchError> {
        self.expect_stage("end_round", Stage::RoundEnd)?;
        self.transition()?;
        Ok(())
    }

    /// Run preparation, round setup and round end until a player has to act.
    pub fn run_automatic_stages(&mut self) -> Result<(), MatchError> {
        while self.state.stage.is_automatic() {
            match self.state.stage {
                Stage::Preparation => self.prepare()?,
                Stage::RoundSetup => self.setup_round()?,
                _ => self.end_round()?,
            }
        }
        Ok(())
    }

    // === Planning ===

    /// Play an assistant for this round.
    pub fn play_assistant(&mut self, player: PlayerId, value: u8) -> Result<(), MatchError> {
        self.expect_stage("play_assistant", Stage::PlanningPhase)?;
        self.state.ensure_current(player)?;

        let hand: SmallVec<[u8; 10]> = self.state.player(player)?.hand.iter().map(|a| a.value).collect();
        check_playable(&hand, &played_this_round(&self.state), value)?;

        if !self.state.player_mut(player)?.play(value) {
            return Err(IllegalMove::CardNotInHand(value).into());
        }
        self.state.turn_index += 1;

        tracing::debug!(%player, value, "assistant played");
        self.transition()?;
        Ok(())
    }

    // === Action ===

    /// Move a unit from the entrance into the hall.
    pub fn move_to_hall(&mut self, player: PlayerId, resource: Resource) -> Result<(), MatchError> {
        self.expect_stage("move_to_hall", Stage::ActionMoveResources)?;
        self.state.ensure_current(player)?;

        if self.state.player(player)?.board.entrance.get(resource) == 0 {
            return Err(IllegalMove::ResourceMissing(resource).into());
        }
        settle(&mut self.state, player, resource)?;
        self.state.player_mut(player)?.board.entrance.try_remove(resource)?;

        self.finish_move()
    }

    /// Move a unit from the entrance onto an island.
    pub fn move_to_island(&mut self, player: PlayerId, resource: Resource, group: usize) -> Result<(), MatchError> {
        self.expect_stage("move_to_island", Stage::ActionMoveResources)?;
        self.state.ensure_current(player)?;
        self.state.island(group)?;

        self.state.player_mut(player)?.board.entrance.try_remove(resource)?;
        self.state.island_mut(group)?.resources.add(resource, 1);

        self.finish_move()
    }

    fn finish_move(&mut self) -> Result<(), MatchError> {
        self.state.moves_left = self
            .state
            .moves_left
            .checked_sub(1)
            .ok_or(MatchError::Invariant("move made with no moves left"))?;
        self.transition()?;
        Ok(())
    }

    /// Advance the shared marker and resolve the island it lands on.
    pub fn move_marker(&mut self, player: PlayerId, steps: u8) -> Result<(), MatchError> {
        self.expect_stage("move_marker", Stage::ActionAdvanceMarker)?;
        self.state.ensure_current(player)?;

        let played = self
            .state
            .player(player)?
            .last_played
            .ok_or(MatchError::Invariant("acting player has no assistant in play"))?;
        let max = played.steps + self.state.modifiers().bonus_steps;
        if steps == 0 || steps > max {
            return Err(IllegalMove::InvalidSteps { steps, max }.into());
        }

        let target = (self.state.marker_index()? + usize::from(steps)) % self.state.islands.len();
        self.state.marker = self.state.islands[target].anchor;

        resolve_conquest(&mut self.state, target)?;
        merge_islands(&mut self.state)?;

        self.transition()?;
        Ok(())
    }

    /// Take every unit on a cloud into the entrance.
    pub fn collect_from_cloud(&mut self, player: PlayerId, cloud: usize) -> Result<(), MatchError> {
        self.expect_stage("collect_from_cloud", Stage::ActionCollectFromSource)?;
        self.state.ensure_current(player)?;

        let source = self
            .state
            .clouds
            .get_mut(cloud)
            .ok_or(IllegalMove::NoSuchSource(cloud))?;
        if source.is_empty() {
            return Err(IllegalMove::SourceEmpty(cloud).into());
        }
        let units = source.take_all();
        self.state.player_mut(player)?.board.entrance.absorb(&units);

        self.transition()?;
        Ok(())
    }

    /// End the current player's turn. Turn-scoped modifiers are cleared.
    pub fn end_turn(&mut self, player: PlayerId) -> Result<(), MatchError> {
        self.expect_stage("end_turn", Stage::ActionEndTurn)?;
        self.state.ensure_current(player)?;

        if let Some(expert) = self.state.expert.as_mut() {
            expert.modifiers = Default::default();
            expert.card_played = false;
        }
        self.state.turn_index += 1;

        self.transition()?;
        Ok(())
    }

    /// Use a special card. Legal in every action stage, once per turn; the
    /// stage does not change unless the match ends.
    pub fn play_character(&mut self, player: PlayerId, kind: CharacterKind, ctx: EffectContext) -> Result<(), MatchError> {
        if !self.state.stage.is_action() {
            return Err(MatchError::WrongStage {
                operation: "play_character",
                stage: self.state.stage,
            });
        }
        self.state.ensure_current(player)?;

        let ctx = EffectContext { player, ..ctx };
        EffectResolver::play(&mut self.state, &mut self.rng, kind, ctx)?;

        self.check_game_over(false);
        Ok(())
    }

    // === Leaving ===

    /// A participant leaves: the match ends without a winner.
    pub fn leave(&mut self, player: PlayerId) -> Result<(), MatchError> {
        if self.state.is_over() {
            return Err(MatchError::WrongStage {
                operation: "leave",
                stage: self.state.stage,
            });
        }
        self.state.player(player)?;

        self.state.result = Some(MatchResult::Abandoned { leaver: player });
        self.state.stage = Stage::GameOver;
        tracing::info!(%player, round = self.state.round, "match abandoned");
        Ok(())
    }

    // === Transitions ===

    fn draw(&mut self) -> Result<Resource, MatchError> {
        self.rng
            .draw_from(&mut self.state.pool)
            .ok_or(MatchError::Invariant("pool exhausted during preparation"))
    }

    /// End the match if an end condition holds. Returns whether it is over.
    fn check_game_over(&mut self, round_boundary: bool) -> bool {
        if self.state.is_over() {
            return true;
        }
        let Some(condition) = end_condition(&self.state, round_boundary) else {
            return false;
        };

        let result = compute_result(&self.state);
        self.state.result = Some(result);
        self.state.stage = Stage::GameOver;
        tracing::info!(?condition, ?result, round = self.state.round, "match over");
        true
    }

    /// Move to the next stage. The game-over check runs first.
    fn transition(&mut self) -> Result<Stage, MatchError> {
        let from = self.state.stage;
        if self.check_game_over(from == Stage::RoundEnd) {
            return Ok(Stage::GameOver);
        }

        let to = next_stage(&self.state);
        if to == Stage::ActionMoveResources && from != Stage::ActionMoveResources {
            if from == Stage::PlanningPhase {
                self.enter_action_phase()?;
            }
            self.state.moves_left = self.state.rules().moves_per_turn;
        }
        self.state.stage = to;

        if from != to {
            tracing::debug!(%from, %to, turn = self.state.turn_index, "stage transition");
        }
        Ok(to)
    }

    /// Reorder the queue by played values.
    fn enter_action_phase(&mut self) -> Result<(), MatchError> {
        let played = self
            .state
            .queue
            .iter()
            .map(|&id| {
                let card = self.state.players.get(id).and_then(|p| p.last_played);
                card.map(|c| (id, c.value))
                    .ok_or(MatchError::Invariant("planning ended with a missing assistant"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.state.queue = action_order(&played)?;
        self.state.turn_index = 0;
        Ok(())
    }
}
