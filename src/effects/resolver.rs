//! Special-card resolution.
//!
//! Each [`CharacterKind`] maps to one transform function through a strategy
//! table ([`transform`]). Resolution runs in a fixed order:
//!
//! 1. The card must be in play and unused this turn
//! 2. The context is checked against the kind's field manifest
//! 3. The player must afford the current cost
//! 4. The transform runs; it fails before mutating anything
//! 5. The player pays. On the first use one coin stays on the card and
//!    the cost rises by one; every other coin goes back to the stock.

use crate::board::Board;
use crate::cards::CharacterKind;
use crate::core::{GameRng, IllegalMove, MatchError, MatchState, PlayerId, Resource, ResourceCounts};
use crate::rules::{award_coin, merge_islands, resolve_conquest, settle, update_all, update_ownership};

use super::context::EffectContext;
use super::exchange::exchange;

/// Units returned per player by the hall-raid effect.
const RAID_LIMIT: u8 = 3;

/// Extra influence granted for one turn.
const INFLUENCE_BONUS: u8 = 2;

/// Extra marker steps granted for one turn.
const STEP_BONUS: u8 = 2;

/// A special-card transform.
pub type Transform = fn(&mut MatchState, &mut GameRng, &EffectContext) -> Result<(), MatchError>;

/// The strategy table.
#[must_use]
pub fn transform(kind: CharacterKind) -> Transform {
    match kind {
        CharacterKind::Monk => card_to_island,
        CharacterKind::Farmer => favor_mover_on_ties,
        CharacterKind::Herald => conquer_out_of_turn,
        CharacterKind::Postman => extra_steps,
        CharacterKind::Herbalist => place_block,
        CharacterKind::Centaur => ignore_markers,
        CharacterKind::Jester => swap_card_with_entrance,
        CharacterKind::Knight => extra_influence,
        CharacterKind::Mushroom => ignore_resource,
        CharacterKind::Minstrel => swap_entrance_with_hall,
        CharacterKind::Princess => card_to_hall,
        CharacterKind::Thief => raid_halls,
    }
}

/// Plays special cards on a match state.
pub struct EffectResolver;

impl EffectResolver {
    /// Resolve `kind` for `ctx.player` and charge for it.
    ///
    /// The caller checks stage and turn; this checks everything about the
    /// card itself.
    pub fn play(
        state: &mut MatchState,
        rng: &mut GameRng,
        kind: CharacterKind,
        mut ctx: EffectContext,
    ) -> Result<(), MatchError> {
        let expert = state.expert.as_ref().ok_or(IllegalMove::NotExpertMatch)?;
        if expert.card_played {
            return Err(IllegalMove::CharacterAlreadyPlayed.into());
        }
        let index = expert
            .card_index(kind)
            .ok_or(IllegalMove::CharacterNotInPlay(kind))?;
        let cost = expert.cards[index].cost;

        ctx.card = Some(index);
        ctx.validate(kind.spec().fields)?;

        let coins = state.player(ctx.player)?.coins;
        if coins < cost {
            return Err(IllegalMove::InsufficientCoins { cost, coins }.into());
        }

        transform(kind)(state, rng, &ctx)?;
        Self::pay(state, ctx.player, index)?;

        tracing::debug!(player = %ctx.player, ?kind, cost, "special card played");
        Ok(())
    }

    fn pay(state: &mut MatchState, player: PlayerId, index: usize) -> Result<(), MatchError> {
        let expert = state.expert_mut()?;
        let card = expert
            .cards
            .get_mut(index)
            .ok_or(MatchError::Invariant("special card vanished during resolution"))?;
        let cost = card.cost;
        let retained = u8::from(card.mark_used());
        expert.stock += cost - retained;
        expert.card_played = true;

        state.player_mut(player)?.coins -= cost;
        Ok(())
    }
}

// === Reservoir helpers ===

fn reservoir_mut(state: &mut MatchState, card: usize) -> Result<&mut ResourceCounts, MatchError> {
    state
        .expert_mut()?
        .cards
        .get_mut(card)
        .and_then(|c| c.reservoir.as_mut())
        .ok_or(MatchError::Invariant("special card has no reservoir"))
}

/// Draw one unit from the pool back onto a card. An empty pool leaves the
/// card short.
fn refill(state: &mut MatchState, rng: &mut GameRng, card: usize) -> Result<(), MatchError> {
    if let Some(unit) = rng.draw_from(&mut state.pool) {
        reservoir_mut(state, card)?.add(unit, 1);
    }
    Ok(())
}

// === Transforms ===

fn card_to_island(state: &mut MatchState, rng: &mut GameRng, ctx: &EffectContext) -> Result<(), MatchError> {
    let (resource, group, card) = (ctx.resource()?, ctx.group()?, ctx.card()?);
    state.island(group)?;

    reservoir_mut(state, card)?.try_remove(resource)?;
    state.island_mut(group)?.resources.add(resource, 1);
    refill(state, rng, card)
}

fn favor_mover_on_ties(state: &mut MatchState, _: &mut GameRng, ctx: &EffectContext) -> Result<(), MatchError> {
    state.expert_mut()?.modifiers.tie_favors_mover = true;
    update_all(state, ctx.player);
    Ok(())
}

fn conquer_out_of_turn(state: &mut MatchState, _: &mut GameRng, ctx: &EffectContext) -> Result<(), MatchError> {
    let group = ctx.group()?;
    state.island(group)?;

    resolve_conquest(state, group)?;
    merge_islands(state)?;
    Ok(())
}

fn extra_steps(state: &mut MatchState, _: &mut GameRng, _: &EffectContext) -> Result<(), MatchError> {
    state.expert_mut()?.modifiers.bonus_steps += STEP_BONUS;
    Ok(())
}

fn place_block(state: &mut MatchState, _: &mut GameRng, ctx: &EffectContext) -> Result<(), MatchError> {
    let (group, card) = (ctx.group()?, ctx.card()?);
    state.island(group)?;

    let blocks = state
        .expert_mut()?
        .cards
        .get_mut(card)
        .and_then(|c| c.blocks.as_mut())
        .ok_or(MatchError::Invariant("special card has no block tokens"))?;
    if *blocks == 0 {
        return Err(IllegalMove::NoBlockTokens.into());
    }
    *blocks -= 1;
    state.island_mut(group)?.blocks += 1;
    Ok(())
}

fn ignore_markers(state: &mut MatchState, _: &mut GameRng, _: &EffectContext) -> Result<(), MatchError> {
    state.expert_mut()?.modifiers.ignore_markers = true;
    Ok(())
}

fn swap_card_with_entrance(state: &mut MatchState, _: &mut GameRng, ctx: &EffectContext) -> Result<(), MatchError> {
    let (sources, destinations, card) = (ctx.sources()?, ctx.destinations()?, ctx.card()?);
    let entrance_capacity = Board::entrance_capacity(state.rules());
    let limit = CharacterKind::Jester.spec().exchange_limit;

    let player = state
        .players
        .get_mut(ctx.player)
        .ok_or(IllegalMove::UnknownPlayer(ctx.player))?;
    let expert = state.expert.as_mut().ok_or(IllegalMove::NotExpertMatch)?;
    let card = expert
        .cards
        .get_mut(card)
        .ok_or(MatchError::Invariant("special card vanished during resolution"))?;
    let card_capacity = card.reservoir_capacity();
    let reservoir = card
        .reservoir
        .as_mut()
        .ok_or(MatchError::Invariant("special card has no reservoir"))?;

    exchange(
        reservoir,
        card_capacity,
        &mut player.board.entrance,
        entrance_capacity,
        sources,
        destinations,
        limit,
    )?;
    Ok(())
}

fn extra_influence(state: &mut MatchState, _: &mut GameRng, _: &EffectContext) -> Result<(), MatchError> {
    state.expert_mut()?.modifiers.bonus_influence += INFLUENCE_BONUS;
    Ok(())
}

fn ignore_resource(state: &mut MatchState, _: &mut GameRng, ctx: &EffectContext) -> Result<(), MatchError> {
    let resource = ctx.resource()?;
    state.expert_mut()?.modifiers.ignored_resource = Some(resource);
    Ok(())
}

fn swap_entrance_with_hall(state: &mut MatchState, _: &mut GameRng, ctx: &EffectContext) -> Result<(), MatchError> {
    let (sources, destinations) = (ctx.sources()?, ctx.destinations()?);
    let entrance_capacity = Board::entrance_capacity(state.rules());
    let hall_capacity = Board::hall_capacity(state.rules());
    let limit = CharacterKind::Minstrel.spec().exchange_limit;

    let board = &mut state.player_mut(ctx.player)?.board;
    let before = board.hall;
    exchange(
        &mut board.entrance,
        entrance_capacity,
        &mut board.hall,
        hall_capacity,
        sources,
        destinations,
        limit,
    )?;
    let after = board.hall;

    // Coins for every 3rd/6th/9th slot reached by the units moved in.
    for resource in Resource::ALL {
        let outgoing = destinations.iter().filter(|&&r| r == resource).count() as u8;
        let low = before.get(resource) - outgoing;
        let coins = after.get(resource) / 3 - low / 3;
        for _ in 0..coins {
            award_coin(state, ctx.player)?;
        }
    }
    for resource in Resource::ALL {
        if before.get(resource) != after.get(resource) {
            update_ownership(state, resource, ctx.player);
        }
    }
    Ok(())
}

fn card_to_hall(state: &mut MatchState, rng: &mut GameRng, ctx: &EffectContext) -> Result<(), MatchError> {
    let (resource, card) = (ctx.resource()?, ctx.card()?);
    if reservoir_mut(state, card)?.get(resource) == 0 {
        return Err(IllegalMove::ResourceMissing(resource).into());
    }

    settle(state, ctx.player, resource)?;
    reservoir_mut(state, card)?.try_remove(resource)?;
    refill(state, rng, card)
}

fn raid_halls(state: &mut MatchState, _: &mut GameRng, ctx: &EffectContext) -> Result<(), MatchError> {
    let resource = ctx.resource()?;

    let mut returned = 0;
    for (_, player) in state.players.iter_mut() {
        returned += player.board.hall.remove_up_to(resource, RAID_LIMIT);
    }
    state.pool.add(resource, returned);
    update_ownership(state, resource, ctx.player);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::SpecialCard;
    use crate::core::{Faction, MatchConfig, Player, Wizard};
    use smallvec::smallvec;

    fn expert_state(kinds: &[CharacterKind]) -> MatchState {
        let mut state = MatchState::new(MatchConfig::new(2).expert());
        for (i, (faction, wizard)) in [(Faction::Black, Wizard::Druid), (Faction::White, Wizard::Sage)]
            .into_iter()
            .enumerate()
        {
            let mut player = Player::new(PlayerId::new(i as u8), "p", faction, wizard);
            player.leader = true;
            player.board.towers = 8;
            player.coins = 5;
            state.players.push(player);
        }
        state.queue = vec![PlayerId::new(0), PlayerId::new(1)];
        let expert = state.expert.as_mut().unwrap();
        expert.stock = 10;
        for &kind in kinds {
            expert.cards.push(SpecialCard::new(kind));
        }
        state
    }

    fn ctx() -> EffectContext {
        EffectContext::new(PlayerId::new(0))
    }

    #[test]
    fn test_first_use_pays_and_raises_cost() {
        let mut state = expert_state(&[CharacterKind::Knight]);
        let mut rng = GameRng::new(1);

        EffectResolver::play(&mut state, &mut rng, CharacterKind::Knight, ctx()).unwrap();

        let expert = state.expert.as_ref().unwrap();
        assert_eq!(expert.cards[0].cost, 3);
        assert_eq!(expert.stock, 11);
        assert!(expert.card_played);
        assert_eq!(expert.modifiers.bonus_influence, 2);
        assert_eq!(state.players[PlayerId::new(0)].coins, 3);
    }

    #[test]
    fn test_second_use_returns_full_cost() {
        let mut state = expert_state(&[CharacterKind::Postman]);
        state.expert.as_mut().unwrap().cards[0].mark_used();
        let mut rng = GameRng::new(1);

        EffectResolver::play(&mut state, &mut rng, CharacterKind::Postman, ctx()).unwrap();

        assert_eq!(state.expert.as_ref().unwrap().stock, 12);
        assert_eq!(state.players[PlayerId::new(0)].coins, 3);
    }

    #[test]
    fn test_one_card_per_turn() {
        let mut state = expert_state(&[CharacterKind::Postman, CharacterKind::Centaur]);
        let mut rng = GameRng::new(1);

        EffectResolver::play(&mut state, &mut rng, CharacterKind::Postman, ctx()).unwrap();
        let result = EffectResolver::play(&mut state, &mut rng, CharacterKind::Centaur, ctx());

        assert_eq!(result, Err(MatchError::Illegal(IllegalMove::CharacterAlreadyPlayed)));
    }

    #[test]
    fn test_rejections_leave_state_untouched() {
        let mut state = expert_state(&[CharacterKind::Mushroom, CharacterKind::Thief]);
        state.players[PlayerId::new(0)].coins = 2;
        let before = state.clone();
        let mut rng = GameRng::new(1);

        assert_eq!(
            EffectResolver::play(&mut state, &mut rng, CharacterKind::Knight, ctx()),
            Err(MatchError::Illegal(IllegalMove::CharacterNotInPlay(CharacterKind::Knight)))
        );
        assert!(matches!(
            EffectResolver::play(&mut state, &mut rng, CharacterKind::Mushroom, ctx()),
            Err(MatchError::Illegal(IllegalMove::MissingField(_)))
        ));
        let thief = EffectContext { resource: Some(Resource::Red), ..ctx() };
        assert_eq!(
            EffectResolver::play(&mut state, &mut rng, CharacterKind::Thief, thief),
            Err(MatchError::Illegal(IllegalMove::InsufficientCoins { cost: 3, coins: 2 }))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_standard_match_has_no_cards() {
        let mut state = MatchState::new(MatchConfig::new(2));
        let mut rng = GameRng::new(1);

        assert_eq!(
            EffectResolver::play(&mut state, &mut rng, CharacterKind::Farmer, ctx()),
            Err(MatchError::Illegal(IllegalMove::NotExpertMatch))
        );
    }

    #[test]
    fn test_card_to_island_refills() {
        let mut state = expert_state(&[CharacterKind::Monk]);
        state.expert.as_mut().unwrap().cards[0].reservoir = Some([Resource::Pink; 4].into_iter().collect());
        state.pool.add(Resource::Green, 1);
        let mut rng = GameRng::new(1);

        let monk = EffectContext {
            resource: Some(Resource::Pink),
            group: Some(5),
            ..ctx()
        };
        EffectResolver::play(&mut state, &mut rng, CharacterKind::Monk, monk).unwrap();

        assert_eq!(state.islands[5].resources[Resource::Pink], 1);
        let reservoir = state.expert.as_ref().unwrap().cards[0].reservoir.unwrap();
        assert_eq!(reservoir[Resource::Pink], 3);
        assert_eq!(reservoir[Resource::Green], 1);
        assert!(state.pool.is_empty());
    }

    #[test]
    fn test_card_to_island_bad_group() {
        let mut state = expert_state(&[CharacterKind::Monk]);
        state.expert.as_mut().unwrap().cards[0].reservoir = Some([Resource::Pink; 4].into_iter().collect());
        let before = state.clone();
        let mut rng = GameRng::new(1);

        let monk = EffectContext {
            resource: Some(Resource::Pink),
            group: Some(40),
            ..ctx()
        };
        let result = EffectResolver::play(&mut state, &mut rng, CharacterKind::Monk, monk);

        assert_eq!(result, Err(MatchError::Illegal(IllegalMove::NoSuchGroup(40))));
        assert_eq!(state, before);
    }

    #[test]
    fn test_place_block_runs_out() {
        let mut state = expert_state(&[CharacterKind::Herbalist]);
        state.expert.as_mut().unwrap().cards[0].blocks = Some(1);
        let mut rng = GameRng::new(1);
        let herbalist = EffectContext { group: Some(2), ..ctx() };

        EffectResolver::play(&mut state, &mut rng, CharacterKind::Herbalist, herbalist.clone()).unwrap();
        assert_eq!(state.islands[2].blocks, 1);
        assert_eq!(state.blocked_groups(), vec![2]);

        state.expert.as_mut().unwrap().card_played = false;
        assert_eq!(
            EffectResolver::play(&mut state, &mut rng, CharacterKind::Herbalist, herbalist),
            Err(MatchError::Illegal(IllegalMove::NoBlockTokens))
        );
    }

    #[test]
    fn test_conquer_out_of_turn_merges() {
        let mut state = expert_state(&[CharacterKind::Herald]);
        state.ownership[Resource::Red.index()] = Some(PlayerId::new(1));
        state.islands[3].faction = Some(Faction::White);
        state.islands[3].towers = 1;
        state.islands[4].resources.add(Resource::Red, 1);
        let mut rng = GameRng::new(1);

        let herald = EffectContext { group: Some(4), ..ctx() };
        EffectResolver::play(&mut state, &mut rng, CharacterKind::Herald, herald).unwrap();

        assert_eq!(state.islands.len(), 11);
        assert_eq!(state.islands[3].size, 2);
        assert_eq!(state.islands[3].faction, Some(Faction::White));
        assert_eq!(state.total_group_size(), 12);
    }

    #[test]
    fn test_swap_card_with_entrance() {
        let mut state = expert_state(&[CharacterKind::Jester]);
        state.expert.as_mut().unwrap().cards[0].reservoir = Some([Resource::Blue; 6].into_iter().collect());
        state.players[PlayerId::new(0)].board.entrance = [Resource::Red; 7].into_iter().collect();
        let mut rng = GameRng::new(1);

        let jester = EffectContext {
            sources: Some(smallvec![Resource::Blue, Resource::Blue]),
            destinations: Some(smallvec![Resource::Red, Resource::Red]),
            ..ctx()
        };
        EffectResolver::play(&mut state, &mut rng, CharacterKind::Jester, jester).unwrap();

        let entrance = state.players[PlayerId::new(0)].board.entrance;
        assert_eq!((entrance[Resource::Red], entrance[Resource::Blue]), (5, 2));
        let reservoir = state.expert.as_ref().unwrap().cards[0].reservoir.unwrap();
        assert_eq!((reservoir[Resource::Red], reservoir[Resource::Blue]), (2, 4));
    }

    #[test]
    fn test_swap_over_limit_is_rejected() {
        let mut state = expert_state(&[CharacterKind::Minstrel]);
        state.players[PlayerId::new(0)].board.entrance = [Resource::Red; 7].into_iter().collect();
        state.players[PlayerId::new(0)].board.hall = [Resource::Green; 3].into_iter().collect();
        let before = state.clone();
        let mut rng = GameRng::new(1);

        let minstrel = EffectContext {
            sources: Some(smallvec![Resource::Red; 3]),
            destinations: Some(smallvec![Resource::Green; 3]),
            ..ctx()
        };
        let result = EffectResolver::play(&mut state, &mut rng, CharacterKind::Minstrel, minstrel);

        assert_eq!(
            result,
            Err(MatchError::Illegal(IllegalMove::ExchangeTooLarge { requested: 3, max: 2 }))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_swap_entrance_with_hall_pays_coins() {
        let mut state = expert_state(&[CharacterKind::Minstrel]);
        let board = &mut state.players[PlayerId::new(0)].board;
        board.entrance = [Resource::Red, Resource::Red].into_iter().collect();
        board.hall = [Resource::Red, Resource::Green].into_iter().collect();
        let mut rng = GameRng::new(1);

        let minstrel = EffectContext {
            sources: Some(smallvec![Resource::Red, Resource::Red]),
            destinations: Some(smallvec![Resource::Red, Resource::Green]),
            ..ctx()
        };
        EffectResolver::play(&mut state, &mut rng, CharacterKind::Minstrel, minstrel).unwrap();

        let board = &state.players[PlayerId::new(0)].board;
        assert_eq!(board.hall[Resource::Red], 2);
        assert_eq!(board.hall[Resource::Green], 0);
        assert_eq!(board.entrance[Resource::Green], 1);
        // hall red went 1 -> 0 -> 2: no threshold crossed; card costs 1
        assert_eq!(state.players[PlayerId::new(0)].coins, 4);
        assert_eq!(state.ownership[Resource::Red.index()], Some(PlayerId::new(0)));
    }

    #[test]
    fn test_card_to_hall_settles() {
        let mut state = expert_state(&[CharacterKind::Princess]);
        state.expert.as_mut().unwrap().cards[0].reservoir = Some([Resource::Yellow; 4].into_iter().collect());
        state.players[PlayerId::new(0)].board.hall = [Resource::Yellow; 2].into_iter().collect();
        let mut rng = GameRng::new(1);

        let princess = EffectContext { resource: Some(Resource::Yellow), ..ctx() };
        EffectResolver::play(&mut state, &mut rng, CharacterKind::Princess, princess).unwrap();

        assert_eq!(state.players[PlayerId::new(0)].board.hall[Resource::Yellow], 3);
        // +1 coin for the 3rd slot, -2 for the card
        assert_eq!(state.players[PlayerId::new(0)].coins, 4);
        assert_eq!(state.ownership[Resource::Yellow.index()], Some(PlayerId::new(0)));
    }

    #[test]
    fn test_raid_halls() {
        let mut state = expert_state(&[CharacterKind::Thief]);
        state.players[PlayerId::new(0)].board.hall = [Resource::Blue; 2].into_iter().collect();
        state.players[PlayerId::new(1)].board.hall = [Resource::Blue; 5].into_iter().collect();
        state.ownership[Resource::Blue.index()] = Some(PlayerId::new(1));
        let mut rng = GameRng::new(1);

        let thief = EffectContext { resource: Some(Resource::Blue), ..ctx() };
        EffectResolver::play(&mut state, &mut rng, CharacterKind::Thief, thief).unwrap();

        assert_eq!(state.players[PlayerId::new(0)].board.hall[Resource::Blue], 0);
        assert_eq!(state.players[PlayerId::new(1)].board.hall[Resource::Blue], 2);
        assert_eq!(state.pool[Resource::Blue], 5);
        assert_eq!(state.ownership[Resource::Blue.index()], Some(PlayerId::new(1)));
    }

    #[test]
    fn test_ties_favor_mover() {
        let mut state = expert_state(&[CharacterKind::Farmer]);
        state.players[PlayerId::new(0)].board.hall = [Resource::Green; 2].into_iter().collect();
        state.players[PlayerId::new(1)].board.hall = [Resource::Green; 2].into_iter().collect();
        state.ownership[Resource::Green.index()] = Some(PlayerId::new(1));
        let mut rng = GameRng::new(1);

        EffectResolver::play(&mut state, &mut rng, CharacterKind::Farmer, ctx()).unwrap();

        assert_eq!(state.ownership[Resource::Green.index()], Some(PlayerId::new(0)));
        assert_eq!(state.ownership[Resource::Red.index()], None);
    }
}
