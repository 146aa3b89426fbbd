//! Whole-match flow tests.
//!
//! A simple bot drives matches from the first join to game over through the
//! executor, checking board invariants after every command.

use isle_engine::core::{MatchState, PlayerId, Resource};
use isle_engine::rules::played_this_round;
use isle_engine::{Command, Executor, Faction, MatchConfig, MatchResult, Outcome, Stage, Wizard};

const SEATS: [(&str, Faction, Wizard); 4] = [
    ("ada", Faction::Black, Wizard::Druid),
    ("bo", Faction::White, Wizard::King),
    ("cy", Faction::Grey, Wizard::Witch),
    ("di", Faction::White, Wizard::Sage),
];

fn seats(player_count: usize) -> Vec<(&'static str, Faction, Wizard)> {
    match player_count {
        4 => vec![SEATS[0], SEATS[1], (SEATS[2].0, Faction::Black, SEATS[2].2), SEATS[3]],
        n => SEATS[..n].to_vec(),
    }
}

fn start(config: MatchConfig) -> Executor {
    let player_count = config.player_count;
    let mut executor = Executor::new(config);
    for (nickname, faction, wizard) in seats(player_count) {
        let outcome = executor.execute(
            None,
            Command::AddPlayer {
                nickname: nickname.to_string(),
                faction,
                wizard,
            },
        );
        assert_eq!(outcome.rejection(), None);
    }
    executor
}

/// A legal command for whoever has to act.
fn next_command(state: &MatchState) -> (PlayerId, Command) {
    let player = state.current_player().unwrap();
    let me = &state.players[player];

    let command = match state.stage {
        Stage::PlanningPhase => {
            let played = played_this_round(state);
            let value = me
                .hand
                .iter()
                .map(|a| a.value)
                .find(|v| !played.contains(v))
                .unwrap_or(me.hand[0].value);
            Command::PlayAssistant { value }
        }
        Stage::ActionMoveResources => {
            let (resource, _) = me.board.entrance.iter().find(|&(_, n)| n > 0).unwrap();
            if me.board.hall[resource] < state.rules().hall_capacity && state.round % 2 == 0 {
                Command::MoveToHall { resource }
            } else {
                Command::MoveToIsland {
                    resource,
                    group: state.marker_index().unwrap(),
                }
            }
        }
        Stage::ActionAdvanceMarker => Command::MoveMarker { steps: 1 },
        Stage::ActionCollectFromSource => {
            let cloud = state.clouds.iter().position(|c| !c.is_empty()).unwrap();
            Command::CollectFromCloud { cloud }
        }
        Stage::ActionEndTurn => Command::EndTurn,
        stage => panic!("no player acts during {stage}"),
    };
    (player, command)
}

/// Every unit in the match, wherever it is.
fn unit_total(state: &MatchState) -> u32 {
    let islands: u32 = state.islands.iter().map(|i| i.resources.total()).sum();
    let boards: u32 = state
        .players
        .iter()
        .map(|(_, p)| p.board.entrance.total() + p.board.hall.total())
        .sum();
    let clouds: u32 = state.clouds.iter().map(|c| c.total()).sum();
    let cards: u32 = state
        .expert
        .iter()
        .flat_map(|e| e.cards.iter())
        .filter_map(|c| c.reservoir)
        .map(|r| r.total())
        .sum();
    state.pool.total() + islands + boards + clouds + cards
}

fn check_invariants(state: &MatchState) {
    assert_eq!(state.total_group_size(), 12);
    assert_eq!(unit_total(state), 10 + 24 * Resource::COUNT as u32);

    for faction in state.factions() {
        let leader = state.leader(faction).unwrap();
        let reserve = u32::from(state.players[leader].board.towers);
        assert_eq!(reserve + state.towers_placed(faction), u32::from(state.rules().towers));
    }

    let anchors: Vec<u8> = state.islands.iter().map(|i| i.anchor).collect();
    let mut sorted = anchors.clone();
    sorted.sort_unstable();
    assert_eq!(anchors, sorted);
    assert!(state.islands.iter().any(|i| i.anchor == state.marker));
}

fn play_out(executor: &mut Executor) -> usize {
    let mut commands = 0;
    while !executor.state().is_over() {
        let (player, command) = next_command(executor.state());
        let outcome = executor.execute(Some(player), command.clone());
        assert_eq!(outcome.rejection(), None, "{command:?} was rejected");
        check_invariants(outcome.state());

        commands += 1;
        assert!(commands < 2_000, "match did not finish");
    }
    commands
}

// =============================================================================
// Full matches
// =============================================================================

/// Two-player standard match runs to a recorded result.
#[test]
fn test_two_player_match_completes() {
    let mut executor = start(MatchConfig::new(2).with_seed(42));
    check_invariants(executor.state());

    play_out(&mut executor);

    let state = executor.state();
    assert_eq!(state.stage, Stage::GameOver);
    assert!(matches!(state.result, Some(MatchResult::Winner(_) | MatchResult::Draw)));
    assert!(state.round <= 10);
}

/// Three-player match uses the larger entrance and clouds.
#[test]
fn test_three_player_match_completes() {
    let mut executor = start(MatchConfig::new(3).with_seed(7));
    let state = executor.state();
    assert!(state.players.iter().all(|(_, p)| p.board.entrance.total() == 9));
    assert!(state.clouds.iter().all(|c| c.total() == 4));
    assert_eq!(state.moves_left, 0);

    play_out(&mut executor);
    assert!(executor.state().result.is_some());
}

/// Four-player match: two factions, towers held by the leaders.
#[test]
fn test_four_player_team_match_completes() {
    let mut executor = start(MatchConfig::new(4).with_seed(3));
    assert_eq!(executor.state().factions().len(), 2);

    play_out(&mut executor);

    let state = executor.state();
    assert!(state.result.is_some());
    let followers = state.players.iter().filter(|(_, p)| !p.leader).count();
    assert_eq!(followers, 2);
}

/// The same seed and the same commands replay to the same match.
#[test]
fn test_replay_is_deterministic() {
    let mut first = start(MatchConfig::new(2).with_seed(99));
    let mut second = start(MatchConfig::new(2).with_seed(99));

    let played = play_out(&mut first);
    assert_eq!(play_out(&mut second), played);
    assert_eq!(first.state(), second.state());
}

/// Different seeds lay out the board differently.
#[test]
fn test_seeds_change_setup() {
    let layouts: Vec<_> = (0..8)
        .map(|seed| {
            let executor = start(MatchConfig::new(2).with_seed(seed));
            let state = executor.state();
            (state.marker, state.islands.iter().map(|i| i.resources).collect::<Vec<_>>())
        })
        .collect();

    assert!(layouts.iter().any(|l| *l != layouts[0]));
}

// =============================================================================
// Turn structure
// =============================================================================

/// Planning runs once per player, then action order follows the values.
#[test]
fn test_action_order_follows_values() {
    let mut executor = start(MatchConfig::new(3).with_seed(5));
    let planning = executor.state().queue.clone();

    for (player, value) in planning.iter().zip([9, 2, 5]) {
        let outcome = executor.execute(Some(*player), Command::PlayAssistant { value });
        assert_eq!(outcome.rejection(), None);
    }

    let state = executor.state();
    assert_eq!(state.stage, Stage::ActionMoveResources);
    assert_eq!(state.queue, vec![planning[1], planning[2], planning[0]]);
    assert_eq!(state.moves_left, 4);
}

/// The next round's planning starts with the first player to act.
#[test]
fn test_next_planning_starts_with_first_actor() {
    let mut executor = start(MatchConfig::new(2).with_seed(12));

    let mut first_actor = None;
    while executor.state().round == 1 {
        let state = executor.state();
        if state.stage == Stage::ActionMoveResources && first_actor.is_none() {
            first_actor = state.current_player();
        }
        let (player, command) = next_command(state);
        executor.execute(Some(player), command);
    }

    assert_eq!(executor.state().stage, Stage::PlanningPhase);
    assert_eq!(executor.state().current_player(), first_actor);
}

/// Out-of-turn commands are refused with the actor named.
#[test]
fn test_out_of_turn_is_rejected() {
    let mut executor = start(MatchConfig::new(2).with_seed(1));
    let waiting = executor.state().queue[1];

    let outcome = executor.execute(Some(waiting), Command::PlayAssistant { value: 4 });

    let rejection = outcome.rejection().unwrap();
    assert_eq!(rejection.player, Some(waiting));
    assert_eq!(rejection.reason, isle_engine::IllegalMove::NotYourTurn);
    assert!(matches!(outcome, Outcome::MoveApplied { .. }));
}
