mod common;

use common::human_table;
use stoppa::game::{Action, ActionError, Game, GameState, HistoryVerb, Phase};

fn open(seed: u64, choice: u8) -> Game {
    let mut g = human_table(seed);
    g.start_round().unwrap();
    g.set_deal_choice(choice).unwrap();
    g
}

fn check_around(g: &mut Game) {
    for _ in 0..g.players().len() {
        let seat = g.current();
        g.act(seat, Action::Call).unwrap();
    }
}

fn declare_all(g: &mut Game) {
    let seats: Vec<usize> =
        g.players().iter().filter(|p| !p.is_folded()).map(|p| p.index()).collect();
    for seat in seats {
        g.declare(seat, 0).unwrap();
    }
}

#[test]
fn betting_starts_left_of_the_dealer() {
    let g = open(1, 2);
    assert_eq!(g.dealer(), 1);
    assert_eq!(g.current(), 2);
    assert_eq!(g.last_raiser(), 2);
    assert_eq!(g.current_bet(), 0);
    assert_eq!(g.to_call(2), 0);
}

#[test]
fn checked_phases_deal_the_split_and_reach_round_over() {
    let mut g = open(3, 2);
    let expected = [(Phase::First, 2), (Phase::Second, 3), (Phase::Third, 3), (Phase::Final, 0)];
    for (phase, dealt) in expected {
        assert_eq!(g.phase(), phase);
        assert!(g.players().iter().all(|p| p.cards().len() == dealt));
        check_around(&mut g);
        assert_eq!(g.state(), GameState::Declaring);
        declare_all(&mut g);
    }
    assert_eq!(g.state(), GameState::RoundOver);
    assert_eq!(g.total_chips(), 100);
    assert!(g.players().iter().all(|p| p.previous_cards().len() == 8));
}

#[test]
fn raise_round_closes_on_the_last_raiser() {
    let mut g = open(5, 3);
    g.act(2, Action::Call).unwrap();
    g.act(3, Action::Raise(4)).unwrap();
    assert_eq!(g.to_call(4), 4);
    for seat in [4, 0, 1] {
        g.act(seat, Action::Call).unwrap();
    }
    // seat 2 checked before the raise and still owes
    assert_eq!(g.state(), GameState::Betting);
    assert_eq!(g.current(), 2);
    g.act(2, Action::Call).unwrap();
    assert_eq!(g.state(), GameState::Talking);
    assert_eq!(g.current(), 3);
    assert_eq!(g.hand_pot(), 20);
}

#[test]
fn reraise_reopens_the_cycle() {
    let mut g = open(6, 3);
    g.act(2, Action::Raise(2)).unwrap();
    g.act(3, Action::Raise(5)).unwrap();
    for seat in [4, 0, 1] {
        g.act(seat, Action::Call).unwrap();
    }
    assert_eq!(g.current(), 2);
    assert_eq!(g.to_call(2), 3);
    g.act(2, Action::Call).unwrap();
    assert_eq!(g.state(), GameState::Talking);
    assert_eq!(g.current(), 3);
}

#[test]
fn talker_settles_the_hand() {
    let mut g = open(8, 3);
    g.act(2, Action::Raise(1)).unwrap();
    for seat in [3, 4, 0, 1] {
        g.act(seat, Action::Call).unwrap();
    }
    assert_eq!(g.state(), GameState::Talking);
    let pot = g.pot();
    g.declare(2, 55).unwrap();
    // 55 is the highest score there is, so nobody can stop it
    assert_eq!(g.last_winner(), Some(2));
    assert_eq!(g.players()[2].fiches(), 19 - 1 + 5 + 1);
    assert_eq!(g.pot(), pot - 1);
    assert_eq!(g.phase(), Phase::Second);
}

#[test]
fn folded_seats_are_skipped_for_the_rest_of_the_phase() {
    let mut g = open(2, 3);
    g.act(2, Action::Fold).unwrap();
    g.act(3, Action::Fold).unwrap();
    g.act(4, Action::Raise(3)).unwrap();
    g.act(0, Action::Call).unwrap();
    g.act(1, Action::Call).unwrap();
    assert_eq!(g.state(), GameState::Talking);
    assert_eq!(g.current(), 4);
    assert_eq!(g.act(2, Action::Call), Err(ActionError::NotBetting));
    g.declare(4, 0).unwrap();
    // folded players are back in for the next phase
    assert!(g.players().iter().all(|p| !p.is_folded()));
    let folds = g
        .history_recent(g.history_len())
        .iter()
        .filter(|e| e.verb == HistoryVerb::Fold && e.phase == Phase::First)
        .count();
    assert_eq!(folds, 2);
}

#[test]
fn shove_takes_the_first_hand_then_the_round_checks_down() {
    let mut g = human_table(4);
    g.start_round().unwrap();
    g.set_deal_choice(3).unwrap();
    // seat 2 shoves everything, everyone else folds: seat 2 takes 19 + 1
    g.act(2, Action::Raise(19)).unwrap();
    for seat in [3, 4, 0, 1] {
        g.act(seat, Action::Fold).unwrap();
    }
    assert_eq!(g.players()[2].fiches(), 20);
    for _ in 0..3 {
        check_around(&mut g);
        declare_all(&mut g);
    }
    assert_eq!(g.state(), GameState::RoundOver);
    assert_eq!(g.total_chips(), 100);
}
