mod common;

use common::{agent_table, human_table};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use stoppa::agents::heuristic::{decide_bet, decide_declaration};
use stoppa::agents::{AgentProfile, Difficulty, Observation, RiskProfile};
use stoppa::config::{GameConfig, SeatConfig};
use stoppa::engine::GameEngine;
use stoppa::game::{Action, ActionKind, Game, GameState, Pending};

#[test]
fn observation_reflects_the_seat_to_act() {
    let mut g = human_table(3);
    g.start_round().unwrap();
    g.set_deal_choice(3).unwrap();
    g.act(2, Action::Raise(4)).unwrap();

    let obs = Observation::capture(&g, 3).unwrap();
    assert_eq!(obs.num_seats, 5);
    assert_eq!(obs.current_bet, 4);
    assert_eq!(obs.to_call(), 4);
    assert_eq!(obs.balance, 19);
    assert_eq!(obs.last_raiser, 2);
    assert_eq!(obs.score, g.score(3).value);
    assert_eq!(obs.cards.len(), 3);
    assert_eq!(obs.legal, vec![ActionKind::Fold, ActionKind::Call, ActionKind::Raise]);

    // only the seat to act has legal actions
    assert!(Observation::capture(&g, 4).unwrap().legal.is_empty());
    g.act(3, Action::Fold).unwrap();
    assert!(Observation::capture(&g, 3).is_none());
    assert!(Observation::capture(&g, 9).is_none());
}

#[test]
fn engine_trait_drives_a_round() {
    fn play(engine: &mut dyn GameEngine) {
        engine.start_round().unwrap();
        engine.set_deal_choice(2).unwrap();
        while engine.state() != GameState::RoundOver {
            let seat = engine.current();
            match engine.state() {
                GameState::Betting => engine.act(seat, Action::Call).unwrap(),
                GameState::Declaring => {
                    let seats: Vec<usize> = engine
                        .players()
                        .iter()
                        .filter(|p| !p.is_folded() && p.declaration().is_none())
                        .map(|p| p.index())
                        .collect();
                    for s in seats {
                        engine.declare(s, 0).unwrap();
                    }
                }
                other => panic!("unexpected state {other:?}"),
            }
        }
    }

    let mut g = human_table(12);
    play(&mut g);
    assert_eq!(g.num_players(), 5);
    assert_eq!(g.total_chips(), 100);
    assert!(g.last_winner().is_some());
}

#[test]
fn mixed_table_waits_only_for_the_human() {
    let mut cfg = GameConfig::with_humans(1).with_seed(21);
    cfg.seats[1] = SeatConfig::agent(AgentProfile::for_difficulty(
        Difficulty::Expert,
        RiskProfile::Aggressive,
    ));
    cfg.seats[2] = SeatConfig::agent(AgentProfile::new(0.0, RiskProfile::Cautious));
    let mut g = Game::new(cfg).unwrap();
    g.start_round().unwrap();

    let mut prompts = 0;
    while g.state() != GameState::RoundOver {
        prompts += 1;
        assert!(prompts < 200, "round did not finish");
        match g.pending() {
            Pending::DealChoice { seat, human } => {
                assert!(human);
                g.set_deal_choice(3).unwrap();
                assert_eq!(seat, 0);
            }
            Pending::Action { seat, human } => {
                assert!(human);
                g.act(seat, Action::Fold).unwrap();
            }
            Pending::Talk { seat, human } => {
                assert!(human);
                g.declare(seat, 0).unwrap();
            }
            Pending::Declarations(seats) => g.declare(seats[0], 0).unwrap(),
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(g.total_chips(), 100);
}

// Every seat still in the hand has matched the table bet or is all in.
fn bets_are_matched(g: &Game) -> bool {
    g.players()
        .iter()
        .filter(|p| !p.is_folded())
        .all(|p| p.bet() == Some(g.current_bet()) || p.fiches() == 0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn closed_cycles_have_matched_bets(seed in any::<u64>(), competence in 0.0f64..=1.0) {
        let mut g = human_table(seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let profile = AgentProfile::new(competence, RiskProfile::Aggressive);
        g.start_round().unwrap();
        g.set_deal_choice(if seed % 2 == 0 { 2 } else { 3 }).unwrap();

        let mut closures = 0;
        let mut steps = 0;
        while g.state() != GameState::RoundOver {
            steps += 1;
            prop_assert!(steps < 500);
            let seat = g.current();
            match g.pending() {
                Pending::Action { .. } => {
                    let obs = Observation::capture(&g, seat).unwrap();
                    let action = decide_bet(&obs, &profile, &mut rng);
                    g.act(seat, action).unwrap();
                }
                Pending::Talk { .. } => {
                    closures += 1;
                    prop_assert!(g.current_bet() > 0);
                    prop_assert!(bets_are_matched(&g));
                    let obs = Observation::capture(&g, seat).unwrap();
                    let value = decide_declaration(&obs, &profile, &mut rng);
                    g.declare(seat, value).unwrap();
                }
                Pending::Declarations(seats) => {
                    closures += 1;
                    prop_assert_eq!(g.current_bet(), 0);
                    prop_assert!(bets_are_matched(&g));
                    for s in seats {
                        g.declare(s, 0).unwrap();
                    }
                }
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }
        // a hand won by folds never reaches either closure branch
        prop_assert!(closures <= 4);
        prop_assert_eq!(g.total_chips(), 100);
    }

    #[test]
    fn agent_decisions_are_always_legal(seed in any::<u64>(), competence in 0.0f64..=1.0) {
        let mut g = agent_table(seed, false);
        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
        let profile = AgentProfile::new(competence, RiskProfile::Aggressive);
        g.start_round().unwrap();
        let mut steps = 0;
        while g.state() != GameState::RoundOver {
            steps += 1;
            prop_assert!(steps < 500);
            let seat = g.current();
            if g.state() == GameState::Betting {
                let obs = Observation::capture(&g, seat).unwrap();
                let action = decide_bet(&obs, &profile, &mut rng);
                prop_assert!(obs.can(action.kind()), "{:?} not in {:?}", action, obs.legal);
            }
            if g.state() == GameState::Talking {
                let obs = Observation::capture(&g, seat).unwrap();
                prop_assert!(decide_declaration(&obs, &profile, &mut rng) >= obs.score);
            }
            prop_assert!(g.advance());
        }
        prop_assert_eq!(g.total_chips(), 100);
    }
}
