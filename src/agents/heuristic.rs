use super::{AgentProfile, Observation, RiskBiases};
use crate::game::{Action, ActionKind, Phase, RAISE_CAP};
use crate::scoring::{longest_suit, MAX_SCORE};
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq)]
struct BetDecision {
    action: Action,
    reason: &'static str,
}

impl BetDecision {
    fn new(action: Action, reason: &'static str) -> Self {
        Self { action, reason }
    }
}

/// Choose a betting action for the observed seat.
///
/// With probability `1 - competence` the agent picks uniformly among the
/// legal actions; otherwise it weighs hand strength against pot odds.
pub fn decide_bet<R: Rng + ?Sized>(
    obs: &Observation,
    profile: &AgentProfile,
    rng: &mut R,
) -> Action {
    let decision = if rng.random::<f64>() < 1.0 - profile.competence {
        random_legal(obs, rng)
    } else {
        reasoned(obs, &profile.biases(), rng)
    };
    let action = legalize(obs, decision.action);
    trace!(seat = obs.seat, ?action, reason = decision.reason, "agent bet decision");
    action
}

/// Choose the score an agent announces when it must talk or declare.
/// Never below the true score.
pub fn decide_declaration<R: Rng + ?Sized>(
    obs: &Observation,
    profile: &AgentProfile,
    rng: &mut R,
) -> u32 {
    if rng.random::<f64>() < profile.biases().bluff_probability {
        let bump = rng.random_range(profile.risk.bluff_increment());
        trace!(seat = obs.seat, score = obs.score, bump, "agent bluffs declaration");
        obs.score + bump
    } else {
        obs.score
    }
}

/// Dealer's split of the opening deal: 2 or 3 cards, evenly.
pub fn choose_deal_split<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    if rng.random_bool(0.5) {
        2
    } else {
        3
    }
}

/// Strength in [0, 1] from the true score, suit length and phase.
pub fn hand_strength(obs: &Observation) -> f64 {
    let mut strength = (f64::from(obs.score) / f64::from(MAX_SCORE)).min(1.0);
    if longest_suit(&obs.cards) >= 3 {
        strength += 0.1;
    }
    match obs.phase {
        Phase::First => strength *= 0.9,
        Phase::Final => strength *= 1.1,
        Phase::Second | Phase::Third => {}
    }
    strength.min(1.0)
}

/// Share of the resulting pot the call costs; 1.0 when there is nothing to call.
pub fn pot_odds(obs: &Observation) -> f64 {
    let to_call = obs.to_call();
    if to_call == 0 {
        return 1.0;
    }
    f64::from(to_call) / f64::from(obs.pot + obs.hand_pot + to_call)
}

fn expected_value(obs: &Observation, strength: f64, biases: &RiskBiases) -> f64 {
    let mut ev = strength - pot_odds(obs) + biases.fold_bias * -0.1 + biases.raise_bias * 0.1;
    if acting_into_aggression(obs) {
        ev -= 0.05;
    }
    ev
}

/// Seat sits one or two places after the last raiser.
fn acting_into_aggression(obs: &Observation) -> bool {
    let n = obs.num_seats.max(1);
    let dist = (obs.seat + n - obs.last_raiser % n) % n;
    (1..=2).contains(&dist)
}

fn random_legal<R: Rng + ?Sized>(obs: &Observation, rng: &mut R) -> BetDecision {
    let action = match obs.legal.choose(rng) {
        Some(ActionKind::Raise) => Action::Raise(obs.current_bet + 1),
        Some(ActionKind::Call) => Action::Call,
        Some(ActionKind::Fold) | None => Action::Fold,
    };
    BetDecision::new(action, "mistake")
}

fn reasoned<R: Rng + ?Sized>(obs: &Observation, biases: &RiskBiases, rng: &mut R) -> BetDecision {
    let strength = hand_strength(obs);
    let ev = expected_value(obs, strength, biases);
    trace!(seat = obs.seat, strength, pot_odds = pot_odds(obs), ev, "agent evaluation");

    if obs.current_bet == 0 {
        if strength > 0.4 + biases.raise_bias * 0.2 {
            return BetDecision::new(Action::Raise(raise_target(obs, biases, rng)), "open");
        }
        if rng.random::<f64>() < biases.bluff_probability {
            return BetDecision::new(Action::Raise(obs.current_bet + 1), "bluff_open");
        }
        return BetDecision::new(Action::Fold, "fold");
    }

    if ev > 0.2 {
        if strength > 0.6 && rng.random::<f64>() < biases.aggressiveness {
            return BetDecision::new(Action::Raise(raise_target(obs, biases, rng)), "value_raise");
        }
        return BetDecision::new(Action::Call, "call");
    }
    if ev > -0.1 && (obs.to_call() <= 2 || strength > 0.35) {
        return BetDecision::new(Action::Call, "cheap_call");
    }
    bluff_or_fold(obs, biases, rng)
}

fn bluff_or_fold<R: Rng + ?Sized>(
    obs: &Observation,
    biases: &RiskBiases,
    rng: &mut R,
) -> BetDecision {
    if rng.random::<f64>() < biases.bluff_probability * 0.5 {
        return BetDecision::new(Action::Raise(obs.current_bet + 1), "bluff_raise");
    }
    if obs.to_call() == 0 {
        return BetDecision::new(Action::Call, "check");
    }
    BetDecision::new(Action::Fold, "fold")
}

/// Raise target drawn from `[current_bet + 1, min(20, balance + own_bet)]`,
/// leaning toward the profile's aggressiveness share of that range.
pub fn raise_target<R: Rng + ?Sized>(obs: &Observation, biases: &RiskBiases, rng: &mut R) -> u32 {
    let low = obs.current_bet + 1;
    let high = RAISE_CAP.min(obs.balance + obs.own_bet);
    if high <= low {
        return low;
    }
    let span = high - low;
    let draw = rng.random_range(0.5..=1.0);
    let offset = (f64::from(span) * biases.aggressiveness * draw).round() as u32;
    low + offset.min(span)
}

// A raise the seat may not make degrades to a call.
fn legalize(obs: &Observation, action: Action) -> Action {
    match action {
        Action::Raise(_) if !obs.can(ActionKind::Raise) => Action::Call,
        other => other,
    }
}
