//! Agents: heuristic opponents that fill the non-human seats.
//!
//! An agent is described by an [`AgentProfile`]: a competence level (the
//! probability it reasons instead of acting at random) and a [`RiskProfile`]
//! selecting its bias tuple. Decisions are pure functions of an
//! [`Observation`] plus an injected RNG; see [`heuristic`].

use crate::cards::Card;
use crate::engine::GameEngine;
use crate::game::{ActionKind, Phase};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub mod heuristic;

/// Skill tiers mapped to a competence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const fn competence(self) -> f64 {
        match self {
            Difficulty::Easy => 0.55,
            Difficulty::Medium => 0.75,
            Difficulty::Hard => 0.88,
            Difficulty::Expert => 0.97,
        }
    }
}

/// Temperament of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum RiskProfile {
    Cautious,
    #[default]
    Balanced,
    Aggressive,
}

/// The bias tuple a risk profile selects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskBiases {
    pub fold_bias: f64,
    pub raise_bias: f64,
    pub bluff_probability: f64,
    /// Fraction of the legal raise range an agent leans toward.
    pub aggressiveness: f64,
}

impl RiskProfile {
    pub const fn biases(self) -> RiskBiases {
        let (fold_bias, raise_bias, bluff_probability, aggressiveness) = match self {
            RiskProfile::Cautious => (0.7, 0.2, 0.05, 0.25),
            RiskProfile::Balanced => (0.4, 0.45, 0.12, 0.5),
            RiskProfile::Aggressive => (0.15, 0.75, 0.25, 0.8),
        };
        RiskBiases { fold_bias, raise_bias, bluff_probability, aggressiveness }
    }

    /// How far above its true score a bluffing declaration may go.
    pub fn bluff_increment(self) -> RangeInclusive<u32> {
        match self {
            RiskProfile::Cautious => 1..=4,
            RiskProfile::Balanced => 2..=8,
            RiskProfile::Aggressive => 3..=12,
        }
    }
}

/// Configuration for one agent seat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct AgentProfile {
    /// Probability in [0, 1] of reasoning rather than picking a random legal action.
    pub competence: f64,
    pub risk: RiskProfile,
}

impl AgentProfile {
    pub fn new(competence: f64, risk: RiskProfile) -> Self {
        Self { competence: competence.clamp(0.0, 1.0), risk }
    }

    pub fn for_difficulty(difficulty: Difficulty, risk: RiskProfile) -> Self {
        Self::new(difficulty.competence(), risk)
    }

    pub fn biases(&self) -> RiskBiases {
        self.risk.biases()
    }
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Medium, RiskProfile::Balanced)
    }
}

/// Everything an agent may look at when it is asked to move. Captured by
/// value so the decision functions never hold a borrow of the game.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub seat: usize,
    pub num_seats: usize,
    pub phase: Phase,
    pub pot: u32,
    pub hand_pot: u32,
    pub current_bet: u32,
    pub own_bet: u32,
    pub balance: u32,
    pub last_raiser: usize,
    /// True score of the seat for the current phase.
    pub score: u32,
    /// The cards that scoring considers this phase.
    pub cards: Vec<Card>,
    pub legal: Vec<ActionKind>,
}

impl Observation {
    /// Snapshot the state visible to `seat`. `None` when the seat does not
    /// exist or has folded.
    pub fn capture(engine: &dyn GameEngine, seat: usize) -> Option<Self> {
        let player = engine.players().get(seat)?;
        let own_bet = player.bet()?;
        let phase = engine.phase();
        Some(Self {
            seat,
            num_seats: engine.players().len(),
            phase,
            pot: engine.pot(),
            hand_pot: engine.hand_pot(),
            current_bet: engine.current_bet(),
            own_bet,
            balance: player.fiches(),
            last_raiser: engine.last_raiser(),
            score: engine.score(seat).value,
            cards: crate::scoring::scoring_pool(player.cards(), player.previous_cards(), phase),
            legal: engine.legal_actions(seat),
        })
    }

    /// Chips still owed to match the table bet.
    pub fn to_call(&self) -> u32 {
        self.current_bet.saturating_sub(self.own_bet)
    }

    pub fn can(&self, kind: ActionKind) -> bool {
        self.legal.contains(&kind)
    }
}
