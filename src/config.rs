//! Table configuration: who sits where, starting chips, RNG seed.
//!
//! ```
//! use stoppa::config::{Controller, GameConfig};
//!
//! let cfg = GameConfig::from_json(r#"{
//!     "seed": 7,
//!     "seats": [
//!         {"controller": {"kind": "human"}, "name": "Ada"},
//!         {"controller": {"kind": "agent", "risk": "aggressive"}},
//!         {"controller": {"kind": "agent", "competence": 0.9}},
//!         {},
//!         {}
//!     ]
//! }"#).unwrap();
//! assert_eq!(cfg.seats.len(), 5);
//! assert!(matches!(cfg.seats[0].controller, Controller::Human));
//! assert_eq!(cfg.starting_fiches, 20);
//! ```

use crate::agents::AgentProfile;
use crate::game::{NUM_SEATS, STARTING_FICHES};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("a table seats exactly {expected} players, got {got}")]
    SeatCount { expected: usize, got: usize },
    #[error("seat {seat}: competence must lie in [0, 1], got {value}")]
    Competence { seat: usize, value: f64 },
    #[error("starting fiches must be positive")]
    NoFiches,
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Who makes the decisions for a seat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Controller {
    Human,
    Agent(AgentProfile),
}

impl Controller {
    pub fn is_human(&self) -> bool {
        matches!(self, Controller::Human)
    }
}

impl Default for Controller {
    fn default() -> Self {
        Controller::Agent(AgentProfile::default())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeatConfig {
    pub name: Option<String>,
    pub controller: Controller,
}

impl SeatConfig {
    pub fn human() -> Self {
        Self { name: None, controller: Controller::Human }
    }

    pub fn agent(profile: AgentProfile) -> Self {
        Self { name: None, controller: Controller::Agent(profile) }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name for seat `index`: the configured one, else "Player N" / "Agent N".
    pub fn display_name(&self, index: usize) -> String {
        match (&self.name, self.controller) {
            (Some(name), _) => name.clone(),
            (None, Controller::Human) => format!("Player {}", index + 1),
            (None, Controller::Agent(_)) => format!("Agent {}", index + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seats: Vec<SeatConfig>,
    pub starting_fiches: u32,
    /// Seed for the table RNG; drawn from OS entropy when absent.
    pub seed: Option<u64>,
    /// Let agents move as soon as it is their turn. When off, the driver
    /// calls `Game::advance` itself.
    pub autoplay: bool,
}

impl GameConfig {
    /// The first `humans` seats are human, the rest default agents.
    pub fn with_humans(humans: usize) -> Self {
        let seats = (0..NUM_SEATS)
            .map(|i| if i < humans { SeatConfig::human() } else { SeatConfig::default() })
            .collect();
        Self { seats, starting_fiches: STARTING_FICHES, seed: None, autoplay: true }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = serde_json::from_str(input)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seats.len() != NUM_SEATS {
            return Err(ConfigError::SeatCount { expected: NUM_SEATS, got: self.seats.len() });
        }
        if self.starting_fiches == 0 {
            return Err(ConfigError::NoFiches);
        }
        for (seat, cfg) in self.seats.iter().enumerate() {
            if let Controller::Agent(profile) = cfg.controller {
                if !(0.0..=1.0).contains(&profile.competence) {
                    return Err(ConfigError::Competence { seat, value: profile.competence });
                }
            }
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::with_humans(1)
    }
}
