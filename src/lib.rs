//! stoppa: rules engine for Stoppa, a five-player betting game played with
//! a 40-card Italian deck.
//!
//! Goals:
//! - One state machine owns the whole round: ante, dealing, betting, talking,
//!   declarations and payout
//! - Scoring and agent decisions are pure functions over plain data
//! - No panics on bad input; entry points return `Result` and coerce values
//!
//! ## Quick start: score a hand
//! ```
//! use stoppa::cards::parse_cards;
//! use stoppa::game::Phase;
//! use stoppa::scoring::score_cards;
//!
//! let hand = parse_cards("7d 6d 1d").unwrap();
//! assert_eq!(score_cards(&hand, &[], Phase::Second).value, 55);
//! ```
//!
//! ## Quick start: play a round with one human seat
//! ```
//! use stoppa::config::GameConfig;
//! use stoppa::game::{Action, Game, GameState, Pending};
//!
//! let mut game = Game::new(GameConfig::with_humans(1).with_seed(3)).unwrap();
//! game.start_round().unwrap();
//! // agents move on their own; answer whenever seat 0 is asked
//! while game.state() != GameState::RoundOver {
//!     match game.pending() {
//!         Pending::DealChoice { .. } => game.set_deal_choice(2).unwrap(),
//!         Pending::Action { seat, .. } => game.act(seat, Action::Call).unwrap(),
//!         Pending::Talk { seat, .. } => game.declare(seat, 0).unwrap(),
//!         Pending::Declarations(seats) => game.declare(seats[0], 0).unwrap(),
//!         Pending::Idle | Pending::RoundOver => break,
//!     }
//! }
//! assert_eq!(game.total_chips(), 100);
//! ```

pub mod agents;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod game;
pub mod scoring;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
