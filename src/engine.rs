// Game engine API boundary. The trait exposes the round entry points and the
// read-only table state so front ends and agents can drive or observe a game
// without reaching into `Game` internals. It is implemented for `Game`.

use crate::game::{Action, ActionError, ActionKind, GameState, Phase, Player};
use crate::scoring::Score;

pub trait GameEngine {
    // Round lifecycle
    fn start_round(&mut self) -> Result<(), ActionError>;
    fn set_deal_choice(&mut self, choice: u8) -> Result<(), ActionError>;

    // Player input
    fn act(&mut self, seat: usize, action: Action) -> Result<(), ActionError>;
    fn declare(&mut self, seat: usize, value: u32) -> Result<(), ActionError>;

    // Queries
    fn players(&self) -> &[Player];
    fn pot(&self) -> u32;
    fn hand_pot(&self) -> u32;
    fn current_bet(&self) -> u32;
    fn phase(&self) -> Phase;
    fn state(&self) -> GameState;
    fn dealer(&self) -> usize;
    fn current(&self) -> usize;
    fn last_raiser(&self) -> usize;
    fn message(&self) -> &str;
    fn to_call(&self, seat: usize) -> u32;
    fn legal_actions(&self, seat: usize) -> Vec<ActionKind>;
    fn score(&self, seat: usize) -> Score;
    fn num_players(&self) -> usize;
}

impl GameEngine for crate::game::Game {
    fn start_round(&mut self) -> Result<(), ActionError> {
        self.start_round()
    }
    fn set_deal_choice(&mut self, choice: u8) -> Result<(), ActionError> {
        self.set_deal_choice(choice)
    }

    fn act(&mut self, seat: usize, action: Action) -> Result<(), ActionError> {
        self.act(seat, action)
    }
    fn declare(&mut self, seat: usize, value: u32) -> Result<(), ActionError> {
        self.declare(seat, value)
    }

    fn players(&self) -> &[Player] {
        &self.players
    }
    fn pot(&self) -> u32 {
        self.pot
    }
    fn hand_pot(&self) -> u32 {
        self.hand_pot
    }
    fn current_bet(&self) -> u32 {
        self.current_bet
    }
    fn phase(&self) -> Phase {
        self.phase
    }
    fn state(&self) -> GameState {
        self.state
    }
    fn dealer(&self) -> usize {
        self.dealer
    }
    fn current(&self) -> usize {
        self.current
    }
    fn last_raiser(&self) -> usize {
        self.last_raiser
    }
    fn message(&self) -> &str {
        &self.message
    }
    fn to_call(&self, seat: usize) -> u32 {
        self.to_call(seat)
    }
    fn legal_actions(&self, seat: usize) -> Vec<ActionKind> {
        self.legal_actions(seat)
    }
    fn score(&self, seat: usize) -> Score {
        self.score(seat)
    }
    fn num_players(&self) -> usize {
        self.players.len()
    }
}
