use crate::agents::{heuristic, AgentProfile, Observation};
use crate::cards::Card;
use crate::config::{ConfigError, Controller, GameConfig};
use crate::deck::Deck;
use crate::scoring::{score_player, Score};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;
use tracing::{debug, info};

/// Seats at the table.
pub const NUM_SEATS: usize = 5;
/// Chips each player starts a session with.
pub const STARTING_FICHES: u32 = 20;
/// Chips every solvent player pays into the pot at round start.
pub const ANTE: u32 = 1;
/// Highest table bet a raise may reach.
pub const RAISE_CAP: u32 = 20;
/// Cards split between the first and third deal; the second deal always adds 3.
pub const SPLIT_CARDS: u8 = 5;

/// The four stages of a round. Cards are dealt in the first three; the
/// final phase scores everything dealt so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    First,
    Second,
    Third,
    Final,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::First, Phase::Second, Phase::Third, Phase::Final];

    pub const fn index(self) -> u8 {
        match self {
            Phase::First => 0,
            Phase::Second => 1,
            Phase::Third => 2,
            Phase::Final => 3,
        }
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Phase::Final)
    }

    pub const fn next(self) -> Option<Phase> {
        match self {
            Phase::First => Some(Phase::Second),
            Phase::Second => Some(Phase::Third),
            Phase::Third => Some(Phase::Final),
            Phase::Final => None,
        }
    }

    /// Cards dealt to each player when this phase begins, given the
    /// dealer's opening split.
    pub const fn cards_to_deal(self, deal_choice: u8) -> usize {
        match self {
            Phase::First => deal_choice as usize,
            Phase::Second => 3,
            Phase::Third => SPLIT_CARDS.saturating_sub(deal_choice) as usize,
            Phase::Final => 0,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phase {}", self.index())
    }
}

/// Coarse state of the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameState {
    /// No round has started yet.
    Idle,
    AwaitingDealChoice,
    Betting,
    /// The last raiser announces a score.
    Talking,
    /// Nobody bet: every active player declares.
    Declaring,
    RoundOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Fold,
    Call,
    Raise,
}

/// A betting action. `Raise` carries the requested table bet, which is
/// coerced to the nearest legal value when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fold,
    Call,
    Raise(u32),
}

impl Action {
    pub const fn kind(self) -> ActionKind {
        match self {
            Action::Fold => ActionKind::Fold,
            Action::Call => ActionKind::Call,
            Action::Raise(_) => ActionKind::Raise,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryVerb {
    Ante,
    DealChoice,
    Fold,
    Call,
    Raise,
    Declare,
    Win,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HistoryEntry {
    pub seat: usize,
    pub verb: HistoryVerb,
    pub amount: Option<u32>,
    pub phase: Phase,
}

/// Why an entry point refused to act. Values are never rejected (they are
/// coerced); only calls made at the wrong time or for the wrong seat are.
/// A rejected call leaves the game untouched.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("a round is already in progress")]
    RoundInProgress,
    #[error("no round has been started")]
    NoRound,
    #[error("the dealer is not choosing a deal")]
    NotAwaitingDealChoice,
    #[error("betting is not open")]
    NotBetting,
    #[error("no declaration is expected")]
    NotDeclaring,
    #[error("seat {seat} is not to act (current seat is {current})")]
    NotYourTurn { seat: usize, current: usize },
    #[error("seat {0} is played by an agent")]
    AgentSeat(usize),
    #[error("seat {0} does not exist")]
    SeatOutOfRange(usize),
    #[error("seat {0} has already declared")]
    AlreadyDeclared(usize),
    #[error("seat {0} has folded")]
    PlayerFolded(usize),
}

/// Who the game is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    Idle,
    DealChoice { seat: usize, human: bool },
    Action { seat: usize, human: bool },
    Talk { seat: usize, human: bool },
    /// Human seats that still owe a declaration.
    Declarations(Vec<usize>),
    RoundOver,
}

impl Pending {
    /// The seat to move is an agent, so `Game::advance` will make progress.
    pub fn is_agent_turn(&self) -> bool {
        matches!(
            self,
            Pending::DealChoice { human: false, .. }
                | Pending::Action { human: false, .. }
                | Pending::Talk { human: false, .. }
        )
    }
}

/// Receives a notification after every meaningful mutation. Implemented for
/// any `FnMut(GameState, &str)`.
pub trait GameObserver {
    fn state_changed(&mut self, state: GameState, message: &str);
}

impl<F> GameObserver for F
where
    F: FnMut(GameState, &str),
{
    fn state_changed(&mut self, state: GameState, message: &str) {
        self(state, message)
    }
}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Player {
    pub(crate) index: usize,
    pub(crate) name: String,
    pub(crate) controller: Controller,
    pub(crate) fiches: u32,
    pub(crate) cards: Vec<Card>,
    pub(crate) previous_cards: Vec<Card>,
    /// Chips put in during the current betting cycle; `None` once folded.
    pub(crate) bet: Option<u32>,
    pub(crate) declaration: Option<u32>,
    pub(crate) last_action: Option<String>,
}

impl Player {
    pub(crate) fn new(index: usize, name: String, controller: Controller, fiches: u32) -> Self {
        Self {
            index,
            name,
            controller,
            fiches,
            cards: Vec::new(),
            previous_cards: Vec::new(),
            bet: Some(0),
            declaration: None,
            last_action: None,
        }
    }

    /// Returns the fixed seat index
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn controller(&self) -> Controller {
        self.controller
    }

    pub fn is_human(&self) -> bool {
        self.controller.is_human()
    }

    pub fn agent_profile(&self) -> Option<AgentProfile> {
        match self.controller {
            Controller::Agent(profile) => Some(profile),
            Controller::Human => None,
        }
    }

    /// Returns the player's chip balance
    pub fn fiches(&self) -> u32 {
        self.fiches
    }

    /// Cards dealt in the current phase
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Cards kept from earlier phases of this round
    pub fn previous_cards(&self) -> &[Card] {
        &self.previous_cards
    }

    /// Bet in the current cycle; `None` is the folded marker.
    pub fn bet(&self) -> Option<u32> {
        self.bet
    }

    pub fn is_folded(&self) -> bool {
        self.bet.is_none()
    }

    pub fn declaration(&self) -> Option<u32> {
        self.declaration
    }

    pub fn last_action(&self) -> Option<&str> {
        self.last_action.as_deref()
    }

    fn contributed(&self) -> u32 {
        self.bet.unwrap_or(0)
    }

    fn reset_round(&mut self) {
        self.cards.clear();
        self.previous_cards.clear();
        self.reset_cycle();
    }

    fn reset_cycle(&mut self) {
        self.bet = Some(0);
        self.declaration = None;
        self.last_action = None;
    }
}

/// The round state machine. Owns every piece of mutable game state; callers
/// read it through accessors and change it only through the entry points
/// (`start_round`, `set_deal_choice`, `act`, `declare`, `advance`).
#[non_exhaustive]
pub struct Game {
    pub(crate) players: Vec<Player>,
    pub(crate) deck: Deck,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) dealer: usize,
    pub(crate) current: usize,
    /// Carry-over pot fed by the ante.
    pub(crate) pot: u32,
    /// Chips bet in the current betting cycle.
    pub(crate) hand_pot: u32,
    pub(crate) current_bet: u32,
    pub(crate) phase: Phase,
    pub(crate) state: GameState,
    pub(crate) deal_choice: u8,
    /// Anchor for closing a betting cycle.
    pub(crate) last_raiser: usize,
    pub(crate) last_raiser_acted: bool,
    pub(crate) autoplay: bool,
    pub(crate) message: String,
    pub(crate) last_winner: Option<usize>,
    history: Vec<HistoryEntry>,
    observer: Option<Box<dyn GameObserver>>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("players", &self.players)
            .field("dealer", &self.dealer)
            .field("current", &self.current)
            .field("pot", &self.pot)
            .field("hand_pot", &self.hand_pot)
            .field("current_bet", &self.current_bet)
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("last_raiser", &self.last_raiser)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Build a table from a validated configuration.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Standard table: the first `humans` seats are human, the rest agents.
    pub fn with_humans(humans: usize) -> Self {
        Self::build(GameConfig::with_humans(humans))
    }

    fn build(config: GameConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let players = config
            .seats
            .iter()
            .enumerate()
            .map(|(i, seat)| {
                Player::new(i, seat.display_name(i), seat.controller, config.starting_fiches)
            })
            .collect();
        Self {
            players,
            deck: Deck::standard(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            dealer: 0,
            current: 0,
            pot: 0,
            hand_pot: 0,
            current_bet: 0,
            phase: Phase::First,
            state: GameState::Idle,
            deal_choice: 3,
            last_raiser: 0,
            last_raiser_acted: false,
            autoplay: config.autoplay,
            message: String::from("Welcome to Stoppa!"),
            last_winner: None,
            history: Vec::new(),
            observer: None,
        }
    }

    /// Install the observer notified after every state change.
    pub fn set_observer<O: GameObserver + 'static>(&mut self, observer: O) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Returns a reference to the players
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.players.get(seat)
    }

    /// Returns the carry-over pot
    pub fn pot(&self) -> u32 {
        self.pot
    }

    /// Returns the chips bet in the current cycle
    pub fn hand_pot(&self) -> u32 {
        self.hand_pot
    }

    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn dealer(&self) -> usize {
        self.dealer
    }

    /// Returns the seat to act
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn last_raiser(&self) -> usize {
        self.last_raiser
    }

    pub fn deal_choice(&self) -> u8 {
        self.deal_choice
    }

    /// Status text for the most recent event
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Winner of the most recently settled hand
    pub fn last_winner(&self) -> Option<usize> {
        self.last_winner
    }

    /// All chips on the table: balances, carry-over pot and cycle pot.
    pub fn total_chips(&self) -> u32 {
        self.players.iter().map(|p| p.fiches).sum::<u32>() + self.pot + self.hand_pot
    }

    pub fn history_recent(&self, n: usize) -> Vec<HistoryEntry> {
        let start = self.history.len().saturating_sub(n);
        self.history[start..].to_vec()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// True score of `seat` for the current phase.
    pub fn score(&self, seat: usize) -> Score {
        self.players.get(seat).map(|p| score_player(p, self.phase)).unwrap_or_default()
    }

    pub fn to_call(&self, seat: usize) -> u32 {
        match self.players.get(seat).and_then(|p| p.bet) {
            Some(bet) => self.current_bet.saturating_sub(bet),
            None => 0,
        }
    }

    /// Actions open to `seat` right now; empty unless it is that seat's turn to bet.
    pub fn legal_actions(&self, seat: usize) -> Vec<ActionKind> {
        if self.state != GameState::Betting || seat != self.current {
            return Vec::new();
        }
        let p = &self.players[seat];
        let Some(bet) = p.bet else {
            return Vec::new();
        };
        let mut actions = vec![ActionKind::Fold, ActionKind::Call];
        if self.current_bet < RAISE_CAP && bet + p.fiches > self.current_bet {
            actions.push(ActionKind::Raise);
        }
        actions
    }

    pub fn pending(&self) -> Pending {
        match self.state {
            GameState::Idle => Pending::Idle,
            GameState::AwaitingDealChoice => {
                Pending::DealChoice { seat: self.dealer, human: self.is_human(self.dealer) }
            }
            GameState::Betting => {
                Pending::Action { seat: self.current, human: self.is_human(self.current) }
            }
            GameState::Talking => {
                Pending::Talk { seat: self.current, human: self.is_human(self.current) }
            }
            GameState::Declaring => Pending::Declarations(self.pending_declarations()),
            GameState::RoundOver => Pending::RoundOver,
        }
    }

    /// Ante, shuffle, rotate the dealer and wait for the opening split.
    pub fn start_round(&mut self) -> Result<(), ActionError> {
        if !matches!(self.state, GameState::Idle | GameState::RoundOver) {
            return Err(ActionError::RoundInProgress);
        }
        self.history.clear();
        self.phase = Phase::First;
        for i in 0..self.players.len() {
            if self.players[i].fiches >= ANTE {
                self.players[i].fiches -= ANTE;
                self.pot += ANTE;
                self.record_history(i, HistoryVerb::Ante, Some(ANTE));
            }
        }
        self.deck = Deck::standard();
        self.deck.shuffle_with(&mut self.rng);
        self.dealer = (self.dealer + 1) % self.players.len();
        self.current = self.dealer;
        self.current_bet = 0;
        self.hand_pot = 0;
        self.last_winner = None;
        for p in &mut self.players {
            p.reset_round();
        }
        self.state = GameState::AwaitingDealChoice;
        info!(dealer = self.dealer, pot = self.pot, "round started");
        self.log(format!("{} is the dealer.", self.players[self.dealer].name));
        self.autoplay_agents();
        Ok(())
    }

    /// A human dealer picks how many cards (2 or 3) open the round.
    pub fn set_deal_choice(&mut self, choice: u8) -> Result<(), ActionError> {
        if self.state != GameState::AwaitingDealChoice {
            return Err(ActionError::NotAwaitingDealChoice);
        }
        if !self.is_human(self.dealer) {
            return Err(ActionError::AgentSeat(self.dealer));
        }
        self.apply_deal_choice(choice);
        self.autoplay_agents();
        Ok(())
    }

    /// Submit a betting action for the human at `seat`.
    pub fn act(&mut self, seat: usize, action: Action) -> Result<(), ActionError> {
        self.ensure_seat(seat)?;
        if self.state != GameState::Betting {
            return Err(ActionError::NotBetting);
        }
        if seat != self.current {
            return Err(ActionError::NotYourTurn { seat, current: self.current });
        }
        if !self.is_human(seat) {
            return Err(ActionError::AgentSeat(seat));
        }
        self.apply_action(action);
        self.autoplay_agents();
        Ok(())
    }

    /// Submit a human declaration: the talker's announced score, or one of
    /// the silent declarations when nobody bet.
    pub fn declare(&mut self, seat: usize, value: u32) -> Result<(), ActionError> {
        self.ensure_seat(seat)?;
        match self.state {
            GameState::Talking => {
                if seat != self.current {
                    return Err(ActionError::NotYourTurn { seat, current: self.current });
                }
                if !self.is_human(seat) {
                    return Err(ActionError::AgentSeat(seat));
                }
                self.resolve_declaration(seat, value);
            }
            GameState::Declaring => {
                let p = &self.players[seat];
                if p.is_folded() {
                    return Err(ActionError::PlayerFolded(seat));
                }
                if !p.is_human() {
                    return Err(ActionError::AgentSeat(seat));
                }
                if p.declaration.is_some() {
                    return Err(ActionError::AlreadyDeclared(seat));
                }
                self.players[seat].declaration = Some(value);
                self.record_history(seat, HistoryVerb::Declare, Some(value));
                self.log(format!("{} declared.", self.players[seat].name));
                self.check_showdown_ready();
            }
            GameState::Idle => return Err(ActionError::NoRound),
            _ => return Err(ActionError::NotDeclaring),
        }
        self.autoplay_agents();
        Ok(())
    }

    /// Make one agent move if an agent is to move. Returns whether anything happened.
    pub fn advance(&mut self) -> bool {
        match self.state {
            GameState::AwaitingDealChoice if !self.is_human(self.dealer) => {
                let choice = heuristic::choose_deal_split(&mut self.rng);
                self.apply_deal_choice(choice);
                true
            }
            GameState::Betting => {
                let seat = self.current;
                let Some(profile) = self.players[seat].agent_profile() else {
                    return false;
                };
                let Some(obs) = Observation::capture(&*self, seat) else {
                    return false;
                };
                let action = heuristic::decide_bet(&obs, &profile, &mut self.rng);
                self.apply_action(action);
                true
            }
            GameState::Talking => {
                let seat = self.current;
                let Some(profile) = self.players[seat].agent_profile() else {
                    return false;
                };
                let Some(obs) = Observation::capture(&*self, seat) else {
                    return false;
                };
                let value = heuristic::decide_declaration(&obs, &profile, &mut self.rng);
                self.resolve_declaration(seat, value);
                true
            }
            _ => false,
        }
    }

    /// Let agents move until a human is needed or the round is over.
    /// Returns the number of agent moves made.
    pub fn run_agents(&mut self) -> usize {
        let mut steps = 0;
        while self.advance() {
            steps += 1;
        }
        steps
    }

    fn autoplay_agents(&mut self) {
        if self.autoplay {
            self.run_agents();
        }
    }

    fn ensure_seat(&self, seat: usize) -> Result<(), ActionError> {
        if seat >= self.players.len() {
            return Err(ActionError::SeatOutOfRange(seat));
        }
        Ok(())
    }

    fn is_human(&self, seat: usize) -> bool {
        self.players.get(seat).map(|p| p.is_human()).unwrap_or(false)
    }

    fn apply_deal_choice(&mut self, choice: u8) {
        let choice = choice.clamp(2, 3);
        self.deal_choice = choice;
        self.record_history(self.dealer, HistoryVerb::DealChoice, Some(u32::from(choice)));
        self.log(format!("{} deals {choice} cards.", self.players[self.dealer].name));
        self.deal_cards();
    }

    fn deal_cards(&mut self) {
        let count = self.phase.cards_to_deal(self.deal_choice);
        let n = self.players.len();
        if count > 0 {
            for i in 0..n {
                let seat = (self.dealer + 1 + i) % n;
                let drawn = self.deck.draw_n(count);
                self.players[seat].cards.extend(drawn);
            }
        }
        info!(phase = self.phase.index(), count, "cards dealt");
        self.begin_betting();
    }

    fn begin_betting(&mut self) {
        self.state = GameState::Betting;
        self.current = (self.dealer + 1) % self.players.len();
        self.current_bet = 0;
        self.hand_pot = 0;
        self.last_raiser = self.current;
        self.last_raiser_acted = false;
        for p in &mut self.players {
            p.reset_cycle();
        }
        self.log("Betting started.");
    }

    fn apply_action(&mut self, action: Action) {
        let idx = self.current;
        debug!(seat = idx, ?action, "applying action");
        match action {
            Action::Fold => self.fold(idx),
            Action::Call => self.call(idx),
            Action::Raise(amount) => self.raise(idx, amount),
        }
        self.advance_turn();
    }

    fn fold(&mut self, idx: usize) {
        self.players[idx].bet = None;
        self.players[idx].last_action = Some("Fold".into());
        self.record_history(idx, HistoryVerb::Fold, None);
        if self.last_raiser == idx {
            self.relocate_anchor();
        }
        self.log(format!("{} folded.", self.players[idx].name));
    }

    fn call(&mut self, idx: usize) {
        let p = &mut self.players[idx];
        let owed = self.current_bet.saturating_sub(p.contributed());
        let cost = owed.min(p.fiches);
        if cost < owed {
            debug!(seat = idx, owed, cost, "short call, player is all in");
        }
        p.fiches -= cost;
        p.bet = Some(p.contributed() + cost);
        p.last_action = Some(if owed == 0 { "Check".into() } else { format!("Call {cost}") });
        self.hand_pot += cost;
        self.mark_acted(idx);
        self.record_history(idx, HistoryVerb::Call, Some(cost));
        self.log(format!("{} called.", self.players[idx].name));
    }

    fn raise(&mut self, idx: usize, requested: u32) {
        if self.current_bet >= RAISE_CAP {
            debug!(seat = idx, requested, "table bet at the cap, raise becomes a call");
            return self.call(idx);
        }
        let (bet, fiches) = (self.players[idx].contributed(), self.players[idx].fiches);
        let mut amount = requested.min(RAISE_CAP);
        if amount <= self.current_bet {
            amount = self.current_bet + 1;
        }
        if fiches < amount - bet {
            amount = bet + fiches;
        }
        if amount <= self.current_bet {
            debug!(seat = idx, requested, "all-in does not top the table bet, calling");
            return self.call(idx);
        }
        if amount != requested {
            debug!(seat = idx, requested, amount, "raise coerced");
        }
        let cost = amount - bet;
        let p = &mut self.players[idx];
        p.fiches -= cost;
        p.bet = Some(amount);
        p.last_action = Some(format!("Raise {amount}"));
        self.hand_pot += cost;
        self.current_bet = amount;
        self.last_raiser = idx;
        self.last_raiser_acted = true;
        self.record_history(idx, HistoryVerb::Raise, Some(amount));
        self.log(format!("{} raised to {amount}.", self.players[idx].name));
    }

    fn mark_acted(&mut self, idx: usize) {
        if idx == self.last_raiser {
            self.last_raiser_acted = true;
        }
    }

    /// Move the closing anchor to the next seat still in the hand.
    fn relocate_anchor(&mut self) {
        if let Some(next) = self.next_active_from(self.last_raiser) {
            debug!(from = self.last_raiser, to = next, "anchor relocated");
            self.last_raiser = next;
            self.last_raiser_acted = false;
        }
    }

    fn next_active_from(&self, start: usize) -> Option<usize> {
        let n = self.players.len();
        (1..=n).map(|step| (start + step) % n).find(|&i| !self.players[i].is_folded())
    }

    fn active_seats(&self) -> Vec<usize> {
        (0..self.players.len()).filter(|&i| !self.players[i].is_folded()).collect()
    }

    fn advance_turn(&mut self) {
        let n = self.players.len();
        for _ in 0..n {
            self.current = (self.current + 1) % n;
            if !self.players[self.current].is_folded() {
                break;
            }
        }

        let active = self.active_seats();
        match active.as_slice() {
            [] => return,
            [only] => {
                self.end_hand(*only);
                return;
            }
            _ => {}
        }

        if self.players[self.last_raiser].is_folded() {
            self.relocate_anchor();
        }
        if self.should_end_cycle() {
            self.close_cycle();
        } else {
            self.notify();
        }
    }

    fn should_end_cycle(&self) -> bool {
        if !self.last_raiser_acted || self.current != self.last_raiser {
            return false;
        }
        // a player with no chips left is all in and counts as matched
        self.players
            .iter()
            .filter(|p| !p.is_folded())
            .all(|p| p.contributed() == self.current_bet || p.fiches == 0)
    }

    fn close_cycle(&mut self) {
        if self.current_bet > 0 {
            self.state = GameState::Talking;
            self.current = self.last_raiser;
            debug!(seat = self.current, "transition: betting -> talking");
            self.log(format!("{} is talking.", self.players[self.current].name));
        } else {
            self.start_declaration();
        }
    }

    fn start_declaration(&mut self) {
        self.state = GameState::Declaring;
        debug!("transition: betting -> declaring");
        self.log("Declaration phase.");
        for seat in 0..self.players.len() {
            let p = &self.players[seat];
            if p.is_human() || p.is_folded() {
                continue;
            }
            let value = self.score(seat).value;
            self.players[seat].declaration = Some(value);
            self.record_history(seat, HistoryVerb::Declare, Some(value));
        }
        self.check_showdown_ready();
    }

    fn pending_declarations(&self) -> Vec<usize> {
        if self.state != GameState::Declaring {
            return Vec::new();
        }
        self.players
            .iter()
            .filter(|p| p.is_human() && !p.is_folded() && p.declaration.is_none())
            .map(|p| p.index)
            .collect()
    }

    fn check_showdown_ready(&mut self) {
        if self.pending_declarations().is_empty() {
            self.resolve_showdown();
        } else {
            self.notify();
        }
    }

    /// Highest true score among active seats accepted by `filter`; the
    /// lowest seat wins ties.
    fn strongest_active(&self, filter: impl Fn(usize) -> bool) -> Option<(usize, u32)> {
        let mut best: Option<(usize, u32)> = None;
        for seat in self.active_seats().into_iter().filter(|&s| filter(s)) {
            let value = self.score(seat).value;
            if best.map_or(true, |(_, b)| value > b) {
                best = Some((seat, value));
            }
        }
        best
    }

    /// Settle a talking declaration. The declarer cannot announce less than
    /// their true score; the strongest opponent stops them only by beating
    /// the announced value.
    fn resolve_declaration(&mut self, declarer: usize, declared: u32) {
        let actual = self.score(declarer).value;
        let effective = declared.max(actual);
        if effective != declared {
            debug!(seat = declarer, declared, actual, "declaration raised to true score");
        }
        self.players[declarer].declaration = Some(effective);
        self.record_history(declarer, HistoryVerb::Declare, Some(effective));

        let winner = match self.strongest_active(|s| s != declarer) {
            Some((opp, opp_score)) if opp_score > effective => {
                let msg = format!(
                    "{} stopped by {} ({opp_score})!",
                    self.players[declarer].name, self.players[opp].name
                );
                self.log(msg);
                opp
            }
            _ => {
                let msg =
                    format!("{} wins declaration ({effective})!", self.players[declarer].name);
                self.log(msg);
                declarer
            }
        };
        self.reveal_winner(winner);
    }

    fn resolve_showdown(&mut self) {
        let Some((winner, value)) = self.strongest_active(|_| true) else {
            return;
        };
        self.log(format!("{} wins showdown ({value})!", self.players[winner].name));
        self.reveal_winner(winner);
    }

    fn reveal_winner(&mut self, winner: usize) {
        let best = self.score(winner).best_cards;
        let p = &mut self.players[winner];
        for card in p.cards.iter_mut().chain(p.previous_cards.iter_mut()) {
            if best.iter().any(|b| b.same_card(*card)) {
                card.reveal();
            }
        }
        self.end_hand(winner);
    }

    /// Pay the hand, bank the cards and move on to the next phase.
    fn end_hand(&mut self, winner: usize) {
        let mut won = std::mem::take(&mut self.hand_pot);
        if self.phase.is_final() {
            won += std::mem::take(&mut self.pot);
        } else if self.pot > 0 {
            won += 1;
            self.pot -= 1;
        }
        self.players[winner].fiches += won;
        self.players[winner].last_action = Some(format!("Win {won}"));
        self.last_winner = Some(winner);
        self.record_history(winner, HistoryVerb::Win, Some(won));
        info!(winner, won, phase = self.phase.index(), "hand won");

        for p in &mut self.players {
            let cards = std::mem::take(&mut p.cards);
            p.previous_cards.extend(cards);
        }

        match self.phase.next() {
            Some(next) => {
                self.phase = next;
                self.deal_cards();
            }
            None => {
                self.state = GameState::RoundOver;
                info!(winner, "round over");
                self.log(format!("Round over. {} won!", self.players[winner].name));
            }
        }
    }

    fn log(&mut self, message: impl Into<String>) {
        self.message = message.into();
        debug!(state = ?self.state, message = %self.message, "status");
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.state_changed(self.state, &self.message);
        }
    }

    fn record_history(&mut self, seat: usize, verb: HistoryVerb, amount: Option<u32>) {
        let entry = HistoryEntry { seat, verb, amount, phase: self.phase };
        self.history.push(entry);
    }
}
