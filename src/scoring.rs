//! Primiera-style scoring: the best single-suit point total of a hand.
//!
//! Before the final phase only the cards dealt in the current phase count.
//! In the final phase the current and all previously dealt cards are pooled,
//! and each suit contributes at most its three highest-point cards.

use crate::cards::{Card, Suit};
use crate::game::{Phase, Player};

/// Highest reachable score: 7 + 6 + Ace of one suit (21 + 18 + 16).
pub const MAX_SCORE: u32 = 55;

/// Cards per suit that count once all phases are pooled.
pub const FINAL_SUIT_CAP: usize = 3;

/// Result of scoring a hand. `value` is the winning suit's subtotal and
/// `best_cards` the cards that produced it (empty for an empty hand).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Score {
    pub value: u32,
    pub suit: Option<Suit>,
    pub best_cards: Vec<Card>,
}

/// Score a player for `phase`.
///
/// ```
/// use stoppa::cards::parse_cards;
/// use stoppa::game::Phase;
/// use stoppa::scoring::score_cards;
///
/// let cards = parse_cards("7c 6c").unwrap();
/// assert_eq!(score_cards(&cards, &[], Phase::First).value, 39);
/// ```
pub fn score_player(player: &Player, phase: Phase) -> Score {
    score_cards(player.cards(), player.previous_cards(), phase)
}

/// Score a current-phase card set plus the cards held from earlier phases.
/// `previous` only matters in the final phase.
pub fn score_cards(current: &[Card], previous: &[Card], phase: Phase) -> Score {
    let pool = scoring_pool(current, previous, phase);
    let mut best = Score::default();
    for suit in Suit::ALL {
        let cards = suit_group(&pool, suit, phase);
        let value: u32 = cards.iter().map(|c| c.points()).sum();
        // strict comparison: ties keep the earlier suit
        if value > best.value {
            best = Score { value, suit: Some(suit), best_cards: cards };
        }
    }
    best
}

/// The card set that scoring looks at for `phase`.
pub fn scoring_pool(current: &[Card], previous: &[Card], phase: Phase) -> Vec<Card> {
    let mut pool = current.to_vec();
    if phase.is_final() {
        pool.extend_from_slice(previous);
    }
    pool
}

/// Number of cards in the most populated suit of `cards`.
pub fn longest_suit(cards: &[Card]) -> usize {
    Suit::ALL
        .iter()
        .map(|&s| cards.iter().filter(|c| c.suit() == s).count())
        .max()
        .unwrap_or(0)
}

fn suit_group(pool: &[Card], suit: Suit, phase: Phase) -> Vec<Card> {
    let mut cards: Vec<Card> = pool.iter().copied().filter(|c| c.suit() == suit).collect();
    if phase.is_final() {
        cards.sort_by(|a, b| b.points().cmp(&a.points()));
        cards.truncate(FINAL_SUIT_CAP);
    }
    cards
}
