use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// The ten ranks of an Italian-suited deck, Ace (1) through King (10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Ace = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Jack = 8,
    Knight = 9,
    King = 10,
}

impl Rank {
    pub const ALL: [Rank; 10] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Jack,
        Rank::Knight,
        Rank::King,
    ];

    /// Face number, 1..=10.
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Primiera point value of the rank.
    pub const fn points(self) -> u32 {
        match self {
            Rank::Ace => 16,
            Rank::Two => 12,
            Rank::Three => 13,
            Rank::Four => 14,
            Rank::Five => 15,
            Rank::Six => 18,
            Rank::Seven => 21,
            Rank::Jack | Rank::Knight | Rank::King => 10,
        }
    }

    pub fn from_value(v: u8) -> Option<Rank> {
        Rank::ALL.get(usize::from(v).checked_sub(1)?).copied()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RankParseError {
    #[error("invalid rank: '{0}'")]
    Invalid(String),
}

impl FromStr for Rank {
    type Err = RankParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Rank::from_value)
            .ok_or_else(|| RankParseError::Invalid(s.to_string()))
    }
}

/// The four Italian suits, in the fixed order used for scoring tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spade,
    Bastoni,
    Coppe,
    Denari,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Bastoni, Suit::Coppe, Suit::Denari];

    pub const fn to_char(self) -> char {
        match self {
            Suit::Spade => 's',
            Suit::Bastoni => 'b',
            Suit::Coppe => 'c',
            Suit::Denari => 'd',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Suit::Spade => "spade",
            Suit::Bastoni => "bastoni",
            Suit::Coppe => "coppe",
            Suit::Denari => "denari",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SuitParseError {
    #[error("invalid suit: '{0}'")]
    Invalid(String),
}

impl FromStr for Suit {
    type Err = SuitParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let mut chars = t.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Suit::try_from(c);
        }
        let lower = t.to_ascii_lowercase();
        Suit::ALL
            .into_iter()
            .find(|suit| suit.name() == lower)
            .ok_or_else(|| SuitParseError::Invalid(s.to_string()))
    }
}

impl TryFrom<char> for Suit {
    type Error = SuitParseError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_lowercase() {
            's' => Ok(Suit::Spade),
            'b' => Ok(Suit::Bastoni),
            'c' => Ok(Suit::Coppe),
            'd' => Ok(Suit::Denari),
            _ => Err(SuitParseError::Invalid(c.to_string())),
        }
    }
}

/// A playing card: rank + suit, plus a display-only `visible` flag that is
/// raised when the card is revealed at a showdown.
///
/// Identity (equality, ordering, hashing) ignores `visible`.
///
/// ```
/// use stoppa::cards::{Card, Rank, Suit};
///
/// let card = Card::new(Rank::Seven, Suit::Coppe);
/// assert_eq!(card.to_string(), "7c");
/// assert_eq!(card.points(), 21);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
    #[serde(default)]
    visible: bool,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit, visible: false }
    }

    pub const fn rank(self) -> Rank {
        self.rank
    }
    pub const fn suit(self) -> Suit {
        self.suit
    }
    pub const fn points(self) -> u32 {
        self.rank.points()
    }
    pub const fn is_visible(self) -> bool {
        self.visible
    }

    pub(crate) fn reveal(&mut self) {
        self.visible = true;
    }

    pub(crate) fn same_card(self, other: Card) -> bool {
        self.rank == other.rank && self.suit == other.suit
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.same_card(*other)
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank.hash(state);
        self.suit.hash(state);
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.rank, self.suit).cmp(&(other.rank, other.suit))
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardParseError {
    #[error("invalid card: '{0}'")]
    Invalid(String),
    #[error(transparent)]
    Rank(#[from] RankParseError),
    #[error(transparent)]
    Suit(#[from] SuitParseError),
}

impl FromStr for Card {
    type Err = CardParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let suit_ch = match t.chars().last() {
            Some(c) if t.len() >= 2 => c,
            _ => return Err(CardParseError::Invalid(s.to_string())),
        };
        // rank is everything before the trailing suit letter ("7c", "10d")
        let rank = Rank::from_str(&t[..t.len() - suit_ch.len_utf8()])?;
        let suit = Suit::try_from(suit_ch)?;
        Ok(Card::new(rank, suit))
    }
}

/// Parse multiple cards separated by whitespace or commas.
///
/// ```
/// use stoppa::cards::{parse_cards, Card, Rank, Suit};
///
/// let cards = parse_cards("7c, 6c 10d").unwrap();
/// assert_eq!(cards[0], Card::new(Rank::Seven, Suit::Coppe));
/// assert_eq!(cards[2], Card::new(Rank::King, Suit::Denari));
/// ```
pub fn parse_cards(input: &str) -> Result<Vec<Card>, CardParseError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(Card::from_str)
        .collect()
}
