//! Card types and the string forms used by the card supply service.

use core::fmt;
use core::str::FromStr;

use crate::error::SupplyError;

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Suit {
    /// Hearts.
    Hearts,
    /// Diamonds.
    Diamonds,
    /// Clubs.
    Clubs,
    /// Spades.
    Spades,
}

impl Suit {
    /// All four suits in deck order.
    pub const ALL: [Self; 4] = [Self::Spades, Self::Diamonds, Self::Clubs, Self::Hearts];

    /// The service's name for the suit (`"HEARTS"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hearts => "HEARTS",
            Self::Diamonds => "DIAMONDS",
            Self::Clubs => "CLUBS",
            Self::Spades => "SPADES",
        }
    }

    const fn code(self) -> char {
        match self {
            Self::Hearts => 'H',
            Self::Diamonds => 'D',
            Self::Clubs => 'C',
            Self::Spades => 'S',
        }
    }
}

impl FromStr for Suit {
    type Err = SupplyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HEARTS" => Ok(Self::Hearts),
            "DIAMONDS" => Ok(Self::Diamonds),
            "CLUBS" => Ok(Self::Clubs),
            "SPADES" => Ok(Self::Spades),
            other => Err(SupplyError::InvalidCard(other.to_owned())),
        }
    }
}

/// Card rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rank {
    /// Ace.
    Ace,
    /// Two.
    Two,
    /// Three.
    Three,
    /// Four.
    Four,
    /// Five.
    Five,
    /// Six.
    Six,
    /// Seven.
    Seven,
    /// Eight.
    Eight,
    /// Nine.
    Nine,
    /// Ten.
    Ten,
    /// Jack.
    Jack,
    /// Queen.
    Queen,
    /// King.
    King,
}

impl Rank {
    /// All thirteen ranks, ace first.
    pub const ALL: [Self; 13] = [
        Self::Ace,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
    ];

    /// Returns whether the rank is an ace.
    #[must_use]
    pub const fn is_ace(self) -> bool {
        matches!(self, Self::Ace)
    }

    /// Blackjack value of a non-ace rank. Aces report 1; the hand decides
    /// whether one of them counts 11.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Ace => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
            Self::Nine => 9,
            Self::Ten | Self::Jack | Self::Queen | Self::King => 10,
        }
    }

    /// The service's name for the rank (`"ACE"`, `"2"`, ..., `"KING"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ace => "ACE",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "JACK",
            Self::Queen => "QUEEN",
            Self::King => "KING",
        }
    }

    const fn code(self) -> char {
        match self {
            Self::Ace => 'A',
            Self::Two => '2',
            Self::Three => '3',
            Self::Four => '4',
            Self::Five => '5',
            Self::Six => '6',
            Self::Seven => '7',
            Self::Eight => '8',
            Self::Nine => '9',
            Self::Ten => '0',
            Self::Jack => 'J',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

impl FromStr for Rank {
    type Err = SupplyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rank| rank.as_str() == s)
            .ok_or_else(|| SupplyError::InvalidCard(s.to_owned()))
    }
}

/// Base URL for the card images served by deckofcardsapi.
pub const IMAGE_BASE: &str = "https://deckofcardsapi.com/static/img";

/// A playing card as handed out by the card supply.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    /// Service code of the card, e.g. `"AS"` or `"0H"`.
    pub code: String,
    /// The rank of the card.
    pub rank: Rank,
    /// The suit of the card.
    pub suit: Suit,
    /// Image reference for the view layer.
    pub image: String,
}

impl Card {
    /// Creates a card with the standard code and image reference.
    #[must_use]
    pub fn new(rank: Rank, suit: Suit) -> Self {
        let code = format!("{}{}", rank.code(), suit.code());
        let image = format!("{IMAGE_BASE}/{code}.png");
        Self {
            code,
            rank,
            suit,
            image,
        }
    }

    /// Builds a card from the service's string fields.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyError::InvalidCard`] if the rank or suit is unknown.
    pub fn from_parts(code: &str, value: &str, suit: &str, image: &str) -> Result<Self, SupplyError> {
        Ok(Self {
            code: code.to_owned(),
            rank: value.parse()?,
            suit: suit.parse()?,
            image: image.to_owned(),
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Number of cards per deck.
pub const DECK_SIZE: usize = 52;

/// Returns one ordered 52-card deck.
#[must_use]
pub fn full_deck() -> Vec<Card> {
    Suit::ALL
        .into_iter()
        .flat_map(|suit| Rank::ALL.into_iter().map(move |rank| Card::new(rank, suit)))
        .collect()
}
