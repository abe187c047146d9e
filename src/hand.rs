//! Hands, hand statuses, and hand valuation.

use crate::card::Card;
use crate::error::ValuationError;

/// The best hand value.
pub const BLACKJACK: u8 = 21;

/// Number of cards that makes a non-bust hand a Charlie.
pub const CHARLIE_CARDS: usize = 6;

/// Most aces the valuation is defined for.
pub const MAX_ACES: usize = 4;

/// Computes the best value of a card sequence.
///
/// Face cards count 10 and numeric ranks their face value. With `n` aces one
/// of them counts 11 when that keeps the total at or below 21, the rest
/// count 1. The result does not depend on card order.
///
/// # Errors
///
/// Returns [`ValuationError::UnsupportedAceCount`] for five or more aces.
pub fn hand_value(cards: &[Card]) -> Result<u8, ValuationError> {
    let mut base: u8 = 0;
    let mut aces: usize = 0;

    for card in cards {
        if card.rank.is_ace() {
            aces += 1;
        } else {
            base = base.saturating_add(card.rank.value());
        }
    }

    match aces {
        0 => Ok(base),
        1..=MAX_ACES => {
            let low = base.saturating_add(aces as u8);
            let high = low.saturating_add(10);
            Ok(if high <= BLACKJACK { high } else { low })
        }
        n => Err(ValuationError::UnsupportedAceCount(n)),
    }
}

/// Lifecycle status of a single hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HandStatus {
    /// No cards dealt yet this round.
    #[default]
    Waiting,
    /// Hand is live and can take actions.
    Playing,
    /// Two-card 21.
    Blackjack,
    /// Six cards without busting.
    Charlie,
    /// Bet doubled; exactly one more card follows.
    DoubledDown,
    /// Hand has stood.
    Stood,
    /// Hand is over 21.
    Bust,
}

impl HandStatus {
    /// Returns whether the status is final for the round.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Blackjack | Self::Charlie | Self::Stood | Self::Bust
        )
    }

    /// Applies the post-draw rules for a player-controlled hand.
    ///
    /// Only `Playing` and `DoubledDown` hands move; every other status is
    /// returned unchanged, so a status never regresses.
    #[must_use]
    pub fn after_cards(self, hand: &Hand) -> Self {
        match self {
            Self::Playing => {
                if hand.is_natural() {
                    Self::Blackjack
                } else if hand.is_bust() {
                    Self::Bust
                } else if hand.len() >= CHARLIE_CARDS {
                    Self::Charlie
                } else {
                    Self::Playing
                }
            }
            Self::DoubledDown => {
                if hand.is_bust() {
                    Self::Bust
                } else {
                    Self::Stood
                }
            }
            other => other,
        }
    }
}

/// An ordered sequence of cards held by one hand.
///
/// A `Hand` only ever holds a sequence [`hand_value`] accepts, so
/// [`Hand::value`] is infallible. The value is derived once from the cards
/// when the hand is built; hands are never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Hand {
    cards: Vec<Card>,
    value: u8,
}

impl Hand {
    /// Creates an empty hand.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cards: Vec::new(),
            value: 0,
        }
    }

    /// Builds a hand from cards in deal order.
    ///
    /// # Errors
    ///
    /// Returns an error if the cards cannot be valued.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, ValuationError> {
        let value = hand_value(&cards)?;
        Ok(Self { cards, value })
    }

    /// Returns the cards in the hand.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Returns the value of the hand.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Returns the number of cards in the hand.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the hand is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Returns whether the hand is a two-card 21.
    #[must_use]
    pub fn is_natural(&self) -> bool {
        self.cards.len() == 2 && self.value == BLACKJACK
    }

    /// Returns whether the hand is a six-card Charlie.
    #[must_use]
    pub fn is_charlie(&self) -> bool {
        self.cards.len() == CHARLIE_CARDS && self.value <= BLACKJACK
    }

    /// Returns whether the hand is over 21.
    #[must_use]
    pub const fn is_bust(&self) -> bool {
        self.value > BLACKJACK
    }

    /// Returns whether the hand is a pair of equal rank value.
    #[must_use]
    pub fn can_split(&self) -> bool {
        matches!(self.cards.as_slice(), [a, b] if a.rank.value() == b.rank.value())
    }

    /// Returns whether the only card in the hand is an ace.
    #[must_use]
    pub fn shows_single_ace(&self) -> bool {
        matches!(self.cards.as_slice(), [card] if card.rank.is_ace())
    }
}
