//! The boundary to the external card supply service.
//!
//! The supply owns deck composition, shuffling, draws, and pile membership.
//! The game never holds cards of its own: it draws, moves cards between the
//! named piles, and lists a pile to learn what a hand holds.

use core::fmt;
use core::future::Future;

use crate::card::Card;
use crate::error::SupplyError;

#[cfg(feature = "http")]
#[cfg_attr(docsrs, doc(cfg(feature = "http")))]
pub mod http;
pub mod local;

/// Opaque identifier of a deck held by the supply.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeckHandle(String);

impl DeckHandle {
    /// Wraps a deck identifier issued by the supply.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeckHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named piles the game keeps on a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pile {
    /// The player's main hand.
    Player,
    /// The hand created by a split.
    Split,
    /// The dealer's hand.
    Dealer,
}

impl Pile {
    /// The service's pile name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player_hand",
            Self::Split => "split_hand",
            Self::Dealer => "dealer_hand",
        }
    }
}

impl fmt::Display for Pile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request/response contract of a card supply service.
///
/// Calls carry no ordering guarantee across piles; callers await each call
/// before issuing a dependent one.
pub trait CardSupply: Send + Sync {
    /// Creates a shuffled deck, or reshuffles `existing` and returns it.
    fn create_or_reshuffle(
        &self,
        existing: Option<&DeckHandle>,
    ) -> impl Future<Output = Result<DeckHandle, SupplyError>> + Send;

    /// Draws `count` cards from the top of the deck.
    fn draw(
        &self,
        deck: &DeckHandle,
        count: usize,
    ) -> impl Future<Output = Result<Vec<Card>, SupplyError>> + Send;

    /// Appends drawn cards to a pile.
    fn add_to_pile(
        &self,
        deck: &DeckHandle,
        pile: Pile,
        codes: &[String],
    ) -> impl Future<Output = Result<(), SupplyError>> + Send;

    /// Lists a pile in the order its cards were added.
    fn list_pile(
        &self,
        deck: &DeckHandle,
        pile: Pile,
    ) -> impl Future<Output = Result<Vec<Card>, SupplyError>> + Send;

    /// Takes the given cards back out of a pile.
    fn remove_from_pile(
        &self,
        deck: &DeckHandle,
        pile: Pile,
        codes: &[String],
    ) -> impl Future<Output = Result<(), SupplyError>> + Send;

    /// Returns every drawn card, piled or not, to the deck.
    fn return_all(&self, deck: &DeckHandle) -> impl Future<Output = Result<(), SupplyError>> + Send;
}
