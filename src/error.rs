//! Error types for valuation, the card supply, and game actions.

use thiserror::Error;

/// Errors raised by hand valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValuationError {
    /// Valuation is only defined for hands holding up to four aces.
    #[error("hands with {0} aces are not supported")]
    UnsupportedAceCount(usize),
}

/// Errors reported by a card supply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupplyError {
    /// The service could not be reached or the response could not be read.
    #[error("transport error: {0}")]
    Transport(String),
    /// The service answered with a non-success HTTP status.
    #[error("service responded with status {0}")]
    Status(u16),
    /// The service answered `success = false`.
    #[error("service rejected the request: {0}")]
    Rejected(String),
    /// The deck handle is not known to the service.
    #[error("unknown deck {0}")]
    UnknownDeck(String),
    /// The pile does not exist on the deck.
    #[error("unknown pile {0}")]
    UnknownPile(String),
    /// Not enough cards remain in the deck.
    #[error("deck exhausted: requested {requested}, remaining {remaining}")]
    DeckExhausted {
        /// Cards requested.
        requested: usize,
        /// Cards left in the deck.
        remaining: usize,
    },
    /// A card field could not be parsed.
    #[error("invalid card field {0:?}")]
    InvalidCard(String),
    /// A card expected in a pile was not there.
    #[error("card {0} is not in the pile")]
    MissingCard(String),
}

/// Errors that can occur during game actions.
///
/// Every variant except [`ActionError::Supply`], [`ActionError::Superseded`]
/// and [`ActionError::UnsupportedHand`] is a rejection: the action was a
/// no-op and the round is exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Invalid game state for this action.
    #[error("invalid game state for this action")]
    InvalidState,
    /// The targeted hand is not playing.
    #[error("hand is not playing")]
    HandNotPlaying,
    /// Cannot double down on this hand.
    #[error("cannot double down on this hand")]
    CannotDouble,
    /// Cannot split this hand.
    #[error("cannot split this hand")]
    CannotSplit,
    /// Insurance is not available right now.
    #[error("insurance is not available")]
    InsuranceUnavailable,
    /// Insufficient chips for this action.
    #[error("insufficient chips for this action")]
    InsufficientFunds,
    /// Another action is still waiting on the card supply.
    #[error("another action is in progress")]
    Busy,
    /// The round was restarted while this action was waiting on the supply.
    #[error("round was superseded by a new start")]
    Superseded,
    /// The card supply failed; the round is unchanged and the action may be retried.
    #[error("card supply failed: {0}")]
    Supply(#[from] SupplyError),
    /// The supply returned a hand outside the supported valuation domain.
    #[error("unsupported hand: {0}")]
    UnsupportedHand(#[from] ValuationError),
}

impl ActionError {
    /// Returns whether this error is a validation rejection (state untouched,
    /// nothing was requested from the supply).
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(
            self,
            Self::Supply(_) | Self::Superseded | Self::UnsupportedHand(_)
        )
    }
}
