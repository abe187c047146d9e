//! A blackjack rules engine for a single player against the dealer.
//!
//! The crate provides a [`Game`] type that manages the round flow (ante,
//! opening deal, hit, stand, double down, split, insurance, dealer play and
//! settlement) on top of an external [`CardSupply`]. The supply owns the
//! deck; the game draws, moves cards between piles and values what it lists.
//!
//! [`LocalSupply`] keeps decks in memory. With the `http` feature,
//! [`DeckApiSupply`] talks to a deckofcardsapi-compatible service.
//!
//! # Example
//!
//! ```no_run
//! use bjtable::{Game, GameOptions, LocalSupply, Target};
//!
//! # async fn play() -> Result<(), bjtable::ActionError> {
//! let game = Game::new(LocalSupply::new(42), GameOptions::default());
//! let table = game.start().await?;
//! if table.player.hand.value() < 17 {
//!     game.hit(Target::Player).await?;
//! }
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod card;
pub mod error;
pub mod game;
pub mod hand;
pub mod options;
pub mod result;
pub mod supply;
mod sync;

// Re-export main types
pub use card::{Card, DECK_SIZE, Rank, Suit};
pub use error::{ActionError, SupplyError, ValuationError};
pub use game::{Dealer, Game, GameStatus, Player, Snapshot, Target};
pub use hand::{Hand, HandStatus, hand_value};
pub use options::{GameOptions, RoundingMode};
pub use result::{HandOutcome, HandResult, RoundResult, insurance_payout, payout, resolve};
#[cfg(feature = "http")]
pub use supply::http::DeckApiSupply;
pub use supply::{CardSupply, DeckHandle, Pile, local::LocalSupply};
