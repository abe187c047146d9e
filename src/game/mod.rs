//! Game engine and state management.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::card::Card;
use crate::error::ActionError;
use crate::hand::Hand;
use crate::options::GameOptions;
use crate::supply::{CardSupply, DeckHandle, Pile};
use crate::sync::Mutex;

mod actions;
mod bet;
mod dealer;
mod insurance;
pub mod state;

pub use state::{Dealer, GameStatus, Player, Snapshot, Target};

use state::Round;

/// A single-table blackjack game driven by an external card supply.
///
/// All state lives behind the game and is read through [`Game::snapshot`].
/// Actions are `async` because they wait on the supply; only one may be
/// outstanding at a time; a second one is rejected with
/// [`ActionError::Busy`]. [`Game::start`] is the exception: it supersedes
/// whatever is in flight, and responses to the superseded action are
/// discarded.
pub struct Game<S> {
    supply: S,
    /// Game options.
    pub options: GameOptions,
    round: Mutex<Round>,
    deck: Mutex<Option<DeckHandle>>,
    /// Identifier of the current round; bumped by every `start`.
    epoch: AtomicU64,
    /// Round identifier of the action currently waiting on the supply.
    in_flight: Mutex<Option<u64>>,
}

/// Marks an action as outstanding until dropped.
struct Flight<'a> {
    slot: &'a Mutex<Option<u64>>,
    epoch: u64,
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        let mut slot = self.slot.lock();
        if *slot == Some(self.epoch) {
            *slot = None;
        }
    }
}

impl<S: CardSupply> Game<S> {
    /// Creates a game that draws from `supply`.
    ///
    /// # Example
    ///
    /// ```
    /// use bjtable::{Game, GameOptions, GameStatus, LocalSupply};
    ///
    /// let game = Game::new(LocalSupply::new(42), GameOptions::default());
    /// assert_eq!(game.status(), GameStatus::NotPlaying);
    /// assert_eq!(game.chips(), 100);
    /// ```
    #[must_use]
    pub fn new(supply: S, options: GameOptions) -> Self {
        let round = Round::new(options.starting_chips);
        Self {
            supply,
            options,
            round: Mutex::new(round),
            deck: Mutex::new(None),
            epoch: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        }
    }

    /// Returns the card supply.
    #[must_use]
    pub const fn supply(&self) -> &S {
        &self.supply
    }

    /// Returns the deck the game is dealing from, if one was created.
    #[must_use]
    pub fn deck(&self) -> Option<DeckHandle> {
        self.deck.lock().clone()
    }

    /// Returns a read-only copy of the table.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let round = self.round.lock();
        Snapshot {
            round: self.epoch.load(Ordering::SeqCst),
            game_status: round.status,
            player: round.player.clone(),
            dealer: round.dealer.clone(),
            result: round.result,
        }
    }

    /// Returns the current game status.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.round.lock().status
    }

    /// Returns the player's uncommitted chips.
    #[must_use]
    pub fn chips(&self) -> usize {
        self.round.lock().player.chips
    }

    /// Returns whether an action is waiting on the supply.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.lock().is_some()
    }

    /// Claims the in-flight slot for an action on the current round.
    fn begin(&self) -> Result<Flight<'_>, ActionError> {
        let mut slot = self.in_flight.lock();
        if slot.is_some() {
            return Err(ActionError::Busy);
        }
        let epoch = self.epoch.load(Ordering::SeqCst);
        *slot = Some(epoch);
        Ok(Flight {
            slot: &self.in_flight,
            epoch,
        })
    }

    /// Fails with [`ActionError::Superseded`] once a newer round has started.
    fn ensure_current(&self, epoch: u64) -> Result<(), ActionError> {
        if self.epoch.load(Ordering::SeqCst) == epoch {
            Ok(())
        } else {
            warn!(round = epoch, "discarding supply response for a superseded round");
            Err(ActionError::Superseded)
        }
    }

    /// Applies `f` to the round if `epoch` is still current.
    fn commit<R>(
        &self,
        epoch: u64,
        f: impl FnOnce(&mut Round) -> Result<R, ActionError>,
    ) -> Result<R, ActionError> {
        let mut round = self.round.lock();
        self.ensure_current(epoch)?;
        f(&mut round)
    }

    fn deck_handle(&self) -> Result<DeckHandle, ActionError> {
        self.deck.lock().clone().ok_or(ActionError::InvalidState)
    }

    /// Lists a pile as the supply holds it.
    async fn list_cards(
        &self,
        epoch: u64,
        deck: &DeckHandle,
        pile: Pile,
    ) -> Result<Vec<Card>, ActionError> {
        let cards = self
            .supply
            .list_pile(deck, pile)
            .await
            .inspect_err(|err| warn!(%pile, error = %err, "pile listing failed"))?;
        self.ensure_current(epoch)?;
        Ok(cards)
    }

    async fn add_cards(
        &self,
        epoch: u64,
        deck: &DeckHandle,
        pile: Pile,
        codes: &[String],
    ) -> Result<(), ActionError> {
        self.supply
            .add_to_pile(deck, pile, codes)
            .await
            .inspect_err(|err| warn!(%pile, error = %err, "adding to pile failed"))?;
        self.ensure_current(epoch)
    }

    /// Draws into a pile until it holds `count` cards beyond `known`.
    ///
    /// The pile listing is authoritative: cards a failed attempt already put
    /// in the pile count towards `count`, and cards of `known` that went
    /// missing are put back before drawing.
    async fn deal_into(
        &self,
        epoch: u64,
        deck: &DeckHandle,
        pile: Pile,
        known: &Hand,
        count: usize,
    ) -> Result<Hand, ActionError> {
        let listed = self.list_cards(epoch, deck, pile).await?;

        let missing = codes_not_in(known.cards(), &listed);
        if !missing.is_empty() {
            warn!(%pile, cards = ?missing, "restoring cards missing from pile");
            self.add_cards(epoch, deck, pile, &missing).await?;
        }

        let pending = codes_not_in(&listed, known.cards());
        if !pending.is_empty() {
            debug!(%pile, cards = ?pending, "adopting cards already in pile");
        }
        let needed = count.saturating_sub(pending.len());
        if needed == 0 && missing.is_empty() {
            return Ok(Hand::from_cards(listed)?);
        }

        if needed > 0 {
            let drawn = self
                .supply
                .draw(deck, needed)
                .await
                .inspect_err(|err| warn!(%pile, needed, error = %err, "draw failed"))?;
            self.ensure_current(epoch)?;

            let codes = codes_of(&drawn);
            debug!(%pile, cards = ?codes, "dealt");
            self.add_cards(epoch, deck, pile, &codes).await?;
        }

        let cards = self.list_cards(epoch, deck, pile).await?;
        Ok(Hand::from_cards(cards)?)
    }

    /// Puts a pile back to exactly `known`; other cards are left loose.
    async fn restore_pile(
        &self,
        epoch: u64,
        deck: &DeckHandle,
        pile: Pile,
        known: &[Card],
    ) -> Result<(), ActionError> {
        let listed = self.list_cards(epoch, deck, pile).await?;

        let extra = codes_not_in(&listed, known);
        if !extra.is_empty() {
            self.supply
                .remove_from_pile(deck, pile, &extra)
                .await
                .inspect_err(|err| warn!(%pile, error = %err, "removing from pile failed"))?;
            self.ensure_current(epoch)?;
        }

        let missing = codes_not_in(known, &listed);
        if !missing.is_empty() {
            self.add_cards(epoch, deck, pile, &missing).await?;
        }
        Ok(())
    }

    /// Runs the dealer if the player side just finished, then reports the table.
    async fn continue_round(&self, epoch: u64) -> Result<Snapshot, ActionError> {
        if self.status() == GameStatus::DealerTurn {
            self.run_dealer(epoch).await?;
        }
        Ok(self.snapshot())
    }
}

fn codes_of(cards: &[Card]) -> Vec<String> {
    cards.iter().map(|card| card.code.clone()).collect()
}

/// Codes of the cards in `cards` that `other` does not hold.
fn codes_not_in(cards: &[Card], other: &[Card]) -> Vec<String> {
    cards
        .iter()
        .filter(|card| !other.iter().any(|o| o.code == card.code))
        .map(|card| card.code.clone())
        .collect()
}
