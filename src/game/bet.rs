use std::sync::atomic::Ordering;

use tracing::{info, warn};

use crate::error::ActionError;
use crate::hand::{Hand, HandStatus};
use crate::supply::{CardSupply, DeckHandle, Pile};

use super::state::{Dealer, Round};
use super::{Flight, Game, GameStatus, Snapshot};

impl<S: CardSupply> Game<S> {
    /// Starts a new round.
    ///
    /// Returns the previous round's cards to the deck and reshuffles it (or
    /// creates a deck on first use), takes the ante, and deals one card to
    /// the dealer and two to the player. A natural ends the player's turn
    /// straight away and the round plays out to the finish.
    ///
    /// Valid once the previous round is finished, or while another action is
    /// still waiting on the supply, in which case that action is superseded.
    ///
    /// # Errors
    ///
    /// Returns an error if a round is in progress, the player cannot cover
    /// the ante, or the supply fails. On supply failure the game status is
    /// restored and the call can be retried.
    pub async fn start(&self) -> Result<Snapshot, ActionError> {
        let ante = self.options.ante;
        let (flight, previous) = {
            let mut round = self.round.lock();
            let mut slot = self.in_flight.lock();

            let idle = matches!(round.status, GameStatus::NotPlaying | GameStatus::Finished);
            if slot.is_none() && !idle {
                return Err(ActionError::InvalidState);
            }
            if ante == 0 || round.player.chips < ante {
                return Err(ActionError::InsufficientFunds);
            }

            let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            *slot = Some(epoch);
            let previous = round.status;
            round.status = GameStatus::Setup;
            (
                Flight {
                    slot: &self.in_flight,
                    epoch,
                },
                previous,
            )
        };
        let epoch = flight.epoch;

        let (dealer, player) = match self.deal_opening(epoch).await {
            Ok(hands) => hands,
            Err(err) => {
                warn!(round = epoch, error = %err, "opening deal failed");
                let mut round = self.round.lock();
                if self.epoch.load(Ordering::SeqCst) == epoch && round.status == GameStatus::Setup {
                    round.status = previous;
                }
                return Err(err);
            }
        };

        self.commit(epoch, |round| {
            let chips = round.player.chips.checked_sub(ante).ok_or(ActionError::InsufficientFunds)?;
            *round = Round::new(chips);
            round.player.bet = ante;
            round.player.hand_status = HandStatus::Playing;
            round.player.receive(super::Target::Player, player);
            round.dealer = Dealer {
                hand: dealer,
                status: HandStatus::Waiting,
            };
            round.status = GameStatus::PlayerTurn;
            info!(
                round = epoch,
                chips,
                bet = ante,
                player = round.player.hand.value(),
                dealer = round.dealer.hand.value(),
                "round started"
            );
            round.end_player_turn_if_done();
            Ok(())
        })?;

        self.continue_round(epoch).await
    }

    /// Resets the deck and deals the opening hands as (dealer, player).
    async fn deal_opening(&self, epoch: u64) -> Result<(Hand, Hand), ActionError> {
        let existing = self.deck.lock().clone();
        if let Some(deck) = &existing {
            self.supply.return_all(deck).await?;
            self.ensure_current(epoch)?;
        }

        let deck: DeckHandle = self.supply.create_or_reshuffle(existing.as_ref()).await?;
        self.ensure_current(epoch)?;
        *self.deck.lock() = Some(deck.clone());

        let empty = Hand::new();
        let dealer = self.deal_into(epoch, &deck, Pile::Dealer, &empty, 1).await?;
        let player = self.deal_into(epoch, &deck, Pile::Player, &empty, 2).await?;
        Ok((dealer, player))
    }
}
