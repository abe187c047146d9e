use tracing::info;

use crate::error::ActionError;
use crate::hand::HandStatus;
use crate::supply::CardSupply;

use super::state::Round;
use super::{Game, GameStatus, Snapshot};

impl<S: CardSupply> Game<S> {
    fn insurance_check(&self, round: &Round) -> Result<usize, ActionError> {
        if round.status != GameStatus::PlayerTurn {
            return Err(ActionError::InvalidState);
        }

        let player = &round.player;
        let stake = player.bet / 2;
        if !self.options.insurance
            || !round.dealer.hand.shows_single_ace()
            || player.hand.len() > 2
            || player.insurance > 0
            || stake == 0
        {
            return Err(ActionError::InsuranceUnavailable);
        }

        if player.chips < stake {
            return Err(ActionError::InsufficientFunds);
        }

        Ok(stake)
    }

    /// Returns whether the player may buy insurance right now.
    #[must_use]
    pub fn is_insurance_offered(&self) -> bool {
        self.insurance_check(&self.round.lock()).is_ok()
    }

    /// Buys insurance for half the main bet.
    ///
    /// Insurance ends the player's turn: every hand still in play stands and
    /// the dealer plays out the round. The stake pays 2:1 if the dealer holds
    /// a natural.
    ///
    /// # Errors
    ///
    /// Returns an error if insurance is not on offer, the player cannot cover
    /// the stake, or the supply fails during the dealer's turn.
    pub async fn buy_insurance(&self) -> Result<Snapshot, ActionError> {
        let flight = self.begin()?;
        let epoch = flight.epoch;

        self.commit(epoch, |round| {
            let stake = self.insurance_check(round)?;
            let player = &mut round.player;
            player.chips -= stake;
            player.insurance = stake;
            for status in [&mut player.hand_status, &mut player.split_hand_status] {
                if *status == HandStatus::Playing {
                    *status = HandStatus::Stood;
                }
            }
            info!(round = epoch, insurance = stake, "insurance bought");
            round.end_player_turn_if_done();
            Ok(())
        })?;

        self.continue_round(epoch).await
    }
}
