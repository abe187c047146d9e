use tracing::{debug, info};

use crate::error::ActionError;
use crate::hand::{Hand, HandStatus};
use crate::result::{HandResult, RoundResult, insurance_payout, payout, resolve};
use crate::supply::{CardSupply, Pile};

use super::state::Round;
use super::{Game, GameStatus, Snapshot};

/// Dealer stands on this value or higher.
const DEALER_STANDS: u8 = 17;

/// Evaluates the dealer's hand between draws.
///
/// With nothing left to contest the dealer only completes a two-card hand,
/// which is enough to settle naturals.
fn dealer_status(hand: &Hand, contested: bool) -> HandStatus {
    if hand.is_natural() {
        HandStatus::Blackjack
    } else if hand.is_bust() {
        HandStatus::Bust
    } else if hand.value() >= DEALER_STANDS || (!contested && hand.len() >= 2) {
        HandStatus::Stood
    } else {
        HandStatus::Playing
    }
}

impl<S: CardSupply> Game<S> {
    /// Plays out the dealer's hand and settles the round.
    ///
    /// Actions that end the player's turn do this themselves. Calling it
    /// directly resumes a round whose dealer draw failed.
    ///
    /// # Errors
    ///
    /// Returns an error if it is not the dealer's turn or the supply fails.
    pub async fn play_dealer(&self) -> Result<Snapshot, ActionError> {
        let flight = self.begin()?;
        if self.status() != GameStatus::DealerTurn {
            return Err(ActionError::InvalidState);
        }

        self.run_dealer(flight.epoch).await?;
        Ok(self.snapshot())
    }

    /// Draws for the dealer one card at a time until the hand is final.
    pub(super) async fn run_dealer(&self, epoch: u64) -> Result<(), ActionError> {
        loop {
            let (status, known) = self.commit(epoch, |round| {
                if round.status != GameStatus::DealerTurn {
                    return Err(ActionError::InvalidState);
                }
                let status = dealer_status(&round.dealer.hand, round.player.is_contested());
                round.dealer.status = status;
                if status.is_terminal() {
                    round.status = GameStatus::Resolving;
                }
                Ok((status, round.dealer.hand.clone()))
            })?;
            if status.is_terminal() {
                break;
            }

            let delay = self.options.dealer_delay;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
                self.ensure_current(epoch)?;
            }

            let deck = self.deck_handle()?;
            let hand = self.deal_into(epoch, &deck, Pile::Dealer, &known, 1).await?;
            self.commit(epoch, |round| {
                debug!(round = epoch, value = hand.value(), "dealer drew");
                round.dealer.hand = hand;
                Ok(())
            })?;
        }

        self.commit(epoch, |round| {
            self.settle(epoch, round);
            Ok(())
        })
    }

    /// Resolves every hand, credits the chips and finishes the round.
    fn settle(&self, epoch: u64, round: &mut Round) {
        let options = &self.options;
        let dealer = &round.dealer.hand;
        let player = &mut round.player;
        let can_blackjack = !player.has_split();

        let settle_hand = |hand: &Hand, bet: usize, insurance: usize| {
            let outcome = resolve(hand, dealer, can_blackjack);
            HandResult {
                outcome,
                bet,
                payout: payout(outcome, bet, insurance, options),
                player_value: hand.value(),
                dealer_value: dealer.value(),
            }
        };

        let insured = insurance_payout(player.insurance, dealer);
        let hand = settle_hand(&player.hand, player.bet, insured);
        let split = player
            .has_split()
            .then(|| settle_hand(&player.split_hand, player.split_bet, 0));

        let total_payout = hand.payout + split.map_or(0, |r| r.payout);
        player.chips += total_payout;
        #[expect(clippy::cast_possible_wrap, reason = "chip counts fit in isize")]
        let net = total_payout as isize - player.committed() as isize;

        let result = RoundResult {
            hand,
            split,
            insurance: player.insurance,
            insurance_payout: insured,
            total_payout,
            net,
            dealer_value: dealer.value(),
            dealer_bust: dealer.is_bust(),
            dealer_blackjack: dealer.is_natural(),
        };
        info!(
            round = epoch,
            outcome = ?result.hand.outcome,
            split = ?result.split.map(|r| r.outcome),
            dealer = result.dealer_value,
            net,
            chips = player.chips,
            "round settled"
        );

        round.result = Some(result);
        round.status = GameStatus::Finished;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Rank, Suit};

    fn hand(ranks: &[Rank]) -> Hand {
        Hand::from_cards(ranks.iter().map(|&r| Card::new(r, Suit::Clubs)).collect()).unwrap()
    }

    #[test]
    fn dealer_draws_below_seventeen() {
        assert_eq!(
            dealer_status(&hand(&[Rank::Ten, Rank::Six]), true),
            HandStatus::Playing
        );
        assert_eq!(
            dealer_status(&hand(&[Rank::Ten, Rank::Seven]), true),
            HandStatus::Stood
        );
        assert_eq!(
            dealer_status(&hand(&[Rank::Ace, Rank::Six]), true),
            HandStatus::Stood
        );
        assert_eq!(
            dealer_status(&hand(&[Rank::Ten, Rank::Six, Rank::Nine]), true),
            HandStatus::Bust
        );
        assert_eq!(
            dealer_status(&hand(&[Rank::Ace, Rank::Queen]), true),
            HandStatus::Blackjack
        );
    }

    #[test]
    fn uncontested_dealer_only_completes_two_cards() {
        assert_eq!(dealer_status(&hand(&[Rank::Seven]), false), HandStatus::Playing);
        assert_eq!(
            dealer_status(&hand(&[Rank::Seven, Rank::Eight]), false),
            HandStatus::Stood
        );
        assert_eq!(
            dealer_status(&hand(&[Rank::Ace, Rank::King]), false),
            HandStatus::Blackjack
        );
    }
}
