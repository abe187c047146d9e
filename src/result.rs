//! Outcome resolution and payouts.

use crate::hand::{BLACKJACK, Hand};
use crate::options::{GameOptions, RoundingMode};

/// Settlement outcome of a single player hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HandOutcome {
    /// Natural blackjack against a dealer without one.
    Blackjack,
    /// Tie; the stake comes back.
    Push,
    /// Dealer wins.
    Lose,
    /// Six-card Charlie.
    Charlie,
    /// Player went over 21.
    Bust,
    /// Player beats the dealer.
    Win,
}

/// Resolves a finished player hand against the dealer's final hand.
///
/// Rules are checked in order and the first match wins. `can_blackjack` is
/// `false` once the round has been split, so a two-card 21 on a split hand
/// settles like any other 21.
#[must_use]
pub fn resolve(player: &Hand, dealer: &Hand, can_blackjack: bool) -> HandOutcome {
    let player_value = player.value();
    let dealer_value = dealer.value();

    if can_blackjack && player.is_natural() {
        if dealer.is_natural() {
            return HandOutcome::Push;
        }
        return HandOutcome::Blackjack;
    }
    if dealer.is_natural() {
        return HandOutcome::Lose;
    }
    if player.is_charlie() {
        if dealer_value == BLACKJACK {
            return HandOutcome::Push;
        }
        return HandOutcome::Charlie;
    }
    if player_value > BLACKJACK {
        HandOutcome::Bust
    } else if player_value > dealer_value {
        HandOutcome::Win
    } else if player_value == dealer_value {
        HandOutcome::Push
    } else if dealer_value > BLACKJACK {
        HandOutcome::Win
    } else {
        HandOutcome::Lose
    }
}

fn round_amount(amount: f64, mode: RoundingMode) -> usize {
    match mode {
        RoundingMode::Up => amount.ceil() as usize,
        RoundingMode::Down => amount.floor() as usize,
        RoundingMode::Nearest => amount.round() as usize,
    }
}

/// Chips returned to the player for a settled hand.
///
/// `insurance_payout` is the already-computed insurance return (see
/// [`insurance_payout`]); it is only non-zero when the dealer holds a
/// natural, which rules out `Win`, `Charlie` and `Blackjack`.
#[must_use]
pub fn payout(
    outcome: HandOutcome,
    bet: usize,
    insurance_payout: usize,
    options: &GameOptions,
) -> usize {
    match outcome {
        HandOutcome::Blackjack => {
            #[expect(
                clippy::cast_precision_loss,
                reason = "f64 has sufficient precision for chip amounts"
            )]
            let winnings = (bet as f64) * options.blackjack_pays;
            bet + round_amount(winnings, options.rounding_blackjack) + insurance_payout
        }
        HandOutcome::Win | HandOutcome::Charlie => bet * 2 + insurance_payout,
        HandOutcome::Push => bet + insurance_payout,
        HandOutcome::Lose | HandOutcome::Bust => insurance_payout,
    }
}

/// Insurance pays 2:1 only when the dealer's final hand is a natural.
#[must_use]
pub fn insurance_payout(insurance: usize, dealer: &Hand) -> usize {
    if dealer.is_natural() { insurance * 2 } else { 0 }
}

/// Result for a single hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandResult {
    /// The outcome of the hand.
    pub outcome: HandOutcome,
    /// The bet amount for this hand.
    pub bet: usize,
    /// Chips returned for this hand (includes insurance on the main hand).
    pub payout: usize,
    /// The player's hand value.
    pub player_value: u8,
    /// The dealer's hand value.
    pub dealer_value: u8,
}

/// Result of a settled round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundResult {
    /// Result of the main hand.
    pub hand: HandResult,
    /// Result of the split hand, if the round was split.
    pub split: Option<HandResult>,
    /// Insurance wager (0 if none was bought).
    pub insurance: usize,
    /// Insurance return folded into the main hand's payout.
    pub insurance_payout: usize,
    /// Chips credited back for the round.
    pub total_payout: usize,
    /// Net result over everything committed this round.
    pub net: isize,
    /// The dealer's final hand value.
    pub dealer_value: u8,
    /// Whether the dealer busted.
    pub dealer_bust: bool,
    /// Whether the dealer had a natural.
    pub dealer_blackjack: bool,
}

impl RoundResult {
    /// Returns whether insurance was bought this round.
    #[must_use]
    pub const fn is_insured(&self) -> bool {
        self.insurance > 0
    }
}
