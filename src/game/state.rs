//! Game state types.

use crate::hand::{Hand, HandStatus};
use crate::result::{HandResult, RoundResult};
use crate::supply::Pile;

/// Phase of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    /// No round has been played yet.
    #[default]
    NotPlaying,
    /// Dealing the opening cards.
    Setup,
    /// Waiting for player actions.
    PlayerTurn,
    /// Dealer plays out their hand.
    DealerTurn,
    /// Hands are being settled.
    Resolving,
    /// Round is settled; a new one can start.
    Finished,
}

/// The player-controlled hand an action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    /// The main hand.
    Player,
    /// The hand created by a split.
    Split,
}

impl Target {
    /// The supply pile holding this hand.
    #[must_use]
    pub const fn pile(self) -> Pile {
        match self {
            Self::Player => Pile::Player,
            Self::Split => Pile::Split,
        }
    }
}

/// The player's side of the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Player {
    /// Chips not committed to the current round.
    pub chips: usize,
    /// Bet on the main hand.
    pub bet: usize,
    /// The main hand.
    pub hand: Hand,
    /// Status of the main hand.
    pub hand_status: HandStatus,
    /// Bet on the split hand (0 without a split).
    pub split_bet: usize,
    /// The split hand (empty without a split).
    pub split_hand: Hand,
    /// Status of the split hand (`Waiting` without a split).
    pub split_hand_status: HandStatus,
    /// Insurance wager (0 if none).
    pub insurance: usize,
}

impl Player {
    pub(crate) fn with_chips(chips: usize) -> Self {
        Self {
            chips,
            ..Self::default()
        }
    }

    /// Returns whether the round has been split.
    #[must_use]
    pub fn has_split(&self) -> bool {
        self.split_hand_status != HandStatus::Waiting
    }

    /// Returns the hand for a target.
    #[must_use]
    pub const fn hand(&self, target: Target) -> &Hand {
        match target {
            Target::Player => &self.hand,
            Target::Split => &self.split_hand,
        }
    }

    /// Returns the status of a target's hand.
    #[must_use]
    pub const fn status(&self, target: Target) -> HandStatus {
        match target {
            Target::Player => self.hand_status,
            Target::Split => self.split_hand_status,
        }
    }

    /// Returns the bet riding on a target's hand.
    #[must_use]
    pub const fn bet(&self, target: Target) -> usize {
        match target {
            Target::Player => self.bet,
            Target::Split => self.split_bet,
        }
    }

    pub(crate) const fn status_mut(&mut self, target: Target) -> &mut HandStatus {
        match target {
            Target::Player => &mut self.hand_status,
            Target::Split => &mut self.split_hand_status,
        }
    }

    pub(crate) const fn bet_mut(&mut self, target: Target) -> &mut usize {
        match target {
            Target::Player => &mut self.bet,
            Target::Split => &mut self.split_bet,
        }
    }

    /// Replaces a hand with the supply's listing and applies the post-draw rules.
    pub(crate) fn receive(&mut self, target: Target, hand: Hand) {
        let status = self.status(target).after_cards(&hand);
        match target {
            Target::Player => self.hand = hand,
            Target::Split => self.split_hand = hand,
        }
        *self.status_mut(target) = status;
    }

    /// Returns whether every hand in play has reached a terminal status.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.hand_status.is_terminal() && (!self.has_split() || self.split_hand_status.is_terminal())
    }

    /// Returns whether a hand is left that the dealer has to draw against.
    ///
    /// After a split a two-card 21 settles on value, so it is contested too.
    pub(crate) fn is_contested(&self) -> bool {
        let split = self.has_split();
        let contested = |status| match status {
            HandStatus::Stood | HandStatus::Charlie => true,
            HandStatus::Blackjack => split,
            _ => false,
        };
        contested(self.hand_status) || (split && contested(self.split_hand_status))
    }

    /// Total chips committed to the round.
    #[must_use]
    pub const fn committed(&self) -> usize {
        self.bet + self.split_bet + self.insurance
    }
}

/// The dealer's side of the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Dealer {
    /// The dealer's hand.
    pub hand: Hand,
    /// Status of the dealer's hand.
    pub status: HandStatus,
}

/// Everything owned by the current round.
#[derive(Debug, Clone, Default)]
pub(crate) struct Round {
    pub(crate) status: GameStatus,
    pub(crate) player: Player,
    pub(crate) dealer: Dealer,
    pub(crate) result: Option<RoundResult>,
}

impl Round {
    pub(crate) fn new(chips: usize) -> Self {
        Self {
            player: Player::with_chips(chips),
            ..Self::default()
        }
    }

    /// Hands the turn to the dealer once no player hand is left to act.
    pub(crate) fn end_player_turn_if_done(&mut self) {
        if self.status == GameStatus::PlayerTurn && self.player.is_done() {
            self.status = GameStatus::DealerTurn;
            self.dealer.status = HandStatus::Playing;
        }
    }
}

/// A read-only copy of the table for the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    /// Identifier of the round the snapshot belongs to.
    pub round: u64,
    /// Phase of the round.
    pub game_status: GameStatus,
    /// The player's side.
    pub player: Player,
    /// The dealer's side.
    pub dealer: Dealer,
    /// Settlement, once the round is finished.
    pub result: Option<RoundResult>,
}

impl Snapshot {
    /// Result of the main hand, once settled.
    #[must_use]
    pub fn hand_result(&self) -> Option<HandResult> {
        self.result.map(|r| r.hand)
    }

    /// Result of the split hand, once settled and if the round was split.
    #[must_use]
    pub fn split_result(&self) -> Option<HandResult> {
        self.result.and_then(|r| r.split)
    }
}
