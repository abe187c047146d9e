use std::sync::atomic::Ordering;

use tracing::{info, warn};

use crate::error::ActionError;
use crate::hand::{Hand, HandStatus};
use crate::supply::{CardSupply, DeckHandle, Pile};

use super::state::Round;
use super::{Game, GameStatus, Snapshot, Target};

fn ensure_playing(round: &Round, target: Target) -> Result<(), ActionError> {
    if round.status != GameStatus::PlayerTurn {
        return Err(ActionError::InvalidState);
    }

    if round.player.status(target) != HandStatus::Playing {
        return Err(ActionError::HandNotPlaying);
    }

    Ok(())
}

fn ensure_can_double(round: &Round, target: Target) -> Result<(), ActionError> {
    ensure_playing(round, target)?;

    if round.player.hand(target).len() != 2 {
        return Err(ActionError::CannotDouble);
    }

    if round.player.chips < round.player.bet(target) {
        return Err(ActionError::InsufficientFunds);
    }

    Ok(())
}

fn ensure_can_split(round: &Round) -> Result<(), ActionError> {
    ensure_playing(round, Target::Player)?;

    let player = &round.player;
    if player.has_split() || !player.hand.can_split() {
        return Err(ActionError::CannotSplit);
    }

    if player.chips < player.bet {
        return Err(ActionError::InsufficientFunds);
    }

    Ok(())
}

impl<S: CardSupply> Game<S> {
    /// Player action: Hit (draw a card into the target hand).
    ///
    /// # Errors
    ///
    /// Returns an error if it is not the player's turn, the target hand is
    /// not in play, or the supply fails.
    pub async fn hit(&self, target: Target) -> Result<Snapshot, ActionError> {
        let flight = self.begin()?;
        let epoch = flight.epoch;
        let known = {
            let round = self.round.lock();
            ensure_playing(&round, target)?;
            round.player.hand(target).clone()
        };

        let deck = self.deck_handle()?;
        let hand = self.deal_into(epoch, &deck, target.pile(), &known, 1).await?;

        self.commit(epoch, |round| {
            ensure_playing(round, target)?;
            round.player.receive(target, hand);
            info!(
                round = epoch,
                ?target,
                value = round.player.hand(target).value(),
                status = ?round.player.status(target),
                "hit"
            );
            round.end_player_turn_if_done();
            Ok(())
        })?;

        self.continue_round(epoch).await
    }

    /// Player action: Stand (keep the target hand).
    ///
    /// When no hand is left to play the dealer takes over and the round is
    /// settled before this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if it is not the player's turn, the target hand is
    /// not in play, or the supply fails during the dealer's turn.
    pub async fn stand(&self, target: Target) -> Result<Snapshot, ActionError> {
        let flight = self.begin()?;
        let epoch = flight.epoch;

        self.commit(epoch, |round| {
            ensure_playing(round, target)?;
            *round.player.status_mut(target) = HandStatus::Stood;
            info!(round = epoch, ?target, "stand");
            round.end_player_turn_if_done();
            Ok(())
        })?;

        self.continue_round(epoch).await
    }

    /// Player action: Double down (double the bet, take exactly one card).
    ///
    /// # Errors
    ///
    /// Returns an error if the target hand is not a playing two-card hand,
    /// the player cannot match the bet, or the supply fails.
    pub async fn double_down(&self, target: Target) -> Result<Snapshot, ActionError> {
        let flight = self.begin()?;
        let epoch = flight.epoch;
        let known = {
            let round = self.round.lock();
            ensure_can_double(&round, target)?;
            round.player.hand(target).clone()
        };

        let deck = self.deck_handle()?;
        let hand = self.deal_into(epoch, &deck, target.pile(), &known, 1).await?;

        self.commit(epoch, |round| {
            ensure_can_double(round, target)?;
            let player = &mut round.player;
            let bet = player.bet(target);
            player.chips -= bet;
            *player.bet_mut(target) = bet * 2;
            *player.status_mut(target) = HandStatus::DoubledDown;
            player.receive(target, hand);
            info!(
                round = epoch,
                ?target,
                bet = bet * 2,
                value = player.hand(target).value(),
                status = ?player.status(target),
                "double down"
            );
            round.end_player_turn_if_done();
            Ok(())
        })?;

        self.continue_round(epoch).await
    }

    /// Player action: Split a pair into two hands.
    ///
    /// The second card moves to the split pile, each hand receives one fresh
    /// card, and the split hand carries a bet equal to the original.
    ///
    /// # Errors
    ///
    /// Returns an error if the main hand is not a playing pair of equal
    /// value, the round was already split, the player cannot match the bet,
    /// or the supply fails. After a supply failure the pair is back in the
    /// player pile, so the split can be retried or the hand played on.
    pub async fn split(&self) -> Result<Snapshot, ActionError> {
        let flight = self.begin()?;
        let epoch = flight.epoch;
        let known = {
            let round = self.round.lock();
            ensure_can_split(&round)?;
            round.player.hand.clone()
        };

        let deck = self.deck_handle()?;
        let (hand, split_hand) = match self.split_cards(epoch, &deck, &known).await {
            Ok(hands) => hands,
            Err(err) => {
                self.undo_split(epoch, &deck, &known).await;
                return Err(err);
            }
        };

        self.commit(epoch, |round| {
            ensure_can_split(round)?;
            let player = &mut round.player;
            player.chips -= player.bet;
            player.split_bet = player.bet;
            player.split_hand_status = HandStatus::Playing;
            player.receive(Target::Player, hand);
            player.receive(Target::Split, split_hand);
            info!(
                round = epoch,
                hand = player.hand.value(),
                split = player.split_hand.value(),
                "split"
            );
            round.end_player_turn_if_done();
            Ok(())
        })?;

        self.continue_round(epoch).await
    }

    /// Moves the second card of the pair to the split pile and deals one card
    /// to each hand.
    ///
    /// Both piles are first put back to the hand the round knows, so a retry
    /// starts from the same cards.
    async fn split_cards(
        &self,
        epoch: u64,
        deck: &DeckHandle,
        known: &Hand,
    ) -> Result<(Hand, Hand), ActionError> {
        let [first, second] = known.cards() else {
            return Err(ActionError::CannotSplit);
        };
        let moved = vec![second.code.clone()];

        self.restore_pile(epoch, deck, Pile::Split, &[]).await?;
        self.restore_pile(epoch, deck, Pile::Player, known.cards()).await?;

        self.supply
            .remove_from_pile(deck, Pile::Player, &moved)
            .await
            .inspect_err(|err| warn!(error = %err, "moving split card failed"))?;
        self.ensure_current(epoch)?;
        self.add_cards(epoch, deck, Pile::Split, &moved).await?;

        let main = Hand::from_cards(vec![first.clone()])?;
        let split = Hand::from_cards(vec![second.clone()])?;
        let hand = self.deal_into(epoch, deck, Pile::Player, &main, 1).await?;
        let split_hand = self.deal_into(epoch, deck, Pile::Split, &split, 1).await?;
        Ok((hand, split_hand))
    }

    /// Puts the pair back in the player pile after a failed split.
    ///
    /// Cards dealt before the failure are left loose.
    async fn undo_split(&self, epoch: u64, deck: &DeckHandle, known: &Hand) {
        if self.epoch.load(Ordering::SeqCst) != epoch {
            return;
        }

        let restored = async {
            self.restore_pile(epoch, deck, Pile::Split, &[]).await?;
            self.restore_pile(epoch, deck, Pile::Player, known.cards()).await
        };
        if let Err(err) = restored.await {
            warn!(round = epoch, error = %err, "could not undo a partial split");
        }
    }
}
