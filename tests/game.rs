//! Game integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Notify;

use bjtable::{
    ActionError, Card, CardSupply, DeckHandle, Game, GameOptions, GameStatus, HandOutcome,
    HandStatus, LocalSupply, Pile, Rank, Suit, SupplyError, Target,
};

fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

fn spade(rank: Rank) -> Card {
    card(rank, Suit::Spades)
}

fn options() -> GameOptions {
    GameOptions::default().with_dealer_delay(Duration::ZERO)
}

/// Fails calls of one kind after letting `skip` of them through.
#[derive(Default)]
struct Fault {
    skip: AtomicUsize,
    fail: AtomicUsize,
}

impl Fault {
    fn arm(&self, skip: usize, fail: usize) {
        self.skip.store(skip, Ordering::SeqCst);
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), SupplyError> {
        if self.fail.load(Ordering::SeqCst) == 0 {
            return Ok(());
        }
        let skipped = self
            .skip
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if skipped {
            return Ok(());
        }
        let failing = self
            .fail
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(SupplyError::Transport("connection reset".to_owned()));
        }
        Ok(())
    }
}

/// Local supply that can fail calls or hold a draw until released.
struct TestSupply {
    inner: LocalSupply,
    draws: Fault,
    adds: Fault,
    lists: Fault,
    removes: Fault,
    gated: AtomicBool,
    entered: Notify,
    release: Notify,
}

impl TestSupply {
    fn stacked(draws: Vec<Card>) -> Self {
        Self {
            inner: LocalSupply::stacked(draws),
            draws: Fault::default(),
            adds: Fault::default(),
            lists: Fault::default(),
            removes: Fault::default(),
            gated: AtomicBool::new(false),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    /// Fails the next `n` draws with a transport error.
    fn fail_next_draws(&self, n: usize) {
        self.draws.arm(0, n);
    }

    /// Holds the next draw until `release` is notified.
    fn gate_next_draw(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }
}

impl CardSupply for TestSupply {
    async fn create_or_reshuffle(
        &self,
        existing: Option<&DeckHandle>,
    ) -> Result<DeckHandle, SupplyError> {
        self.inner.create_or_reshuffle(existing).await
    }

    async fn draw(&self, deck: &DeckHandle, count: usize) -> Result<Vec<Card>, SupplyError> {
        if self.gated.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.draws.check()?;
        self.inner.draw(deck, count).await
    }

    async fn add_to_pile(
        &self,
        deck: &DeckHandle,
        pile: Pile,
        codes: &[String],
    ) -> Result<(), SupplyError> {
        self.adds.check()?;
        self.inner.add_to_pile(deck, pile, codes).await
    }

    async fn list_pile(&self, deck: &DeckHandle, pile: Pile) -> Result<Vec<Card>, SupplyError> {
        self.lists.check()?;
        self.inner.list_pile(deck, pile).await
    }

    async fn remove_from_pile(
        &self,
        deck: &DeckHandle,
        pile: Pile,
        codes: &[String],
    ) -> Result<(), SupplyError> {
        self.removes.check()?;
        self.inner.remove_from_pile(deck, pile, codes).await
    }

    async fn return_all(&self, deck: &DeckHandle) -> Result<(), SupplyError> {
        self.inner.return_all(deck).await
    }
}

fn stacked_game(draws: Vec<Card>) -> Game<TestSupply> {
    Game::new(TestSupply::stacked(draws), options())
}

#[tokio::test]
async fn natural_blackjack_pays_three_to_two() {
    // Dealer 7, player A K, dealer completes with an 8.
    let game = stacked_game(vec![
        spade(Rank::Seven),
        spade(Rank::Ace),
        spade(Rank::King),
        spade(Rank::Eight),
    ]);

    let table = game.start().await.unwrap();
    assert_eq!(table.game_status, GameStatus::Finished);
    assert_eq!(table.player.hand_status, HandStatus::Blackjack);
    assert_eq!(table.dealer.hand.len(), 2);
    assert_eq!(table.dealer.hand.value(), 15);
    assert_eq!(table.dealer.status, HandStatus::Stood);

    let result = table.hand_result().unwrap();
    assert_eq!(result.outcome, HandOutcome::Blackjack);
    assert_eq!(result.payout, 25);
    assert_eq!(game.chips(), 115);
    assert_eq!(table.result.unwrap().net, 15);
}

#[tokio::test]
async fn naturals_on_both_sides_push() {
    let game = stacked_game(vec![
        spade(Rank::Ace),
        card(Rank::Ace, Suit::Hearts),
        spade(Rank::King),
        card(Rank::King, Suit::Hearts),
    ]);

    let table = game.start().await.unwrap();
    assert_eq!(table.dealer.status, HandStatus::Blackjack);
    assert_eq!(table.hand_result().unwrap().outcome, HandOutcome::Push);
    assert_eq!(game.chips(), 100);
}

#[tokio::test]
async fn stand_hands_over_to_dealer() {
    let game = stacked_game(vec![
        spade(Rank::Nine),
        spade(Rank::Ten),
        spade(Rank::Seven),
        spade(Rank::Eight),
    ]);

    let table = game.start().await.unwrap();
    assert_eq!(table.game_status, GameStatus::PlayerTurn);
    assert_eq!(table.player.hand.value(), 17);
    assert_eq!(table.player.bet, 10);
    assert_eq!(table.player.chips, 90);
    assert!(!game.is_insurance_offered());
    assert_eq!(
        game.buy_insurance().await.unwrap_err(),
        ActionError::InsuranceUnavailable
    );

    let table = game.stand(Target::Player).await.unwrap();
    assert_eq!(table.game_status, GameStatus::Finished);
    assert_eq!(table.player.hand_status, HandStatus::Stood);
    assert_eq!(table.dealer.hand.value(), 17);
    assert_eq!(table.hand_result().unwrap().outcome, HandOutcome::Push);
    assert_eq!(game.chips(), 100);

    assert_eq!(
        game.hit(Target::Player).await.unwrap_err(),
        ActionError::InvalidState
    );
}

#[tokio::test]
async fn bust_ends_the_hand_and_dealer_completes() {
    let game = stacked_game(vec![
        spade(Rank::Seven),
        spade(Rank::Nine),
        spade(Rank::Eight),
        card(Rank::Nine, Suit::Hearts),
        spade(Rank::Ten),
    ]);

    game.start().await.unwrap();
    let table = game.hit(Target::Player).await.unwrap();
    assert_eq!(table.player.hand_status, HandStatus::Bust);
    assert_eq!(table.player.hand.value(), 26);
    assert_eq!(table.game_status, GameStatus::Finished);
    assert_eq!(table.dealer.hand.len(), 2);

    let result = table.hand_result().unwrap();
    assert_eq!(result.outcome, HandOutcome::Bust);
    assert_eq!(result.payout, 0);
    assert_eq!(game.chips(), 90);

    assert_eq!(
        game.hit(Target::Player).await.unwrap_err(),
        ActionError::InvalidState
    );
}

#[tokio::test]
async fn six_card_charlie_pays_even_money() {
    let game = stacked_game(vec![
        spade(Rank::Ten),
        spade(Rank::Two),
        card(Rank::Two, Suit::Hearts),
        card(Rank::Two, Suit::Clubs),
        card(Rank::Two, Suit::Diamonds),
        card(Rank::Three, Suit::Spades),
        card(Rank::Three, Suit::Hearts),
        spade(Rank::Seven),
    ]);

    game.start().await.unwrap();
    for _ in 0..3 {
        let table = game.hit(Target::Player).await.unwrap();
        assert_eq!(table.player.hand_status, HandStatus::Playing);
    }
    let table = game.hit(Target::Player).await.unwrap();
    assert_eq!(table.player.hand.len(), 6);
    assert_eq!(table.player.hand_status, HandStatus::Charlie);
    assert_eq!(table.dealer.hand.value(), 17);

    let result = table.hand_result().unwrap();
    assert_eq!(result.outcome, HandOutcome::Charlie);
    assert_eq!(result.payout, 20);
    assert_eq!(game.chips(), 110);
}

#[tokio::test]
async fn charlie_pushes_against_dealer_twenty_one() {
    let game = stacked_game(vec![
        spade(Rank::Ten),
        spade(Rank::Two),
        card(Rank::Two, Suit::Hearts),
        card(Rank::Two, Suit::Clubs),
        card(Rank::Two, Suit::Diamonds),
        card(Rank::Three, Suit::Spades),
        card(Rank::Three, Suit::Hearts),
        spade(Rank::Five),
        spade(Rank::Six),
    ]);

    game.start().await.unwrap();
    for _ in 0..4 {
        game.hit(Target::Player).await.unwrap();
    }
    let table = game.snapshot();
    assert_eq!(table.dealer.hand.value(), 21);
    assert_eq!(table.hand_result().unwrap().outcome, HandOutcome::Push);
    assert_eq!(game.chips(), 100);
}

#[tokio::test]
async fn insurance_pays_when_dealer_has_blackjack() {
    let game = stacked_game(vec![
        spade(Rank::Ace),
        spade(Rank::Nine),
        spade(Rank::Seven),
        spade(Rank::King),
    ]);

    game.start().await.unwrap();
    assert!(game.is_insurance_offered());

    let table = game.buy_insurance().await.unwrap();
    assert_eq!(table.player.insurance, 5);
    assert_eq!(table.player.hand_status, HandStatus::Stood);
    assert_eq!(table.dealer.status, HandStatus::Blackjack);

    let result = table.result.unwrap();
    assert!(result.is_insured());
    assert!(result.dealer_blackjack);
    assert_eq!(result.hand.outcome, HandOutcome::Lose);
    assert_eq!(result.insurance_payout, 10);
    assert_eq!(result.total_payout, 10);
    assert_eq!(result.net, -5);
    assert_eq!(game.chips(), 95);
}

#[tokio::test]
async fn insurance_is_lost_when_dealer_misses() {
    let game = stacked_game(vec![
        spade(Rank::Ace),
        spade(Rank::Ten),
        spade(Rank::Nine),
        spade(Rank::Eight),
    ]);

    game.start().await.unwrap();
    let table = game.buy_insurance().await.unwrap();
    assert_eq!(table.dealer.hand.value(), 19);

    let result = table.result.unwrap();
    assert_eq!(result.insurance_payout, 0);
    assert_eq!(result.hand.outcome, HandOutcome::Push);
    assert_eq!(result.hand.payout, 10);
    assert_eq!(game.chips(), 95);
}

#[tokio::test]
async fn insurance_disabled_by_options() {
    let supply = TestSupply::stacked(vec![spade(Rank::Ace), spade(Rank::Ten), spade(Rank::Six)]);
    let game = Game::new(supply, options().with_insurance(false));

    game.start().await.unwrap();
    assert!(!game.is_insurance_offered());
    assert_eq!(
        game.buy_insurance().await.unwrap_err(),
        ActionError::InsuranceUnavailable
    );
}

#[tokio::test]
async fn split_pair_plays_two_hands() {
    let game = stacked_game(vec![
        spade(Rank::Six),
        spade(Rank::Ten),
        card(Rank::Ten, Suit::Diamonds),
        card(Rank::Three, Suit::Clubs),
        card(Rank::Four, Suit::Hearts),
        card(Rank::Ten, Suit::Clubs),
        card(Rank::Nine, Suit::Clubs),
    ]);

    game.start().await.unwrap();
    let table = game.split().await.unwrap();
    assert!(table.player.has_split());
    assert_eq!(table.player.chips, 80);
    assert_eq!(table.player.split_bet, 10);
    assert_eq!(table.player.hand.len(), 2);
    assert_eq!(table.player.split_hand.len(), 2);
    assert_eq!(table.player.hand.cards()[0].code, "0S");
    assert_eq!(table.player.split_hand.cards()[0].code, "0D");
    assert_eq!(table.player.hand.value(), 13);
    assert_eq!(table.player.split_hand.value(), 14);
    assert_eq!(table.player.split_hand_status, HandStatus::Playing);

    assert_eq!(game.split().await.unwrap_err(), ActionError::CannotSplit);

    let table = game.stand(Target::Player).await.unwrap();
    assert_eq!(table.game_status, GameStatus::PlayerTurn);

    let table = game.stand(Target::Split).await.unwrap();
    assert_eq!(table.game_status, GameStatus::Finished);
    assert!(table.result.unwrap().dealer_bust);
    assert_eq!(table.hand_result().unwrap().outcome, HandOutcome::Win);
    assert_eq!(table.split_result().unwrap().outcome, HandOutcome::Win);
    assert_eq!(table.result.unwrap().total_payout, 40);
    assert_eq!(game.chips(), 120);
}

#[tokio::test]
async fn split_twenty_one_is_played_out_against_the_dealer() {
    // The split hand makes 21 on two cards, which settles as a plain 21, so
    // the dealer keeps drawing after the main hand busts.
    let game = stacked_game(vec![
        spade(Rank::Seven),
        spade(Rank::King),
        card(Rank::King, Suit::Hearts),
        card(Rank::Five, Suit::Clubs),
        card(Rank::Ace, Suit::Diamonds),
        card(Rank::Nine, Suit::Clubs),
        card(Rank::Five, Suit::Hearts),
        card(Rank::Nine, Suit::Hearts),
    ]);

    game.start().await.unwrap();
    let table = game.split().await.unwrap();
    assert_eq!(table.player.split_hand_status, HandStatus::Blackjack);
    assert_eq!(table.game_status, GameStatus::PlayerTurn);

    let table = game.hit(Target::Player).await.unwrap();
    assert_eq!(table.player.hand_status, HandStatus::Bust);
    assert_eq!(table.game_status, GameStatus::Finished);
    assert_eq!(table.dealer.hand.len(), 3);
    assert_eq!(table.dealer.hand.value(), 21);
    assert_eq!(table.hand_result().unwrap().outcome, HandOutcome::Bust);
    assert_eq!(table.split_result().unwrap().outcome, HandOutcome::Push);
    assert_eq!(game.chips(), 90);
}

fn pair_of_tens() -> Vec<Card> {
    vec![
        spade(Rank::Six),
        spade(Rank::Ten),
        card(Rank::Ten, Suit::Diamonds),
        card(Rank::Three, Suit::Clubs),
        card(Rank::Four, Suit::Hearts),
        card(Rank::Five, Suit::Diamonds),
    ]
}

#[tokio::test]
async fn failed_card_move_leaves_the_pair_intact() {
    let faults: [fn(&TestSupply); 2] = [
        |supply| supply.removes.arm(0, 1),
        |supply| supply.adds.arm(0, 1),
    ];
    for fail in faults {
        let game = stacked_game(pair_of_tens());
        let before = game.start().await.unwrap();

        fail(game.supply());
        assert!(matches!(game.split().await.unwrap_err(), ActionError::Supply(_)));
        assert_eq!(game.snapshot(), before);
        assert_eq!(game.chips(), 90);
        assert!(!game.is_busy());

        let table = game.split().await.unwrap();
        assert_eq!(table.player.chips, 80);
        assert_eq!(table.player.hand.cards()[0].code, "0S");
        assert_eq!(table.player.hand.value(), 13);
        assert_eq!(table.player.split_hand.cards()[0].code, "0D");
        assert_eq!(table.player.split_hand.value(), 14);
    }
}

#[tokio::test]
async fn hit_after_a_failed_split_keeps_both_cards() {
    let game = stacked_game(pair_of_tens());
    game.start().await.unwrap();

    game.supply().adds.arm(0, 1);
    assert!(game.split().await.is_err());

    let table = game.hit(Target::Player).await.unwrap();
    let codes: Vec<_> = table.player.hand.cards().iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, ["0S", "0D", "3C"]);
    assert_eq!(table.player.hand.value(), 23);
    assert_eq!(table.player.hand_status, HandStatus::Bust);
}

#[tokio::test]
async fn split_failing_after_a_deal_is_rolled_back() {
    let game = stacked_game(pair_of_tens());
    let before = game.start().await.unwrap();

    // The main hand's card arrives, the split hand's draw fails.
    game.supply().draws.arm(1, 1);
    assert!(matches!(game.split().await.unwrap_err(), ActionError::Supply(_)));
    assert_eq!(game.snapshot(), before);

    // The card dealt before the failure stays out of play.
    let table = game.split().await.unwrap();
    let codes: Vec<_> = table.player.hand.cards().iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, ["0S", "4H"]);
    assert_eq!(table.player.hand.value(), 14);
    assert_eq!(table.player.split_hand.value(), 15);
}

#[tokio::test]
async fn split_of_unequal_cards_is_rejected() {
    let game = stacked_game(vec![
        spade(Rank::Six),
        spade(Rank::Ten),
        card(Rank::Nine, Suit::Diamonds),
    ]);

    let before = game.start().await.unwrap();
    let err = game.split().await.unwrap_err();
    assert_eq!(err, ActionError::CannotSplit);
    assert!(err.is_rejection());
    assert_eq!(game.snapshot(), before);
}

#[tokio::test]
async fn double_down_takes_one_card_for_twice_the_bet() {
    let game = stacked_game(vec![
        spade(Rank::Six),
        spade(Rank::Five),
        spade(Rank::Four),
        spade(Rank::Ten),
        card(Rank::Ten, Suit::Hearts),
        card(Rank::Nine, Suit::Hearts),
    ]);

    game.start().await.unwrap();
    let table = game.double_down(Target::Player).await.unwrap();
    assert_eq!(table.player.bet, 20);
    assert_eq!(table.player.hand.len(), 3);
    assert_eq!(table.player.hand_status, HandStatus::Stood);
    assert!(table.result.unwrap().dealer_bust);

    let result = table.hand_result().unwrap();
    assert_eq!(result.outcome, HandOutcome::Win);
    assert_eq!(result.payout, 40);
    assert_eq!(game.chips(), 120);
}

#[tokio::test]
async fn double_down_needs_two_cards_and_chips() {
    let game = stacked_game(vec![
        spade(Rank::Six),
        spade(Rank::Two),
        spade(Rank::Three),
        spade(Rank::Four),
    ]);

    game.start().await.unwrap();
    game.hit(Target::Player).await.unwrap();
    assert_eq!(
        game.double_down(Target::Player).await.unwrap_err(),
        ActionError::CannotDouble
    );

    let supply = TestSupply::stacked(vec![spade(Rank::Six), spade(Rank::Five), spade(Rank::Four)]);
    let game = Game::new(supply, options().with_starting_chips(15));
    game.start().await.unwrap();
    assert_eq!(
        game.double_down(Target::Player).await.unwrap_err(),
        ActionError::InsufficientFunds
    );
}

#[tokio::test]
async fn start_is_rejected_mid_round_and_without_chips() {
    let game = stacked_game(vec![spade(Rank::Six), spade(Rank::Five), spade(Rank::Four)]);
    game.start().await.unwrap();
    assert_eq!(game.start().await.unwrap_err(), ActionError::InvalidState);
    assert_eq!(
        game.hit(Target::Split).await.unwrap_err(),
        ActionError::HandNotPlaying
    );

    let supply = TestSupply::stacked(vec![]);
    let game = Game::new(supply, options().with_starting_chips(5));
    assert_eq!(
        game.start().await.unwrap_err(),
        ActionError::InsufficientFunds
    );
    assert_eq!(game.status(), GameStatus::NotPlaying);
}

#[tokio::test]
async fn failed_opening_deal_can_be_retried() {
    let game = stacked_game(vec![spade(Rank::Six), spade(Rank::Five), spade(Rank::Four)]);
    game.supply().fail_next_draws(1);

    let err = game.start().await.unwrap_err();
    assert!(matches!(err, ActionError::Supply(SupplyError::Transport(_))));
    assert!(!err.is_rejection());
    assert_eq!(game.status(), GameStatus::NotPlaying);
    assert_eq!(game.chips(), 100);

    let table = game.start().await.unwrap();
    assert_eq!(table.game_status, GameStatus::PlayerTurn);
    assert_eq!(table.dealer.hand.value(), 6);
    assert_eq!(table.player.hand.value(), 9);
}

#[tokio::test]
async fn failed_hit_leaves_the_table_unchanged() {
    let game = stacked_game(vec![
        spade(Rank::Six),
        spade(Rank::Five),
        spade(Rank::Four),
        spade(Rank::Two),
    ]);

    let before = game.start().await.unwrap();
    game.supply().fail_next_draws(1);
    assert!(matches!(
        game.hit(Target::Player).await.unwrap_err(),
        ActionError::Supply(_)
    ));
    assert_eq!(game.snapshot(), before);
    assert!(!game.is_busy());

    let table = game.hit(Target::Player).await.unwrap();
    assert_eq!(table.player.hand.value(), 11);
}

#[tokio::test]
async fn hit_retried_after_a_failed_listing_deals_once() {
    let game = stacked_game(vec![
        spade(Rank::Six),
        spade(Rank::Five),
        spade(Rank::Four),
        spade(Rank::Two),
        spade(Rank::Eight),
    ]);

    let before = game.start().await.unwrap();
    // The card reaches the pile but the listing that follows fails.
    game.supply().lists.arm(1, 1);
    assert!(matches!(
        game.hit(Target::Player).await.unwrap_err(),
        ActionError::Supply(_)
    ));
    assert_eq!(game.snapshot(), before);

    let table = game.hit(Target::Player).await.unwrap();
    assert_eq!(table.player.hand.len(), 3);
    assert_eq!(table.player.hand.value(), 11);

    let table = game.hit(Target::Player).await.unwrap();
    assert_eq!(table.player.hand.value(), 19);
}

#[tokio::test]
async fn failed_dealer_draw_can_be_resumed() {
    let game = stacked_game(vec![
        spade(Rank::Nine),
        spade(Rank::Ten),
        spade(Rank::Seven),
        spade(Rank::Eight),
    ]);

    game.start().await.unwrap();
    game.supply().fail_next_draws(1);
    assert!(matches!(
        game.stand(Target::Player).await.unwrap_err(),
        ActionError::Supply(_)
    ));

    let table = game.snapshot();
    assert_eq!(table.game_status, GameStatus::DealerTurn);
    assert_eq!(table.player.hand_status, HandStatus::Stood);
    assert_eq!(
        game.hit(Target::Player).await.unwrap_err(),
        ActionError::InvalidState
    );

    let table = game.play_dealer().await.unwrap();
    assert_eq!(table.game_status, GameStatus::Finished);
    assert_eq!(table.hand_result().unwrap().outcome, HandOutcome::Push);
    assert_eq!(
        game.play_dealer().await.unwrap_err(),
        ActionError::InvalidState
    );
}

#[tokio::test]
async fn concurrent_actions_are_busy() {
    let game = stacked_game(vec![
        spade(Rank::Six),
        spade(Rank::Five),
        spade(Rank::Four),
        spade(Rank::Two),
    ]);
    game.start().await.unwrap();
    game.supply().gate_next_draw();

    let hit = game.hit(Target::Player);
    let other = async {
        game.supply().entered.notified().await;
        assert!(game.is_busy());
        let result = game.stand(Target::Player).await;
        game.supply().release.notify_one();
        result
    };
    let (hit, other) = tokio::join!(hit, other);

    assert_eq!(other.unwrap_err(), ActionError::Busy);
    assert_eq!(hit.unwrap().player.hand.value(), 11);
    assert!(!game.is_busy());
}

#[tokio::test]
async fn start_supersedes_an_action_in_flight() {
    let game = stacked_game(vec![
        spade(Rank::Six),
        spade(Rank::Five),
        spade(Rank::Four),
        spade(Rank::Two),
    ]);
    game.start().await.unwrap();
    game.supply().gate_next_draw();

    let hit = game.hit(Target::Player);
    let restart = async {
        game.supply().entered.notified().await;
        game.supply().inner.restack(vec![
            spade(Rank::Eight),
            spade(Rank::Nine),
            spade(Rank::Three),
            spade(Rank::Queen),
        ]);
        let result = game.start().await;
        game.supply().release.notify_one();
        result
    };
    let (hit, restart) = tokio::join!(hit, restart);

    assert_eq!(hit.unwrap_err(), ActionError::Superseded);
    let table = restart.unwrap();
    assert_eq!(table.round, 2);
    assert_eq!(table.dealer.hand.value(), 8);
    assert_eq!(table.player.hand.value(), 12);

    let table = game.snapshot();
    assert_eq!(table.game_status, GameStatus::PlayerTurn);
    assert_eq!(table.player.hand.len(), 2);
    assert_eq!(table.player.chips, 80);
    assert!(!game.is_busy());
}

#[tokio::test]
async fn shuffled_rounds_keep_the_ledger_balanced() {
    let game = Game::new(LocalSupply::new(7), options());

    for _ in 0..5 {
        let chips_before = game.chips();
        let mut table = game.start().await.unwrap();
        while table.game_status == GameStatus::PlayerTurn {
            table = if table.player.hand.value() < 15 {
                game.hit(Target::Player).await.unwrap()
            } else {
                game.stand(Target::Player).await.unwrap()
            };
        }

        assert_eq!(table.game_status, GameStatus::Finished);
        let result = table.result.unwrap();
        let net = isize::try_from(game.chips()).unwrap() - isize::try_from(chips_before).unwrap();
        assert_eq!(net, result.net);
        assert!(table.dealer.status.is_terminal());
    }
    assert!(game.deck().is_some());
}
