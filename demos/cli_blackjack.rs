//! CLI blackjack example.
//!
//! Set `RUST_LOG=bjtable=debug` to watch the supply traffic.

use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use bjtable::{
    ActionError, Card, Game, GameOptions, GameStatus, Hand, HandStatus, LocalSupply, Snapshot,
    Suit, Target,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Blackjack CLI example (type 'q' to quit)");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let game = Game::new(LocalSupply::new(seed), GameOptions::default());

    loop {
        let chips = game.chips();
        if chips < game.options.ante {
            println!("You are out of chips. Game over.");
            break;
        }

        match prompt_line(&format!("Chips: {chips}. Deal? (enter / q): ")).as_str() {
            "q" | "quit" => {
                println!("Goodbye.");
                break;
            }
            _ => {}
        }

        let mut table = match game.start().await {
            Ok(table) => table,
            Err(err) => {
                println!("Deal error: {err}");
                continue;
            }
        };

        while table.game_status == GameStatus::PlayerTurn {
            print_table(&table);
            if game.is_insurance_offered() {
                println!("Dealer shows an Ace. [i]nsurance available.");
            }

            let target = current_target(&table);
            println!("{}", format_actions(&table, target));
            let action = prompt_line("Action: ");

            let result = match action.as_str() {
                "h" | "hit" => game.hit(target).await,
                "s" | "stand" => game.stand(target).await,
                "d" | "double" => game.double_down(target).await,
                "p" | "split" => game.split().await,
                "i" | "insurance" => game.buy_insurance().await,
                "q" | "quit" => return,
                _ => {
                    println!("Unknown action.");
                    continue;
                }
            };

            match result {
                Ok(next) => table = next,
                Err(err) if err.is_rejection() => println!("Not allowed: {err}"),
                Err(err) => {
                    println!("Action error: {err}");
                    table = game.snapshot();
                }
            }
        }

        while table.game_status == GameStatus::DealerTurn {
            table = match game.play_dealer().await {
                Ok(table) => table,
                Err(ActionError::Supply(err)) => {
                    println!("Dealer error: {err}. Retrying.");
                    game.snapshot()
                }
                Err(err) => {
                    println!("Dealer error: {err}");
                    break;
                }
            };
        }

        print_table(&table);
        if let Some(result) = table.result {
            println!("Main hand: {:?} (payout {})", result.hand.outcome, result.hand.payout);
            if let Some(split) = result.split {
                println!("Split hand: {:?} (payout {})", split.outcome, split.payout);
            }
            if result.is_insured() {
                println!("Insurance payout: {}", result.insurance_payout);
            }
            println!("Round complete. Net {}", result.net);
        }
    }
}

/// The hand actions apply to: the main hand first, then the split hand.
fn current_target(table: &Snapshot) -> Target {
    if table.player.hand_status == HandStatus::Playing {
        Target::Player
    } else {
        Target::Split
    }
}

fn prompt_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return "q".to_string();
    }
    input.trim().to_lowercase()
}

fn print_table(table: &Snapshot) {
    println!(
        "\nDealer: {} (value {}) | {:?}",
        format_hand(&table.dealer.hand),
        table.dealer.hand.value(),
        table.dealer.status
    );

    let player = &table.player;
    println!(
        "Hand: {} | value {} | bet {} | {:?}",
        format_hand(&player.hand),
        player.hand.value(),
        player.bet,
        player.hand_status
    );
    if player.has_split() {
        println!(
            "Split: {} | value {} | bet {} | {:?}",
            format_hand(&player.split_hand),
            player.split_hand.value(),
            player.split_bet,
            player.split_hand_status
        );
    }
    println!("Chips: {}\n", player.chips);
}

fn format_actions(table: &Snapshot, target: Target) -> String {
    let player = &table.player;
    let hand = player.hand(target);
    let bet = player.bet(target);

    let can_double = hand.len() == 2 && player.chips >= bet;
    let can_split = target == Target::Player
        && !player.has_split()
        && hand.can_split()
        && player.chips >= bet;

    let parts = [
        format_action("hit", "h", true),
        format_action("stand", "s", true),
        format_action("double", "d", can_double),
        format_action("split", "p", can_split),
    ];
    format!("Actions: {}", parts.join(" "))
}

fn format_action(label: &str, key: &str, allowed: bool) -> String {
    let text = format!("[{key}]{label}");
    if allowed {
        colorize(&text, "32")
    } else {
        colorize(&text, "90")
    }
}

fn colorize(text: &str, code: &str) -> String {
    format!("\u{1b}[{code}m{text}\u{1b}[0m")
}

fn format_hand(hand: &Hand) -> String {
    if hand.is_empty() {
        return "(empty)".to_string();
    }
    hand.cards()
        .iter()
        .map(format_card)
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_card(card: &Card) -> String {
    let color_code = match card.suit {
        Suit::Hearts | Suit::Diamonds => "31",
        Suit::Clubs => "32",
        Suit::Spades => "34",
    };
    colorize(&card.code, color_code)
}
