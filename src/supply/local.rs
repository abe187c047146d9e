//! In-process card supply backed by a seeded shuffle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::card::{Card, full_deck};
use crate::error::SupplyError;
use crate::sync::Mutex;

use super::{CardSupply, DeckHandle, Pile};

#[derive(Debug, Default)]
struct LocalDeck {
    /// Undrawn cards; the top of the deck is the end of the vector.
    stock: Vec<Card>,
    /// Drawn cards that are not in any pile.
    loose: Vec<Card>,
    piles: HashMap<Pile, Vec<Card>>,
}

impl LocalDeck {
    fn return_all(&mut self) {
        let mut returned: Vec<Card> = self.loose.drain(..).collect();
        for pile in self.piles.values_mut() {
            returned.append(pile);
        }
        // Returned cards go under the remaining stock.
        returned.append(&mut self.stock);
        self.stock = returned;
    }
}

/// A card supply that keeps its decks in memory.
///
/// Decks are single 52-card decks shuffled with a seeded `ChaCha8Rng`.
/// [`LocalSupply::stacked`] builds a supply whose decks deal a fixed
/// sequence instead, which is how tests script a round.
pub struct LocalSupply {
    decks: Mutex<HashMap<String, LocalDeck>>,
    /// Fixed draw order for new decks; shuffling is disabled when set.
    stack: Mutex<Option<Vec<Card>>>,
    next_id: AtomicU64,
    rng: Mutex<ChaCha8Rng>,
}

impl LocalSupply {
    /// Creates a supply whose decks are shuffled from the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            decks: Mutex::new(HashMap::new()),
            stack: Mutex::new(None),
            next_id: AtomicU64::new(0),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Creates a supply whose decks deal `draws` in order and never shuffle.
    #[must_use]
    pub fn stacked(draws: Vec<Card>) -> Self {
        let supply = Self::new(0);
        supply.restack(draws);
        supply
    }

    /// Replaces the draw order of every deck, existing and future.
    ///
    /// Piles are left as they are.
    pub fn restack(&self, draws: Vec<Card>) {
        let mut stock = draws;
        stock.reverse();
        for deck in self.decks.lock().values_mut() {
            deck.stock.clone_from(&stock);
        }
        *self.stack.lock() = Some(stock);
    }

    /// Returns the number of undrawn cards in a deck.
    #[must_use]
    pub fn remaining(&self, deck: &DeckHandle) -> Option<usize> {
        self.decks.lock().get(deck.as_str()).map(|d| d.stock.len())
    }

    fn fresh_stock(&self) -> Vec<Card> {
        if let Some(stock) = self.stack.lock().as_ref() {
            return stock.clone();
        }
        let mut cards = full_deck();
        cards.shuffle(&mut *self.rng.lock());
        cards
    }

    fn with_deck<T>(
        &self,
        deck: &DeckHandle,
        f: impl FnOnce(&mut LocalDeck) -> Result<T, SupplyError>,
    ) -> Result<T, SupplyError> {
        let mut decks = self.decks.lock();
        let local = decks
            .get_mut(deck.as_str())
            .ok_or_else(|| SupplyError::UnknownDeck(deck.to_string()))?;
        f(local)
    }
}

impl Default for LocalSupply {
    fn default() -> Self {
        Self::new(0)
    }
}

fn take_codes(from: &mut Vec<Card>, codes: &[String]) -> Result<Vec<Card>, SupplyError> {
    if let Some(missing) = codes.iter().find(|code| !from.iter().any(|c| &c.code == *code)) {
        return Err(SupplyError::MissingCard(missing.clone()));
    }
    let mut taken = Vec::with_capacity(codes.len());
    for code in codes {
        if let Some(index) = from.iter().position(|c| &c.code == code) {
            taken.push(from.remove(index));
        }
    }
    Ok(taken)
}

impl CardSupply for LocalSupply {
    async fn create_or_reshuffle(
        &self,
        existing: Option<&DeckHandle>,
    ) -> Result<DeckHandle, SupplyError> {
        if let Some(deck) = existing {
            let shuffled = self.stack.lock().is_none();
            self.with_deck(deck, |local| {
                if shuffled {
                    local.stock.shuffle(&mut *self.rng.lock());
                }
                Ok(())
            })?;
            debug!(%deck, "reshuffled local deck");
            return Ok(deck.clone());
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let deck = DeckHandle::new(format!("local-{id}"));
        let stock = self.fresh_stock();
        self.decks.lock().insert(
            deck.as_str().to_owned(),
            LocalDeck {
                stock,
                ..LocalDeck::default()
            },
        );
        debug!(%deck, "created local deck");
        Ok(deck)
    }

    async fn draw(&self, deck: &DeckHandle, count: usize) -> Result<Vec<Card>, SupplyError> {
        self.with_deck(deck, |local| {
            let remaining = local.stock.len();
            if remaining < count {
                return Err(SupplyError::DeckExhausted {
                    requested: count,
                    remaining,
                });
            }
            let mut drawn = local.stock.split_off(remaining - count);
            drawn.reverse();
            local.loose.extend(drawn.iter().cloned());
            Ok(drawn)
        })
    }

    async fn add_to_pile(
        &self,
        deck: &DeckHandle,
        pile: Pile,
        codes: &[String],
    ) -> Result<(), SupplyError> {
        self.with_deck(deck, |local| {
            let cards = take_codes(&mut local.loose, codes)?;
            local.piles.entry(pile).or_default().extend(cards);
            Ok(())
        })
    }

    async fn list_pile(&self, deck: &DeckHandle, pile: Pile) -> Result<Vec<Card>, SupplyError> {
        self.with_deck(deck, |local| {
            Ok(local.piles.get(&pile).cloned().unwrap_or_default())
        })
    }

    async fn remove_from_pile(
        &self,
        deck: &DeckHandle,
        pile: Pile,
        codes: &[String],
    ) -> Result<(), SupplyError> {
        self.with_deck(deck, |local| {
            let cards = local
                .piles
                .get_mut(&pile)
                .ok_or_else(|| SupplyError::UnknownPile(pile.to_string()))?;
            let taken = take_codes(cards, codes)?;
            local.loose.extend(taken);
            Ok(())
        })
    }

    async fn return_all(&self, deck: &DeckHandle) -> Result<(), SupplyError> {
        self.with_deck(deck, |local| {
            local.return_all();
            Ok(())
        })
    }
}
