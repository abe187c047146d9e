//! Card supply backed by a deckofcardsapi-compatible HTTP service.

use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::card::Card;
use crate::error::SupplyError;

use super::{CardSupply, DeckHandle, Pile};

/// Public deckofcardsapi endpoint.
pub const DEFAULT_BASE_URL: &str = "https://deckofcardsapi.com/api/deck";

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCard {
    code: String,
    #[serde(default)]
    image: String,
    value: String,
    suit: String,
}

impl TryFrom<ApiCard> for Card {
    type Error = SupplyError;

    fn try_from(card: ApiCard) -> Result<Self, Self::Error> {
        Self::from_parts(&card.code, &card.value, &card.suit, &card.image)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiPile {
    #[serde(default)]
    cards: Vec<ApiCard>,
}

/// Common response body of every endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    deck_id: Option<String>,
    #[serde(default)]
    cards: Vec<ApiCard>,
    #[serde(default)]
    piles: HashMap<String, ApiPile>,
}

impl Envelope {
    pub(crate) fn into_success(self) -> Result<Self, SupplyError> {
        if self.success {
            Ok(self)
        } else {
            Err(SupplyError::Rejected(
                self.error.unwrap_or_else(|| "success = false".to_owned()),
            ))
        }
    }

    pub(crate) fn into_cards(self) -> Result<Vec<Card>, SupplyError> {
        self.cards.into_iter().map(Card::try_from).collect()
    }

    pub(crate) fn into_pile(mut self, pile: Pile) -> Result<Vec<Card>, SupplyError> {
        self.piles
            .remove(pile.as_str())
            .map_or_else(Vec::new, |p| p.cards)
            .into_iter()
            .map(Card::try_from)
            .collect()
    }
}

/// HTTP client for a deckofcardsapi-compatible card service.
#[derive(Debug, Clone)]
pub struct DeckApiSupply {
    client: Client,
    base_url: String,
}

impl DeckApiSupply {
    /// Creates a client for the public deckofcardsapi service.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client for a service rooted at `base_url`.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a client that reuses an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Result<Envelope, SupplyError> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "card supply request");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SupplyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "card supply returned an error status");
            return Err(SupplyError::Status(status.as_u16()));
        }

        response
            .json::<Envelope>()
            .await
            .map_err(|e| SupplyError::Transport(e.to_string()))?
            .into_success()
    }
}

impl Default for DeckApiSupply {
    fn default() -> Self {
        Self::new()
    }
}

impl CardSupply for DeckApiSupply {
    async fn create_or_reshuffle(
        &self,
        existing: Option<&DeckHandle>,
    ) -> Result<DeckHandle, SupplyError> {
        let path = existing.map_or_else(
            || "new/shuffle/?deck_count=1".to_owned(),
            |deck| format!("{deck}/shuffle/"),
        );
        let envelope = self.get(&path).await?;
        envelope
            .deck_id
            .map(DeckHandle::new)
            .ok_or_else(|| SupplyError::Rejected("response carried no deck_id".to_owned()))
    }

    async fn draw(&self, deck: &DeckHandle, count: usize) -> Result<Vec<Card>, SupplyError> {
        self.get(&format!("{deck}/draw/?count={count}"))
            .await?
            .into_cards()
    }

    async fn add_to_pile(
        &self,
        deck: &DeckHandle,
        pile: Pile,
        codes: &[String],
    ) -> Result<(), SupplyError> {
        let cards = codes.join(",");
        self.get(&format!("{deck}/pile/{pile}/add/?cards={cards}"))
            .await
            .map(drop)
    }

    async fn list_pile(&self, deck: &DeckHandle, pile: Pile) -> Result<Vec<Card>, SupplyError> {
        self.get(&format!("{deck}/pile/{pile}/list/"))
            .await?
            .into_pile(pile)
    }

    async fn remove_from_pile(
        &self,
        deck: &DeckHandle,
        pile: Pile,
        codes: &[String],
    ) -> Result<(), SupplyError> {
        let cards = codes.join(",");
        self.get(&format!("{deck}/pile/{pile}/draw/?cards={cards}"))
            .await
            .map(drop)
    }

    async fn return_all(&self, deck: &DeckHandle) -> Result<(), SupplyError> {
        self.get(&format!("{deck}/return/")).await.map(drop)
    }
}
