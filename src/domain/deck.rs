use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Card, new_id};

/// Visual theme of a deck. Only the name is stored; rendering is up to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeckTheme {
  #[default]
  Default,
  Neon,
  Minimal,
  Notebook,
  SciFi,
}

impl DeckTheme {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Default => "default",
      Self::Neon => "neon",
      Self::Minimal => "minimal",
      Self::Notebook => "notebook",
      Self::SciFi => "sci-fi",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub cards: Vec<Card>,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub created_at: DateTime<Utc>,
  #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
  pub last_studied: Option<DateTime<Utc>>,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub theme: DeckTheme,
}

impl Deck {
  pub fn card(&self, card_id: &str) -> Option<&Card> {
    self.cards.iter().find(|c| c.id == card_id)
  }

  /// Replace the card with the same id, keeping its position.
  /// Returns false if the deck has no such card.
  pub fn replace_card(&mut self, card: Card) -> bool {
    match self.cards.iter_mut().find(|c| c.id == card.id) {
      Some(slot) => {
        *slot = card;
        true
      }
      None => false,
    }
  }

  pub fn remove_card(&mut self, card_id: &str) -> bool {
    let before = self.cards.len();
    self.cards.retain(|c| c.id != card_id);
    self.cards.len() != before
  }
}

/// Deck fields supplied by the user when creating or editing a deck
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeck {
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub theme: DeckTheme,
}

impl NewDeck {
  pub fn into_deck(self, now: DateTime<Utc>) -> Deck {
    Deck {
      id: new_id(),
      name: self.name,
      description: self.description,
      cards: Vec::new(),
      created_at: now,
      last_studied: None,
      tags: self.tags,
      theme: self.theme,
    }
  }
}
