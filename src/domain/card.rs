use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// Ease factor assigned to a card that has never been reviewed
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Interval (days) assigned to a card that has never been reviewed
pub const DEFAULT_INTERVAL_DAYS: u32 = 1;

/// A flashcard together with its spaced repetition state.
///
/// Timestamps serialize as epoch milliseconds (or `null`), so stored
/// records stay compatible with the browser client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
  pub id: String,
  pub question: String,
  pub answer: String,
  #[serde(default)]
  pub tags: Vec<String>,

  #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
  pub last_reviewed: Option<DateTime<Utc>>,
  /// None means the card has never been reviewed and is always due
  #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
  pub next_review: Option<DateTime<Utc>>,

  // SM-2 fields
  #[serde(default)]
  pub repetitions: u32,
  #[serde(default = "default_ease_factor")]
  pub ease_factor: f64,
  #[serde(default = "default_interval")]
  pub interval: u32,
}

fn default_ease_factor() -> f64 {
  DEFAULT_EASE_FACTOR
}

fn default_interval() -> u32 {
  DEFAULT_INTERVAL_DAYS
}

impl Card {
  pub fn new(question: String, answer: String, tags: Vec<String>) -> Self {
    Self {
      id: new_id(),
      question,
      answer,
      tags,
      last_reviewed: None,
      next_review: None,
      repetitions: 0,
      ease_factor: DEFAULT_EASE_FACTOR,
      interval: DEFAULT_INTERVAL_DAYS,
    }
  }

  /// True if the card has reached its next review time (or never had one)
  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    self.next_review.is_none_or(|next| next <= now)
  }
}

/// Card content supplied by the user when adding or editing a card
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
  pub question: String,
  pub answer: String,
  #[serde(default)]
  pub tags: Vec<String>,
}

impl From<NewCard> for Card {
  fn from(input: NewCard) -> Self {
    Card::new(input.question, input.answer, input.tags)
  }
}
