//! Study session endpoints: build a shuffled queue of due cards and accept ratings.

use axum::{
  extract::{Path, State},
  Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::db::{self, CardUpdate, DbPool};
use crate::domain::{Card, ReviewForm};
use crate::srs;

use super::{ApiError, ApiResult};

/// Interval in days each rating button would schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntervalPreview {
  pub again: u32,
  pub hard: u32,
  pub good: u32,
  pub easy: u32,
}

impl From<[u32; 4]> for IntervalPreview {
  fn from([again, hard, good, easy]: [u32; 4]) -> Self {
    Self { again, hard, good, easy }
  }
}

#[derive(Debug, Serialize)]
pub struct StudyCard {
  #[serde(flatten)]
  pub card: Card,
  pub preview: IntervalPreview,
  /// Short button labels ("1d", "2w", ...) in again, hard, good, easy order
  pub labels: [String; 4],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyQueue {
  pub deck_id: String,
  pub deck_name: String,
  pub cards: Vec<StudyCard>,
}

/// Due cards of a deck in random order
pub async fn study_queue(
  State(pool): State<DbPool>,
  Path(deck_id): Path<String>,
) -> ApiResult<Json<StudyQueue>> {
  let deck = {
    let conn = db::try_lock(&pool)?;
    db::get_deck_by_id(&conn, &deck_id)?.ok_or(ApiError::NotFound("Deck"))?
  };

  let due = srs::due_cards(&deck.cards, Utc::now());
  let queue = srs::shuffle_study_queue(due, &mut rand::rng());
  tracing::debug!(deck_id = %deck.id, due = queue.len(), "Built study queue");

  let cards = queue
    .into_iter()
    .map(|card| {
      let intervals = srs::preview_intervals(&card);
      StudyCard {
        preview: intervals.into(),
        labels: intervals.map(srs::format_interval),
        card,
      }
    })
    .collect();

  Ok(Json(StudyQueue {
    deck_id: deck.id,
    deck_name: deck.name,
    cards,
  }))
}

/// A reviewed card plus whether the rating counts toward the session's correct tally
#[derive(Debug, Serialize)]
pub struct ReviewResult {
  #[serde(flatten)]
  pub card: Card,
  pub correct: bool,
}

/// Apply a rating to one card and return its new scheduling state
pub async fn submit_review(
  State(pool): State<DbPool>,
  Path((deck_id, card_id)): Path<(String, String)>,
  Json(form): Json<ReviewForm>,
) -> ApiResult<Json<ReviewResult>> {
  let conn = db::try_lock(&pool)?;
  match db::review_card_in_deck(&conn, &deck_id, &card_id, form.rating, Utc::now())? {
    CardUpdate::Updated(card) => Ok(Json(ReviewResult {
      card,
      correct: form.rating.is_correct(),
    })),
    CardUpdate::MissingDeck => Err(ApiError::NotFound("Deck")),
    CardUpdate::MissingCard => Err(ApiError::NotFound("Card")),
  }
}
