pub mod decks;
pub mod progress;
pub mod study;

use axum::{
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post, put},
  Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::{self, DbLockError, DbPool};
use crate::domain::Deck;
use crate::srs::{self, ReviewStatus};

/// Errors surfaced to API clients as `{"error": "..."}` bodies
#[derive(Debug)]
pub enum ApiError {
  NotFound(&'static str),
  BadRequest(String),
  Unavailable,
  Database(rusqlite::Error),
}

impl std::fmt::Display for ApiError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::NotFound(what) => write!(f, "{} not found", what),
      Self::BadRequest(msg) => write!(f, "{}", msg),
      Self::Unavailable => write!(f, "{}", DbLockError),
      Self::Database(e) => write!(f, "Database error: {}", e),
    }
  }
}

impl std::error::Error for ApiError {}

impl From<rusqlite::Error> for ApiError {
  fn from(e: rusqlite::Error) -> Self {
    Self::Database(e)
  }
}

impl From<DbLockError> for ApiError {
  fn from(_: DbLockError) -> Self {
    Self::Unavailable
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
      Self::Database(e) => {
        tracing::error!("Database error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
  }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Build the JSON API router over a deck store
pub fn router(pool: DbPool) -> Router {
  Router::new()
    .route("/api/overview", get(overview))
    .route("/api/decks", get(decks::list_decks).post(decks::create_deck))
    .route(
      "/api/decks/{deck_id}",
      get(decks::get_deck).put(decks::edit_deck).delete(decks::remove_deck),
    )
    .route("/api/decks/{deck_id}/cards", post(decks::create_card))
    .route(
      "/api/decks/{deck_id}/cards/{card_id}",
      put(decks::edit_card).delete(decks::remove_card),
    )
    .route("/api/decks/{deck_id}/study", get(study::study_queue))
    .route("/api/decks/{deck_id}/cards/{card_id}/review", post(study::submit_review))
    .route("/api/stats", get(progress::stats))
    .route("/api/sessions", post(progress::record_session))
    .with_state(pool)
}

/// Why a deck was suggested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionReason {
  /// The deck has the most cards due
  DueCards,
  /// Nothing is due; this deck has gone longest without study
  Stale,
  /// Nothing is due; this deck has cards but was never studied
  NotStarted,
}

/// Deck that most needs attention right now
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
  pub deck_id: String,
  pub deck_name: String,
  pub reason: SuggestionReason,
  pub due_count: usize,
}

/// Pick the deck with the most due cards (first wins ties). When nothing is
/// due, fall back to the non-empty deck studied longest ago, never-studied first.
fn suggest_deck(decks: &[Deck], now: DateTime<Utc>) -> Option<Suggestion> {
  let mut best: Option<(&Deck, usize)> = None;
  for deck in decks {
    let due = srs::review_status(&deck.cards, now).due_count;
    if due > 0 && best.is_none_or(|(_, top)| due > top) {
      best = Some((deck, due));
    }
  }

  if let Some((deck, due_count)) = best {
    return Some(Suggestion {
      deck_id: deck.id.clone(),
      deck_name: deck.name.clone(),
      reason: SuggestionReason::DueCards,
      due_count,
    });
  }

  decks
    .iter()
    .filter(|d| !d.cards.is_empty())
    .min_by_key(|d| d.last_studied.map_or(0, |t| t.timestamp_millis()))
    .map(|deck| Suggestion {
      deck_id: deck.id.clone(),
      deck_name: deck.name.clone(),
      reason: if deck.last_studied.is_some() {
        SuggestionReason::Stale
      } else {
        SuggestionReason::NotStarted
      },
      due_count: 0,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
  pub deck_count: usize,
  pub total_cards: usize,
  pub status: ReviewStatus,
  #[serde(with = "chrono::serde::ts_milliseconds_option")]
  pub next_review: Option<DateTime<Utc>>,
  /// Human readable time until `next_review`, only when nothing is due
  pub next_review_label: Option<String>,
  pub suggestion: Option<Suggestion>,
}

const DAY_MS: i64 = 86_400_000;

/// Relative label for a future time. Days round up, so a review set
/// 4 days out reads "in 4 days" for the whole of its first day.
fn format_relative_time(dt: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let duration = dt.signed_duration_since(now);

  let minutes = duration.num_minutes();
  let hours = duration.num_hours();
  let days = (duration.num_milliseconds() + DAY_MS - 1) / DAY_MS;

  if minutes < 1 {
    "now".to_string()
  } else if minutes < 60 {
    format!("in {} minute{}", minutes, if minutes == 1 { "" } else { "s" })
  } else if hours < 24 {
    format!("in {} hour{}", hours, if hours == 1 { "" } else { "s" })
  } else if days <= 1 {
    "tomorrow".to_string()
  } else {
    format!("in {} days", days)
  }
}

pub async fn overview(State(pool): State<DbPool>) -> ApiResult<Json<Overview>> {
  let conn = db::try_lock(&pool)?;
  let decks = db::get_all_decks(&conn)?;
  let now = Utc::now();

  let mut status = ReviewStatus::default();
  let mut next_review: Option<DateTime<Utc>> = None;

  for deck in &decks {
    status = status + srs::review_status(&deck.cards, now);

    if let Some(next) = srs::next_review_time(&deck.cards, now) {
      next_review = Some(next_review.map_or(next, |current| current.min(next)));
    }
  }

  let next_review_label = if status.due_count == 0 {
    next_review.map(|next| format_relative_time(next, now))
  } else {
    None
  };

  Ok(Json(Overview {
    deck_count: decks.len(),
    total_cards: decks.iter().map(|d| d.cards.len()).sum(),
    status,
    next_review,
    next_review_label,
    suggestion: suggest_deck(&decks, now),
  }))
}

pub use decks::{create_card, create_deck, edit_card, edit_deck, get_deck, list_decks, remove_card, remove_deck};
pub use progress::{record_session, stats};
pub use study::{study_queue, submit_review};

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Card, NewDeck};
  use chrono::{Duration, TimeZone};

  #[test]
  fn test_format_relative_time() {
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    assert_eq!(format_relative_time(now, now), "now");
    assert_eq!(format_relative_time(now + Duration::minutes(1), now), "in 1 minute");
    assert_eq!(format_relative_time(now + Duration::minutes(30), now), "in 30 minutes");
    assert_eq!(format_relative_time(now + Duration::hours(5), now), "in 5 hours");
    assert_eq!(format_relative_time(now + Duration::hours(24), now), "tomorrow");
    assert_eq!(format_relative_time(now + Duration::hours(30), now), "in 2 days");
    assert_eq!(format_relative_time(now + Duration::days(4), now), "in 4 days");
  }

  #[test]
  fn test_format_relative_time_rounds_days_up() {
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    let due = now + Duration::days(4);
    assert_eq!(format_relative_time(due, now + Duration::milliseconds(5)), "in 4 days");
    assert_eq!(format_relative_time(due, now + Duration::hours(23)), "in 4 days");
    assert_eq!(format_relative_time(due, now + Duration::hours(25)), "in 3 days");
  }

  fn deck(name: &str, cards: Vec<Card>, last_studied: Option<DateTime<Utc>>) -> Deck {
    let mut deck = NewDeck {
      name: name.to_string(),
      description: String::new(),
      tags: vec![],
      theme: Default::default(),
    }
    .into_deck(Utc::now());
    deck.cards = cards;
    deck.last_studied = last_studied;
    deck
  }

  fn card(next_review: Option<DateTime<Utc>>) -> Card {
    Card {
      next_review,
      ..Card::new("q".into(), "a".into(), vec![])
    }
  }

  #[test]
  fn test_suggest_deck_with_most_due_cards() {
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    let decks = vec![
      deck("one", vec![card(None)], None),
      deck("two", vec![card(None), card(None)], Some(now)),
      deck("also two", vec![card(None), card(Some(now))], None),
    ];

    let suggestion = suggest_deck(&decks, now).unwrap();
    assert_eq!(suggestion.deck_name, "two");
    assert_eq!(suggestion.reason, SuggestionReason::DueCards);
    assert_eq!(suggestion.due_count, 2);
  }

  #[test]
  fn test_suggest_deck_studied_longest_ago_when_nothing_due() {
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    let later = Some(now + Duration::days(3));
    let decks = vec![
      deck("empty", vec![], None),
      deck("recent", vec![card(later)], Some(now - Duration::days(1))),
      deck("old", vec![card(later)], Some(now - Duration::days(9))),
    ];

    let suggestion = suggest_deck(&decks, now).unwrap();
    assert_eq!(suggestion.deck_name, "old");
    assert_eq!(suggestion.reason, SuggestionReason::Stale);
    assert_eq!(suggestion.due_count, 0);
  }

  #[test]
  fn test_suggest_never_studied_deck_first() {
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    let later = Some(now + Duration::days(3));
    let decks = vec![
      deck("studied", vec![card(later)], Some(now - Duration::days(30))),
      deck("untouched", vec![card(later)], None),
    ];

    let suggestion = suggest_deck(&decks, now).unwrap();
    assert_eq!(suggestion.deck_name, "untouched");
    assert_eq!(suggestion.reason, SuggestionReason::NotStarted);
  }

  #[test]
  fn test_no_suggestion_without_cards() {
    let now = Utc::now();
    assert!(suggest_deck(&[], now).is_none());
    assert!(suggest_deck(&[deck("empty", vec![], None)], now).is_none());
  }

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(ApiError::NotFound("Deck").into_response().status(), StatusCode::NOT_FOUND);
    assert_eq!(
      ApiError::BadRequest("bad".into()).into_response().status(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(ApiError::Unavailable.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
      ApiError::from(rusqlite::Error::InvalidQuery).into_response().status(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_api_error_messages() {
    assert_eq!(ApiError::NotFound("Card").to_string(), "Card not found");
    assert_eq!(ApiError::from(DbLockError).to_string(), "Database unavailable");
  }
}
