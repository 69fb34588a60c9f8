//! Deck and card management endpoints.

use axum::{
  extract::{Path, State},
  http::StatusCode,
  Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::db::{self, DbPool};
use crate::domain::{Card, Deck, NewCard, NewDeck};
use crate::srs::{self, ReviewStatus};

use super::{ApiError, ApiResult};

/// A deck together with its current review status
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
  #[serde(flatten)]
  pub deck: Deck,
  pub status: ReviewStatus,
}

impl DeckSummary {
  fn new(deck: Deck) -> Self {
    let status = srs::review_status(&deck.cards, Utc::now());
    Self { deck, status }
  }
}

fn validate_deck(input: &NewDeck) -> ApiResult<()> {
  if input.name.trim().is_empty() {
    return Err(ApiError::BadRequest("Deck name must not be empty".into()));
  }
  Ok(())
}

fn validate_card(input: &NewCard) -> ApiResult<()> {
  if input.question.trim().is_empty() || input.answer.trim().is_empty() {
    return Err(ApiError::BadRequest("Question and answer must not be empty".into()));
  }
  Ok(())
}

pub async fn list_decks(State(pool): State<DbPool>) -> ApiResult<Json<Vec<DeckSummary>>> {
  let conn = db::try_lock(&pool)?;
  let decks = db::get_all_decks(&conn)?;
  Ok(Json(decks.into_iter().map(DeckSummary::new).collect()))
}

pub async fn create_deck(
  State(pool): State<DbPool>,
  Json(input): Json<NewDeck>,
) -> ApiResult<(StatusCode, Json<Deck>)> {
  validate_deck(&input)?;
  let conn = db::try_lock(&pool)?;
  let deck = db::save_deck(&conn, input, Utc::now())?;
  Ok((StatusCode::CREATED, Json(deck)))
}

pub async fn get_deck(
  State(pool): State<DbPool>,
  Path(deck_id): Path<String>,
) -> ApiResult<Json<DeckSummary>> {
  let conn = db::try_lock(&pool)?;
  let deck = db::get_deck_by_id(&conn, &deck_id)?.ok_or(ApiError::NotFound("Deck"))?;
  Ok(Json(DeckSummary::new(deck)))
}

/// Edit a deck's details; its cards are left as they are
pub async fn edit_deck(
  State(pool): State<DbPool>,
  Path(deck_id): Path<String>,
  Json(input): Json<NewDeck>,
) -> ApiResult<Json<Deck>> {
  validate_deck(&input)?;
  let conn = db::try_lock(&pool)?;
  let mut deck = db::get_deck_by_id(&conn, &deck_id)?.ok_or(ApiError::NotFound("Deck"))?;

  deck.name = input.name;
  deck.description = input.description;
  deck.tags = input.tags;
  deck.theme = input.theme;
  db::update_deck(&conn, &deck, Utc::now())?;
  Ok(Json(deck))
}

pub async fn remove_deck(
  State(pool): State<DbPool>,
  Path(deck_id): Path<String>,
) -> ApiResult<StatusCode> {
  let conn = db::try_lock(&pool)?;
  if db::delete_deck(&conn, &deck_id)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound("Deck"))
  }
}

pub async fn create_card(
  State(pool): State<DbPool>,
  Path(deck_id): Path<String>,
  Json(input): Json<NewCard>,
) -> ApiResult<(StatusCode, Json<Card>)> {
  validate_card(&input)?;
  let conn = db::try_lock(&pool)?;
  let card = db::add_card_to_deck(&conn, &deck_id, input, Utc::now())?.ok_or(ApiError::NotFound("Deck"))?;
  Ok((StatusCode::CREATED, Json(card)))
}

/// Edit a card's content, keeping its scheduling state
pub async fn edit_card(
  State(pool): State<DbPool>,
  Path((deck_id, card_id)): Path<(String, String)>,
  Json(input): Json<NewCard>,
) -> ApiResult<Json<Card>> {
  validate_card(&input)?;
  let conn = db::try_lock(&pool)?;
  let deck = db::get_deck_by_id(&conn, &deck_id)?.ok_or(ApiError::NotFound("Deck"))?;
  let card = deck.card(&card_id).ok_or(ApiError::NotFound("Card"))?;

  let edited = Card {
    question: input.question,
    answer: input.answer,
    tags: input.tags,
    ..card.clone()
  };
  let card = db::update_card_in_deck(&conn, &deck_id, edited, Utc::now())?
    .ok_or(ApiError::NotFound("Card"))?;
  Ok(Json(card))
}

pub async fn remove_card(
  State(pool): State<DbPool>,
  Path((deck_id, card_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
  let conn = db::try_lock(&pool)?;
  if db::delete_card_from_deck(&conn, &deck_id, &card_id, Utc::now())? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound("Card"))
  }
}
