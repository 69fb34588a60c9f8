//! Deck and card CRUD over the key-value deck table.
//!
//! Every card write is a read-modify-write of the owning deck; callers hold
//! the connection lock for the whole operation, so updates never interleave.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::{Card, Deck, NewCard, NewDeck, Rating};
use crate::srs;

use super::{from_json, to_json};

pub fn insert_deck(conn: &Connection, deck: &Deck) -> Result<()> {
  conn.execute(
    "INSERT INTO decks (id, data, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
    params![deck.id, to_json(deck)?, deck.created_at.timestamp_millis()],
  )?;
  Ok(())
}

/// All decks in creation order
pub fn get_all_decks(conn: &Connection) -> Result<Vec<Deck>> {
  let mut stmt = conn.prepare("SELECT data FROM decks ORDER BY created_at ASC, rowid ASC")?;
  let rows = stmt
    .query_map([], |row| row.get::<_, String>(0))?
    .collect::<Result<Vec<_>>>()?;

  rows.iter().map(|data| from_json(data)).collect()
}

pub fn get_deck_by_id(conn: &Connection, id: &str) -> Result<Option<Deck>> {
  let data: Option<String> = conn
    .query_row("SELECT data FROM decks WHERE id = ?1", params![id], |row| row.get(0))
    .optional()?;

  data.map(|d| from_json(&d)).transpose()
}

/// Create a deck from user input, assigning its id and creation time
pub fn save_deck(conn: &Connection, input: NewDeck, now: DateTime<Utc>) -> Result<Deck> {
  let deck = input.into_deck(now);
  insert_deck(conn, &deck)?;
  tracing::info!(
    deck_id = %deck.id,
    name = %deck.name,
    theme = deck.theme.as_str(),
    "Created deck"
  );
  Ok(deck)
}

/// Overwrite a stored deck, stamping the write time. Returns false if no deck has this id.
pub fn update_deck(conn: &Connection, deck: &Deck, now: DateTime<Utc>) -> Result<bool> {
  let updated = conn.execute(
    "UPDATE decks SET data = ?1, updated_at = ?2 WHERE id = ?3",
    params![to_json(deck)?, now.timestamp_millis(), deck.id],
  )?;
  Ok(updated > 0)
}

pub fn delete_deck(conn: &Connection, id: &str) -> Result<bool> {
  let deleted = conn.execute("DELETE FROM decks WHERE id = ?1", params![id])?;
  if deleted > 0 {
    tracing::info!(deck_id = %id, "Deleted deck");
  }
  Ok(deleted > 0)
}

/// Append a new card (default scheduling state) to a deck.
/// Returns None if the deck does not exist.
pub fn add_card_to_deck(
  conn: &Connection,
  deck_id: &str,
  input: NewCard,
  now: DateTime<Utc>,
) -> Result<Option<Card>> {
  let Some(mut deck) = get_deck_by_id(conn, deck_id)? else {
    return Ok(None);
  };

  let card = Card::from(input);
  deck.cards.push(card.clone());
  update_deck(conn, &deck, now)?;
  Ok(Some(card))
}

/// Replace a card inside a deck, keeping its position.
/// Returns None if either the deck or the card does not exist.
pub fn update_card_in_deck(
  conn: &Connection,
  deck_id: &str,
  card: Card,
  now: DateTime<Utc>,
) -> Result<Option<Card>> {
  let Some(mut deck) = get_deck_by_id(conn, deck_id)? else {
    return Ok(None);
  };

  if !deck.replace_card(card.clone()) {
    return Ok(None);
  }
  update_deck(conn, &deck, now)?;
  Ok(Some(card))
}

pub fn delete_card_from_deck(
  conn: &Connection,
  deck_id: &str,
  card_id: &str,
  now: DateTime<Utc>,
) -> Result<bool> {
  let Some(mut deck) = get_deck_by_id(conn, deck_id)? else {
    return Ok(false);
  };

  if !deck.remove_card(card_id) {
    return Ok(false);
  }
  update_deck(conn, &deck, now)
}

/// Outcome of a write addressed to one card of one deck
#[derive(Debug, Clone, PartialEq)]
pub enum CardUpdate {
  Updated(Card),
  MissingDeck,
  MissingCard,
}

/// Schedule a reviewed card and persist it, marking the deck as studied at `now`.
pub fn review_card_in_deck(
  conn: &Connection,
  deck_id: &str,
  card_id: &str,
  rating: Rating,
  now: DateTime<Utc>,
) -> Result<CardUpdate> {
  let Some(mut deck) = get_deck_by_id(conn, deck_id)? else {
    return Ok(CardUpdate::MissingDeck);
  };
  let Some(card) = deck.card(card_id) else {
    return Ok(CardUpdate::MissingCard);
  };

  let reviewed = srs::review_card(card, rating, now);
  deck.replace_card(reviewed.clone());
  deck.last_studied = Some(now);
  update_deck(conn, &deck, now)?;
  Ok(CardUpdate::Updated(reviewed))
}
