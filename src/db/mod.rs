pub mod decks;
pub mod schema;
pub mod stats;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{Card, DeckTheme, NewDeck};

// Re-export all public items from submodules
pub use decks::*;
pub use schema::run_migrations;
pub use stats::*;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }
}

/// Error returned when database lock cannot be acquired
#[derive(Debug)]
pub struct DbLockError;

impl std::fmt::Display for DbLockError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Database unavailable")
  }
}

impl std::error::Error for DbLockError {}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, DbLockError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
    DbLockError
  })
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String> {
  serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

pub(crate) fn from_json<T: DeserializeOwned>(text: &str) -> Result<T> {
  serde_json::from_str(text)
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

pub fn init_db(path: &Path) -> Result<DbPool> {
  if let Some(parent) = path.parent() {
    if let Err(e) = std::fs::create_dir_all(parent) {
      tracing::warn!("Could not create database directory {}: {}", parent.display(), e);
    }
  }

  // Create backup before migrations if database exists
  if path.exists() {
    let backup_path = path.with_extension("db.backup");
    if let Err(e) = std::fs::copy(path, &backup_path) {
      tracing::warn!("Could not create database backup: {}", e);
    }
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

/// Insert the sample decks into an empty store. Returns the number of decks added.
pub fn seed_sample_decks(conn: &Connection, now: DateTime<Utc>) -> Result<usize> {
  let count: i64 = conn.query_row("SELECT COUNT(*) FROM decks", [], |row| row.get(0))?;
  if count > 0 {
    return Ok(0);
  }

  let samples = sample_decks();
  let added = samples.len();
  for (input, cards) in samples {
    let mut deck = input.into_deck(now);
    deck.cards = cards
      .iter()
      .map(|(question, answer, tags)| {
        Card::new(
          question.to_string(),
          answer.to_string(),
          tags.iter().map(|t| t.to_string()).collect(),
        )
      })
      .collect();
    insert_deck(conn, &deck)?;
  }

  tracing::info!("Seeded {} sample decks", added);
  Ok(added)
}

type SampleCard = (&'static str, &'static str, &'static [&'static str]);

fn deck(name: &str, description: &str, tags: &[&str], theme: DeckTheme) -> NewDeck {
  NewDeck {
    name: name.to_string(),
    description: description.to_string(),
    tags: tags.iter().map(|t| t.to_string()).collect(),
    theme,
  }
}

fn sample_decks() -> Vec<(NewDeck, Vec<SampleCard>)> {
  vec![
    (
      deck(
        "Rust Ownership",
        "Borrowing, moves and lifetimes",
        &["rust", "programming"],
        DeckTheme::Default,
      ),
      vec![
        (
          "What happens to a String when it is assigned to another variable?",
          "It is moved; the original binding can no longer be used.",
          &["ownership"][..],
        ),
        (
          "How many mutable references to a value may exist at once?",
          "Exactly one, and no shared references may coexist with it.",
          &["borrowing"][..],
        ),
        (
          "What does the 'static lifetime mean?",
          "The reference may live for the entire duration of the program.",
          &["lifetimes"][..],
        ),
      ],
    ),
    (
      deck(
        "World Capitals",
        "Capital cities around the globe",
        &["geography"],
        DeckTheme::Notebook,
      ),
      vec![
        ("Capital of Australia?", "Canberra", &["oceania"][..]),
        ("Capital of Canada?", "Ottawa", &["americas"][..]),
        ("Capital of Kenya?", "Nairobi", &["africa"][..]),
        ("Capital of Mongolia?", "Ulaanbaatar", &["asia"][..]),
      ],
    ),
  ]
}
