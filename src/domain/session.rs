use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A finished (or abandoned) pass over a deck's due cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
  pub deck_id: String,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub start_time: DateTime<Utc>,
  #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
  pub end_time: Option<DateTime<Utc>>,
  pub cards_reviewed: u32,
  pub cards_correct: u32,
}

impl StudySession {
  pub fn duration_ms(&self) -> Option<i64> {
    self
      .end_time
      .map(|end| (end - self.start_time).num_milliseconds())
  }
}

/// Lifetime study statistics for the (single) local user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
  pub streak_days: u32,
  pub total_reviews: u64,
  #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
  pub last_review_date: Option<DateTime<Utc>>,
  #[serde(default)]
  pub study_history: Vec<StudySession>,
}
