//! Study streaks and per-deck performance derived from session history.
//!
//! Days are calendar days in UTC.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::{StudySession, UserStats};

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
  now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Fold a finished session into the user's stats.
///
/// The streak grows by one when the previous study day was yesterday,
/// restarts at 1 after a gap, and is unchanged for a second session on
/// the same day.
pub fn apply_study_session(stats: &UserStats, session: StudySession, now: DateTime<Utc>) -> UserStats {
  let today = start_of_day(now);

  let streak_days = match stats.last_review_date {
    None => 1,
    Some(last) => match (today - start_of_day(last)).num_days() {
      0 => stats.streak_days.max(1),
      1 => stats.streak_days + 1,
      d if d > 1 => 1,
      // Clock moved backwards; keep the streak as it was
      _ => stats.streak_days,
    },
  };

  let mut study_history = stats.study_history.clone();
  let cards_reviewed = u64::from(session.cards_reviewed);
  study_history.push(session);

  UserStats {
    streak_days,
    total_reviews: stats.total_reviews + cards_reviewed,
    last_review_date: Some(today),
    study_history,
  }
}

/// Aggregated correctness for one deck
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckPerformance {
  pub deck_id: String,
  pub cards_reviewed: u64,
  pub cards_correct: u64,
  /// Percentage of reviewed cards answered correctly (0 when nothing was reviewed)
  pub percent_correct: f64,
}

pub fn deck_performance(stats: &UserStats) -> Vec<DeckPerformance> {
  let mut totals: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
  for session in &stats.study_history {
    let entry = totals.entry(session.deck_id.as_str()).or_default();
    entry.0 += u64::from(session.cards_reviewed);
    entry.1 += u64::from(session.cards_correct);
  }

  totals
    .into_iter()
    .map(|(deck_id, (reviewed, correct))| DeckPerformance {
      deck_id: deck_id.to_string(),
      cards_reviewed: reviewed,
      cards_correct: correct,
      percent_correct: if reviewed > 0 {
        correct as f64 / reviewed as f64 * 100.0
      } else {
        0.0
      },
    })
    .collect()
}

/// Cards reviewed on each of the last `days` days, oldest first, ending today
pub fn reviews_per_day(stats: &UserStats, now: DateTime<Utc>, days: u32) -> Vec<(NaiveDate, u64)> {
  let today = now.date_naive();
  (0..i64::from(days))
    .rev()
    .map(|offset| {
      let day = today - Duration::days(offset);
      let count = stats
        .study_history
        .iter()
        .filter(|s| s.start_time.date_naive() == day)
        .map(|s| u64::from(s.cards_reviewed))
        .sum();
      (day, count)
    })
    .collect()
}

/// Mean session length in milliseconds over sessions that have an end time
pub fn average_session_ms(stats: &UserStats) -> Option<i64> {
  let (total, count) = stats
    .study_history
    .iter()
    .filter_map(StudySession::duration_ms)
    .fold((0_i128, 0_i128), |(total, count), ms| (total + i128::from(ms), count + 1));
  if count == 0 {
    return None;
  }
  // The mean of i64 values always fits back into i64
  i64::try_from(total / count).ok()
}
