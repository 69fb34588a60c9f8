//! User study statistics, stored as a single key-value record

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::{StudySession, UserStats};
use crate::stats::apply_study_session;

use super::{from_json, to_json};

const USER_STATS_KEY: &str = "user_stats";

/// Load the user's stats, or zeroed stats if none were recorded yet
pub fn get_user_stats(conn: &Connection) -> Result<UserStats> {
  let value: Option<String> = conn
    .query_row("SELECT value FROM kv WHERE key = ?1", params![USER_STATS_KEY], |row| row.get(0))
    .optional()?;

  match value {
    Some(v) => from_json(&v),
    None => Ok(UserStats::default()),
  }
}

pub fn update_user_stats(conn: &Connection, stats: &UserStats) -> Result<()> {
  conn.execute(
    "INSERT INTO kv (key, value) VALUES (?1, ?2)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    params![USER_STATS_KEY, to_json(stats)?],
  )?;
  Ok(())
}

/// Append a study session to the history and update totals and streak
pub fn record_study_session(conn: &Connection, session: StudySession, now: DateTime<Utc>) -> Result<UserStats> {
  let stats = get_user_stats(conn)?;
  let stats = apply_study_session(&stats, session, now);
  update_user_stats(conn, &stats)?;

  tracing::debug!(
    streak_days = stats.streak_days,
    total_reviews = stats.total_reviews,
    "Recorded study session"
  );
  Ok(stats)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::TestEnv;
  use chrono::{Duration, TimeZone};

  fn session(start: DateTime<Utc>, reviewed: u32) -> StudySession {
    StudySession {
      deck_id: "deck".to_string(),
      start_time: start,
      end_time: Some(start + Duration::minutes(3)),
      cards_reviewed: reviewed,
      cards_correct: reviewed / 2,
    }
  }

  #[test]
  fn test_default_stats_when_empty() {
    let env = TestEnv::new().unwrap();
    assert_eq!(get_user_stats(&env.conn).unwrap(), UserStats::default());
  }

  #[test]
  fn test_update_overwrites() {
    let env = TestEnv::new().unwrap();
    let mut stats = UserStats::default();
    stats.total_reviews = 3;
    update_user_stats(&env.conn, &stats).unwrap();
    stats.total_reviews = 8;
    update_user_stats(&env.conn, &stats).unwrap();

    assert_eq!(get_user_stats(&env.conn).unwrap().total_reviews, 8);
  }

  #[test]
  fn test_record_sessions_across_days() {
    let env = TestEnv::new().unwrap();
    let day1 = Utc.with_ymd_and_hms(2026, 5, 1, 18, 0, 0).unwrap();
    let day2 = day1 + Duration::days(1);

    record_study_session(&env.conn, session(day1, 10), day1).unwrap();
    let stats = record_study_session(&env.conn, session(day2, 6), day2).unwrap();

    assert_eq!(stats.streak_days, 2);
    assert_eq!(stats.total_reviews, 16);
    assert_eq!(get_user_stats(&env.conn).unwrap(), stats);
  }
}
