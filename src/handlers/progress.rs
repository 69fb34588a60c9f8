use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::config;
use crate::db::{self, DbPool};
use crate::domain::{StudySession, UserStats};
use crate::stats::{self, DeckPerformance};

use super::{ApiError, ApiResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayActivity {
  pub date: NaiveDate,
  pub cards_reviewed: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
  #[serde(flatten)]
  pub stats: UserStats,
  pub deck_performance: Vec<DeckPerformance>,
  pub recent_activity: Vec<DayActivity>,
  pub average_session_ms: Option<i64>,
}

pub async fn stats(State(pool): State<DbPool>) -> ApiResult<Json<StatsView>> {
  let user_stats = {
    let conn = db::try_lock(&pool)?;
    db::get_user_stats(&conn)?
  };

  let recent_activity = stats::reviews_per_day(&user_stats, Utc::now(), config::ACTIVITY_WINDOW_DAYS)
    .into_iter()
    .map(|(date, cards_reviewed)| DayActivity { date, cards_reviewed })
    .collect();

  Ok(Json(StatsView {
    deck_performance: stats::deck_performance(&user_stats),
    average_session_ms: stats::average_session_ms(&user_stats),
    recent_activity,
    stats: user_stats,
  }))
}

pub async fn record_session(
  State(pool): State<DbPool>,
  Json(session): Json<StudySession>,
) -> ApiResult<Json<UserStats>> {
  if session.cards_correct > session.cards_reviewed {
    return Err(ApiError::BadRequest(
      "cardsCorrect cannot exceed cardsReviewed".into(),
    ));
  }
  if session.end_time.is_some_and(|end| end < session.start_time) {
    return Err(ApiError::BadRequest("endTime is before startTime".into()));
  }

  let conn = db::try_lock(&pool)?;
  let stats = db::record_study_session(&conn, session, Utc::now())?;
  Ok(Json(stats))
}
