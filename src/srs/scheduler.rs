//! Simplified SM-2 review scheduler.
//!
//! Each review maps a card and a four-level [`Rating`] to a new card state.
//! Stored state below the floors (ease < 1.3, interval < 1) is clamped up
//! to the floor before the transition is applied.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Card, Rating};

/// Hard floor for the ease factor
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Hard floor for the review interval in days
pub const MIN_INTERVAL_DAYS: u32 = 1;

/// Ease factor penalty on an "again" rating
pub const AGAIN_EASE_PENALTY: f64 = 0.2;

/// Ease factor penalty on a "hard" rating
pub const HARD_EASE_PENALTY: f64 = 0.15;

/// Interval growth on a "hard" rating
pub const HARD_INTERVAL_MULTIPLIER: f64 = 1.2;

/// Ease factor bonus on an "easy" rating
pub const EASY_EASE_BONUS: f64 = 0.1;

/// Extra interval growth on an "easy" rating, applied on top of the ease factor
pub const EASY_INTERVAL_MULTIPLIER: f64 = 1.3;

/// Fixed intervals for the first two consecutive "good" ratings
pub const GOOD_FIRST_INTERVAL_DAYS: u32 = 1;
pub const GOOD_SECOND_INTERVAL_DAYS: u32 = 3;

/// Scheduling fields produced by a single transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
  pub repetitions: u32,
  pub ease_factor: f64,
  pub interval: u32,
}

fn ceil_days(days: f64) -> u32 {
  // `as` saturates, so runaway growth pins at u32::MAX instead of wrapping
  (days.ceil() as u32).max(MIN_INTERVAL_DAYS)
}

/// Compute the next repetitions, ease factor and interval for a rating
pub fn next_schedule(card: &Card, rating: Rating) -> Schedule {
  let repetitions = card.repetitions;
  // f64::max returns the other operand for NaN, so NaN also reads as the floor
  let ease = card.ease_factor.max(MIN_EASE_FACTOR);
  let interval = card.interval.max(MIN_INTERVAL_DAYS);

  match rating {
    Rating::Again => Schedule {
      repetitions: 0,
      ease_factor: (ease - AGAIN_EASE_PENALTY).max(MIN_EASE_FACTOR),
      interval: MIN_INTERVAL_DAYS,
    },
    Rating::Hard => Schedule {
      repetitions: repetitions.saturating_sub(1),
      ease_factor: (ease - HARD_EASE_PENALTY).max(MIN_EASE_FACTOR),
      interval: ceil_days(interval as f64 * HARD_INTERVAL_MULTIPLIER),
    },
    Rating::Good => {
      let repetitions = repetitions.saturating_add(1);
      let interval = match repetitions {
        1 => GOOD_FIRST_INTERVAL_DAYS,
        2 => GOOD_SECOND_INTERVAL_DAYS,
        _ => ceil_days(interval as f64 * ease),
      };
      Schedule {
        repetitions,
        ease_factor: ease,
        interval,
      }
    }
    Rating::Easy => {
      let ease_factor = ease + EASY_EASE_BONUS;
      Schedule {
        repetitions: repetitions.saturating_add(1),
        ease_factor,
        interval: ceil_days(interval as f64 * ease_factor * EASY_INTERVAL_MULTIPLIER),
      }
    }
  }
}

/// Apply a review to a card, returning the updated card.
///
/// The next review is `interval` whole days after `now` (not aligned to
/// midnight). The input card is left untouched.
pub fn review_card(card: &Card, rating: Rating, now: DateTime<Utc>) -> Card {
  let schedule = next_schedule(card, rating);
  let next_review = now
    .checked_add_signed(Duration::days(i64::from(schedule.interval)))
    .unwrap_or(DateTime::<Utc>::MAX_UTC);

  tracing::debug!(
    card_id = %card.id,
    rating = rating.as_str(),
    repetitions = schedule.repetitions,
    ease_factor = schedule.ease_factor,
    interval = schedule.interval,
    "Scheduled review"
  );

  Card {
    repetitions: schedule.repetitions,
    ease_factor: schedule.ease_factor,
    interval: schedule.interval,
    last_reviewed: Some(now),
    next_review: Some(next_review),
    ..card.clone()
  }
}

/// Interval in days each rating would produce, ordered again, hard, good, easy.
/// Used to label the rating buttons.
pub fn preview_intervals(card: &Card) -> [u32; 4] {
  Rating::ALL.map(|rating| next_schedule(card, rating).interval)
}

/// Format an interval in days to a short label
pub fn format_interval(days: u32) -> String {
  match days {
    0 => "now".to_string(),
    1..=6 => format!("{}d", days),
    7..=29 => format!("{}w", days / 7),
    30..=364 => format!("{}mo", days / 30),
    _ => format!("{}y", days / 365),
  }
}
