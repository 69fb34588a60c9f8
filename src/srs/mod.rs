pub mod scheduler;
pub mod selector;

pub use scheduler::{MIN_EASE_FACTOR, MIN_INTERVAL_DAYS, format_interval, preview_intervals, review_card};
pub use selector::{
  LEARNING_MIN_REPETITIONS, MASTERED_REPETITIONS, ReviewStatus, due_cards, next_review_time,
  review_status, shuffle_study_queue,
};
