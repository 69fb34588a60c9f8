//! Due-card selection and review status counts for study sessions.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::domain::Card;

/// Cards with at least this many repetitions (and fewer than
/// [`MASTERED_REPETITIONS`]) are counted as learning
pub const LEARNING_MIN_REPETITIONS: u32 = 1;

/// Cards with at least this many consecutive successful reviews are counted as mastered
pub const MASTERED_REPETITIONS: u32 = 5;

/// Review status counts for a card collection.
///
/// `learning_count` and `mastered_count` are disjoint, but either may
/// overlap with `due_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStatus {
  pub due_count: usize,
  pub learning_count: usize,
  pub mastered_count: usize,
}

impl std::ops::Add for ReviewStatus {
  type Output = Self;

  fn add(self, other: Self) -> Self {
    Self {
      due_count: self.due_count + other.due_count,
      learning_count: self.learning_count + other.learning_count,
      mastered_count: self.mastered_count + other.mastered_count,
    }
  }
}

pub fn is_learning(card: &Card) -> bool {
  (LEARNING_MIN_REPETITIONS..MASTERED_REPETITIONS).contains(&card.repetitions)
}

pub fn is_mastered(card: &Card) -> bool {
  card.repetitions >= MASTERED_REPETITIONS
}

/// Cards due at `now`, in input order
pub fn due_cards(cards: &[Card], now: DateTime<Utc>) -> Vec<Card> {
  cards.iter().filter(|c| c.is_due(now)).cloned().collect()
}

pub fn review_status(cards: &[Card], now: DateTime<Utc>) -> ReviewStatus {
  cards.iter().fold(ReviewStatus::default(), |mut status, card| {
    if card.is_due(now) {
      status.due_count += 1;
    }
    if is_learning(card) {
      status.learning_count += 1;
    } else if is_mastered(card) {
      status.mastered_count += 1;
    }
    status
  })
}

/// Uniformly permute a study queue
pub fn shuffle_study_queue<R: Rng + ?Sized>(mut cards: Vec<Card>, rng: &mut R) -> Vec<Card> {
  cards.shuffle(rng);
  cards
}

/// Earliest scheduled review strictly after `now`, if any
pub fn next_review_time(cards: &[Card], now: DateTime<Utc>) -> Option<DateTime<Utc>> {
  cards
    .iter()
    .filter_map(|c| c.next_review)
    .filter(|next| *next > now)
    .min()
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone};
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  fn t0() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
  }

  fn card(question: &str, repetitions: u32, next_review: Option<DateTime<Utc>>) -> Card {
    Card {
      repetitions,
      next_review,
      ..Card::new(question.to_string(), "answer".to_string(), vec![])
    }
  }

  fn questions(cards: &[Card]) -> Vec<&str> {
    cards.iter().map(|c| c.question.as_str()).collect()
  }

  #[test]
  fn test_never_reviewed_is_always_due() {
    let cards = vec![card("new", 7, None)];
    for offset in [-1_000_000, 0, 1_000_000] {
      let now = t0() + Duration::days(offset);
      assert_eq!(due_cards(&cards, now).len(), 1);
    }
  }

  #[test]
  fn test_due_boundary() {
    let now = t0();
    let cards = vec![
      card("exactly now", 1, Some(now)),
      card("one ms later", 1, Some(now + Duration::milliseconds(1))),
      card("yesterday", 1, Some(now - Duration::days(1))),
    ];

    let due = due_cards(&cards, now);
    assert_eq!(questions(&due), vec!["exactly now", "yesterday"]);
  }

  #[test]
  fn test_due_cards_keeps_input_order() {
    let now = t0();
    let cards = vec![
      card("c", 0, None),
      card("future", 0, Some(now + Duration::days(2))),
      card("a", 0, Some(now - Duration::days(3))),
      card("b", 0, None),
    ];

    assert_eq!(questions(&due_cards(&cards, now)), vec!["c", "a", "b"]);
  }

  #[test]
  fn test_due_cards_empty() {
    assert!(due_cards(&[], t0()).is_empty());
  }

  #[test]
  fn test_review_status_counts() {
    let now = t0();
    let later = Some(now + Duration::days(5));
    let cards = vec![
      card("fresh", 0, None),
      card("learning due", 1, Some(now)),
      card("learning later", 4, later),
      card("mastered due", 5, Some(now - Duration::days(1))),
      card("mastered later", 12, later),
    ];

    let status = review_status(&cards, now);
    assert_eq!(
      status,
      ReviewStatus {
        due_count: 3,
        learning_count: 2,
        mastered_count: 2,
      }
    );
  }

  #[test]
  fn test_learning_and_mastered_are_disjoint() {
    let now = t0();
    let cards: Vec<Card> = (0..12).map(|reps| card("c", reps, None)).collect();

    let status = review_status(&cards, now);
    assert!(status.learning_count + status.mastered_count <= cards.len());
    for c in &cards {
      assert!(!(is_learning(c) && is_mastered(c)));
    }
    assert_eq!(status.learning_count, 4);
    assert_eq!(status.mastered_count, 7);
  }

  #[test]
  fn test_threshold_constants() {
    assert!(!is_learning(&card("zero", 0, None)));
    assert!(is_learning(&card("min", LEARNING_MIN_REPETITIONS, None)));
    assert!(is_learning(&card("max", MASTERED_REPETITIONS - 1, None)));
    assert!(is_mastered(&card("mastered", MASTERED_REPETITIONS, None)));
  }

  #[test]
  fn test_review_status_add() {
    let a = ReviewStatus { due_count: 1, learning_count: 2, mastered_count: 3 };
    let b = ReviewStatus { due_count: 4, learning_count: 0, mastered_count: 1 };
    assert_eq!(a + b, ReviewStatus { due_count: 5, learning_count: 2, mastered_count: 4 });
  }

  #[test]
  fn test_shuffle_is_a_permutation() {
    let cards: Vec<Card> = (0..20).map(|i| card(&i.to_string(), 0, None)).collect();
    let mut rng = StdRng::seed_from_u64(7);

    let shuffled = shuffle_study_queue(cards.clone(), &mut rng);

    assert_eq!(shuffled.len(), cards.len());
    let mut before: Vec<_> = cards.iter().map(|c| c.id.clone()).collect();
    let mut after: Vec<_> = shuffled.iter().map(|c| c.id.clone()).collect();
    before.sort();
    after.sort();
    assert_eq!(before, after);
  }

  #[test]
  fn test_shuffle_is_reproducible_with_seed() {
    let cards: Vec<Card> = (0..10).map(|i| card(&i.to_string(), 0, None)).collect();

    let a = shuffle_study_queue(cards.clone(), &mut StdRng::seed_from_u64(42));
    let b = shuffle_study_queue(cards, &mut StdRng::seed_from_u64(42));
    assert_eq!(questions(&a), questions(&b));
  }

  #[test]
  fn test_next_review_time() {
    let now = t0();
    let cards = vec![
      card("new", 0, None),
      card("past", 1, Some(now - Duration::days(1))),
      card("soon", 1, Some(now + Duration::hours(3))),
      card("later", 1, Some(now + Duration::days(3))),
    ];

    assert_eq!(next_review_time(&cards, now), Some(now + Duration::hours(3)));
    assert_eq!(next_review_time(&cards[..2], now), None);
  }
}
