use serde::{Deserialize, Serialize};

/// How well the learner recalled a card, from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Rating {
  /// Forgot the card entirely (a lapse)
  Again,
  /// Recalled with difficulty
  Hard,
  /// Recalled correctly
  Good,
  /// Recalled effortlessly
  Easy,
}

impl Rating {
  pub const ALL: [Rating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Again => "again",
      Self::Hard => "hard",
      Self::Good => "good",
      Self::Easy => "easy",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "again" => Some(Self::Again),
      "hard" => Some(Self::Hard),
      "good" => Some(Self::Good),
      "easy" => Some(Self::Easy),
      _ => None,
    }
  }

  /// Good and easy count as correct answers in session tallies
  pub fn is_correct(&self) -> bool {
    matches!(self, Self::Good | Self::Easy)
  }
}

impl TryFrom<String> for Rating {
  type Error = String;

  fn try_from(s: String) -> Result<Self, Self::Error> {
    Self::from_str(&s).ok_or_else(|| format!("unknown rating: {}", s))
  }
}

/// Body of a review submission
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReviewForm {
  pub rating: Rating,
}
