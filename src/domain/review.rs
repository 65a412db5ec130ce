use serde::{Deserialize, Serialize};

/// Discrete rating offered by the review buttons.
///
/// Values are the backend scheduler's 0-5 quality scale; the UI only exposes
/// three points of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewQuality {
  Hard = 2,
  Medium = 3,
  Easy = 5,
}

impl ReviewQuality {
  pub const ALL: [ReviewQuality; 3] = [Self::Hard, Self::Medium, Self::Easy];

  pub fn from_u8(value: u8) -> Option<Self> {
    match value {
      2 => Some(Self::Hard),
      3 => Some(Self::Medium),
      5 => Some(Self::Easy),
      _ => None,
    }
  }

  pub fn as_u8(&self) -> u8 {
    *self as u8
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Hard => "Hard",
      Self::Medium => "Medium",
      Self::Easy => "Easy",
    }
  }

  /// CSS modifier for the rating button
  pub fn css_class(&self) -> &'static str {
    match self {
      Self::Hard => "hard",
      Self::Medium => "medium",
      Self::Easy => "easy",
    }
  }
}

/// Backend acknowledgment of a recorded review
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewAck {
  #[serde(default)]
  pub message: Option<String>,
  #[serde(default)]
  pub next_review: Option<String>,
  #[serde(default)]
  pub interval_days: Option<i64>,
}
