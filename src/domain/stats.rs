//! Aggregates computed by the backend and shown read-only.

use serde::{Deserialize, Serialize};

/// `GET /api/progress/overall`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OverallProgress {
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub total_topics: i64,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub quiz_accuracy: f64,
  /// Seconds
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub total_time_spent: f64,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub cards_mastered: i64,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub average_mastery: f64,
}

impl OverallProgress {
  pub fn total_minutes(&self) -> i64 {
    (self.total_time_spent / 60.0).round() as i64
  }

  /// Mastery rounded and clamped for the radial indicator
  pub fn mastery_percent(&self) -> u32 {
    self.average_mastery.round().clamp(0.0, 100.0) as u32
  }
}

/// `GET /api/progress/streak`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Streak {
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub current_streak: i64,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub longest_streak: i64,
}

/// `GET /api/progress/recommendations`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Recommendations {
  #[serde(default)]
  pub recommendation_summary: Option<String>,
}

impl Recommendations {
  pub fn summary(&self) -> Option<&str> {
    self
      .recommendation_summary
      .as_deref()
      .filter(|s| !s.trim().is_empty())
  }
}

/// Entry of `GET /api/quiz/weak-topics`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeakTopic {
  pub level: String,
  pub topic: String,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub accuracy: f64,
  #[serde(default)]
  pub recommendation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WeakTopicsResponse {
  #[serde(default)]
  pub weak_topics: Vec<WeakTopic>,
}

/// Entry of `GET /api/progress/level/{level}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopicProgress {
  pub topic: String,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub quiz_accuracy: f64,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub cards_mastered: i64,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub cards_total: i64,
  /// Minutes
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub time_spent: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LevelProgressResponse {
  #[serde(default)]
  pub progress: Vec<TopicProgress>,
}

/// `GET /api/flashcards/stats`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FlashcardStats {
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub total_cards: i64,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub due_cards: i64,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub total_reviews: i64,
}

/// `GET /api/quiz/stats`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuizStats {
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub total_attempts: i64,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub accuracy: f64,
  /// Seconds per question
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub average_time: f64,
}

/// Kind of backend study session opened for streak tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
  Flashcards,
  Quiz,
}

/// Counters reported when a backend study session ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionTally {
  pub cards_reviewed: u32,
  pub questions_answered: u32,
  pub correct_answers: u32,
}

/// Format a percentage the way the pages show it ("72.5%")
pub fn percent_one_decimal(value: f64) -> String {
  format!("{:.1}%", value)
}

/// Format a number without a trailing ".0" when it is whole
pub fn trim_number(value: f64) -> String {
  if value.fract() == 0.0 {
    format!("{}", value as i64)
  } else {
    format!("{:.2}", value)
      .trim_end_matches('0')
      .trim_end_matches('.')
      .to_string()
  }
}
