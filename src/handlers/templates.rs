//! Template and form structs for all pages and htmx fragments.

use askama::Template;
use serde::Deserialize;

use crate::notify::Notice;
use crate::study::GenerationStatus;

use super::views::{
  DashboardView, FilterOptions, FlashcardStatsView, FlashcardView, ProgressView, QuizStatsView,
  QuizView,
};

// ==================== Pages ====================

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
  pub active: &'static str,
  pub notices: Vec<Notice>,
  pub dashboard: DashboardView,
}

#[derive(Template)]
#[template(path = "flashcards.html")]
pub struct FlashcardsTemplate {
  pub active: &'static str,
  pub notices: Vec<Notice>,
  pub filters: FilterOptions,
  pub flashcard: FlashcardView,
  pub stats: FlashcardStatsView,
}

#[derive(Template)]
#[template(path = "quiz.html")]
pub struct QuizTemplate {
  pub active: &'static str,
  pub notices: Vec<Notice>,
  pub filters: FilterOptions,
  pub default_count: u32,
  pub quiz: QuizView,
  pub stats: QuizStatsView,
}

#[derive(Template)]
#[template(path = "progress.html")]
pub struct ProgressTemplate {
  pub active: &'static str,
  pub notices: Vec<Notice>,
  pub progress: ProgressView,
}

#[derive(Template)]
#[template(path = "generate.html")]
pub struct GenerateTemplate {
  pub active: &'static str,
  pub notices: Vec<Notice>,
  pub filters: FilterOptions,
  pub flashcard_count: u32,
  pub question_count: u32,
  pub has_status: bool,
  pub status: GenerationStatus,
}

// ==================== Fragments ====================

/// Flashcard panel plus out-of-band stats and notices
#[derive(Template)]
#[template(path = "partials/flashcard_fragment.html")]
pub struct FlashcardFragmentTemplate {
  pub notices: Vec<Notice>,
  pub flashcard: FlashcardView,
  pub stats: FlashcardStatsView,
}

/// Quiz panel plus out-of-band stats and notices
#[derive(Template)]
#[template(path = "partials/quiz_fragment.html")]
pub struct QuizFragmentTemplate {
  pub notices: Vec<Notice>,
  pub quiz: QuizView,
  pub stats: QuizStatsView,
}

#[derive(Template)]
#[template(path = "partials/level_fragment.html")]
pub struct LevelProgressTemplate {
  pub notices: Vec<Notice>,
  pub progress: ProgressView,
}

#[derive(Template)]
#[template(path = "partials/generation_fragment.html")]
pub struct GenerationStatusTemplate {
  pub notices: Vec<Notice>,
  pub has_status: bool,
  pub status: GenerationStatus,
}

#[derive(Template)]
#[template(path = "partials/notices.html")]
pub struct NoticesTemplate {
  pub notices: Vec<Notice>,
}

// ==================== Forms ====================

/// Level/topic filters; blank selects mean "any"
#[derive(Debug, Deserialize)]
pub struct FilterForm {
  pub level: Option<String>,
  pub topic: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FlipForm {
  pub card_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RateForm {
  pub card_id: i64,
  pub quality: u8,
}

#[derive(Debug, Deserialize)]
pub struct QuizStartForm {
  pub level: Option<String>,
  pub topic: Option<String>,
  /// Kept as text so a blank field falls back to the default
  pub count: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerForm {
  pub question_id: i64,
  pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
  pub level: String,
  pub topic: Option<String>,
  pub content: Option<String>,
  pub flashcard_count: Option<String>,
  pub question_count: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
  pub level: Option<String>,
}

/// Parse an optional numeric form field, falling back on blank or invalid input
pub fn parse_count(value: Option<&str>, default: u32) -> u32 {
  value
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .and_then(|v| v.parse::<u32>().ok())
    .filter(|n| *n > 0)
    .unwrap_or(default)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_count() {
    assert_eq!(parse_count(None, 10), 10);
    assert_eq!(parse_count(Some(""), 10), 10);
    assert_eq!(parse_count(Some(" 7 "), 10), 7);
    assert_eq!(parse_count(Some("0"), 10), 10);
    assert_eq!(parse_count(Some("many"), 5), 5);
  }
}
