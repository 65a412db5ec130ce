//! Per-browser study state: flashcard and quiz flows plus the last known
//! backend aggregates shown on each page.

pub mod quiz;
pub mod review;

use thiserror::Error;

use crate::config;
use crate::domain::{
  FlashcardStats, OverallProgress, QuizRequest, QuizStats, Recommendations, Streak, TopicCatalog,
  TopicProgress, WeakTopic,
};
use crate::notify::Notifications;

pub use quiz::{QuizFlow, QuizPhase, QuizSession};
pub use review::{FlashcardFlow, FlashcardReview, ReviewPhase};

/// An action that is not valid in the current flow state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
  #[error("No flashcard session is active")]
  NoActiveDeck,
  #[error("All cards in this session have been reviewed")]
  DeckComplete,
  #[error("Card {received} is not the current card ({expected})")]
  CardMismatch { expected: i64, received: i64 },
  #[error("No quiz is active")]
  NoActiveQuiz,
  #[error("This quiz is already finished")]
  QuizFinished,
  #[error("Question {received} is not the current question ({expected})")]
  QuestionMismatch { expected: i64, received: i64 },
  #[error("Question {question_id} has already been answered")]
  AlreadyAnswered { question_id: i64 },
  #[error("Answer the current question first")]
  NotAnswered,
  #[error("Already at the first question")]
  AtFirstQuestion,
  #[error("Option {0} is not available for this question")]
  UnknownOption(String),
}

/// Dashboard regions, each keeping its last successful value
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
  pub overall: Option<OverallProgress>,
  pub streak: Option<Streak>,
  pub recommendations: Option<Recommendations>,
  pub weak_topics: Option<Vec<WeakTopic>>,
}

impl DashboardSnapshot {
  /// Overlay fresh results; failed sub-fetches (`None`) keep prior values
  pub fn merge(
    &mut self,
    overall: Option<OverallProgress>,
    streak: Option<Streak>,
    recommendations: Option<Recommendations>,
    weak_topics: Option<Vec<WeakTopic>>,
  ) {
    if overall.is_some() {
      self.overall = overall;
    }
    if streak.is_some() {
      self.streak = streak;
    }
    if recommendations.is_some() {
      self.recommendations = recommendations;
    }
    if weak_topics.is_some() {
      self.weak_topics = weak_topics;
    }
  }
}

/// Progress page state
#[derive(Debug, Clone)]
pub struct ProgressSnapshot {
  pub streak: Option<Streak>,
  pub overall: Option<OverallProgress>,
  pub level: String,
  pub breakdown: Option<Vec<TopicProgress>>,
}

impl Default for ProgressSnapshot {
  fn default() -> Self {
    Self {
      streak: None,
      overall: None,
      level: config::DEFAULT_PROGRESS_LEVEL.to_string(),
      breakdown: None,
    }
  }
}

impl ProgressSnapshot {
  /// Switch levels; the previous level's breakdown no longer applies
  pub fn select_level(&mut self, level: &str) {
    if self.level != level {
      self.level = level.to_string();
      self.breakdown = None;
    }
  }
}

/// Single status line on the generation page, replaced on each attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationStatus {
  pub message: String,
  pub is_error: bool,
}

impl GenerationStatus {
  pub fn ok(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      is_error: false,
    }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      is_error: true,
    }
  }
}

/// Everything one browser session owns
#[derive(Debug, Clone, Default)]
pub struct StudySession {
  pub flashcards: FlashcardFlow,
  pub quiz: QuizFlow,
  /// Filters of the last quiz start, reused by "Take Another Quiz"
  pub last_quiz_request: Option<QuizRequest>,
  pub topics: Option<TopicCatalog>,
  pub dashboard: DashboardSnapshot,
  pub progress: ProgressSnapshot,
  pub flashcard_stats: Option<FlashcardStats>,
  pub quiz_stats: Option<QuizStats>,
  pub generation_status: Option<GenerationStatus>,
  pub notices: Notifications,
}

impl StudySession {
  pub fn new() -> Self {
    Self::default()
  }

  /// Keep prior stats when a refresh failed
  pub fn update_flashcard_stats(&mut self, stats: Option<FlashcardStats>) {
    if stats.is_some() {
      self.flashcard_stats = stats;
    }
  }

  pub fn update_quiz_stats(&mut self, stats: Option<QuizStats>) {
    if stats.is_some() {
      self.quiz_stats = stats;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_dashboard_merge_keeps_prior_values() {
    let mut snapshot = DashboardSnapshot::default();
    snapshot.merge(
      Some(OverallProgress {
        total_topics: 4,
        ..Default::default()
      }),
      Some(Streak {
        current_streak: 3,
        longest_streak: 5,
      }),
      None,
      Some(Vec::new()),
    );

    // Second load: overall and streak fail
    snapshot.merge(None, None, Some(Recommendations::default()), None);

    assert_eq!(snapshot.overall.as_ref().map(|o| o.total_topics), Some(4));
    assert_eq!(snapshot.streak.as_ref().map(|s| s.current_streak), Some(3));
    assert!(snapshot.recommendations.is_some());
    assert_eq!(snapshot.weak_topics, Some(Vec::new()));
  }

  #[test]
  fn test_failed_stats_refresh_keeps_prior() {
    let mut session = StudySession::new();
    session.update_flashcard_stats(Some(FlashcardStats {
      total_cards: 10,
      due_cards: 2,
      total_reviews: 30,
    }));
    session.update_flashcard_stats(None);
    assert_eq!(session.flashcard_stats.as_ref().map(|s| s.total_cards), Some(10));

    session.update_quiz_stats(None);
    assert!(session.quiz_stats.is_none());
  }

  #[test]
  fn test_progress_level_switch_clears_breakdown() {
    let mut progress = ProgressSnapshot::default();
    assert_eq!(progress.level, "L1");
    progress.breakdown = Some(Vec::new());
    progress.select_level("L1");
    assert!(progress.breakdown.is_some());
    progress.select_level("L2");
    assert_eq!(progress.level, "L2");
    assert!(progress.breakdown.is_none());
  }

  #[test]
  fn test_flow_error_messages() {
    assert_eq!(
      FlowError::DeckComplete.to_string(),
      "All cards in this session have been reviewed"
    );
    assert_eq!(
      FlowError::AlreadyAnswered { question_id: 4 }.to_string(),
      "Question 4 has already been answered"
    );
  }
}
