//! Display-ready view models built from session state.
//!
//! Templates only read plain fields from these; all formatting happens here.

use crate::config;
use crate::domain::stats::{percent_one_decimal, trim_number};
use crate::domain::{FlashcardStats, QuizStats, ReviewQuality, TopicCatalog};
use crate::study::{
  DashboardSnapshot, FlashcardFlow, ProgressSnapshot, QuizFlow, QuizPhase, QuizSession,
  ReviewPhase,
};

/// Placeholder for values never loaded
const NO_DATA: &str = "—";

#[derive(Debug, Clone)]
pub struct SelectOption {
  pub value: String,
  pub selected: bool,
}

/// Level/topic choices for filter controls
#[derive(Debug, Clone)]
pub struct FilterOptions {
  pub levels: Vec<SelectOption>,
  pub topics: Vec<SelectOption>,
}

impl FilterOptions {
  pub fn new(
    catalog: Option<&TopicCatalog>,
    selected_level: Option<&str>,
    selected_topic: Option<&str>,
  ) -> Self {
    let levels = match catalog.map(TopicCatalog::levels) {
      Some(levels) if !levels.is_empty() => levels,
      _ => config::FALLBACK_LEVELS.iter().map(|l| l.to_string()).collect(),
    };
    let topics = catalog.map(TopicCatalog::all_topics).unwrap_or_default();

    Self {
      levels: options(levels, selected_level),
      topics: options(topics, selected_topic),
    }
  }
}

fn options(values: Vec<String>, selected: Option<&str>) -> Vec<SelectOption> {
  values
    .into_iter()
    .map(|value| SelectOption {
      selected: selected == Some(value.as_str()),
      value,
    })
    .collect()
}

// ==================== Dashboard ====================

#[derive(Debug, Clone)]
pub struct WeakTopicView {
  pub heading: String,
  pub detail: String,
}

#[derive(Debug, Clone)]
pub struct DashboardView {
  pub total_topics: String,
  pub quiz_accuracy: String,
  pub total_minutes: String,
  pub cards_mastered: String,
  pub current_streak: String,
  pub recommendation: String,
  pub weak_topics: Vec<WeakTopicView>,
  pub weak_topics_message: String,
}

impl DashboardView {
  pub fn from_snapshot(snapshot: &DashboardSnapshot) -> Self {
    let overall = snapshot.overall.as_ref();
    let recommendation = match &snapshot.recommendations {
      Some(recs) => recs
        .summary()
        .map(str::to_string)
        .unwrap_or_else(|| "No recommendations at this time.".to_string()),
      None => "No data available.".to_string(),
    };

    let weak_topics: Vec<WeakTopicView> = snapshot
      .weak_topics
      .iter()
      .flatten()
      .map(|t| {
        let mut detail = format!("Accuracy: {}", percent_one_decimal(t.accuracy));
        if let Some(rec) = t.recommendation.as_deref().filter(|r| !r.is_empty()) {
          detail.push_str(" | ");
          detail.push_str(rec);
        }
        WeakTopicView {
          heading: format!("{} - {}", t.level, t.topic),
          detail,
        }
      })
      .collect();
    let weak_topics_message = match &snapshot.weak_topics {
      Some(_) => "No weak topics identified yet. Keep studying!".to_string(),
      None => "No data available.".to_string(),
    };

    Self {
      total_topics: overall.map_or(NO_DATA.to_string(), |o| o.total_topics.to_string()),
      quiz_accuracy: overall.map_or(NO_DATA.to_string(), |o| {
        format!("{}%", trim_number(o.quiz_accuracy))
      }),
      total_minutes: overall.map_or(NO_DATA.to_string(), |o| o.total_minutes().to_string()),
      cards_mastered: overall.map_or(NO_DATA.to_string(), |o| o.cards_mastered.to_string()),
      current_streak: snapshot
        .streak
        .as_ref()
        .map_or(NO_DATA.to_string(), |s| s.current_streak.to_string()),
      recommendation,
      weak_topics,
      weak_topics_message,
    }
  }
}

// ==================== Flashcards ====================

#[derive(Debug, Clone)]
pub struct RatingButton {
  pub value: u8,
  pub label: &'static str,
  pub class: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct FlashcardView {
  pub has_card: bool,
  pub showing_back: bool,
  pub complete: bool,
  pub has_message: bool,
  pub message: String,
  pub card_id: i64,
  pub front: String,
  pub back: String,
  pub meta: String,
  pub position: usize,
  pub total: usize,
  pub ratings: Vec<RatingButton>,
}

impl FlashcardView {
  pub fn from_flow(flow: &FlashcardFlow) -> Self {
    match flow {
      FlashcardFlow::Idle => Self::default(),
      FlashcardFlow::NothingToReview { message } => Self {
        has_message: true,
        message: message.clone(),
        ..Self::default()
      },
      FlashcardFlow::Reviewing(review) => match (review.phase(), review.current()) {
        (ReviewPhase::Complete, _) | (_, None) => Self {
          complete: true,
          total: review.len(),
          ..Self::default()
        },
        (phase, Some(card)) => Self {
          has_card: true,
          showing_back: phase == ReviewPhase::ShowingBack,
          card_id: card.id,
          front: card.front.clone(),
          back: card.back.clone(),
          meta: card.meta_line(),
          position: review.cursor() + 1,
          total: review.len(),
          ratings: ReviewQuality::ALL
            .iter()
            .map(|q| RatingButton {
              value: q.as_u8(),
              label: q.label(),
              class: q.css_class(),
            })
            .collect(),
          ..Self::default()
        },
      },
    }
  }
}

#[derive(Debug, Clone)]
pub struct FlashcardStatsView {
  pub total: String,
  pub due: String,
  pub reviews: String,
}

impl FlashcardStatsView {
  pub fn new(stats: Option<&FlashcardStats>) -> Self {
    match stats {
      Some(s) => Self {
        total: s.total_cards.to_string(),
        due: s.due_cards.to_string(),
        reviews: s.total_reviews.to_string(),
      },
      None => Self {
        total: NO_DATA.to_string(),
        due: NO_DATA.to_string(),
        reviews: NO_DATA.to_string(),
      },
    }
  }
}

// ==================== Quiz ====================

#[derive(Debug, Clone)]
pub struct OptionView {
  pub label: &'static str,
  pub text: String,
  /// Extra CSS classes: selected / correct / incorrect
  pub class: String,
}

#[derive(Debug, Clone, Default)]
pub struct QuizView {
  pub has_question: bool,
  pub finished: bool,
  pub question_id: i64,
  pub number: usize,
  pub total: usize,
  pub level_topic: String,
  pub text: String,
  pub options: Vec<OptionView>,
  pub answered: bool,
  pub verdict: String,
  pub explanation: String,
  pub can_previous: bool,
  pub can_next: bool,
  pub next_label: &'static str,
  pub score_percent: u32,
  pub score_correct: usize,
  pub score_total: usize,
  pub retake_level: String,
  pub retake_topic: String,
  pub retake_count: u32,
}

impl QuizView {
  pub fn from_flow(flow: &QuizFlow) -> Self {
    match flow {
      QuizFlow::NotStarted => Self::default(),
      QuizFlow::Active(quiz) => Self::from_session(quiz),
    }
  }

  fn from_session(quiz: &QuizSession) -> Self {
    let request = quiz.request();
    let mut view = Self {
      total: quiz.len(),
      retake_level: request.filter.level.clone().unwrap_or_default(),
      retake_topic: request.filter.topic.clone().unwrap_or_default(),
      retake_count: request.count,
      ..Self::default()
    };

    if quiz.phase() == QuizPhase::Results {
      let score = quiz.score();
      view.finished = true;
      view.score_percent = score.percentage();
      view.score_correct = score.correct;
      view.score_total = score.total;
      return view;
    }

    let Some(question) = quiz.current() else {
      return view;
    };
    let recorded = quiz.current_answer();

    view.has_question = true;
    view.question_id = question.id;
    view.number = quiz.cursor() + 1;
    view.level_topic = format!("{} | {}", question.level, question.topic);
    view.text = question.question.clone();
    view.answered = recorded.is_some();
    view.can_previous = quiz.can_go_back();
    view.can_next = quiz.can_advance();
    view.next_label = if quiz.is_last() { "Finish" } else { "Next" };
    view.options = question
      .options()
      .into_iter()
      .map(|(label, text)| {
        let class = match recorded {
          Some(answer) if answer.correct_answer == Some(label) => {
            if answer.user_answer == label {
              "selected correct"
            } else {
              "correct"
            }
          }
          Some(answer) if answer.user_answer == label => "selected incorrect",
          _ => "",
        };
        OptionView {
          label: label.as_str(),
          text: text.to_string(),
          class: class.to_string(),
        }
      })
      .collect();

    if let Some(answer) = recorded {
      view.verdict = if answer.is_correct {
        "✅ Correct!".to_string()
      } else {
        "❌ Incorrect".to_string()
      };
      view.explanation = answer.explanation.clone();
    }

    view
  }
}

#[derive(Debug, Clone)]
pub struct QuizStatsView {
  pub total: String,
  pub accuracy: String,
  pub average_time: String,
}

impl QuizStatsView {
  pub fn new(stats: Option<&QuizStats>) -> Self {
    match stats {
      Some(s) => Self {
        total: s.total_attempts.to_string(),
        accuracy: format!("{}%", trim_number(s.accuracy)),
        average_time: format!("{}s", trim_number(s.average_time)),
      },
      None => Self {
        total: NO_DATA.to_string(),
        accuracy: NO_DATA.to_string(),
        average_time: NO_DATA.to_string(),
      },
    }
  }
}

// ==================== Progress ====================

#[derive(Debug, Clone)]
pub struct LevelTab {
  pub name: String,
  /// URL path segment for the level
  pub slug: String,
  pub active: bool,
}

#[derive(Debug, Clone)]
pub struct TopicRow {
  pub topic: String,
  pub accuracy: String,
  pub cards: String,
  pub minutes: String,
}

#[derive(Debug, Clone)]
pub struct ProgressView {
  pub current_streak: String,
  pub longest_streak: String,
  pub mastery: u32,
  pub mastery_loaded: bool,
  pub level: String,
  pub tabs: Vec<LevelTab>,
  pub rows: Vec<TopicRow>,
  pub message: String,
}

impl ProgressView {
  pub fn new(snapshot: &ProgressSnapshot, catalog: Option<&TopicCatalog>) -> Self {
    let mut levels = catalog.map(TopicCatalog::levels).unwrap_or_default();
    if levels.is_empty() {
      levels = config::FALLBACK_LEVELS.iter().map(|l| l.to_string()).collect();
    }
    if !levels.contains(&snapshot.level) {
      levels.push(snapshot.level.clone());
    }

    let rows: Vec<TopicRow> = snapshot
      .breakdown
      .iter()
      .flatten()
      .map(|p| TopicRow {
        topic: p.topic.clone(),
        accuracy: percent_one_decimal(p.quiz_accuracy),
        cards: format!("{}/{}", p.cards_mastered, p.cards_total),
        minutes: format!("{} min", trim_number(p.time_spent)),
      })
      .collect();
    let message = match &snapshot.breakdown {
      Some(_) => "No progress recorded for this level yet.".to_string(),
      None => "No data available.".to_string(),
    };

    Self {
      current_streak: snapshot
        .streak
        .as_ref()
        .map_or(NO_DATA.to_string(), |s| s.current_streak.to_string()),
      longest_streak: snapshot
        .streak
        .as_ref()
        .map_or(NO_DATA.to_string(), |s| s.longest_streak.to_string()),
      mastery: snapshot.overall.as_ref().map_or(0, |o| o.mastery_percent()),
      mastery_loaded: snapshot.overall.is_some(),
      level: snapshot.level.clone(),
      tabs: levels
        .into_iter()
        .map(|name| LevelTab {
          active: name == snapshot.level,
          slug: urlencoding::encode(&name).into_owned(),
          name,
        })
        .collect(),
      rows,
      message,
    }
  }
}
