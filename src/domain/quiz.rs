use serde::{Deserialize, Serialize};

use super::card::DeckFilter;

/// Multiple-choice option label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
  A,
  B,
  C,
  D,
}

impl OptionLabel {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::A => "A",
      Self::B => "B",
      Self::C => "C",
      Self::D => "D",
    }
  }

  /// Parse a label case-insensitively ("a" and "A" are the same option)
  pub fn from_str(s: &str) -> Option<Self> {
    match s.trim().to_ascii_uppercase().as_str() {
      "A" => Some(Self::A),
      "B" => Some(Self::B),
      "C" => Some(Self::C),
      "D" => Some(Self::D),
      _ => None,
    }
  }
}

/// A multiple-choice question as served by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
  pub id: i64,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub level: String,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub topic: String,
  pub question: String,
  pub option_a: String,
  pub option_b: String,
  pub option_c: String,
  #[serde(default)]
  pub option_d: Option<String>,
}

impl Question {
  /// Options in display order; D only when the backend supplied a non-empty one
  pub fn options(&self) -> Vec<(OptionLabel, &str)> {
    let mut options = vec![
      (OptionLabel::A, self.option_a.as_str()),
      (OptionLabel::B, self.option_b.as_str()),
      (OptionLabel::C, self.option_c.as_str()),
    ];
    if let Some(d) = self.option_d.as_deref().filter(|d| !d.trim().is_empty()) {
      options.push((OptionLabel::D, d));
    }
    options
  }

  pub fn has_option(&self, label: OptionLabel) -> bool {
    self.options().iter().any(|(l, _)| *l == label)
  }
}

/// Parameters for a random quiz batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
  pub count: u32,
  pub filter: DeckFilter,
}

impl QuizRequest {
  pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("count", self.count.to_string())];
    pairs.extend(self.filter.query_pairs());
    pairs
  }
}

/// Body of `POST /api/quiz/submit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerSubmission {
  pub question_id: i64,
  pub user_answer: String,
  /// Whole seconds since the question was first shown
  pub time_taken: u64,
}

/// Backend verdict for a submitted answer
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnswerOutcome {
  pub is_correct: bool,
  pub correct_answer: String,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub explanation: String,
}

/// One entry of the in-session answer log
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedAnswer {
  pub question_id: i64,
  pub user_answer: OptionLabel,
  pub is_correct: bool,
  pub correct_answer: Option<OptionLabel>,
  pub explanation: String,
}

impl RecordedAnswer {
  pub fn new(question_id: i64, user_answer: OptionLabel, outcome: AnswerOutcome) -> Self {
    Self {
      question_id,
      user_answer,
      is_correct: outcome.is_correct,
      correct_answer: OptionLabel::from_str(&outcome.correct_answer),
      explanation: outcome.explanation,
    }
  }
}

/// Final quiz result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
  pub correct: usize,
  pub total: usize,
}

impl QuizScore {
  /// floor(100 * correct / total); an empty log scores 0
  pub fn percentage(&self) -> u32 {
    if self.total == 0 {
      return 0;
    }
    (self.correct * 100 / self.total) as u32
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn question(option_d: Option<&str>) -> Question {
    Question {
      id: 3,
      level: "L1".to_string(),
      topic: "Ethics".to_string(),
      question: "Which standard covers loyalty?".to_string(),
      option_a: "I(A)".to_string(),
      option_b: "IV(A)".to_string(),
      option_c: "VII(B)".to_string(),
      option_d: option_d.map(String::from),
    }
  }

  #[test]
  fn test_options_three() {
    let q = question(None);
    let labels: Vec<_> = q.options().into_iter().map(|(l, _)| l).collect();
    assert_eq!(labels, vec![OptionLabel::A, OptionLabel::B, OptionLabel::C]);
    assert!(!q.has_option(OptionLabel::D));
  }

  #[test]
  fn test_options_with_d() {
    let q = question(Some("None of the above"));
    assert_eq!(q.options().len(), 4);
    assert!(q.has_option(OptionLabel::D));
  }

  #[test]
  fn test_blank_option_d_is_absent() {
    assert_eq!(question(Some("")).options().len(), 3);
  }

  #[test]
  fn test_option_label_parse() {
    assert_eq!(OptionLabel::from_str("b"), Some(OptionLabel::B));
    assert_eq!(OptionLabel::from_str(" D "), Some(OptionLabel::D));
    assert_eq!(OptionLabel::from_str("E"), None);
    assert_eq!(OptionLabel::from_str(""), None);
  }

  #[test]
  fn test_score_floors() {
    assert_eq!(QuizScore { correct: 2, total: 3 }.percentage(), 66);
    assert_eq!(QuizScore { correct: 1, total: 3 }.percentage(), 33);
    assert_eq!(QuizScore { correct: 5, total: 5 }.percentage(), 100);
    assert_eq!(QuizScore { correct: 0, total: 0 }.percentage(), 0);
  }

  #[test]
  fn test_quiz_request_query() {
    let request = QuizRequest {
      count: 5,
      filter: DeckFilter::new(Some("L2".to_string()), None),
    };
    assert_eq!(
      request.query_pairs(),
      vec![("count", "5".to_string()), ("level", "L2".to_string())]
    );
  }

  #[test]
  fn test_recorded_answer_parses_correct_label() {
    let outcome = AnswerOutcome {
      is_correct: false,
      correct_answer: "c".to_string(),
      explanation: "Because.".to_string(),
    };
    let recorded = RecordedAnswer::new(3, OptionLabel::A, outcome);
    assert_eq!(recorded.correct_answer, Some(OptionLabel::C));
    assert!(!recorded.is_correct);
  }

  #[test]
  fn test_outcome_with_null_explanation() {
    let outcome: AnswerOutcome =
      serde_json::from_str(r#"{"is_correct":true,"correct_answer":"A","explanation":null}"#).unwrap();
    assert!(outcome.is_correct);
    assert_eq!(outcome.explanation, "");
  }

  #[test]
  fn test_question_with_null_level_and_topic() {
    let json = r#"{"id":9,"level":null,"topic":null,"question":"q","option_a":"a","option_b":"b","option_c":"c","option_d":null}"#;
    let q: Question = serde_json::from_str(json).unwrap();
    assert_eq!((q.level.as_str(), q.topic.as_str()), ("", ""));
    assert_eq!(q.options().len(), 3);
  }
}
