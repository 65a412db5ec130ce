use serde::{Deserialize, Serialize};

/// A front/back study item as served by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
  pub id: i64,
  pub front: String,
  pub back: String,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub level: String,
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub topic: String,
  #[serde(default)]
  pub difficulty: Option<String>,
}

impl Flashcard {
  /// "L1 | Ethics | medium" style metadata line
  pub fn meta_line(&self) -> String {
    let mut parts = vec![self.level.as_str(), self.topic.as_str()];
    if let Some(difficulty) = self.difficulty.as_deref() {
      parts.push(difficulty);
    }
    parts
      .into_iter()
      .filter(|p| !p.is_empty())
      .collect::<Vec<_>>()
      .join(" | ")
  }
}

/// Where a review deck came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckSource {
  /// Cards the scheduler says are due now
  Due,
  /// Cards matching explicit level/topic filters
  Filtered(DeckFilter),
}

impl DeckSource {
  /// Label sent with backend study-session tracking: (level, topic)
  pub fn tracking_labels(&self) -> (String, String) {
    match self {
      Self::Due => ("ALL".to_string(), "due".to_string()),
      Self::Filtered(filter) => (
        filter.level.clone().unwrap_or_else(|| "ALL".to_string()),
        filter.topic.clone().unwrap_or_else(|| "mixed".to_string()),
      ),
    }
  }
}

/// Optional level/topic filters; empty form fields become `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckFilter {
  pub level: Option<String>,
  pub topic: Option<String>,
}

impl DeckFilter {
  pub fn new(level: Option<String>, topic: Option<String>) -> Self {
    Self {
      level: non_empty(level),
      topic: non_empty(topic),
    }
  }

  /// Query pairs for the backend, omitting unset filters
  pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(level) = &self.level {
      pairs.push(("level", level.clone()));
    }
    if let Some(topic) = &self.topic {
      pairs.push(("topic", topic.clone()));
    }
    pairs
  }
}

/// Treat blank select/input values as "no filter"
pub fn non_empty(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}
