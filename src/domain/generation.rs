use serde::Deserialize;

use super::card::non_empty;

/// Which generator endpoint a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationTarget {
  Flashcards,
  Quiz,
}

impl GenerationTarget {
  pub fn noun(&self) -> &'static str {
    match self {
      Self::Flashcards => "flashcards",
      Self::Quiz => "quiz questions",
    }
  }
}

/// Study material submitted for AI generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
  pub level: String,
  pub topic: String,
  pub content: String,
  pub count: u32,
}

/// A generation form left a required field blank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncompleteForm;

impl GenerationRequest {
  /// Build a request, rejecting a missing topic or content
  pub fn from_form(
    level: String,
    topic: Option<String>,
    content: Option<String>,
    count: u32,
  ) -> Result<Self, IncompleteForm> {
    let topic = non_empty(topic).ok_or(IncompleteForm)?;
    let content = non_empty(content).ok_or(IncompleteForm)?;
    Ok(Self {
      level,
      topic,
      content,
      count: count.max(1),
    })
  }
}

/// Successful generator response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerationReceipt {
  #[serde(default, deserialize_with = "super::null_as_default")]
  pub message: String,
  #[serde(default)]
  pub count: Option<i64>,
}
