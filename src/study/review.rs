//! Flashcard review state machine.
//!
//! `SHOWING_FRONT <-> SHOWING_BACK`, and a rating acknowledged by the
//! backend advances to the next card's front or to `COMPLETE`.

use crate::domain::{DeckSource, Flashcard};

use super::FlowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPhase {
  ShowingFront,
  ShowingBack,
  Complete,
}

/// A non-empty deck being reviewed in order
#[derive(Debug, Clone)]
pub struct FlashcardReview {
  deck: Vec<Flashcard>,
  /// Index of the current card; `deck.len()` once complete
  cursor: usize,
  showing_back: bool,
  source: DeckSource,
  /// Backend study session opened for this deck, if tracking succeeded
  tracking_id: Option<i64>,
}

impl FlashcardReview {
  /// Start reviewing; `None` for an empty deck
  pub fn new(deck: Vec<Flashcard>, source: DeckSource) -> Option<Self> {
    if deck.is_empty() {
      return None;
    }
    Some(Self {
      deck,
      cursor: 0,
      showing_back: false,
      source,
      tracking_id: None,
    })
  }

  pub fn phase(&self) -> ReviewPhase {
    if self.cursor >= self.deck.len() {
      ReviewPhase::Complete
    } else if self.showing_back {
      ReviewPhase::ShowingBack
    } else {
      ReviewPhase::ShowingFront
    }
  }

  pub fn is_complete(&self) -> bool {
    self.phase() == ReviewPhase::Complete
  }

  pub fn current(&self) -> Option<&Flashcard> {
    self.deck.get(self.cursor)
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn len(&self) -> usize {
    self.deck.len()
  }

  /// Cards rated so far
  pub fn reviewed(&self) -> usize {
    self.cursor
  }

  pub fn source(&self) -> &DeckSource {
    &self.source
  }

  pub fn tracking_id(&self) -> Option<i64> {
    self.tracking_id
  }

  pub fn set_tracking_id(&mut self, id: i64) {
    self.tracking_id = Some(id);
  }

  /// Toggle between front and back of the current card
  pub fn flip(&mut self) -> Result<ReviewPhase, FlowError> {
    if self.is_complete() {
      return Err(FlowError::DeckComplete);
    }
    self.showing_back = !self.showing_back;
    Ok(self.phase())
  }

  /// Check a rating request targets the current card and return its id.
  ///
  /// Called before the review is sent so nothing reaches the backend for an
  /// exhausted deck or a stale page.
  pub fn rating_target(&self, card_id: i64) -> Result<i64, FlowError> {
    let current = self.current().ok_or(FlowError::DeckComplete)?;
    if current.id != card_id {
      return Err(FlowError::CardMismatch {
        expected: current.id,
        received: card_id,
      });
    }
    Ok(current.id)
  }

  /// Advance past `card_id` once the backend acknowledged its review
  pub fn record_rating(&mut self, card_id: i64) -> Result<ReviewPhase, FlowError> {
    self.rating_target(card_id)?;
    self.cursor += 1;
    self.showing_back = false;
    Ok(self.phase())
  }
}

/// What the flashcard page is showing
#[derive(Debug, Clone, Default)]
pub enum FlashcardFlow {
  /// No deck requested yet
  #[default]
  Idle,
  /// The last request matched no cards
  NothingToReview { message: String },
  Reviewing(FlashcardReview),
}

impl FlashcardFlow {
  pub fn review(&self) -> Option<&FlashcardReview> {
    match self {
      Self::Reviewing(review) => Some(review),
      _ => None,
    }
  }

  pub fn review_mut(&mut self) -> Result<&mut FlashcardReview, FlowError> {
    match self {
      Self::Reviewing(review) => Ok(review),
      _ => Err(FlowError::NoActiveDeck),
    }
  }

  /// Replace the flow with a freshly loaded deck
  pub fn load(deck: Vec<Flashcard>, source: DeckSource, empty_message: &str) -> Self {
    match FlashcardReview::new(deck, source) {
      Some(review) => Self::Reviewing(review),
      None => Self::NothingToReview {
        message: empty_message.to_string(),
      },
    }
  }
}
