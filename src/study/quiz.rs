//! Quiz state machine.
//!
//! Question `i` is answered iff `i < answers.len()`: Next requires the
//! current question to be answered, so the log is always a prefix of the
//! question list.

use chrono::{DateTime, Utc};

use crate::domain::{
  AnswerOutcome, AnswerSubmission, OptionLabel, Question, QuizRequest, QuizScore, RecordedAnswer,
};

use super::FlowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
  Unanswered,
  Answered,
  Results,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
  questions: Vec<Question>,
  cursor: usize,
  /// Furthest question shown so far
  reached: usize,
  answers: Vec<RecordedAnswer>,
  started_at: DateTime<Utc>,
  /// When the frontier question was first shown, for `time_taken`
  shown_at: DateTime<Utc>,
  finished: bool,
  request: QuizRequest,
  tracking_id: Option<i64>,
}

impl QuizSession {
  /// Start a quiz; `None` for an empty batch
  pub fn start(questions: Vec<Question>, request: QuizRequest, now: DateTime<Utc>) -> Option<Self> {
    if questions.is_empty() {
      return None;
    }
    Some(Self {
      questions,
      cursor: 0,
      reached: 0,
      answers: Vec::new(),
      started_at: now,
      shown_at: now,
      finished: false,
      request,
      tracking_id: None,
    })
  }

  pub fn phase(&self) -> QuizPhase {
    if self.finished {
      QuizPhase::Results
    } else if self.cursor < self.answers.len() {
      QuizPhase::Answered
    } else {
      QuizPhase::Unanswered
    }
  }

  pub fn current(&self) -> Option<&Question> {
    if self.finished {
      return None;
    }
    self.questions.get(self.cursor)
  }

  /// Recorded outcome for the current question, if it was answered
  pub fn current_answer(&self) -> Option<&RecordedAnswer> {
    if self.finished {
      return None;
    }
    self.answers.get(self.cursor)
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn len(&self) -> usize {
    self.questions.len()
  }

  pub fn answers(&self) -> &[RecordedAnswer] {
    &self.answers
  }

  pub fn started_at(&self) -> DateTime<Utc> {
    self.started_at
  }

  pub fn request(&self) -> &QuizRequest {
    &self.request
  }

  pub fn tracking_id(&self) -> Option<i64> {
    self.tracking_id
  }

  pub fn set_tracking_id(&mut self, id: i64) {
    self.tracking_id = Some(id);
  }

  pub fn is_last(&self) -> bool {
    self.cursor + 1 == self.questions.len()
  }

  pub fn can_go_back(&self) -> bool {
    !self.finished && self.cursor > 0
  }

  pub fn can_advance(&self) -> bool {
    self.phase() == QuizPhase::Answered
  }

  /// Validate a selection and build the backend submission.
  ///
  /// Answered questions are locked: a second selection is rejected here, so
  /// nothing is resubmitted.
  pub fn prepare_answer(
    &self,
    question_id: i64,
    label: OptionLabel,
    now: DateTime<Utc>,
  ) -> Result<AnswerSubmission, FlowError> {
    let question = self.unanswered_current(question_id)?;
    if !question.has_option(label) {
      return Err(FlowError::UnknownOption(label.as_str().to_string()));
    }
    let elapsed = (now - self.shown_at).num_seconds().max(0) as u64;
    Ok(AnswerSubmission {
      question_id: question.id,
      user_answer: label.as_str().to_string(),
      time_taken: elapsed,
    })
  }

  /// Append the backend verdict for the current question
  pub fn record_answer(
    &mut self,
    question_id: i64,
    label: OptionLabel,
    outcome: AnswerOutcome,
  ) -> Result<&RecordedAnswer, FlowError> {
    let id = self.unanswered_current(question_id)?.id;
    self.answers.push(RecordedAnswer::new(id, label, outcome));
    Ok(&self.answers[self.cursor])
  }

  fn unanswered_current(&self, question_id: i64) -> Result<&Question, FlowError> {
    let question = self.current().ok_or(FlowError::QuizFinished)?;
    if question.id != question_id {
      return Err(FlowError::QuestionMismatch {
        expected: question.id,
        received: question_id,
      });
    }
    if self.cursor < self.answers.len() {
      return Err(FlowError::AlreadyAnswered { question_id });
    }
    Ok(question)
  }

  /// Move to the next question, or to results after the last one
  pub fn next(&mut self, now: DateTime<Utc>) -> Result<QuizPhase, FlowError> {
    if self.finished {
      return Err(FlowError::QuizFinished);
    }
    if self.cursor >= self.answers.len() {
      return Err(FlowError::NotAnswered);
    }
    self.cursor += 1;
    if self.cursor >= self.questions.len() {
      self.finished = true;
    } else if self.cursor > self.reached {
      self.reached = self.cursor;
      self.shown_at = now;
    }
    Ok(self.phase())
  }

  /// Step back to an earlier (necessarily answered) question
  pub fn previous(&mut self) -> Result<QuizPhase, FlowError> {
    if self.finished {
      return Err(FlowError::QuizFinished);
    }
    if self.cursor == 0 {
      return Err(FlowError::AtFirstQuestion);
    }
    self.cursor -= 1;
    Ok(self.phase())
  }

  pub fn score(&self) -> QuizScore {
    QuizScore {
      correct: self.answers.iter().filter(|a| a.is_correct).count(),
      total: self.answers.len(),
    }
  }
}

/// What the quiz page is showing
#[derive(Debug, Clone, Default)]
pub enum QuizFlow {
  #[default]
  NotStarted,
  Active(QuizSession),
}

impl QuizFlow {
  pub fn session(&self) -> Option<&QuizSession> {
    match self {
      Self::Active(session) => Some(session),
      Self::NotStarted => None,
    }
  }

  pub fn session_mut(&mut self) -> Result<&mut QuizSession, FlowError> {
    match self {
      Self::Active(session) => Ok(session),
      Self::NotStarted => Err(FlowError::NoActiveQuiz),
    }
  }
}
