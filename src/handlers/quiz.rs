//! Quiz handlers.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::Utc;

use crate::api::LogOnError;
use crate::config;
use crate::domain::{DeckFilter, OptionLabel, QuizRequest, SessionKind, SessionTally};
use crate::session::StudyContext;
use crate::state::AppState;
use crate::study::{FlowError, QuizFlow, QuizPhase, QuizSession, StudySession};

use super::templates::{parse_count, AnswerForm, QuizFragmentTemplate, QuizStartForm, QuizTemplate};
use super::views::{FilterOptions, QuizStatsView, QuizView};
use super::{
  close_tracking, fetch_topics, is_htmx_request, open_tracking, render, store_topics,
};

pub async fn quiz_page(State(state): State<AppState>, study: StudyContext) -> Html<String> {
  let (stats, topics) = tokio::join!(state.api.quiz_stats(), fetch_topics(&state.api, &study));

  let mut guard = study.lock().await;
  let session: &mut StudySession = &mut guard;
  store_topics(session, topics);
  session.update_quiz_stats(stats.log_warn("Failed to load quiz stats"));

  let last = session.last_quiz_request.as_ref();
  let template = QuizTemplate {
    active: "quiz",
    notices: session.notices.snapshot(),
    filters: FilterOptions::new(
      session.topics.as_ref(),
      last.and_then(|r| r.filter.level.as_deref()),
      last.and_then(|r| r.filter.topic.as_deref()),
    ),
    default_count: last.map_or(config::DEFAULT_QUIZ_COUNT, |r| r.count),
    quiz: QuizView::from_flow(&session.quiz),
    stats: QuizStatsView::new(session.quiz_stats.as_ref()),
  };
  render(&template)
}

/// Fetch a random batch and start a new quiz over it
pub async fn start_quiz(
  State(state): State<AppState>,
  study: StudyContext,
  headers: HeaderMap,
  Form(form): Form<QuizStartForm>,
) -> Response {
  let mut guard = match study.try_lock() {
    Ok(guard) => guard,
    Err(busy) => return busy.into_response(),
  };
  let session: &mut StudySession = &mut guard;

  let request = QuizRequest {
    count: parse_count(form.count.as_deref(), config::DEFAULT_QUIZ_COUNT),
    filter: DeckFilter::new(form.level, form.topic),
  };
  session.last_quiz_request = Some(request.clone());

  let questions = match state.api.random_quiz(&request).await {
    Ok(questions) => questions,
    Err(e) => {
      tracing::warn!("Failed to load quiz for {:?}: {}", request, e);
      session.notices.error("Error loading quiz");
      return quiz_response(&headers, session);
    }
  };
  if questions.is_empty() {
    session.notices.error("No questions found for these filters");
    return quiz_response(&headers, session);
  }

  // A quiz abandoned before its results still counts toward the streak
  if let Some(previous) = session.quiz.session().filter(|q| q.phase() != QuizPhase::Results) {
    close_tracking(&state.api, previous.tracking_id(), tally(previous)).await;
  }

  let level = request.filter.level.clone().unwrap_or_else(|| "ALL".to_string());
  let topic = request.filter.topic.clone().unwrap_or_else(|| "mixed".to_string());
  let tracking_id = open_tracking(&state.api, SessionKind::Quiz, &level, &topic).await;

  tracing::debug!("Starting quiz with {} questions", questions.len());
  if let Some(mut quiz) = QuizSession::start(questions, request, Utc::now()) {
    if let Some(id) = tracking_id {
      quiz.set_tracking_id(id);
    }
    session.quiz = QuizFlow::Active(quiz);
  }

  quiz_response(&headers, session)
}

/// Submit the selected option for the current question
pub async fn answer_question(
  State(state): State<AppState>,
  study: StudyContext,
  headers: HeaderMap,
  Form(form): Form<AnswerForm>,
) -> Response {
  let mut guard = match study.try_lock() {
    Ok(guard) => guard,
    Err(busy) => return busy.into_response(),
  };
  let session: &mut StudySession = &mut guard;

  let Some(label) = OptionLabel::from_str(&form.answer) else {
    session.notices.error(FlowError::UnknownOption(form.answer).to_string());
    return quiz_response(&headers, session);
  };

  let quiz = match session.quiz.session_mut() {
    Ok(quiz) => quiz,
    Err(e) => {
      session.notices.error(e.to_string());
      return quiz_response(&headers, session);
    }
  };

  let submission = match quiz.prepare_answer(form.question_id, label, Utc::now()) {
    Ok(submission) => submission,
    // Answered questions are locked; a repeat click changes nothing
    Err(FlowError::AlreadyAnswered { .. }) => return quiz_response(&headers, session),
    Err(e) => {
      session.notices.error(e.to_string());
      return quiz_response(&headers, session);
    }
  };

  match state.api.submit_answer(&submission).await {
    Ok(outcome) => {
      if let Err(e) = quiz.record_answer(form.question_id, label, outcome) {
        tracing::warn!("Answer for question {} not recorded: {}", form.question_id, e);
      }
    }
    Err(e) => {
      tracing::warn!("Failed to submit answer for question {}: {}", form.question_id, e);
      session.notices.error("Error submitting answer");
    }
  }

  quiz_response(&headers, session)
}

/// Advance; past the last question this shows the results
pub async fn next_question(
  State(state): State<AppState>,
  study: StudyContext,
  headers: HeaderMap,
) -> Response {
  let mut guard = match study.try_lock() {
    Ok(guard) => guard,
    Err(busy) => return busy.into_response(),
  };
  let session: &mut StudySession = &mut guard;

  let advanced = session.quiz.session_mut().and_then(|quiz| quiz.next(Utc::now()));
  match advanced {
    Ok(QuizPhase::Results) => {
      if let Some(quiz) = session.quiz.session() {
        let score = quiz.score();
        let elapsed = Utc::now() - quiz.started_at();
        tracing::debug!(
          "Quiz finished: {}/{} in {}s",
          score.correct,
          score.total,
          elapsed.num_seconds()
        );
        close_tracking(&state.api, quiz.tracking_id(), tally(quiz)).await;
      }
      let stats = state.api.quiz_stats().await;
      session.update_quiz_stats(stats.log_warn("Failed to refresh quiz stats"));
    }
    Ok(_) => {}
    Err(e) => {
      session.notices.error(e.to_string());
    }
  }

  quiz_response(&headers, session)
}

pub async fn previous_question(study: StudyContext, headers: HeaderMap) -> Response {
  let mut guard = match study.try_lock() {
    Ok(guard) => guard,
    Err(busy) => return busy.into_response(),
  };
  let session: &mut StudySession = &mut guard;

  if let Err(e) = session.quiz.session_mut().and_then(QuizSession::previous) {
    session.notices.error(e.to_string());
  }

  quiz_response(&headers, session)
}

fn tally(quiz: &QuizSession) -> SessionTally {
  let score = quiz.score();
  SessionTally {
    cards_reviewed: 0,
    questions_answered: score.total as u32,
    correct_answers: score.correct as u32,
  }
}

fn quiz_response(headers: &HeaderMap, session: &StudySession) -> Response {
  if !is_htmx_request(headers) {
    return Redirect::to("/quiz").into_response();
  }
  let template = QuizFragmentTemplate {
    notices: session.notices.snapshot(),
    quiz: QuizView::from_flow(&session.quiz),
    stats: QuizStatsView::new(session.quiz_stats.as_ref()),
  };
  render(&template).into_response()
}
