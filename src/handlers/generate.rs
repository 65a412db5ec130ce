//! AI content generation trigger.
//!
//! The backend does the generating; these handlers validate the form, forward
//! it, and report the outcome on the page's status line.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;

use crate::api::{ApiClient, ApiError, LogOnError};
use crate::config;
use crate::domain::{GenerationRequest, GenerationTarget};
use crate::session::StudyContext;
use crate::state::AppState;
use crate::study::{GenerationStatus, StudySession};

use super::templates::{parse_count, GenerateForm, GenerateTemplate, GenerationStatusTemplate};
use super::views::FilterOptions;
use super::{fetch_topics, is_htmx_request, render, store_topics};

pub async fn generate_page(State(state): State<AppState>, study: StudyContext) -> Html<String> {
  let topics = fetch_topics(&state.api, &study).await;

  let mut guard = study.lock().await;
  let session: &mut StudySession = &mut guard;
  store_topics(session, topics);

  let (has_status, status) = status_fields(session);
  let template = GenerateTemplate {
    active: "generate",
    notices: session.notices.snapshot(),
    filters: FilterOptions::new(session.topics.as_ref(), None, None),
    flashcard_count: config::DEFAULT_GENERATED_FLASHCARDS,
    question_count: config::DEFAULT_GENERATED_QUESTIONS,
    has_status,
    status,
  };
  render(&template)
}

pub async fn generate_flashcards(
  State(state): State<AppState>,
  study: StudyContext,
  headers: HeaderMap,
  Form(form): Form<GenerateForm>,
) -> Response {
  generate_targets(&state, &study, &headers, &form, &[GenerationTarget::Flashcards]).await
}

pub async fn generate_quiz(
  State(state): State<AppState>,
  study: StudyContext,
  headers: HeaderMap,
  Form(form): Form<GenerateForm>,
) -> Response {
  generate_targets(&state, &study, &headers, &form, &[GenerationTarget::Quiz]).await
}

/// Flashcards first, then questions, from the same material
pub async fn generate_both(
  State(state): State<AppState>,
  study: StudyContext,
  headers: HeaderMap,
  Form(form): Form<GenerateForm>,
) -> Response {
  let targets = [GenerationTarget::Flashcards, GenerationTarget::Quiz];
  generate_targets(&state, &study, &headers, &form, &targets).await
}

async fn generate_targets(
  state: &AppState,
  study: &StudyContext,
  headers: &HeaderMap,
  form: &GenerateForm,
  targets: &[GenerationTarget],
) -> Response {
  let mut guard = match study.try_lock() {
    Ok(guard) => guard,
    Err(busy) => return busy.into_response(),
  };
  let session: &mut StudySession = &mut guard;

  let mut results = Vec::with_capacity(targets.len());
  for &target in targets {
    let status = run_generation(&state.api, session, target, form).await;
    let incomplete = status.is_error && results.is_empty() && status.message == INCOMPLETE_FORM;
    results.push(status);
    // Same form for every target: no point repeating the validation error
    if incomplete {
      break;
    }
  }
  session.generation_status = Some(combine(results));

  if !is_htmx_request(headers) {
    return Redirect::to("/generate").into_response();
  }
  let (has_status, status) = status_fields(session);
  let template = GenerationStatusTemplate {
    notices: session.notices.snapshot(),
    has_status,
    status,
  };
  render(&template).into_response()
}

const INCOMPLETE_FORM: &str = "Please fill in all fields";

async fn run_generation(
  api: &ApiClient,
  session: &mut StudySession,
  target: GenerationTarget,
  form: &GenerateForm,
) -> GenerationStatus {
  let count = match target {
    GenerationTarget::Flashcards => parse_count(
      form.flashcard_count.as_deref(),
      config::DEFAULT_GENERATED_FLASHCARDS,
    ),
    GenerationTarget::Quiz => parse_count(
      form.question_count.as_deref(),
      config::DEFAULT_GENERATED_QUESTIONS,
    ),
  };
  let request = match GenerationRequest::from_form(
    form.level.clone(),
    form.topic.clone(),
    form.content.clone(),
    count,
  ) {
    Ok(request) => request,
    Err(_) => return GenerationStatus::error(INCOMPLETE_FORM),
  };

  tracing::info!(
    "Requesting {} {} for {} / {}",
    request.count,
    target.noun(),
    request.level,
    request.topic
  );
  match api.generate(target, &request).await {
    Ok(receipt) => {
      match target {
        GenerationTarget::Flashcards => {
          let stats = api.flashcard_stats().await;
          session.update_flashcard_stats(stats.log_warn("Failed to refresh flashcard stats"));
        }
        GenerationTarget::Quiz => {
          let stats = api.quiz_stats().await;
          session.update_quiz_stats(stats.log_warn("Failed to refresh quiz stats"));
        }
      }
      // New content may introduce a topic
      session.topics = None;

      let message = if receipt.message.trim().is_empty() {
        match receipt.count {
          Some(n) => format!("Generated {} {}", n, target.noun()),
          None => format!("Generated {}", target.noun()),
        }
      } else {
        receipt.message
      };
      GenerationStatus::ok(message)
    }
    Err(ApiError::Status { status, detail }) => {
      tracing::warn!("Generation of {} rejected ({}): {}", target.noun(), status, detail);
      GenerationStatus::error(format!("Error: {}", detail))
    }
    Err(e) if e.is_transport() => {
      tracing::warn!("Generation of {} failed: {}", target.noun(), e);
      GenerationStatus::error(format!(
        "Error generating {}: the study backend is unreachable",
        target.noun()
      ))
    }
    Err(e) => {
      tracing::warn!("Generation of {} failed: {}", target.noun(), e);
      GenerationStatus::error(format!("Error generating {}: {}", target.noun(), e.detail()))
    }
  }
}

/// Fold per-target outcomes into the single status line
fn combine(mut results: Vec<GenerationStatus>) -> GenerationStatus {
  if results.len() == 1 {
    return results.remove(0);
  }
  let is_error = results.iter().any(|r| r.is_error);
  let message = results
    .into_iter()
    .map(|r| r.message)
    .collect::<Vec<_>>()
    .join(" / ");
  GenerationStatus { message, is_error }
}

fn status_fields(session: &StudySession) -> (bool, GenerationStatus) {
  match &session.generation_status {
    Some(status) => (true, status.clone()),
    None => (false, GenerationStatus::ok("")),
  }
}
