use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};

use crate::api::LogOnError;
use crate::config;
use crate::domain::card::non_empty;
use crate::session::StudyContext;
use crate::state::AppState;
use crate::study::StudySession;

use super::templates::{LevelProgressTemplate, ProgressQuery, ProgressTemplate};
use super::views::ProgressView;
use super::{fetch_topics, is_htmx_request, render, store_topics};

/// Progress page: streak and mastery plus one level's topic breakdown
/// ("L1" unless `?level=` picks another)
pub async fn progress_page(
  State(state): State<AppState>,
  study: StudyContext,
  Query(query): Query<ProgressQuery>,
) -> Response {
  let level = non_empty(query.level).unwrap_or_else(|| config::DEFAULT_PROGRESS_LEVEL.to_string());

  let api = &state.api;
  let (streak, overall, breakdown, topics) = tokio::join!(
    api.streak(),
    api.overall_progress(),
    api.level_progress(&level),
    fetch_topics(api, &study),
  );

  let mut guard = study.lock().await;
  let session: &mut StudySession = &mut guard;
  store_topics(session, topics);

  let progress = &mut session.progress;
  if let Some(streak) = streak.log_warn("Failed to load streak") {
    progress.streak = Some(streak);
  }
  if let Some(overall) = overall.log_warn("Failed to load overall progress") {
    progress.overall = Some(overall);
  }
  progress.select_level(&level);
  if let Some(rows) = breakdown.log_warn("Failed to load level progress") {
    progress.breakdown = Some(rows);
  }

  let template = ProgressTemplate {
    active: "progress",
    notices: session.notices.snapshot(),
    progress: ProgressView::new(&session.progress, session.topics.as_ref()),
  };
  render(&template).into_response()
}

/// Level selector: re-fetch one level's breakdown
pub async fn level_progress(
  State(state): State<AppState>,
  study: StudyContext,
  headers: HeaderMap,
  Path(level): Path<String>,
) -> Response {
  if !is_htmx_request(&headers) {
    let target = format!("/progress?level={}", urlencoding::encode(&level));
    return Redirect::to(&target).into_response();
  }

  let breakdown = state.api.level_progress(&level).await;

  let mut guard = study.lock().await;
  let session: &mut StudySession = &mut guard;
  session.progress.select_level(&level);
  match breakdown {
    Ok(rows) => session.progress.breakdown = Some(rows),
    Err(e) => {
      tracing::warn!("Failed to load progress for level {}: {}", level, e);
      session.notices.error(format!("Error loading progress for {}", level));
    }
  }

  let template = LevelProgressTemplate {
    notices: session.notices.snapshot(),
    progress: ProgressView::new(&session.progress, session.topics.as_ref()),
  };
  render(&template).into_response()
}
