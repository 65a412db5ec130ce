//! HTTP handlers: full pages on GET, htmx fragments (or redirects) on POST.

pub mod dashboard;
pub mod flashcards;
pub mod generate;
pub mod progress;
pub mod quiz;
pub mod templates;
pub mod views;

use askama::Template;
use axum::extract::Path;
use axum::http::{header, HeaderMap, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::api::{ApiClient, LogOnError};
use crate::domain::{SessionKind, SessionTally, TopicCatalog};
use crate::session::StudyContext;
use crate::study::StudySession;

use templates::NoticesTemplate;

pub use dashboard::dashboard;
pub use flashcards::{flashcards_page, flip_card, load_due, load_filtered, rate_card};
pub use generate::{generate_both, generate_flashcards, generate_page, generate_quiz};
pub use progress::{level_progress, progress_page};
pub use quiz::{answer_question, next_question, previous_question, quiz_page, start_quiz};

/// Check if request is from HTMX
pub(crate) fn is_htmx_request(headers: &HeaderMap) -> bool {
  headers.get("HX-Request").is_some()
}

pub(crate) fn render<T: Template>(template: &T) -> Html<String> {
  Html(template.render().unwrap_or_else(|e| {
    tracing::error!("Template render failed: {}", e);
    String::new()
  }))
}

/// Fetch the topic catalog unless the session already has one.
///
/// Only peeks at the session, so page loads never hold it across a backend
/// call. A failure leaves the fallback levels and retries on the next load.
pub(crate) async fn fetch_topics(api: &ApiClient, study: &StudyContext) -> Option<TopicCatalog> {
  if study.lock().await.topics.is_some() {
    return None;
  }
  api.topics().await.log_warn("Failed to load topic catalog")
}

pub(crate) fn store_topics(session: &mut StudySession, fetched: Option<TopicCatalog>) {
  if fetched.is_some() {
    session.topics = fetched;
  }
}

/// Open a backend study session for tracking; failures only log
pub(crate) async fn open_tracking(
  api: &ApiClient,
  kind: SessionKind,
  level: &str,
  topic: &str,
) -> Option<i64> {
  api
    .start_study_session(kind, level, topic)
    .await
    .log_warn("Failed to start study session tracking")
    .map(|ticket| ticket.session_id)
}

pub(crate) async fn close_tracking(api: &ApiClient, tracking_id: Option<i64>, tally: SessionTally) {
  if let Some(id) = tracking_id {
    api
      .end_study_session(id, tally)
      .await
      .log_warn("Failed to end study session tracking");
  }
}

/// Dismiss a notification
pub async fn dismiss_notice(
  study: StudyContext,
  headers: HeaderMap,
  Path(id): Path<u64>,
) -> Response {
  let mut session = study.lock().await;
  session.notices.dismiss(id);

  if is_htmx_request(&headers) {
    let template = NoticesTemplate {
      notices: session.notices.snapshot(),
    };
    return render(&template).into_response();
  }
  Redirect::to(&referer_path(&headers)).into_response()
}

/// Same-site path to return to after a plain form post
fn referer_path(headers: &HeaderMap) -> String {
  headers
    .get(header::REFERER)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.parse::<Uri>().ok())
    .map(|uri| uri.path().to_string())
    .filter(|path| path.starts_with('/') && !path.starts_with("//"))
    .unwrap_or_else(|| "/".to_string())
}
