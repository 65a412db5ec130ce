use axum::extract::State;
use axum::response::Html;

use crate::api::LogOnError;
use crate::session::StudyContext;
use crate::state::AppState;

use super::render;
use super::templates::DashboardTemplate;
use super::views::DashboardView;

/// Dashboard: the four aggregates are fetched concurrently and each one
/// that fails keeps whatever the session last showed.
pub async fn dashboard(State(state): State<AppState>, study: StudyContext) -> Html<String> {
  let api = &state.api;
  let (overall, streak, recommendations, weak_topics) = tokio::join!(
    api.overall_progress(),
    api.streak(),
    api.recommendations(),
    api.weak_topics(),
  );

  let mut session = study.lock().await;
  session.dashboard.merge(
    overall.log_warn("Failed to load overall progress"),
    streak.log_warn("Failed to load streak"),
    recommendations.log_warn("Failed to load recommendations"),
    weak_topics.log_warn("Failed to load weak topics"),
  );

  let template = DashboardTemplate {
    active: "dashboard",
    notices: session.notices.snapshot(),
    dashboard: DashboardView::from_snapshot(&session.dashboard),
  };
  render(&template)
}
