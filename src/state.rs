//! Application state shared by all handlers.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Settings;
use crate::session::SessionStore;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
  /// Client for the study backend
  pub api: ApiClient,

  /// Per-browser study sessions
  pub sessions: Arc<SessionStore>,

  /// Number of due cards requested per review session
  pub due_limit: u32,
}

impl AppState {
  pub fn new(api: ApiClient, due_limit: u32) -> Self {
    Self {
      api,
      sessions: Arc::new(SessionStore::new()),
      due_limit,
    }
  }

  pub fn from_settings(settings: &Settings) -> Self {
    Self::new(ApiClient::new(settings.api_base_url.clone()), settings.due_limit)
  }
}
