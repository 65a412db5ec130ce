//! In-memory storage for browser study sessions.
//!
//! Stores a `StudySession` per session ID (from cookie) behind its own async
//! mutex. Sessions auto-expire after a configurable duration of inactivity.

use axum::extract::{FromRequestParts, Request};
use axum::http::{request::Parts, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, MutexGuard, TryLockError};

use crate::config;
use crate::state::AppState;
use crate::study::StudySession;

pub type SharedSession = Arc<AsyncMutex<StudySession>>;

/// Session entry with last access time for expiration
struct SessionEntry {
  session: SharedSession,
  last_access: DateTime<Utc>,
}

/// All live sessions, keyed by cookie value
#[derive(Default)]
pub struct SessionStore {
  sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Get or create the session for the given ID
  pub fn get_or_create(&self, session_id: &str) -> SharedSession {
    let mut sessions = match self.sessions.lock() {
      Ok(guard) => guard,
      Err(poisoned) => {
        tracing::warn!("Session store lock poisoned; recovering");
        poisoned.into_inner()
      }
    };

    // Clean up expired sessions occasionally (~10% chance)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      cleanup_expired(&mut sessions, Utc::now());
    }

    let entry = sessions
      .entry(session_id.to_string())
      .or_insert_with(|| {
        tracing::debug!("Creating study session {}", session_id);
        SessionEntry {
          session: Arc::new(AsyncMutex::new(StudySession::new())),
          last_access: Utc::now(),
        }
      });
    entry.last_access = Utc::now();
    entry.session.clone()
  }
}

/// Clean up expired sessions
fn cleanup_expired(sessions: &mut HashMap<String, SessionEntry>, now: DateTime<Utc>) {
  let expiry = now - Duration::hours(config::SESSION_EXPIRY_HOURS);
  let before = sessions.len();
  sessions.retain(|_, entry| entry.last_access > expiry);
  let removed = before - sessions.len();
  if removed > 0 {
    tracing::debug!("Expired {} study sessions", removed);
  }
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

/// Session id resolved by [`ensure_session_cookie`]
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

/// Middleware: make sure every request carries a session id, issuing a
/// cookie on first visit.
pub async fn ensure_session_cookie(jar: CookieJar, mut request: Request, next: Next) -> Response {
  let existing = jar
    .get(config::SESSION_COOKIE_NAME)
    .map(|c| c.value().to_string())
    .filter(|v| !v.is_empty());

  let (jar, session_id) = match existing {
    Some(id) => (jar, id),
    None => {
      let id = generate_session_id();
      let cookie = Cookie::build((config::SESSION_COOKIE_NAME, id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
      (jar.add(cookie), id)
    }
  };

  request.extensions_mut().insert(SessionId(session_id));
  let response = next.run(request).await;
  (jar, response).into_response()
}

/// The current browser's study session.
/// Add this as a handler parameter to get the caller's state.
pub struct StudyContext {
  pub session_id: String,
  session: SharedSession,
}

impl StudyContext {
  /// Wait for the session (page loads)
  pub async fn lock(&self) -> MutexGuard<'_, StudySession> {
    self.session.lock().await
  }

  /// Take the session only if no other request is using it (actions).
  ///
  /// Rejects re-entrant submissions such as a double-clicked rating while
  /// the first one is still waiting on the backend.
  pub fn try_lock(&self) -> Result<MutexGuard<'_, StudySession>, Busy> {
    self.session.try_lock().map_err(|_: TryLockError| {
      tracing::debug!("Session {} busy; rejecting concurrent action", self.session_id);
      Busy
    })
  }
}

impl FromRequestParts<AppState> for StudyContext {
  type Rejection = Response;

  async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
    let session_id = match parts.extensions.get::<SessionId>() {
      Some(SessionId(id)) => id.clone(),
      None => {
        // Router without the cookie middleware: fall back to the raw cookie
        let jar = CookieJar::from_request_parts(parts, state)
          .await
          .map_err(|_| StatusCode::BAD_REQUEST.into_response())?;
        jar
          .get(config::SESSION_COOKIE_NAME)
          .map(|c| c.value().to_string())
          .ok_or_else(|| (StatusCode::BAD_REQUEST, "Missing session").into_response())?
      }
    };

    let session = state.sessions.get_or_create(&session_id);
    Ok(StudyContext {
      session_id,
      session,
    })
  }
}

/// Another request for the same session is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Busy;

impl IntoResponse for Busy {
  fn into_response(self) -> Response {
    (StatusCode::CONFLICT, "A request is already in progress").into_response()
  }
}
