use thiserror::Error;

/// Failure talking to the study backend
#[derive(Debug, Error)]
pub enum ApiError {
  /// Connection refused, reset, DNS failure and similar
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),

  /// Non-2xx response; `detail` is the human-readable reason from the body
  #[error("backend returned {status}: {detail}")]
  Status { status: u16, detail: String },

  #[error("unexpected response body: {0}")]
  Decode(#[from] serde_json::Error),
}

impl ApiError {
  /// Backend-provided detail for status errors, the error text otherwise
  pub fn detail(&self) -> String {
    match self {
      Self::Status { detail, .. } => detail.clone(),
      other => other.to_string(),
    }
  }

  pub fn is_transport(&self) -> bool {
    matches!(self, Self::Transport(_))
  }
}

/// Extension trait for logging errors on non-critical backend calls
pub trait LogOnError<T> {
  /// Log the error at warn level and return None
  fn log_warn(self, context: &str) -> Option<T>;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
  fn log_warn(self, context: &str) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        None
      }
    }
  }
}

/// Pull a readable reason out of an error response body.
///
/// FastAPI-style backends put it under `detail`, either as a string or as a
/// structured validation list; plain-text bodies are used as-is.
pub(crate) fn extract_detail(body: &str, fallback: &str) -> String {
  const MAX_DETAIL_CHARS: usize = 300;

  let detail = match serde_json::from_str::<serde_json::Value>(body) {
    Ok(serde_json::Value::Object(map)) => match map.get("detail").or_else(|| map.get("message")) {
      Some(serde_json::Value::String(s)) => s.clone(),
      Some(serde_json::Value::Null) | None => String::new(),
      Some(other) => other.to_string(),
    },
    Ok(serde_json::Value::String(s)) => s,
    _ => body.trim().to_string(),
  };

  if detail.is_empty() {
    fallback.to_string()
  } else {
    detail.chars().take(MAX_DETAIL_CHARS).collect()
  }
}
