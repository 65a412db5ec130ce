//! Application configuration.
//!
//! Runtime settings are resolved with priority config.toml > environment
//! (.env is loaded first) > built-in defaults. Everything else is a constant.

use serde::Deserialize;
use std::path::Path;

// ==================== Runtime Settings ====================

/// Default backend API base URL
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Default address the front end binds to
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Default number of due cards requested per review session
pub const DEFAULT_DUE_LIMIT: u32 = 20;

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
  backend: Option<BackendSection>,
  server: Option<ServerSection>,
  study: Option<StudySection>,
}

#[derive(Debug, Default, Deserialize)]
struct BackendSection {
  url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
  addr: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StudySection {
  due_limit: Option<u32>,
}

/// Resolved runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  /// Base URL of the study backend, without a trailing slash
  pub api_base_url: String,
  pub bind_addr: String,
  pub due_limit: u32,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      api_base_url: DEFAULT_API_URL.to_string(),
      bind_addr: DEFAULT_BIND_ADDR.to_string(),
      due_limit: DEFAULT_DUE_LIMIT,
    }
  }
}

/// Environment lookups consulted when config.toml leaves a value unset
pub struct EnvOverrides {
  pub api_url: Option<String>,
  pub bind_addr: Option<String>,
  pub due_limit: Option<String>,
}

impl EnvOverrides {
  pub fn from_env() -> Self {
    Self {
      api_url: std::env::var("STUDY_API_URL").ok(),
      bind_addr: std::env::var("STUDY_BIND_ADDR").ok(),
      due_limit: std::env::var("STUDY_DUE_LIMIT").ok(),
    }
  }

  pub fn none() -> Self {
    Self {
      api_url: None,
      bind_addr: None,
      due_limit: None,
    }
  }
}

/// Load settings with priority: config.toml > .env / environment > default
pub fn load_settings() -> Settings {
  // Load .env file if present
  let _ = dotenvy::dotenv();
  load_settings_from(Path::new("config.toml"), EnvOverrides::from_env())
}

/// Resolve settings from an explicit config file path and environment values
pub fn load_settings_from(config_path: &Path, env: EnvOverrides) -> Settings {
  let file = match std::fs::read_to_string(config_path) {
    Ok(contents) => match toml::from_str::<FileConfig>(&contents) {
      Ok(config) => config,
      Err(e) => {
        tracing::warn!("Ignoring malformed {}: {}", config_path.display(), e);
        FileConfig::default()
      }
    },
    Err(_) => FileConfig::default(),
  };

  let mut settings = Settings::default();

  // Priority 1: config.toml, Priority 2: environment
  if let Some(url) = file.backend.and_then(|b| b.url) {
    tracing::info!("Using backend from config.toml: {}", url);
    settings.api_base_url = url;
  } else if let Some(url) = env.api_url {
    tracing::info!("Using backend from STUDY_API_URL env: {}", url);
    settings.api_base_url = url;
  }

  if let Some(addr) = file.server.and_then(|s| s.addr).or(env.bind_addr) {
    settings.bind_addr = addr;
  }

  let env_limit = env.due_limit.and_then(|raw| match raw.parse::<u32>() {
    Ok(limit) => Some(limit),
    Err(_) => {
      tracing::warn!("Ignoring non-numeric STUDY_DUE_LIMIT: {}", raw);
      None
    }
  });
  if let Some(limit) = file.study.and_then(|s| s.due_limit).or(env_limit) {
    settings.due_limit = limit.max(1);
  }

  settings.api_base_url = settings.api_base_url.trim_end_matches('/').to_string();
  settings
}

// ==================== Study Defaults ====================

/// Number of questions requested when the quiz form leaves count empty
pub const DEFAULT_QUIZ_COUNT: u32 = 10;

/// Flashcards requested from the generator by default
pub const DEFAULT_GENERATED_FLASHCARDS: u32 = 10;

/// Quiz questions requested from the generator by default
pub const DEFAULT_GENERATED_QUESTIONS: u32 = 5;

/// Level shown first on the progress page
pub const DEFAULT_PROGRESS_LEVEL: &str = "L1";

/// Levels offered by selectors before the topic catalog has loaded
pub const FALLBACK_LEVELS: [&str; 3] = ["L1", "L2", "L3"];

// ==================== Session Configuration ====================

/// Cookie carrying the browser's study session id
pub const SESSION_COOKIE_NAME: &str = "study_session";

/// Session expiration time in hours of inactivity
pub const SESSION_EXPIRY_HOURS: i64 = 12;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

/// Maximum number of notifications kept per session
pub const MAX_NOTICES: usize = 5;
