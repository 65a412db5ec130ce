use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use study_desk::api::LogOnError;
use study_desk::{app, config, state::AppState};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "study_desk=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let settings = config::load_settings();
  tracing::info!("Using study backend at {}", settings.api_base_url);

  let state = AppState::from_settings(&settings);

  // Reachability is informational only; pages degrade per request
  if let Some(health) = state.api.health().await.log_warn("Study backend unreachable") {
    tracing::info!("Study backend status: {}", health.status);
  }

  let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", settings.bind_addr));

  tracing::info!("Server running on http://{}", settings.bind_addr);

  axum::serve(listener, app(state))
    .await
    .expect("Server failed to start");
}
