pub mod api;
pub mod config;
pub mod domain;
pub mod handlers;
pub mod notify;
pub mod session;
pub mod state;
pub mod study;

use axum::{middleware, routing::get, routing::post, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
  Router::new()
    .route("/", get(handlers::dashboard))
    .route("/dashboard", get(handlers::dashboard))
    .route("/flashcards", get(handlers::flashcards_page))
    .route("/flashcards/due", post(handlers::load_due))
    .route("/flashcards/browse", post(handlers::load_filtered))
    .route("/flashcards/flip", post(handlers::flip_card))
    .route("/flashcards/rate", post(handlers::rate_card))
    .route("/quiz", get(handlers::quiz_page))
    .route("/quiz/start", post(handlers::start_quiz))
    .route("/quiz/answer", post(handlers::answer_question))
    .route("/quiz/next", post(handlers::next_question))
    .route("/quiz/previous", post(handlers::previous_question))
    .route("/progress", get(handlers::progress_page))
    .route("/progress/level/{level}", get(handlers::level_progress))
    .route("/generate", get(handlers::generate_page))
    .route("/generate/flashcards", post(handlers::generate_flashcards))
    .route("/generate/quiz", post(handlers::generate_quiz))
    .route("/generate/both", post(handlers::generate_both))
    .route("/notices/{id}/dismiss", post(handlers::dismiss_notice))
    .nest_service("/static", ServeDir::new("static"))
    .layer(middleware::from_fn(session::ensure_session_cookie))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
