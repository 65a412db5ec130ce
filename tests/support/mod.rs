//! In-process stand-in for the study backend plus request helpers.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_test::{TestResponse, TestServer};
use serde::Deserialize;
use serde_json::{json, Value};

use study_desk::api::ApiClient;
use study_desk::state::AppState;

/// Canned data served by the mock backend and everything it was sent
#[derive(Default)]
pub struct MockData {
  pub due: Vec<Value>,
  pub filtered: Vec<Value>,
  pub questions: Vec<Value>,
  pub fail_reviews: bool,
  pub fail_answers: bool,
  pub fail_overall: bool,
  pub fail_streak: bool,
  pub fail_flashcard_stats: bool,
  pub review_delay: Option<Duration>,
  pub stats_delay: Option<Duration>,
  pub answer_delay: Option<Duration>,
  pub generation_error: Option<(StatusCode, Value)>,

  pub reviews: Vec<Value>,
  pub answers: Vec<Value>,
  pub filter_queries: Vec<FilterQuery>,
  pub generated: Vec<(String, Value)>,
  pub sessions_started: Vec<Value>,
  pub sessions_ended: Vec<Value>,
  pub flashcard_stats_calls: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
  pub level: Option<String>,
  pub topic: Option<String>,
  pub count: Option<u32>,
}

pub type Shared = Arc<Mutex<MockData>>;

pub fn flashcard(id: i64, front: &str, back: &str) -> Value {
  json!({
    "id": id,
    "front": front,
    "back": back,
    "level": "L1",
    "topic": "Ethics",
    "difficulty": "medium",
  })
}

/// Question whose correct answer is always "A"
pub fn question(id: i64, text: &str) -> Value {
  json!({
    "id": id,
    "level": "L1",
    "topic": "Quant",
    "question": text,
    "option_a": "Right",
    "option_b": "Wrong",
    "option_c": "Also wrong",
    "option_d": null,
  })
}

fn error(status: StatusCode, detail: &str) -> Response {
  (status, Json(json!({ "detail": detail }))).into_response()
}

async fn overall(State(data): State<Shared>) -> Response {
  if data.lock().unwrap().fail_overall {
    return error(StatusCode::INTERNAL_SERVER_ERROR, "aggregation failed");
  }
  Json(json!({
    "total_topics": 7,
    "quiz_accuracy": 81.5,
    "total_time_spent": 5400,
    "cards_mastered": 42,
    "average_mastery": 63.4,
  }))
  .into_response()
}

async fn streak(State(data): State<Shared>) -> Response {
  if data.lock().unwrap().fail_streak {
    return error(StatusCode::INTERNAL_SERVER_ERROR, "streak failed");
  }
  Json(json!({ "current_streak": 4, "longest_streak": 9 })).into_response()
}

async fn recommendations() -> Json<Value> {
  Json(json!({ "recommendation_summary": "Focus on Fixed Income this week." }))
}

async fn level_progress(Path(level): Path<String>) -> Json<Value> {
  let progress = if level == "L1" {
    json!([{
      "topic": "Ethics",
      "quiz_accuracy": 72.4,
      "cards_mastered": 5,
      "cards_total": 20,
      "time_spent": 35,
    }])
  } else {
    json!([])
  };
  Json(json!({ "level": level, "progress": progress }))
}

async fn flashcard_stats(State(data): State<Shared>) -> Response {
  let delay = data.lock().unwrap().stats_delay;
  if let Some(delay) = delay {
    tokio::time::sleep(delay).await;
  }
  let mut data = data.lock().unwrap();
  data.flashcard_stats_calls += 1;
  if data.fail_flashcard_stats {
    return error(StatusCode::INTERNAL_SERVER_ERROR, "stats failed");
  }
  Json(json!({
    "total_cards": 120,
    "due_cards": data.due.len().saturating_sub(data.reviews.len()),
    "total_reviews": 300 + data.reviews.len(),
  }))
  .into_response()
}

async fn due(State(data): State<Shared>) -> Json<Value> {
  Json(json!({ "flashcards": data.lock().unwrap().due.clone() }))
}

async fn filtered(State(data): State<Shared>, Query(query): Query<FilterQuery>) -> Json<Value> {
  let mut data = data.lock().unwrap();
  data.filter_queries.push(query);
  Json(json!({ "flashcards": data.filtered.clone() }))
}

async fn review(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
  let delay = data.lock().unwrap().review_delay;
  if let Some(delay) = delay {
    tokio::time::sleep(delay).await;
  }
  let mut data = data.lock().unwrap();
  if data.fail_reviews {
    return error(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
  }
  data.reviews.push(body);
  Json(json!({ "message": "Review recorded", "interval_days": 1 })).into_response()
}

async fn quiz_stats() -> Json<Value> {
  Json(json!({ "total_attempts": 25, "accuracy": 68.0, "average_time": 12.5 }))
}

async fn weak_topics() -> Json<Value> {
  Json(json!({
    "weak_topics": [{
      "level": "L2",
      "topic": "Derivatives",
      "accuracy": 41.27,
      "recommendation": "Revisit forward pricing",
    }]
  }))
}

async fn random_quiz(State(data): State<Shared>, Query(query): Query<FilterQuery>) -> Json<Value> {
  let mut data = data.lock().unwrap();
  let count = query.count.unwrap_or(10) as usize;
  data.filter_queries.push(query);
  let questions: Vec<Value> = data.questions.iter().take(count).cloned().collect();
  Json(json!({ "questions": questions }))
}

async fn submit(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
  let delay = data.lock().unwrap().answer_delay;
  if let Some(delay) = delay {
    tokio::time::sleep(delay).await;
  }
  let mut data = data.lock().unwrap();
  if data.fail_answers {
    return error(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
  }
  let is_correct = body["user_answer"] == "A";
  data.answers.push(body);
  Json(json!({
    "is_correct": is_correct,
    "correct_answer": "A",
    "explanation": "A is the textbook definition.",
  }))
  .into_response()
}

async fn topics() -> Json<Value> {
  Json(json!({ "topics": { "L1": ["Ethics", "Quant"], "L2": ["Equity", "Ethics"] } }))
}

async fn generate(kind: &str, data: Shared, body: Value) -> Response {
  let mut data = data.lock().unwrap();
  if let Some((status, body)) = data.generation_error.clone() {
    return (status, Json(body)).into_response();
  }
  let count = body["flashcard_count"]
    .as_u64()
    .or_else(|| body["question_count"].as_u64())
    .unwrap_or(0);
  data.generated.push((kind.to_string(), body));
  Json(json!({ "message": format!("Generated {} {}", count, kind), "count": count })).into_response()
}

async fn generate_flashcards(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
  generate("flashcards", data, body).await
}

async fn generate_quiz(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
  generate("questions", data, body).await
}

async fn session_start(State(data): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
  let mut data = data.lock().unwrap();
  data.sessions_started.push(body);
  Json(json!({ "session_id": data.sessions_started.len() }))
}

async fn session_end(State(data): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
  data.lock().unwrap().sessions_ended.push(body);
  Json(json!({ "message": "Session ended" }))
}

pub struct MockBackend {
  pub addr: SocketAddr,
  pub data: Shared,
}

impl MockBackend {
  pub async fn start(data: MockData) -> Self {
    let data = Arc::new(Mutex::new(data));
    let router = Router::new()
      .route("/api/progress/overall", get(overall))
      .route("/api/progress/streak", get(streak))
      .route("/api/progress/recommendations", get(recommendations))
      .route("/api/progress/level/{level}", get(level_progress))
      .route("/api/flashcards/stats", get(flashcard_stats))
      .route("/api/flashcards/due", get(due))
      .route("/api/flashcards", get(filtered))
      .route("/api/flashcards/review", post(review))
      .route("/api/quiz/stats", get(quiz_stats))
      .route("/api/quiz/weak-topics", get(weak_topics))
      .route("/api/quiz/random", get(random_quiz))
      .route("/api/quiz/submit", post(submit))
      .route("/api/topics", get(topics))
      .route("/api/generate/flashcards", post(generate_flashcards))
      .route("/api/generate/quiz", post(generate_quiz))
      .route("/api/study-session/start", post(session_start))
      .route("/api/study-session/end", post(session_end))
      .route("/api/health", get(|| async { Json(json!({ "status": "healthy" })) }))
      .with_state(data.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, router).await.unwrap();
    });

    Self { addr, data }
  }

  pub fn url(&self) -> String {
    format!("http://{}", self.addr)
  }

  pub fn with<R>(&self, f: impl FnOnce(&mut MockData) -> R) -> R {
    f(&mut self.data.lock().unwrap())
  }
}

pub struct Harness {
  pub server: TestServer,
  pub backend: MockBackend,
}

impl Harness {
  pub async fn new(data: MockData) -> Self {
    let backend = MockBackend::start(data).await;
    let state = AppState::new(ApiClient::new(backend.url()), 20);
    let server = TestServer::new(study_desk::app(state)).unwrap();
    Self { server, backend }
  }

  /// Full page GET for the given browser session
  pub async fn page(&self, session: &str, path: &str) -> TestResponse {
    self
      .server
      .get(path)
      .add_header(header::COOKIE, cookie(session))
      .await
  }

  /// htmx-style POST returning a fragment
  pub async fn action(&self, session: &str, path: &str, form: &[(&str, &str)]) -> TestResponse {
    self
      .server
      .post(path)
      .add_header(header::COOKIE, cookie(session))
      .add_header(HX_REQUEST, HeaderValue::from_static("true"))
      .form(&form)
      .await
  }

  /// Plain form POST (no JavaScript)
  pub async fn plain_post(&self, session: &str, path: &str, form: &[(&str, &str)]) -> TestResponse {
    self
      .server
      .post(path)
      .add_header(header::COOKIE, cookie(session))
      .form(&form)
      .await
  }
}

pub const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");

pub fn cookie(session: &str) -> HeaderValue {
  HeaderValue::from_str(&format!("study_session={}", session)).unwrap()
}
