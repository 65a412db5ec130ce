mod support;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;

use study_desk::api::ApiClient;
use study_desk::state::AppState;
use support::{Harness, MockData, HX_REQUEST};

#[tokio::test]
async fn test_dashboard_renders_all_regions() {
  let h = Harness::new(MockData::default()).await;

  let page = h.page("alice", "/").await;
  page.assert_status_ok();
  let text = page.text();
  assert!(text.contains("81.5%"));
  assert!(text.contains("90"));
  assert!(text.contains("42"));
  assert!(text.contains("Focus on Fixed Income this week."));
  assert!(text.contains("L2 - Derivatives"));
  assert!(text.contains("Accuracy: 41.3% | Revisit forward pricing"));
}

#[tokio::test]
async fn test_dashboard_isolates_failed_fetch() {
  let h = Harness::new(MockData {
    fail_overall: true,
    ..Default::default()
  })
  .await;

  let page = h.page("bob", "/dashboard").await;
  page.assert_status_ok();
  let text = page.text();
  assert!(!text.contains("81.5%"));
  assert!(text.contains("Focus on Fixed Income this week."));
  assert!(text.contains("L2 - Derivatives"));
}

#[tokio::test]
async fn test_dashboard_keeps_last_good_values() {
  let h = Harness::new(MockData::default()).await;

  assert!(h.page("carol", "/").await.text().contains("81.5%"));
  h.backend.with(|data| data.fail_overall = true);
  assert!(h.page("carol", "/").await.text().contains("81.5%"));
}

#[tokio::test]
async fn test_unreachable_backend_degrades_to_placeholders() {
  // Reserve a port, then close it so connections are refused
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let state = AppState::new(ApiClient::new(format!("http://{}", addr)), 20);
  let server = TestServer::new(study_desk::app(state)).unwrap();

  let page = server
    .get("/")
    .add_header(header::COOKIE, HeaderValue::from_static("study_session=dan"))
    .await;
  page.assert_status_ok();
  assert!(page.text().contains("No data available."));
}

#[tokio::test]
async fn test_first_visit_sets_session_cookie() {
  let h = Harness::new(MockData::default()).await;

  let page = h.server.get("/").await;
  page.assert_status_ok();
  let cookie = page.header(header::SET_COOKIE);
  let cookie = cookie.to_str().unwrap();
  assert!(cookie.starts_with("study_session="));
  assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_progress_page_defaults_to_l1() {
  let h = Harness::new(MockData::default()).await;

  let page = h.page("erin", "/progress").await;
  page.assert_status_ok();
  let text = page.text();
  assert!(text.contains("L1 Topics"));
  assert!(text.contains("Ethics"));
  assert!(text.contains("72.4%"));
  assert!(text.contains("5/20"));
  assert!(text.contains("35 min"));
  assert!(text.contains("63%"));
  assert!(text.contains("9"));
}

#[tokio::test]
async fn test_level_switch_fragment() {
  let h = Harness::new(MockData::default()).await;

  let fragment = h
    .server
    .get("/progress/level/L2")
    .add_header(header::COOKIE, support::cookie("frank"))
    .add_header(HX_REQUEST, HeaderValue::from_static("true"))
    .await;
  fragment.assert_status_ok();
  let text = fragment.text();
  assert!(text.contains("L2 Topics"));
  assert!(text.contains("No progress recorded for this level yet."));
}

#[tokio::test]
async fn test_level_switch_without_htmx_redirects() {
  let h = Harness::new(MockData::default()).await;

  let response = h.page("gina", "/progress/level/L3").await;
  assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
  assert_eq!(response.header(header::LOCATION), "/progress?level=L3");

  let page = h.page("gina", "/progress?level=L3").await;
  assert!(page.text().contains("L3 Topics"));
}

#[tokio::test]
async fn test_generation_requires_topic_and_content() {
  let h = Harness::new(MockData::default()).await;

  let response = h
    .action(
      "hank",
      "/generate/both",
      &[("level", "L1"), ("topic", "Ethics"), ("content", "  ")],
    )
    .await;
  let text = response.text();
  assert!(text.contains("Please fill in all fields"));
  assert_eq!(text.matches("Please fill in all fields").count(), 1);

  h.backend.with(|data| assert!(data.generated.is_empty()));
}

#[tokio::test]
async fn test_generation_error_detail_is_shown() {
  let h = Harness::new(MockData {
    generation_error: Some((
      StatusCode::INTERNAL_SERVER_ERROR,
      json!({ "detail": "ANTHROPIC_API_KEY not configured" }),
    )),
    ..Default::default()
  })
  .await;

  let response = h
    .action(
      "ivy",
      "/generate/flashcards",
      &[("level", "L1"), ("topic", "Ethics"), ("content", "Standard I(A)")],
    )
    .await;
  assert!(response.text().contains("Error: ANTHROPIC_API_KEY not configured"));
}

#[tokio::test]
async fn test_generation_structured_error_detail() {
  let h = Harness::new(MockData {
    generation_error: Some((
      StatusCode::UNPROCESSABLE_ENTITY,
      json!({ "detail": [{ "loc": ["body", "topic"], "msg": "field required" }] }),
    )),
    ..Default::default()
  })
  .await;

  let response = h
    .action(
      "jack",
      "/generate/quiz",
      &[("level", "L1"), ("topic", "Ethics"), ("content", "notes")],
    )
    .await;
  let text = response.text();
  assert!(text.contains("Error: "));
  assert!(text.contains("field required"));
}

#[tokio::test]
async fn test_generate_both_runs_sequentially() {
  let h = Harness::new(MockData::default()).await;

  let response = h
    .action(
      "kim",
      "/generate/both",
      &[
        ("level", "L2"),
        ("topic", "Equity"),
        ("content", "Dividend discount models"),
        ("flashcard_count", "4"),
        ("question_count", "2"),
      ],
    )
    .await;
  let text = response.text();
  assert!(text.contains("Generated 4 flashcards / Generated 2 questions"));

  h.backend.with(|data| {
    assert_eq!(data.generated.len(), 2);
    assert_eq!(data.generated[0].0, "flashcards");
    assert_eq!(data.generated[0].1["flashcard_count"], 4);
    assert_eq!(data.generated[0].1["level"], "L2");
    assert_eq!(data.generated[1].0, "questions");
    assert_eq!(data.generated[1].1["question_count"], 2);
  });
}

#[tokio::test]
async fn test_generate_page_uses_catalog_levels() {
  let h = Harness::new(MockData::default()).await;

  let page = h.page("lee", "/generate").await;
  page.assert_status_ok();
  let text = page.text();
  assert!(text.contains(r#"<option value="L2">"#));
  assert!(!text.contains(r#"<option value="L3">"#));
}

#[tokio::test]
async fn test_dismiss_notice() {
  let h = Harness::new(MockData::default()).await;

  let loaded = h.action("max", "/quiz/start", &[("count", "5")]).await;
  assert!(loaded.text().contains("No questions found for these filters"));

  let dismissed = h.action("max", "/notices/1/dismiss", &[]).await;
  dismissed.assert_status_ok();
  assert!(!dismissed.text().contains("No questions found for these filters"));

  let page = h.page("max", "/quiz").await;
  assert!(!page.text().contains("No questions found for these filters"));
}
