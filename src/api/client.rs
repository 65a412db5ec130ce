//! Typed client for the study backend's REST API.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use super::error::{extract_detail, ApiError};
use crate::domain::stats::{LevelProgressResponse, WeakTopicsResponse};
use crate::domain::{
  AnswerOutcome, AnswerSubmission, DeckFilter, Flashcard, FlashcardStats, GenerationReceipt,
  GenerationRequest, GenerationTarget, OverallProgress, Question, QuizRequest, QuizStats,
  Recommendations, ReviewAck, ReviewQuality, SessionKind, SessionTally, Streak, TopicCatalog,
  TopicProgress, WeakTopic,
};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
struct FlashcardsResponse {
  #[serde(default)]
  flashcards: Vec<Flashcard>,
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
  #[serde(default)]
  questions: Vec<Question>,
}

#[derive(Serialize)]
struct ReviewBody {
  flashcard_id: i64,
  quality: u8,
}

#[derive(Serialize)]
struct FlashcardGenerationBody<'a> {
  level: &'a str,
  topic: &'a str,
  content: &'a str,
  flashcard_count: u32,
}

#[derive(Serialize)]
struct QuizGenerationBody<'a> {
  level: &'a str,
  topic: &'a str,
  content: &'a str,
  question_count: u32,
}

#[derive(Serialize)]
struct SessionStartBody<'a> {
  session_type: SessionKind,
  level: &'a str,
  topic: &'a str,
}

#[derive(Serialize)]
struct SessionEndBody {
  session_id: i64,
  #[serde(flatten)]
  tally: SessionTally,
}

/// Backend study session opened for streak tracking
#[derive(Debug, Clone, Deserialize)]
pub struct SessionTicket {
  pub session_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
  #[serde(default)]
  pub status: String,
}

/// HTTP client bound to one backend base URL
#[derive(Clone)]
pub struct ApiClient {
  http: reqwest::Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self::with_client(reqwest::Client::new(), base_url)
  }

  pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_string();
    Self { http, base_url }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  async fn get_json<T: DeserializeOwned>(
    &self,
    path: &str,
    query: &[(&'static str, String)],
  ) -> ApiResult<T> {
    tracing::debug!("GET {} {:?}", path, query);
    let response = self.http.get(self.url(path)).query(query).send().await?;
    Self::decode(response).await
  }

  async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
    &self,
    path: &str,
    body: &B,
  ) -> ApiResult<T> {
    tracing::debug!("POST {}", path);
    let response = self.http.post(self.url(path)).json(body).send().await?;
    Self::decode(response).await
  }

  async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
      let fallback = status.canonical_reason().unwrap_or("Request failed");
      return Err(ApiError::Status {
        status: status.as_u16(),
        detail: extract_detail(&body, fallback),
      });
    }

    Ok(serde_json::from_str(&body)?)
  }

  // ==================== Progress ====================

  pub async fn overall_progress(&self) -> ApiResult<OverallProgress> {
    self.get_json("/api/progress/overall", &[]).await
  }

  pub async fn streak(&self) -> ApiResult<Streak> {
    self.get_json("/api/progress/streak", &[]).await
  }

  pub async fn recommendations(&self) -> ApiResult<Recommendations> {
    self.get_json("/api/progress/recommendations", &[]).await
  }

  pub async fn level_progress(&self, level: &str) -> ApiResult<Vec<TopicProgress>> {
    let path = format!("/api/progress/level/{}", urlencoding::encode(level));
    let response: LevelProgressResponse = self.get_json(&path, &[]).await?;
    Ok(response.progress)
  }

  // ==================== Flashcards ====================

  pub async fn flashcard_stats(&self) -> ApiResult<FlashcardStats> {
    self.get_json("/api/flashcards/stats", &[]).await
  }

  pub async fn due_flashcards(&self, limit: u32) -> ApiResult<Vec<Flashcard>> {
    let response: FlashcardsResponse = self
      .get_json("/api/flashcards/due", &[("limit", limit.to_string())])
      .await?;
    Ok(response.flashcards)
  }

  pub async fn flashcards(&self, filter: &DeckFilter) -> ApiResult<Vec<Flashcard>> {
    let response: FlashcardsResponse = self
      .get_json("/api/flashcards", &filter.query_pairs())
      .await?;
    Ok(response.flashcards)
  }

  pub async fn review_flashcard(
    &self,
    flashcard_id: i64,
    quality: ReviewQuality,
  ) -> ApiResult<ReviewAck> {
    let body = ReviewBody {
      flashcard_id,
      quality: quality.as_u8(),
    };
    self.post_json("/api/flashcards/review", &body).await
  }

  // ==================== Quiz ====================

  pub async fn quiz_stats(&self) -> ApiResult<QuizStats> {
    self.get_json("/api/quiz/stats", &[]).await
  }

  pub async fn weak_topics(&self) -> ApiResult<Vec<WeakTopic>> {
    let response: WeakTopicsResponse = self.get_json("/api/quiz/weak-topics", &[]).await?;
    Ok(response.weak_topics)
  }

  pub async fn random_quiz(&self, request: &QuizRequest) -> ApiResult<Vec<Question>> {
    let response: QuestionsResponse = self
      .get_json("/api/quiz/random", &request.query_pairs())
      .await?;
    Ok(response.questions)
  }

  pub async fn submit_answer(&self, submission: &AnswerSubmission) -> ApiResult<AnswerOutcome> {
    self.post_json("/api/quiz/submit", submission).await
  }

  // ==================== Catalog / generation ====================

  pub async fn topics(&self) -> ApiResult<TopicCatalog> {
    self.get_json("/api/topics", &[]).await
  }

  pub async fn generate(
    &self,
    target: GenerationTarget,
    request: &GenerationRequest,
  ) -> ApiResult<GenerationReceipt> {
    match target {
      GenerationTarget::Flashcards => {
        let body = FlashcardGenerationBody {
          level: &request.level,
          topic: &request.topic,
          content: &request.content,
          flashcard_count: request.count,
        };
        self.post_json("/api/generate/flashcards", &body).await
      }
      GenerationTarget::Quiz => {
        let body = QuizGenerationBody {
          level: &request.level,
          topic: &request.topic,
          content: &request.content,
          question_count: request.count,
        };
        self.post_json("/api/generate/quiz", &body).await
      }
    }
  }

  // ==================== Study sessions ====================

  pub async fn start_study_session(
    &self,
    kind: SessionKind,
    level: &str,
    topic: &str,
  ) -> ApiResult<SessionTicket> {
    let body = SessionStartBody {
      session_type: kind,
      level,
      topic,
    };
    self.post_json("/api/study-session/start", &body).await
  }

  pub async fn end_study_session(&self, session_id: i64, tally: SessionTally) -> ApiResult<()> {
    let body = SessionEndBody { session_id, tally };
    let _: IgnoredAny = self.post_json("/api/study-session/end", &body).await?;
    Ok(())
  }

  pub async fn health(&self) -> ApiResult<Health> {
    self.get_json("/api/health", &[]).await
  }
}
