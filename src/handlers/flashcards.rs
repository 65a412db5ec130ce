//! Flashcard review handlers.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;

use crate::api::{ApiClient, LogOnError};
use crate::domain::{
  DeckFilter, DeckSource, Flashcard, ReviewQuality, SessionKind, SessionTally,
};
use crate::session::StudyContext;
use crate::state::AppState;
use crate::study::{FlashcardFlow, ReviewPhase, StudySession};

use super::templates::{
  FilterForm, FlashcardFragmentTemplate, FlashcardsTemplate, FlipForm, RateForm,
};
use super::views::{FilterOptions, FlashcardStatsView, FlashcardView};
use super::{
  close_tracking, fetch_topics, is_htmx_request, open_tracking, render, store_topics,
};

const NO_DUE_CARDS: &str = "No flashcards due for review!";
const NO_MATCHING_CARDS: &str = "No flashcards found for these filters";

/// Flashcard page: stats, filters and whatever the deck currently shows
pub async fn flashcards_page(State(state): State<AppState>, study: StudyContext) -> Html<String> {
  let (stats, topics) = tokio::join!(state.api.flashcard_stats(), fetch_topics(&state.api, &study));

  let mut guard = study.lock().await;
  let session: &mut StudySession = &mut guard;
  store_topics(session, topics);
  session.update_flashcard_stats(stats.log_warn("Failed to load flashcard stats"));

  let (level, topic) = match session.flashcards.review().map(|r| r.source()) {
    Some(DeckSource::Filtered(filter)) => (filter.level.as_deref(), filter.topic.as_deref()),
    _ => (None, None),
  };
  let template = FlashcardsTemplate {
    active: "flashcards",
    notices: session.notices.snapshot(),
    filters: FilterOptions::new(session.topics.as_ref(), level, topic),
    flashcard: FlashcardView::from_flow(&session.flashcards),
    stats: FlashcardStatsView::new(session.flashcard_stats.as_ref()),
  };
  render(&template)
}

/// Start a review of everything the scheduler says is due
pub async fn load_due(
  State(state): State<AppState>,
  study: StudyContext,
  headers: HeaderMap,
) -> Response {
  let mut guard = match study.try_lock() {
    Ok(guard) => guard,
    Err(busy) => return busy.into_response(),
  };
  let session: &mut StudySession = &mut guard;

  match state.api.due_flashcards(state.due_limit).await {
    Ok(cards) => replace_deck(&state.api, session, cards, DeckSource::Due).await,
    Err(e) => {
      tracing::warn!("Failed to load due flashcards: {}", e);
      session.notices.error("Error loading flashcards");
    }
  }

  flashcard_response(&headers, session)
}

/// Start a review of all cards matching the level/topic filters
pub async fn load_filtered(
  State(state): State<AppState>,
  study: StudyContext,
  headers: HeaderMap,
  Form(form): Form<FilterForm>,
) -> Response {
  let mut guard = match study.try_lock() {
    Ok(guard) => guard,
    Err(busy) => return busy.into_response(),
  };
  let session: &mut StudySession = &mut guard;

  let filter = DeckFilter::new(form.level, form.topic);
  match state.api.flashcards(&filter).await {
    Ok(cards) => replace_deck(&state.api, session, cards, DeckSource::Filtered(filter)).await,
    Err(e) => {
      tracing::warn!("Failed to load flashcards for {:?}: {}", filter, e);
      session.notices.error("Error loading flashcards");
    }
  }

  flashcard_response(&headers, session)
}

pub async fn flip_card(study: StudyContext, headers: HeaderMap, Form(form): Form<FlipForm>) -> Response {
  let mut guard = match study.try_lock() {
    Ok(guard) => guard,
    Err(busy) => return busy.into_response(),
  };
  let session: &mut StudySession = &mut guard;

  let flipped = session.flashcards.review_mut().and_then(|review| {
    review.rating_target(form.card_id)?;
    review.flip()
  });
  if let Err(e) = flipped {
    session.notices.error(e.to_string());
  }

  flashcard_response(&headers, session)
}

/// Record a rating; the deck only advances once the backend acknowledged it
pub async fn rate_card(
  State(state): State<AppState>,
  study: StudyContext,
  headers: HeaderMap,
  Form(form): Form<RateForm>,
) -> Response {
  let mut guard = match study.try_lock() {
    Ok(guard) => guard,
    Err(busy) => return busy.into_response(),
  };
  let session: &mut StudySession = &mut guard;

  let Some(quality) = ReviewQuality::from_u8(form.quality) else {
    tracing::warn!("Rejected review quality {}", form.quality);
    session.notices.error("Invalid rating");
    return flashcard_response(&headers, session);
  };

  let card_id = match session
    .flashcards
    .review_mut()
    .and_then(|review| review.rating_target(form.card_id))
  {
    Ok(id) => id,
    Err(e) => {
      session.notices.error(e.to_string());
      return flashcard_response(&headers, session);
    }
  };

  match state.api.review_flashcard(card_id, quality).await {
    Ok(ack) => tracing::debug!(
      "Card {} rated {}; next review {:?} ({:?} days)",
      card_id,
      quality.label(),
      ack.next_review,
      ack.interval_days
    ),
    Err(e) => {
      tracing::warn!("Failed to record review for card {}: {}", card_id, e);
      session.notices.error("Error recording review");
      return flashcard_response(&headers, session);
    }
  }

  if let Ok(review) = session.flashcards.review_mut() {
    match review.record_rating(card_id) {
      Ok(ReviewPhase::Complete) => {
        let tally = SessionTally {
          cards_reviewed: review.reviewed() as u32,
          ..Default::default()
        };
        close_tracking(&state.api, review.tracking_id(), tally).await;
        session.notices.success("Session complete!");
      }
      Ok(_) => {}
      Err(e) => tracing::warn!("Review for card {} acknowledged but not applied: {}", card_id, e),
    }
  }

  let stats = state.api.flashcard_stats().await;
  session.update_flashcard_stats(stats.log_warn("Failed to refresh flashcard stats"));

  flashcard_response(&headers, session)
}

/// Swap in a freshly loaded deck, closing tracking for one left unfinished
async fn replace_deck(
  api: &ApiClient,
  session: &mut StudySession,
  cards: Vec<Flashcard>,
  source: DeckSource,
) {
  if let Some(review) = session.flashcards.review().filter(|r| !r.is_complete()) {
    let tally = SessionTally {
      cards_reviewed: review.reviewed() as u32,
      ..Default::default()
    };
    close_tracking(api, review.tracking_id(), tally).await;
  }

  let empty_message = match source {
    DeckSource::Due => NO_DUE_CARDS,
    DeckSource::Filtered(_) => NO_MATCHING_CARDS,
  };
  let (level, topic) = source.tracking_labels();
  tracing::debug!("Loaded {} flashcards ({} / {})", cards.len(), level, topic);

  session.flashcards = FlashcardFlow::load(cards, source, empty_message);
  if let FlashcardFlow::Reviewing(review) = &mut session.flashcards {
    if let Some(id) = open_tracking(api, SessionKind::Flashcards, &level, &topic).await {
      review.set_tracking_id(id);
    }
  }
}

fn flashcard_response(headers: &HeaderMap, session: &StudySession) -> Response {
  if !is_htmx_request(headers) {
    return Redirect::to("/flashcards").into_response();
  }
  let template = FlashcardFragmentTemplate {
    notices: session.notices.snapshot(),
    flashcard: FlashcardView::from_flow(&session.flashcards),
    stats: FlashcardStatsView::new(session.flashcard_stats.as_ref()),
  };
  render(&template).into_response()
}
