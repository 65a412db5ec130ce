pub mod card;
pub mod generation;
pub mod quiz;
pub mod review;
pub mod stats;
pub mod topics;

pub use card::{DeckFilter, DeckSource, Flashcard};
pub use generation::{GenerationReceipt, GenerationRequest, GenerationTarget};
pub use quiz::{
  AnswerOutcome, AnswerSubmission, OptionLabel, Question, QuizRequest, QuizScore, RecordedAnswer,
};
pub use review::{ReviewAck, ReviewQuality};
pub use stats::{
  FlashcardStats, OverallProgress, QuizStats, Recommendations, SessionKind, SessionTally, Streak,
  TopicProgress, WeakTopic,
};
pub use topics::TopicCatalog;

use serde::{Deserialize, Deserializer};

/// Backend columns are nullable; `null` decodes like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
