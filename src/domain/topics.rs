use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Level → topics mapping used to populate filter controls
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TopicCatalog {
  #[serde(default)]
  pub topics: BTreeMap<String, Vec<String>>,
}

impl TopicCatalog {
  pub fn levels(&self) -> Vec<String> {
    self.topics.keys().cloned().collect()
  }

  /// Union of topics across all levels, de-duplicated and sorted
  pub fn all_topics(&self) -> Vec<String> {
    self
      .topics
      .values()
      .flatten()
      .cloned()
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect()
  }
}
