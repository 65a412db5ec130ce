//! Per-session notification queue.
//!
//! Notices replace blocking alerts: they are appended by handlers, rendered
//! on the next response and stay until dismissed or pushed out by newer ones.

use std::collections::VecDeque;

use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
  Success,
  Error,
}

impl NoticeLevel {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Success => "success",
      Self::Error => "error",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub id: u64,
  pub level: NoticeLevel,
  pub message: String,
}

impl Notice {
  pub fn css_class(&self) -> &'static str {
    self.level.as_str()
  }
}

#[derive(Debug, Clone)]
pub struct Notifications {
  next_id: u64,
  capacity: usize,
  items: VecDeque<Notice>,
}

impl Default for Notifications {
  fn default() -> Self {
    Self::with_capacity(config::MAX_NOTICES)
  }
}

impl Notifications {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      next_id: 1,
      capacity: capacity.max(1),
      items: VecDeque::new(),
    }
  }

  /// Append a notice, dropping the oldest beyond capacity. Returns its id.
  pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> u64 {
    let id = self.next_id;
    self.next_id += 1;
    self.items.push_back(Notice {
      id,
      level,
      message: message.into(),
    });
    while self.items.len() > self.capacity {
      self.items.pop_front();
    }
    id
  }

  pub fn success(&mut self, message: impl Into<String>) -> u64 {
    self.push(NoticeLevel::Success, message)
  }

  pub fn error(&mut self, message: impl Into<String>) -> u64 {
    self.push(NoticeLevel::Error, message)
  }

  /// Remove a notice; false if it was already gone
  pub fn dismiss(&mut self, id: u64) -> bool {
    let before = self.items.len();
    self.items.retain(|n| n.id != id);
    self.items.len() != before
  }

  /// Owned copy for templates
  pub fn snapshot(&self) -> Vec<Notice> {
    self.items.iter().cloned().collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_push_assigns_increasing_ids() {
    let mut notices = Notifications::default();
    let a = notices.error("Error loading quiz");
    let b = notices.success("No flashcards due for review!");
    assert!(b > a);
    assert_eq!(notices.snapshot().last().map(|n| n.level), Some(NoticeLevel::Success));
  }

  #[test]
  fn test_capacity_drops_oldest() {
    let mut notices = Notifications::with_capacity(2);
    notices.error("one");
    notices.error("two");
    notices.error("three");
    let messages: Vec<_> = notices.snapshot().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["two", "three"]);
  }

  #[test]
  fn test_dismiss() {
    let mut notices = Notifications::default();
    let id = notices.error("Error recording review");
    assert_eq!(notices.snapshot()[0].message, "Error recording review");
    assert!(notices.dismiss(id));
    assert!(!notices.dismiss(id));
    assert!(notices.snapshot().is_empty());
  }
}
