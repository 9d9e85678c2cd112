//! Entry domain model.

use super::now_epoch_ms;
use super::topic::TopicId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable entry identifier.
pub type EntryId = Uuid;

const SUMMARY_MAX_CHARS: usize = 50;

/// One timestamped note under a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub uuid: EntryId,
    /// Parent topic. Never changes after creation.
    pub topic_uuid: TopicId,
    /// Free-form body, replaced wholesale on edit.
    pub text: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Entry {
    /// Creates an entry under `topic_uuid` stamped with the current time.
    pub fn new(topic_uuid: TopicId, text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), topic_uuid, text, now_epoch_ms())
    }

    pub fn with_id(
        uuid: EntryId,
        topic_uuid: TopicId,
        text: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            uuid,
            topic_uuid,
            text: text.into(),
            created_at,
        }
    }

    /// Short form of the body: the first 50 characters, with `...` appended
    /// when anything was cut.
    pub fn summary(&self) -> String {
        let mut chars = self.text.chars();
        let head: String = chars.by_ref().take(SUMMARY_MAX_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Entry;
    use uuid::Uuid;

    #[test]
    fn short_body_summary_is_unchanged() {
        let entry = Entry::new(Uuid::new_v4(), "opening principles");
        assert_eq!(entry.summary(), "opening principles");
    }

    #[test]
    fn long_body_summary_is_truncated_on_char_boundary() {
        let body = "é".repeat(60);
        let entry = Entry::new(Uuid::new_v4(), body);
        let summary = entry.summary();
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), 53);
    }

    #[test]
    fn exactly_fifty_chars_is_not_marked_truncated() {
        let entry = Entry::new(Uuid::new_v4(), "x".repeat(50));
        assert_eq!(entry.summary(), "x".repeat(50));
    }
}
