//! Topic domain model.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another topic.
//! - `owner` is set at construction and never rewritten by storage.

use super::identity::Identity;
use super::now_epoch_ms;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable topic identifier.
pub type TopicId = Uuid;

/// A subject the owner keeps journal entries about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub uuid: TopicId,
    /// Short label shown in the topic list.
    pub text: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub owner: Identity,
}

impl Topic {
    /// Creates a topic with a generated id, stamped with the current time.
    pub fn new(owner: Identity, text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), owner, text, now_epoch_ms())
    }

    /// Creates a topic with caller-provided id and creation time.
    ///
    /// Used by storage read paths and tests that need fixed timestamps.
    pub fn with_id(
        uuid: TopicId,
        owner: Identity,
        text: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            uuid,
            text: text.into(),
            created_at,
            owner,
        }
    }

    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        &self.owner == identity
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
