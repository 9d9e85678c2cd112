//! Controller configuration.
//!
//! # Responsibility
//! - Carry the form bounds and access policy the journal service runs with.
//!
//! # Invariants
//! - `JournalConfig::default()` reproduces the shipped behavior: write-time
//!   owner re-check on entry creation, and no owner check on entry delete.

use crate::form::DEFAULT_MAX_TOPIC_LABEL_CHARS;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Ownership gates that are policy rather than invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPolicy {
    /// Reload the topic right before inserting an entry and silently skip the
    /// write when the caller no longer owns it.
    pub recheck_owner_before_entry_write: bool,
    /// Gate `delete_entry` on topic ownership. Off by default: any
    /// authenticated identity may delete any entry by id.
    pub enforce_owner_on_delete: bool,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            recheck_owner_before_entry_write: true,
            enforce_owner_on_delete: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Upper bound for topic labels, in characters.
    pub max_topic_label_chars: usize,
    pub access: AccessPolicy,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            max_topic_label_chars: DEFAULT_MAX_TOPIC_LABEL_CHARS,
            access: AccessPolicy::default(),
        }
    }
}

impl JournalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_topic_label_chars == 0 {
            return Err(ConfigError::ZeroTopicLabelLimit);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroTopicLabelLimit,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroTopicLabelLimit => write!(f, "max_topic_label_chars must be at least 1"),
        }
    }
}

impl Error for ConfigError {}
