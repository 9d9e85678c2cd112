//! Core domain logic for Learning Log.
//! This crate is the single source of truth for ownership and form rules.

pub mod config;
pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AccessPolicy, ConfigError, JournalConfig};
pub use form::{EntryForm, FieldError, Rejection, TopicForm, DEFAULT_MAX_TOPIC_LABEL_CHARS};
pub use logging::{default_log_level, init_logging, logging_status, parse_level, LogError, LogOptions};
pub use model::entry::{Entry, EntryId};
pub use model::identity::Identity;
pub use model::topic::{Topic, TopicId};
pub use repo::journal_repo::{JournalRepository, RepoError, RepoResult, SqliteJournalRepository};
pub use service::journal_service::{
    authorize, EntryContext, EntryWrite, JournalError, JournalService, Missing, TopicView,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
