//! Journal access controller.
//!
//! # Responsibility
//! - Serve every topic/entry use-case for one authenticated identity.
//! - Gate each read and write on topic ownership through `authorize`.
//! - Validate form input and hand rejected input back for redisplay.
//!
//! # Invariants
//! - Ownership mismatches surface as `JournalError::NotFound`, the same
//!   error an absent id produces.
//! - Validation runs only after the ownership gate has passed.
//! - Topic lists are oldest first; entry lists are newest first.
//! - With the default `AccessPolicy`, `create_entry` re-reads the topic right
//!   before the insert and reports success without writing when the caller no
//!   longer owns it, and `delete_entry` performs no ownership check.

use crate::config::JournalConfig;
use crate::form::{EntryForm, Rejection, TopicForm};
use crate::model::entry::{Entry, EntryId};
use crate::model::identity::Identity;
use crate::model::topic::{Topic, TopicId};
use crate::repo::journal_repo::{JournalRepository, RepoError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The resource a caller asked for and may not see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Topic(TopicId),
    Entry(EntryId),
}

impl Display for Missing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Topic(id) => write!(f, "topic {id}"),
            Self::Entry(id) => write!(f, "entry {id}"),
        }
    }
}

/// Service error for journal use-cases.
#[derive(Debug)]
pub enum JournalError {
    /// Absent, or present but owned by someone else.
    NotFound(Missing),
    /// Form input failed validation; carries the input for redisplay.
    Invalid(Rejection),
    /// Persistence-layer failure.
    Store(RepoError),
}

impl Display for JournalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(missing) => write!(f, "not found: {missing}"),
            Self::Invalid(rejection) => write!(f, "{rejection}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for JournalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(rejection) => Some(rejection),
            Self::Store(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for JournalError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::EntryNotFound(id) => Self::NotFound(Missing::Entry(id)),
            other => Self::Store(other),
        }
    }
}

impl From<Rejection> for JournalError {
    fn from(value: Rejection) -> Self {
        Self::Invalid(value)
    }
}

impl From<Missing> for JournalError {
    fn from(value: Missing) -> Self {
        Self::NotFound(value)
    }
}

/// A topic together with its entries, newest entry first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicView {
    pub topic: Topic,
    pub entries: Vec<Entry>,
}

/// An entry together with the topic it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryContext {
    pub entry: Entry,
    pub topic: Topic,
}

/// Outcome of an accepted new-entry submission.
///
/// Both variants mean "redirect to the topic view"; `Skipped` is the
/// write-time owner re-check declining the insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryWrite {
    Saved(Entry),
    Skipped { topic_uuid: TopicId },
}

impl EntryWrite {
    pub fn topic_uuid(&self) -> TopicId {
        match self {
            Self::Saved(entry) => entry.topic_uuid,
            Self::Skipped { topic_uuid } => *topic_uuid,
        }
    }
}

/// The single ownership check used by every gate in this module.
pub fn authorize(identity: &Identity, topic: &Topic) -> Result<(), Missing> {
    if topic.is_owned_by(identity) {
        Ok(())
    } else {
        Err(Missing::Topic(topic.uuid))
    }
}

/// Journal service facade over repository implementations.
pub struct JournalService<R: JournalRepository> {
    repo: R,
    config: JournalConfig,
}

impl<R: JournalRepository> JournalService<R> {
    /// Creates a service with the default configuration.
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, JournalConfig::default())
    }

    pub fn with_config(repo: R, config: JournalConfig) -> Self {
        Self { repo, config }
    }

    /// Lists the caller's topics, oldest first.
    pub fn list_topics(&self, identity: &Identity) -> Result<Vec<Topic>, JournalError> {
        let topics = self.repo.list_topics_by_owner(identity)?;
        debug!(
            "event=topic_list module=service status=ok count={}",
            topics.len()
        );
        Ok(topics)
    }

    /// Loads one owned topic and its entries, newest first.
    pub fn view_topic(
        &self,
        identity: &Identity,
        topic_id: TopicId,
    ) -> Result<TopicView, JournalError> {
        let topic = self.owned_topic(identity, topic_id)?;
        let entries = self.repo.list_entries_by_topic(topic.uuid)?;
        Ok(TopicView { topic, entries })
    }

    /// Loads the owned topic a new entry would be added to.
    pub fn topic_for_new_entry(
        &self,
        identity: &Identity,
        topic_id: TopicId,
    ) -> Result<Topic, JournalError> {
        self.owned_topic(identity, topic_id)
    }

    /// Validates the label and persists a new topic owned by `identity`.
    pub fn create_topic(
        &self,
        identity: &Identity,
        label: impl Into<String>,
    ) -> Result<Topic, JournalError> {
        let form = TopicForm::new(label);
        let text = form
            .clean(self.config.max_topic_label_chars)
            .inspect_err(|_| {
                debug!("event=topic_create module=service status=invalid");
            })?;

        let topic = Topic::new(identity.clone(), text);
        self.repo.insert_topic(&topic)?;
        info!(
            "event=topic_create module=service status=ok topic={}",
            topic.uuid
        );
        Ok(topic)
    }

    /// Validates the body and appends an entry to an owned topic.
    pub fn create_entry(
        &self,
        identity: &Identity,
        topic_id: TopicId,
        body: impl Into<String>,
    ) -> Result<EntryWrite, JournalError> {
        let topic = self.owned_topic(identity, topic_id)?;
        let text = EntryForm::new(body).clean().inspect_err(|_| {
            debug!("event=entry_create module=service status=invalid topic={topic_id}");
        })?;

        if self.config.access.recheck_owner_before_entry_write {
            let current = self.repo.get_topic(topic.uuid)?;
            let still_owned = current
                .as_ref()
                .is_some_and(|current| authorize(identity, current).is_ok());
            if !still_owned {
                warn!(
                    "event=entry_create module=service status=skipped reason=owner_recheck_failed topic={topic_id}"
                );
                return Ok(EntryWrite::Skipped {
                    topic_uuid: topic.uuid,
                });
            }
        }

        let entry = Entry::new(topic.uuid, text);
        self.repo.insert_entry(&entry)?;
        info!(
            "event=entry_create module=service status=ok topic={} entry={}",
            topic.uuid, entry.uuid
        );
        Ok(EntryWrite::Saved(entry))
    }

    /// Loads an entry for the edit form, gated on its topic's owner.
    pub fn entry_for_edit(
        &self,
        identity: &Identity,
        entry_id: EntryId,
    ) -> Result<EntryContext, JournalError> {
        self.owned_entry(identity, entry_id)
    }

    /// Replaces the body of an owned entry in place.
    pub fn edit_entry(
        &self,
        identity: &Identity,
        entry_id: EntryId,
        new_body: impl Into<String>,
    ) -> Result<EntryContext, JournalError> {
        let EntryContext { mut entry, topic } = self.owned_entry(identity, entry_id)?;
        let text = EntryForm::new(new_body).clean().inspect_err(|_| {
            debug!("event=entry_edit module=service status=invalid entry={entry_id}");
        })?;

        self.repo.update_entry_text(entry.uuid, text.as_str())?;
        entry.text = text;
        info!(
            "event=entry_edit module=service status=ok topic={} entry={}",
            topic.uuid, entry.uuid
        );
        Ok(EntryContext { entry, topic })
    }

    /// Deletes an entry and returns its parent topic id.
    ///
    /// Ownership is only checked when
    /// `AccessPolicy::enforce_owner_on_delete` is set.
    pub fn delete_entry(
        &self,
        identity: &Identity,
        entry_id: EntryId,
    ) -> Result<TopicId, JournalError> {
        let topic_uuid = if self.config.access.enforce_owner_on_delete {
            self.owned_entry(identity, entry_id)?.topic.uuid
        } else {
            self.repo
                .get_entry(entry_id)?
                .ok_or(Missing::Entry(entry_id))?
                .topic_uuid
        };

        self.repo.delete_entry(entry_id)?;
        info!(
            "event=entry_delete module=service status=ok topic={topic_uuid} entry={entry_id} owner_checked={}",
            self.config.access.enforce_owner_on_delete
        );
        Ok(topic_uuid)
    }

    fn owned_topic(&self, identity: &Identity, topic_id: TopicId) -> Result<Topic, JournalError> {
        let topic = self
            .repo
            .get_topic(topic_id)?
            .ok_or(Missing::Topic(topic_id))?;
        authorize(identity, &topic).inspect_err(|_| {
            debug!("event=authorize module=service status=denied topic={topic_id}");
        })?;
        Ok(topic)
    }

    fn owned_entry(
        &self,
        identity: &Identity,
        entry_id: EntryId,
    ) -> Result<EntryContext, JournalError> {
        let entry = self
            .repo
            .get_entry(entry_id)?
            .ok_or(Missing::Entry(entry_id))?;
        let topic = self
            .repo
            .get_topic(entry.topic_uuid)?
            .ok_or(Missing::Entry(entry_id))?;
        authorize(identity, &topic).map_err(|_| {
            debug!("event=authorize module=service status=denied entry={entry_id}");
            Missing::Entry(entry_id)
        })?;
        Ok(EntryContext { entry, topic })
    }
}
