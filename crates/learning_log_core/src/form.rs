//! Submitted form payloads and their field validation.
//!
//! # Responsibility
//! - Hold raw user input for the topic and entry forms.
//! - Turn raw input into cleaned values or a `Rejection` that keeps the
//!   original input for redisplay.
//!
//! # Invariants
//! - Surrounding whitespace is trimmed before any check; a whitespace-only
//!   value counts as empty.
//! - Length limits are measured in characters, not bytes.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default upper bound for topic labels, in characters.
pub const DEFAULT_MAX_TOPIC_LABEL_CHARS: usize = 200;

const TEXT_FIELD: &str = "text";

/// One failed constraint on a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required,
    TooLong { max: usize, actual: usize },
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "This field is required."),
            Self::TooLong { max, actual } => write!(
                f,
                "Ensure this value has at most {max} characters (it has {actual})."
            ),
        }
    }
}

/// Rejected form submission.
///
/// `input` is the raw value exactly as submitted, so the form can be
/// re-rendered with what the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub field: &'static str,
    pub input: String,
    pub errors: Vec<FieldError>,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`:", self.field)?;
        for error in &self.errors {
            write!(f, " {error}")?;
        }
        Ok(())
    }
}

impl Error for Rejection {}

/// New topic form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TopicForm {
    #[serde(default)]
    pub text: String,
}

impl TopicForm {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Returns the trimmed label, or a rejection when it is empty or longer
    /// than `max_chars`.
    pub fn clean(&self, max_chars: usize) -> Result<String, Rejection> {
        let trimmed = self.text.trim();
        let mut errors = Vec::new();
        if trimmed.is_empty() {
            errors.push(FieldError::Required);
        } else {
            let actual = trimmed.chars().count();
            if actual > max_chars {
                errors.push(FieldError::TooLong {
                    max: max_chars,
                    actual,
                });
            }
        }

        if errors.is_empty() {
            Ok(trimmed.to_string())
        } else {
            Err(Rejection {
                field: TEXT_FIELD,
                input: self.text.clone(),
                errors,
            })
        }
    }
}

/// New/edit entry form. Entry bodies carry no length bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EntryForm {
    #[serde(default)]
    pub text: String,
}

impl EntryForm {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn clean(&self) -> Result<String, Rejection> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            return Err(Rejection {
                field: TEXT_FIELD,
                input: self.text.clone(),
                errors: vec![FieldError::Required],
            });
        }
        Ok(trimmed.to_string())
    }
}
