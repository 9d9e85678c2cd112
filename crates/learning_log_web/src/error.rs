//! Error types for the HTTP layer.

use crate::views;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use learning_log_core::{JournalError, RepoError};
use log::error;
use thiserror::Error;

/// Failures a handler turns into an HTTP response.
#[derive(Debug, Error)]
pub enum WebError {
    /// Absent, foreign, or unparsable id. Always a bare 404.
    #[error("not found")]
    NotFound,

    #[error("journal store failure: {0}")]
    Store(#[source] RepoError),

    /// A broken handler contract, e.g. a form rejection that no handler
    /// turned into a redisplayed form.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JournalError> for WebError {
    fn from(value: JournalError) -> Self {
        match value {
            JournalError::NotFound(_) => Self::NotFound,
            JournalError::Store(err) => Self::Store(err),
            JournalError::Invalid(rejection) => {
                Self::Internal(format!("unhandled form rejection: {rejection}"))
            }
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("event=http_request module=web status=error error_code=internal error={self}");
            return (status, Html(views::server_error_page())).into_response();
        }
        (status, Html(views::not_found_page())).into_response()
    }
}
