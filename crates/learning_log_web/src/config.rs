//! HTTP layer configuration.

use http::HeaderName;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_IDENTITY_HEADER: &str = "x-remote-user";
pub const DEFAULT_LOGIN_URL: &str = "/users/login/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// Request header carrying the authenticated username. Must only be set
    /// by the trusted auth front end, which also owns CSRF protection for the
    /// POST forms.
    pub identity_header: String,
    /// Where unauthenticated requests are sent; `?next=<path>` is appended.
    pub login_url: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebConfigError {
    #[error("invalid identity header name `{0}`")]
    InvalidIdentityHeader(String),
    #[error("login url must not be empty")]
    EmptyLoginUrl,
}

impl WebConfig {
    pub fn validate(&self) -> Result<(), WebConfigError> {
        HeaderName::from_str(&self.identity_header)
            .map_err(|_| WebConfigError::InvalidIdentityHeader(self.identity_header.clone()))?;
        if self.login_url.trim().is_empty() {
            return Err(WebConfigError::EmptyLoginUrl);
        }
        Ok(())
    }
}
