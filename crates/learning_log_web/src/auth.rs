//! Authenticated identity extraction.
//!
//! The login/session flow lives outside this service. A trusted front end
//! authenticates the user and forwards the username in a request header;
//! requests without it are sent to the login URL.

use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Redirect, Response};
use http::request::Parts;
use learning_log_core::Identity;

/// The caller's identity, required by every route except the home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub Identity);

/// Rejection for unauthenticated requests: `303` to the login URL.
#[derive(Debug)]
pub struct LoginRedirect {
    location: String,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&self.location).into_response()
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let config = state.web();
        identity_from_parts(parts, &config.identity_header)
            .map(CurrentUser)
            .ok_or_else(|| LoginRedirect {
                location: login_location(&config.login_url, requested_path(parts)),
            })
    }
}

/// Reads a non-blank username from `header`.
pub fn identity_from_parts(parts: &Parts, header: &str) -> Option<Identity> {
    parts
        .headers
        .get(header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(Identity::new)
}

/// Path plus query string, so the login round trip returns to the same view.
fn requested_path(parts: &Parts) -> &str {
    parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path(), |path_and_query| path_and_query.as_str())
}

fn login_location(login_url: &str, next: &str) -> String {
    format!("{login_url}?next={}", urlencoding::encode(next))
}
