//! HTTP surface for Learning Log.
//!
//! Maps the journal routes onto `JournalService` calls and renders the
//! results as server-side HTML. Authentication is delegated: the identity
//! arrives in a trusted request header set by the auth front end.

#![forbid(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod state;
pub mod views;

pub use auth::CurrentUser;
pub use config::{WebConfig, WebConfigError};
pub use error::WebError;
pub use state::AppState;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use std::time::Instant;

/// Builds the application router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/topics/", get(handlers::topics))
        .route("/topics/{topic_id}/", get(handlers::topic))
        .route(
            "/new_topic/",
            get(handlers::new_topic_form).post(handlers::new_topic),
        )
        .route(
            "/new_entry/{topic_id}/",
            get(handlers::new_entry_form).post(handlers::new_entry),
        )
        .route(
            "/edit_entry/{entry_id}/",
            get(handlers::edit_entry_form).post(handlers::edit_entry),
        )
        .route("/delete_entry/{entry_id}/", post(handlers::delete_entry))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(req: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    info!(
        "event=http_request module=web method={method} path={path} status={} duration_ms={}",
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
