//! Route handlers.
//!
//! Every handler except `index` and `not_found` requires a `CurrentUser`.
//! Ids arrive as raw path segments; one that does not parse as a UUID is
//! reported exactly like an id that does not exist.

use crate::auth::CurrentUser;
use crate::error::WebError;
use crate::state::AppState;
use crate::views;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use learning_log_core::{EntryForm, EntryWrite, JournalError, TopicForm};
use uuid::Uuid;

pub async fn index() -> Html<String> {
    Html(views::index_page())
}

pub async fn topics(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>, WebError> {
    let topics = state.with_journal(|journal| journal.list_topics(&user))?;
    Ok(Html(views::topics_page(&topics)))
}

pub async fn topic(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(topic_id): Path<String>,
) -> Result<Html<String>, WebError> {
    let topic_id = parse_id(&topic_id)?;
    let view = state.with_journal(|journal| journal.view_topic(&user, topic_id))?;
    Ok(Html(views::topic_page(&view)))
}

pub async fn new_topic_form(CurrentUser(_user): CurrentUser) -> Html<String> {
    Html(views::new_topic_page("", &[]))
}

pub async fn new_topic(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<TopicForm>,
) -> Result<Response, WebError> {
    match state.with_journal(|journal| journal.create_topic(&user, form.text)) {
        Ok(_) => Ok(Redirect::to("/topics/").into_response()),
        Err(JournalError::Invalid(rejection)) => Ok(rerender(views::new_topic_page(
            &rejection.input,
            &rejection.errors,
        ))),
        Err(err) => Err(err.into()),
    }
}

pub async fn new_entry_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(topic_id): Path<String>,
) -> Result<Html<String>, WebError> {
    let topic_id = parse_id(&topic_id)?;
    let topic = state.with_journal(|journal| journal.topic_for_new_entry(&user, topic_id))?;
    Ok(Html(views::new_entry_page(&topic, "", &[])))
}

pub async fn new_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(topic_id): Path<String>,
    Form(form): Form<EntryForm>,
) -> Result<Response, WebError> {
    let topic_id = parse_id(&topic_id)?;
    state.with_journal(|journal| -> Result<Response, WebError> {
        match journal.create_entry(&user, topic_id, form.text) {
            Ok(write) => Ok(entry_written(&write)),
            Err(JournalError::Invalid(rejection)) => {
                let topic = journal.topic_for_new_entry(&user, topic_id)?;
                Ok(rerender(views::new_entry_page(
                    &topic,
                    &rejection.input,
                    &rejection.errors,
                )))
            }
            Err(err) => Err(err.into()),
        }
    })
}

pub async fn edit_entry_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(entry_id): Path<String>,
) -> Result<Html<String>, WebError> {
    let entry_id = parse_id(&entry_id)?;
    let context = state.with_journal(|journal| journal.entry_for_edit(&user, entry_id))?;
    Ok(Html(views::edit_entry_page(
        &context.topic,
        &context.entry,
        &context.entry.text,
        &[],
    )))
}

pub async fn edit_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(entry_id): Path<String>,
    Form(form): Form<EntryForm>,
) -> Result<Response, WebError> {
    let entry_id = parse_id(&entry_id)?;
    state.with_journal(|journal| -> Result<Response, WebError> {
        match journal.edit_entry(&user, entry_id, form.text) {
            Ok(context) => Ok(redirect_to_topic(context.topic.uuid)),
            Err(JournalError::Invalid(rejection)) => {
                let context = journal.entry_for_edit(&user, entry_id)?;
                Ok(rerender(views::edit_entry_page(
                    &context.topic,
                    &context.entry,
                    &rejection.input,
                    &rejection.errors,
                )))
            }
            Err(err) => Err(err.into()),
        }
    })
}

pub async fn delete_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(entry_id): Path<String>,
) -> Result<Response, WebError> {
    let entry_id = parse_id(&entry_id)?;
    let topic_uuid = state.with_journal(|journal| journal.delete_entry(&user, entry_id))?;
    Ok(redirect_to_topic(topic_uuid))
}

pub async fn not_found() -> WebError {
    WebError::NotFound
}

fn parse_id(raw: &str) -> Result<Uuid, WebError> {
    Uuid::parse_str(raw).map_err(|_| WebError::NotFound)
}

/// Saved and skipped writes answer alike: back to the topic view.
fn entry_written(write: &EntryWrite) -> Response {
    redirect_to_topic(write.topic_uuid())
}

fn redirect_to_topic(topic_id: Uuid) -> Response {
    Redirect::to(&format!("/topics/{topic_id}/")).into_response()
}

/// A rejected form is redisplayed with `200 OK`.
fn rerender(page: String) -> Response {
    (StatusCode::OK, Html(page)).into_response()
}
