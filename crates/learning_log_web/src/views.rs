//! Server-rendered HTML pages.
//!
//! Every piece of user-supplied text goes through `escape_html` before it is
//! written into markup.

use chrono::DateTime;
use learning_log_core::{Entry, FieldError, Topic, TopicView};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;

static PARAGRAPH_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("valid paragraph break regex"));

const ENTRY_DATE_FORMAT: &str = "%b %d, %Y %H:%M";

pub fn index_page() -> String {
    layout(
        "Learning Log",
        "<h1>Learning Log</h1>\n\
         <p>Learning Log helps you keep track of your learning, for any topic you're learning about.</p>",
    )
}

pub fn topics_page(topics: &[Topic]) -> String {
    let mut body = String::from("<h1>Topics</h1>\n<ul>\n");
    if topics.is_empty() {
        body.push_str("<li>No topics have been added yet.</li>\n");
    }
    for topic in topics {
        let _ = writeln!(
            body,
            "<li><a href=\"{}\">{}</a></li>",
            topic_href(topic),
            escape_html(&topic.text)
        );
    }
    body.push_str("</ul>\n<a href=\"/new_topic/\">Add a new topic</a>");
    layout("Topics", &body)
}

pub fn topic_page(view: &TopicView) -> String {
    let topic = &view.topic;
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<h1>Topic: {}</h1>\n<h2>Entries:</h2>\n<p><a href=\"/new_entry/{}/\">Add new entry</a></p>\n<ul>",
        escape_html(&topic.text),
        topic.uuid
    );
    if view.entries.is_empty() {
        body.push_str("<li>There are no entries for this topic yet.</li>\n");
    }
    for entry in &view.entries {
        let _ = writeln!(
            body,
            "<li>\n<p>{} \
             <a href=\"/edit_entry/{id}/\">Edit entry</a></p>\n\
             <form action=\"/delete_entry/{id}/\" method=\"post\"><button type=\"submit\">Delete entry</button></form>\n\
             {}\n</li>",
            format_entry_date(entry.created_at),
            linebreaks(&entry.text),
            id = entry.uuid
        );
    }
    body.push_str("</ul>");
    layout(&topic.text, &body)
}

pub fn new_topic_page(input: &str, errors: &[FieldError]) -> String {
    let body = format!(
        "<h1>Add a new topic:</h1>\n{}",
        text_form("/new_topic/", "input", input, errors, "Add topic")
    );
    layout("New topic", &body)
}

pub fn new_entry_page(topic: &Topic, input: &str, errors: &[FieldError]) -> String {
    let body = format!(
        "<p><a href=\"{}\">{}</a></p>\n<h1>Add a new entry:</h1>\n{}",
        topic_href(topic),
        escape_html(&topic.text),
        text_form(
            &format!("/new_entry/{}/", topic.uuid),
            "textarea",
            input,
            errors,
            "Add entry"
        )
    );
    layout("New entry", &body)
}

pub fn edit_entry_page(topic: &Topic, entry: &Entry, input: &str, errors: &[FieldError]) -> String {
    let body = format!(
        "<p><a href=\"{}\">{}</a></p>\n<h1>Edit entry:</h1>\n{}",
        topic_href(topic),
        escape_html(&topic.text),
        text_form(
            &format!("/edit_entry/{}/", entry.uuid),
            "textarea",
            input,
            errors,
            "Save changes"
        )
    );
    layout("Edit entry", &body)
}

pub fn not_found_page() -> String {
    layout("Not Found", "<h1>Not Found</h1>\n<p>The requested resource was not found on this server.</p>")
}

pub fn server_error_page() -> String {
    layout("Server Error", "<h1>Server Error (500)</h1>")
}

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Renders plain text as paragraphs: blank lines split paragraphs, single
/// newlines become `<br>`.
pub fn linebreaks(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    PARAGRAPH_BREAK_RE
        .split(normalized.trim())
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| format!("<p>{}</p>", escape_html(paragraph).replace('\n', "<br>")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats epoch milliseconds as e.g. `Jan 05, 2024 13:07` (UTC).
pub fn format_entry_date(epoch_ms: i64) -> String {
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|at| at.format(ENTRY_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn topic_href(topic: &Topic) -> String {
    format!("/topics/{}/", topic.uuid)
}

fn text_form(action: &str, widget: &str, input: &str, errors: &[FieldError], submit: &str) -> String {
    let mut html = format!("<form action=\"{action}\" method=\"post\">\n");
    if !errors.is_empty() {
        html.push_str("<ul class=\"errorlist\">\n");
        for error in errors {
            let _ = writeln!(html, "<li>{}</li>", escape_html(&error.to_string()));
        }
        html.push_str("</ul>\n");
    }
    let value = escape_html(input);
    if widget == "textarea" {
        let _ = writeln!(
            html,
            "<textarea name=\"text\" cols=\"80\" rows=\"10\">{value}</textarea>"
        );
    } else {
        let _ = writeln!(html, "<input type=\"text\" name=\"text\" value=\"{value}\">");
    }
    let _ = write!(html, "<button type=\"submit\">{submit}</button>\n</form>");
    html
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n\
         <nav><a href=\"/\">Learning Log</a> - <a href=\"/topics/\">Topics</a></nav>\n{body}\n</body>\n</html>\n",
        escape_html(title)
    )
}

#[cfg(test)]
mod tests {
    use super::{escape_html, format_entry_date, linebreaks, new_topic_page, topics_page};
    use learning_log_core::{FieldError, Identity, Topic};

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn linebreaks_splits_paragraphs_and_lines() {
        assert_eq!(
            linebreaks("one\ntwo\n\n\nthree\r\n"),
            "<p>one<br>two</p>\n<p>three</p>"
        );
    }

    #[test]
    fn linebreaks_escapes_before_inserting_markup() {
        assert_eq!(linebreaks("<b>bold</b>"), "<p>&lt;b&gt;bold&lt;/b&gt;</p>");
    }

    #[test]
    fn entry_date_uses_month_day_year_time() {
        assert_eq!(format_entry_date(1_704_460_020_000), "Jan 05, 2024 13:07");
    }

    #[test]
    fn empty_topic_list_has_placeholder() {
        assert!(topics_page(&[]).contains("No topics have been added yet."));
    }

    #[test]
    fn topic_labels_are_escaped_in_list() {
        let topic = Topic::new(Identity::new("alice"), "<script>");
        let html = topics_page(&[topic]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn rejected_form_echoes_input_and_errors() {
        let html = new_topic_page("\"quoted\"", &[FieldError::Required]);
        assert!(html.contains("value=\"&quot;quoted&quot;\""));
        assert!(html.contains("This field is required."));
    }
}
