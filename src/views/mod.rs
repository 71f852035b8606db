//! Server-rendered HTML pages.

use actix_session::Session;
use actix_web::http::{header::ContentType, StatusCode};
use actix_web::HttpResponse;

use crate::dto::FormErrors;
use crate::models::user::User;
use crate::utils::error::AppError;
use crate::utils::flash::{self, FlashMessage};

pub mod list_views;
pub mod user_views;

/// Per-request bits every page shows: the nav state and pending flash notices.
pub struct PageContext {
    username: Option<String>,
    flashes: Vec<FlashMessage>,
}

impl PageContext {
    /// Drains the session's flash queue.
    pub fn new(session: &Session, user: Option<&User>) -> Result<Self, AppError> {
        Ok(PageContext {
            username: user.map(|u| u.username.clone()),
            flashes: flash::take(session)?,
        })
    }

    fn anonymous() -> Self {
        PageContext {
            username: None,
            flashes: Vec::new(),
        }
    }
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn nav(ctx: &PageContext) -> String {
    let right = match &ctx.username {
        Some(username) => format!(
            r#"<a href="/list/new">New List</a> <a href="/account">{}</a> <a href="/logout">Logout</a>"#,
            escape(username)
        ),
        None => r#"<a href="/login">Login</a> <a href="/register">Register</a>"#.to_string(),
    };
    format!(
        r#"<nav><a href="/home">Home</a> <a href="/about">About</a> <a href="/contact">Contact</a> <span class="nav-right">{}</span></nav>"#,
        right
    )
}

fn layout(ctx: &PageContext, title: &str, body: &str) -> String {
    let flashes: String = ctx
        .flashes
        .iter()
        .map(|f| {
            format!(
                r#"<div class="alert alert-{}">{}</div>"#,
                f.level.as_str(),
                escape(&f.message)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>ToDo App - {title}</title>
<link rel="stylesheet" href="/static/main.css">
</head>
<body>
{nav}
<main>
{flashes}
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        nav = nav(ctx),
        flashes = flashes,
        body = body,
    )
}

pub fn render(ctx: &PageContext, title: &str, body: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(layout(ctx, title, body))
}

pub fn error_page(status: StatusCode, heading: &str, message: &str) -> HttpResponse {
    let body = format!("<h1>{}</h1><p>{}</p>", escape(heading), escape(message));
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(layout(&PageContext::anonymous(), heading, &body))
}

fn field_errors(name: &str, errors: &FormErrors) -> String {
    errors
        .field(name)
        .iter()
        .map(|e| format!(r#"<div class="invalid-feedback">{}</div>"#, escape(e)))
        .collect()
}

/// A labelled `<input>` followed by its validation messages.
pub(crate) fn input(kind: &str, name: &str, label: &str, value: &str, errors: &FormErrors) -> String {
    let class = if errors.field(name).is_empty() { "form-control" } else { "form-control is-invalid" };
    // never echo passwords back
    let value = if kind == "password" { "" } else { value };
    format!(
        r#"<div class="form-group"><label for="{name}">{label}</label><input type="{kind}" id="{name}" name="{name}" class="{class}" value="{value}">{errors}</div>"#,
        name = name,
        label = escape(label),
        kind = kind,
        class = class,
        value = escape(value),
        errors = field_errors(name, errors),
    )
}

pub(crate) fn textarea(name: &str, label: &str, value: &str, errors: &FormErrors) -> String {
    let class = if errors.field(name).is_empty() { "form-control" } else { "form-control is-invalid" };
    format!(
        r#"<div class="form-group"><label for="{name}">{label}</label><textarea id="{name}" name="{name}" class="{class}">{value}</textarea>{errors}</div>"#,
        name = name,
        label = escape(label),
        class = class,
        value = escape(value),
        errors = field_errors(name, errors),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn password_inputs_are_never_prefilled() {
        let html = input("password", "password", "Password", "hunter2", &FormErrors::default());

        assert!(!html.contains("hunter2"));
    }

    #[test]
    fn invalid_inputs_show_their_errors() {
        let mut errors = FormErrors::default();
        errors.add("email", "Invalid email address.");

        let html = input("email", "email", "Email", "nope", &errors);

        assert!(html.contains("is-invalid"));
        assert!(html.contains("Invalid email address."));
    }
}
