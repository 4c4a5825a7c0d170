//! Server-rendered pages.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;
use url::form_urlencoded;

use super::validation::FieldErrors;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub redirect_to: String,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    pub focus_password: bool,
    pub join_href: String,
}

impl LoginTemplate {
    #[must_use]
    pub fn new(redirect_to: &str) -> Self {
        Self::with_errors("", redirect_to, FieldErrors::default())
    }

    #[must_use]
    pub fn with_errors(email: &str, redirect_to: &str, errors: FieldErrors) -> Self {
        Self {
            email: email.to_string(),
            redirect_to: redirect_to.to_string(),
            focus_password: focus_password(&errors),
            email_error: errors.email,
            password_error: errors.password,
            join_href: link_with_redirect("/join", redirect_to),
        }
    }
}

#[derive(Template)]
#[template(path = "join.html")]
pub struct JoinTemplate {
    pub email: String,
    pub redirect_to: String,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    pub focus_password: bool,
    pub login_href: String,
}

impl JoinTemplate {
    #[must_use]
    pub fn new(redirect_to: &str) -> Self {
        Self::with_errors("", redirect_to, FieldErrors::default())
    }

    #[must_use]
    pub fn with_errors(email: &str, redirect_to: &str, errors: FieldErrors) -> Self {
        Self {
            email: email.to_string(),
            redirect_to: redirect_to.to_string(),
            focus_password: focus_password(&errors),
            email_error: errors.email,
            password_error: errors.password,
            login_href: link_with_redirect("/login", redirect_to),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub user_email: Option<String>,
}

#[derive(Template)]
#[template(path = "notes.html")]
pub struct NotesTemplate {
    pub email: String,
}

/// Email keeps focus unless only the password failed.
fn focus_password(errors: &FieldErrors) -> bool {
    errors.email.is_none() && errors.password.is_some()
}

fn link_with_redirect(path: &str, redirect_to: &str) -> String {
    if redirect_to.is_empty() {
        return path.to_string();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("redirectTo", redirect_to)
        .finish();
    format!("{path}?{query}")
}

pub fn render<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => {
            error!("Failed to render template: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
