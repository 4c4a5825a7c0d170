//! Login page: loader guard, form, and credential action.

use axum::{
    extract::{Extension, Form, Query, rejection::FormRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::{
    LOGIN_REDIRECT, errors_json,
    types::{LoginForm, RedirectQuery},
    wants_html,
};
use crate::web::{
    session::{create_user_session, get_user_id, redirect},
    state::AppState,
    templates::{LoginTemplate, render},
    validation::{
        ActionErrors, FieldErrors, INVALID_CREDENTIALS, remember_flag, safe_redirect,
        validate_credentials,
    },
};

#[utoipa::path(
    get,
    path = "/login",
    params(RedirectQuery),
    responses(
        (status = 200, description = "Login form", body = String, content_type = "text/html"),
        (status = 302, description = "Already signed in, redirected to `/`")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn loader(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    Query(query): Query<RedirectQuery>,
) -> Response {
    match get_user_id(&headers, &state).await {
        Ok(Some(_)) => return redirect("/", None),
        Ok(None) => {}
        Err(err) => {
            error!("Failed to lookup session: {err:#}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    let redirect_to = query.redirect_to.unwrap_or_default();
    render(StatusCode::OK, &LoginTemplate::new(&redirect_to))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Signed in; session cookie set and redirected to `redirectTo` or `/notes`"),
        (status = 400, description = "Validation or credential error", body = ActionErrors)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn action(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    // A body that cannot be decoded is treated as an empty form.
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!("Unreadable login form: {rejection}");
            LoginForm::default()
        }
    };

    let credentials = match validate_credentials(form.email.as_deref(), form.password.as_deref())
    {
        Ok(credentials) => credentials,
        Err(errors) => return failure(&headers, &form, errors),
    };

    let user = match state
        .users()
        .verify_login(&credentials.email, &credentials.password)
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("Login rejected");
            return failure(&headers, &form, FieldErrors::email(INVALID_CREDENTIALS));
        }
        Err(err) => {
            error!("Failed to verify login: {err:#}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    info!(user_id = %user.id, "Login succeeded");

    let redirect_to = safe_redirect(form.redirect_to.as_deref(), LOGIN_REDIRECT);
    create_user_session(
        &state,
        user.id,
        remember_flag(form.remember.as_deref()),
        &redirect_to,
    )
    .await
}

fn failure(headers: &HeaderMap, form: &LoginForm, errors: FieldErrors) -> Response {
    if !wants_html(headers) {
        return errors_json(errors);
    }

    let page = LoginTemplate::with_errors(
        form.email.as_deref().unwrap_or_default(),
        form.redirect_to.as_deref().unwrap_or_default(),
        errors,
    );
    render(StatusCode::BAD_REQUEST, &page)
}
