//! Sign-up page.

use axum::{
    extract::{Extension, Form, Query, rejection::FormRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::{
    JOIN_REDIRECT, errors_json,
    types::{JoinForm, RedirectQuery},
    wants_html,
};
use crate::store::CreateUserOutcome;
use crate::web::{
    session::{create_user_session, get_user_id, redirect},
    state::AppState,
    templates::{JoinTemplate, render},
    validation::{ActionErrors, EMAIL_TAKEN, FieldErrors, safe_redirect, validate_credentials},
};

#[utoipa::path(
    get,
    path = "/join",
    params(RedirectQuery),
    responses(
        (status = 200, description = "Sign-up form", body = String, content_type = "text/html"),
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
    render(StatusCode::OK, &JoinTemplate::new(&redirect_to))
}

#[utoipa::path(
    post,
    path = "/join",
    request_body(content = JoinForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Account created; session cookie set and redirected to `redirectTo` or `/`"),
        (status = 400, description = "Validation error or email already registered", body = ActionErrors)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn action(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    form: Result<Form<JoinForm>, FormRejection>,
) -> Response {
    // A body that cannot be decoded is treated as an empty form.
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!("Unreadable join form: {rejection}");
            JoinForm::default()
        }
    };

    let credentials = match validate_credentials(form.email.as_deref(), form.password.as_deref())
    {
        Ok(credentials) => credentials,
        Err(errors) => return failure(&headers, &form, errors),
    };

    match state.users().get_user_by_email(&credentials.email).await {
        Ok(Some(_)) => return failure(&headers, &form, FieldErrors::email(EMAIL_TAKEN)),
        Ok(None) => {}
        Err(err) => {
            error!("Failed to lookup user: {err:#}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    // The lookup above is advisory; the insert is what enforces uniqueness.
    let user = match state
        .users()
        .create_user(&credentials.email, &credentials.password)
        .await
    {
        Ok(CreateUserOutcome::Created(user)) => user,
        Ok(CreateUserOutcome::Conflict) => {
            return failure(&headers, &form, FieldErrors::email(EMAIL_TAKEN));
        }
        Err(err) => {
            error!("Failed to create user: {err:#}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    info!(user_id = %user.id, "User created");

    let redirect_to = safe_redirect(form.redirect_to.as_deref(), JOIN_REDIRECT);
    create_user_session(&state, user.id, false, &redirect_to).await
}

fn failure(headers: &HeaderMap, form: &JoinForm, errors: FieldErrors) -> Response {
    if !wants_html(headers) {
        return errors_json(errors);
    }

    let page = JoinTemplate::with_errors(
        form.email.as_deref().unwrap_or_default(),
        form.redirect_to.as_deref().unwrap_or_default(),
        errors,
    );
    render(StatusCode::BAD_REQUEST, &page)
}
