use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

use crate::web::{
    session::get_user_id,
    state::AppState,
    templates::{IndexTemplate, render},
};

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Landing page", body = String, content_type = "text/html")
    ),
    tag = "notes"
)]
pub async fn root(headers: HeaderMap, state: Extension<Arc<AppState>>) -> Response {
    let user_email = match get_user_id(&headers, &state).await {
        Ok(Some(user_id)) => match state.users().get_user_by_id(user_id).await {
            Ok(user) => user.map(|user| user.email),
            Err(err) => {
                error!("Failed to lookup user: {err:#}");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        },
        Ok(None) => None,
        Err(err) => {
            error!("Failed to lookup session: {err:#}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    render(StatusCode::OK, &IndexTemplate { user_email })
}
