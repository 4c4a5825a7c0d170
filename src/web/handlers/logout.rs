use axum::{
    extract::Extension,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::web::{
    session::{destroy_session, redirect},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 302, description = "Session cleared, redirected to `/`")
    ),
    tag = "auth"
)]
pub async fn logout(headers: HeaderMap, state: Extension<Arc<AppState>>) -> Response {
    destroy_session(&headers, &state, "/").await
}

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 302, description = "Nothing to render, redirected to `/`")
    ),
    tag = "auth"
)]
pub async fn loader() -> impl IntoResponse {
    redirect("/", None)
}
