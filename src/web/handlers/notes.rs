use axum::{
    extract::{Extension, OriginalUri},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, warn};

use crate::web::{
    session::{destroy_session, require_user_id},
    state::AppState,
    templates::{NotesTemplate, render},
};

#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "Notes landing page", body = String, content_type = "text/html"),
        (status = 302, description = "No session, redirected to `/login?redirectTo=...`")
    ),
    tag = "notes"
)]
pub async fn notes(
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    state: Extension<Arc<AppState>>,
) -> Response {
    let user_id = match require_user_id(&headers, uri.path(), &state).await {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    match state.users().get_user_by_id(user_id).await {
        Ok(Some(user)) => render(StatusCode::OK, &NotesTemplate { email: user.email }),
        Ok(None) => {
            // Session outlived its account.
            warn!(%user_id, "Session references a missing user");
            destroy_session(&headers, &state, "/").await
        }
        Err(err) => {
            error!("Failed to lookup user: {err:#}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
