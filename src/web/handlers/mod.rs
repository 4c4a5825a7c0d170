//! Route handlers for the account pages.

pub mod health;
pub mod join;
pub mod login;
pub mod logout;
pub mod notes;
pub mod root;
pub mod types;

use axum::{
    Json,
    http::{HeaderMap, StatusCode, header::ACCEPT},
    response::{IntoResponse, Response},
};

use super::validation::{ActionErrors, FieldErrors};

/// Where a successful login lands when no `redirectTo` was posted.
pub const LOGIN_REDIRECT: &str = "/notes";
/// Where a successful sign-up lands when no `redirectTo` was posted.
pub const JOIN_REDIRECT: &str = "/";

/// Browsers posting the form natively ask for HTML; script clients get JSON.
pub(crate) fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains("text/html"))
}

pub(crate) fn errors_json(errors: FieldErrors) -> Response {
    (StatusCode::BAD_REQUEST, Json(ActionErrors { errors })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn wants_html_follows_accept() {
        let mut headers = HeaderMap::new();
        assert!(!wants_html(&headers));

        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        assert!(!wants_html(&headers));

        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        assert!(wants_html(&headers));
    }
}
