//! Cookie sessions: issue, resolve, and clear.
//!
//! The cookie carries a random token; stores only ever see its SHA-256 hash.

use anyhow::{Context, Result};
use axum::{
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{COOKIE, InvalidHeaderValue, LOCATION, SET_COOKIE},
    },
    response::{IntoResponse, Response},
};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use tracing::{debug, error};
use url::form_urlencoded;
use uuid::Uuid;

use super::state::{AppState, WebConfig};

pub const SESSION_COOKIE_NAME: &str = "jotter_session";

/// Create a new session token for the auth cookie.
///
/// # Errors
/// Returns an error if the OS random source fails.
pub fn generate_session_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

#[must_use]
pub fn hash_session_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

/// Read the session token from the `Cookie` header, if any.
#[must_use]
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == SESSION_COOKIE_NAME)
                .then(|| val.trim().to_string())
                .filter(|val| !val.is_empty())
        })
}

/// Build a secure `HttpOnly` cookie for the session token.
///
/// Without `remember` the cookie has no `Max-Age` and dies with the browser session.
///
/// # Errors
/// Returns an error if the token contains characters not allowed in a header.
pub fn session_cookie(
    config: &WebConfig,
    token: &str,
    remember: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax");
    if remember {
        cookie.push_str(&format!("; Max-Age={}", config.session_ttl_seconds()));
    }
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// # Errors
/// Never in practice; the value is built from constants.
pub fn clear_session_cookie(config: &WebConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// `302 Found` to `location`, optionally setting a cookie.
#[must_use]
pub fn redirect(location: &str, cookie: Option<HeaderValue>) -> Response {
    let location =
        HeaderValue::from_str(location).unwrap_or_else(|_| HeaderValue::from_static("/"));
    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, location);
    if let Some(cookie) = cookie {
        headers.insert(SET_COOKIE, cookie);
    }
    (StatusCode::FOUND, headers).into_response()
}

/// Resolve the session cookie into a user id.
///
/// Returns `Ok(None)` when the cookie is missing, unknown, or expired.
///
/// # Errors
/// Returns an error if the session store fails.
pub async fn get_user_id(headers: &HeaderMap, state: &AppState) -> Result<Option<Uuid>> {
    let Some(token) = extract_session_token(headers) else {
        return Ok(None);
    };
    state
        .sessions()
        .lookup_session(&hash_session_token(&token))
        .await
}

/// Like [`get_user_id`], but anonymous requests are sent to the login page with
/// `redirectTo` pointing back at `path`.
///
/// # Errors
/// Returns the response to send instead of the page.
pub async fn require_user_id(
    headers: &HeaderMap,
    path: &str,
    state: &AppState,
) -> Result<Uuid, Response> {
    match get_user_id(headers, state).await {
        Ok(Some(user_id)) => Ok(user_id),
        Ok(None) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("redirectTo", path)
                .finish();
            Err(redirect(&format!("/login?{query}"), None))
        }
        Err(err) => {
            error!("Failed to lookup session: {err:#}");
            Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

/// Issue a session for `user_id` and redirect to `redirect_to`.
pub async fn create_user_session(
    state: &AppState,
    user_id: Uuid,
    remember: bool,
    redirect_to: &str,
) -> Response {
    let token = match generate_session_token() {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to generate session token: {err:#}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if let Err(err) = state
        .sessions()
        .insert_session(
            user_id,
            &hash_session_token(&token),
            state.config().session_ttl_seconds(),
        )
        .await
    {
        error!("Failed to insert session: {err:#}");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    match session_cookie(state.config(), &token, remember) {
        Ok(cookie) => {
            debug!(%user_id, remember, redirect_to, "session created");
            redirect(redirect_to, Some(cookie))
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Drop the server-side record (if any) and clear the cookie.
pub async fn destroy_session(headers: &HeaderMap, state: &AppState, redirect_to: &str) -> Response {
    if let Some(token) = extract_session_token(headers) {
        if let Err(err) = state
            .sessions()
            .delete_session(&hash_session_token(&token))
            .await
        {
            error!("Failed to delete session: {err:#}");
        }
    }

    // Always clear the cookie, even if the session record was missing.
    redirect(redirect_to, clear_session_cookie(state.config()).ok())
}
