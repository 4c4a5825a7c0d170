//! Shared helpers for the HTTP tests: an in-memory app and request builders.

#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{
        Request, Response, StatusCode,
        header::{ACCEPT, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
};
use jotter::{
    store::{CreateUserOutcome, MemorySessionStore, MemoryUserStore, UserStore},
    web::{self, AppState, WebConfig},
};
use std::sync::Arc;
use tower::ServiceExt;
use url::form_urlencoded;

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "correct horse";

pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryUserStore>,
    pub sessions: Arc<MemorySessionStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(WebConfig::default())
    }

    pub fn with_config(config: WebConfig) -> Self {
        let users = Arc::new(MemoryUserStore::new());
        let sessions = Arc::new(MemorySessionStore::new());
        let state = Arc::new(AppState::new(config, users.clone(), sessions.clone()));
        Self {
            router: web::app(state),
            users,
            sessions,
        }
    }

    /// App with one account (`EMAIL` / `PASSWORD`) already registered.
    pub async fn with_user() -> Result<Self> {
        let app = Self::new();
        match app.users.create_user(EMAIL, PASSWORD).await? {
            CreateUserOutcome::Created(_) => Ok(app),
            CreateUserOutcome::Conflict => anyhow::bail!("seed user already exists"),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Result<Response<Body>> {
        Ok(self.router.clone().oneshot(request).await?)
    }

    /// Log in with the seeded account and return the `name=value` cookie pair.
    pub async fn login_cookie(&self) -> Result<String> {
        let response = self
            .send(post_form("/login", &[("email", EMAIL), ("password", PASSWORD)], None)?)
            .await?;
        anyhow::ensure!(response.status() == StatusCode::FOUND, "login failed");
        cookie_pair(&response).context("login did not set a cookie")
    }
}

pub fn post_form(
    uri: &str,
    fields: &[(&str, &str)],
    accept: Option<&str>,
) -> Result<Request<Body>> {
    let body = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(accept) = accept {
        builder = builder.header(ACCEPT, accept);
    }
    Ok(builder.body(Body::from(body))?)
}

pub fn get(uri: &str, cookie: Option<&str>) -> Result<Request<Body>> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    Ok(builder.body(Body::empty())?)
}

pub fn post(uri: &str, cookie: Option<&str>) -> Result<Request<Body>> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    Ok(builder.body(Body::empty())?)
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
}

pub fn set_cookie(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
}

/// The `name=value` part of `Set-Cookie`, ready to send back as `Cookie`.
pub fn cookie_pair(response: &Response<Body>) -> Option<String> {
    set_cookie(response)
        .and_then(|cookie| cookie.split(';').next())
        .map(str::to_string)
}

pub async fn body_string(response: Response<Body>) -> Result<String> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

pub async fn body_json(response: Response<Body>) -> Result<serde_json::Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
