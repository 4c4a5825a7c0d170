//! Sign-up, logout, the `/notes` guard and the pages around them.

mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{
    EMAIL, PASSWORD, TestApp, body_json, body_string, cookie_pair, get, location, post,
    post_form, set_cookie,
};
use jotter::store::UserStore;
use serde_json::json;

#[tokio::test]
async fn join_creates_account_and_signs_in() -> Result<()> {
    let app = TestApp::new();
    let response = app
        .send(post_form(
            "/join",
            &[("email", EMAIL), ("password", PASSWORD)],
            None,
        )?)
        .await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/"));
    assert!(set_cookie(&response).is_some_and(|cookie| !cookie.contains("Max-Age")));

    let cookie = cookie_pair(&response).unwrap_or_default();
    let home = app.send(get("/", Some(&cookie))?).await?;
    assert!(body_string(home).await?.contains("View Notes for ada@example.com"));

    assert!(app.users.get_user_by_email(EMAIL).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn join_rejects_taken_email() -> Result<()> {
    let app = TestApp::with_user().await?;
    let response = app
        .send(post_form(
            "/join",
            &[("email", "Ada@Example.com"), ("password", "another password")],
            None,
        )?)
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await?,
        json!({"errors": {"email": "A user already exists with this email", "password": null}})
    );
    Ok(())
}

#[tokio::test]
async fn join_validates_like_login() -> Result<()> {
    let app = TestApp::new();
    let response = app
        .send(post_form(
            "/join",
            &[("email", EMAIL), ("password", "short")],
            None,
        )?)
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await?["errors"]["password"],
        json!("Password is too short")
    );
    assert!(app.users.get_user_by_email(EMAIL).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn join_page_links_back_to_login() -> Result<()> {
    let app = TestApp::new();
    let response = app.send(get("/join?redirectTo=%2Fnotes", None)?).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await?;
    assert!(body.contains("Create Account"));
    assert!(body.contains(r#"autocomplete="new-password""#));
    assert!(body.contains("/login?redirectTo=%2Fnotes"));
    Ok(())
}

#[tokio::test]
async fn signed_in_visitor_skips_join() -> Result<()> {
    let app = TestApp::with_user().await?;
    let cookie = app.login_cookie().await?;

    let response = app.send(get("/join", Some(&cookie))?).await?;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/"));
    Ok(())
}

#[tokio::test]
async fn notes_requires_a_session() -> Result<()> {
    let app = TestApp::new();
    let response = app.send(get("/notes", None)?).await?;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/login?redirectTo=%2Fnotes"));
    Ok(())
}

#[tokio::test]
async fn logout_clears_cookie_and_session() -> Result<()> {
    let app = TestApp::with_user().await?;
    let cookie = app.login_cookie().await?;
    assert_eq!(app.sessions.active_sessions().await, 1);

    let response = app.send(post("/logout", Some(&cookie))?).await?;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/"));
    assert!(set_cookie(&response).is_some_and(|cookie| cookie.contains("Max-Age=0")));
    assert_eq!(app.sessions.active_sessions().await, 0);

    // The old cookie no longer opens the notes page.
    let notes = app.send(get("/notes", Some(&cookie))?).await?;
    assert_eq!(notes.status(), StatusCode::FOUND);
    Ok(())
}

#[tokio::test]
async fn logout_without_session_still_redirects() -> Result<()> {
    let app = TestApp::new();
    let response = app.send(post("/logout", None)?).await?;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/"));

    let response = app.send(get("/logout", None)?).await?;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(set_cookie(&response).is_none());
    Ok(())
}

#[tokio::test]
async fn index_for_anonymous_visitors() -> Result<()> {
    let app = TestApp::new();
    let response = app.send(get("/", None)?).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await?;
    assert!(body.contains(r#"href="/join""#));
    assert!(body.contains(r#"href="/login""#));
    Ok(())
}

#[tokio::test]
async fn health_reports_build_and_store() -> Result<()> {
    let app = TestApp::new();
    let response = app.send(get("/health", None)?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-app"));
    assert!(response.headers().contains_key("x-request-id"));

    let body = body_json(response).await?;
    assert_eq!(body["name"], json!("jotter"));
    assert_eq!(body["database"], json!("ok"));
    Ok(())
}

#[tokio::test]
async fn join_with_unreadable_body_is_a_field_error() -> Result<()> {
    use axum::{body::Body, http::Request};

    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/join")
        .body(Body::from("email=ada%40example.com&password=correct+horse"))?;

    let response = app.send(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await?["errors"]["email"],
        json!("Email is invalid")
    );
    assert!(app.users.get_user_by_email(EMAIL).await?.is_none());
    Ok(())
}
