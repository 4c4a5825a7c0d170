//! # Jotter (notes web application)
//!
//! `jotter` serves the account pages of a notes application: a server-rendered
//! login form, a sign-up form, and the session cookie that ties later requests
//! to a user.
//!
//! ## Login flow
//!
//! - **Loader (`GET /login`):** a request that already carries a valid session is
//!   redirected to `/`; everyone else gets the form.
//! - **Action (`POST /login`):** fields are validated in order (email pattern,
//!   password present, password length) and the first failure is answered with a
//!   `400` and a field-scoped message. Valid input goes to the user store; a miss
//!   is reported as "Invalid email or password" so account existence never leaks.
//! - **Session:** on success a random token is issued in an `HttpOnly` cookie and
//!   only its SHA-256 hash is stored. The response redirects to `redirectTo`
//!   (same-origin paths only) or `/notes`.
//!
//! ## Stores
//!
//! Users and sessions live behind the [`store::UserStore`] and
//! [`store::SessionStore`] traits, backed by `PostgreSQL` in production and by
//! in-memory maps for tests and local runs.

pub mod cli;
pub mod store;
pub mod web;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
