//! User and session persistence.
//!
//! Handlers only talk to the [`UserStore`] and [`SessionStore`] traits. The
//! `PostgreSQL` implementations live in [`postgres`]; [`memory`] keeps everything
//! in process for tests and `--memory-store` runs.

pub mod memory;
pub mod password;
pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use memory::{MemorySessionStore, MemoryUserStore};
pub use postgres::{PgSessionStore, PgUserStore};

/// Public view of an account; the password hash never leaves the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

/// Outcome when attempting to create a new account.
#[derive(Debug)]
pub enum CreateUserOutcome {
    Created(User),
    Conflict,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Hash `password` and insert the account. Existing emails yield `Conflict`.
    async fn create_user(&self, email: &str, password: &str) -> Result<CreateUserOutcome>;

    /// Check credentials. Unknown emails and wrong passwords both return `Ok(None)`.
    async fn verify_login(&self, email: &str, password: &str) -> Result<Option<User>>;

    /// Cheap liveness probe used by `/health`.
    async fn ping(&self) -> Result<()>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_session(&self, user_id: Uuid, token_hash: &[u8], ttl_seconds: i64)
        -> Result<()>;

    /// Resolve a token hash to its user, ignoring expired records.
    async fn lookup_session(&self, token_hash: &[u8]) -> Result<Option<Uuid>>;

    async fn delete_session(&self, token_hash: &[u8]) -> Result<()>;
}

/// Normalize an email for lookup/uniqueness checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
