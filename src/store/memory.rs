//! In-process stores for tests and `--memory-store` runs.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    CreateUserOutcome, SessionStore, User, UserStore, normalize_email,
    password::{hash_password, verify_dummy, verify_password},
};

struct UserRecord {
    user: User,
    password_hash: String,
}

#[derive(Default)]
pub struct MemoryUserStore {
    // keyed by normalized email
    users: Mutex<HashMap<String, UserRecord>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.lock().await;
        Ok(users
            .values()
            .find(|record| record.user.id == id)
            .map(|record| record.user.clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.lock().await;
        Ok(users
            .get(&normalize_email(email))
            .map(|record| record.user.clone()))
    }

    async fn create_user(&self, email: &str, password: &str) -> Result<CreateUserOutcome> {
        let email = normalize_email(email);
        // Hash before locking; the map is only held for the insert.
        let password_hash = hash_password(password)?;

        let mut users = self.users.lock().await;
        if users.contains_key(&email) {
            return Ok(CreateUserOutcome::Conflict);
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.clone(),
        };
        users.insert(
            email,
            UserRecord {
                user: user.clone(),
                password_hash,
            },
        );

        Ok(CreateUserOutcome::Created(user))
    }

    async fn verify_login(&self, email: &str, password: &str) -> Result<Option<User>> {
        let record = {
            let users = self.users.lock().await;
            users
                .get(&normalize_email(email))
                .map(|record| (record.user.clone(), record.password_hash.clone()))
        };

        let Some((user, password_hash)) = record else {
            verify_dummy(password);
            return Ok(None);
        };

        if verify_password(password, &password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

struct SessionRecord {
    user_id: Uuid,
    expires_at: Instant,
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<Vec<u8>, SessionRecord>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (non-expired) sessions.
    pub async fn active_sessions(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .lock()
            .await
            .values()
            .filter(|record| record.expires_at > now)
            .count()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert_session(
        &self,
        user_id: Uuid,
        token_hash: &[u8],
        ttl_seconds: i64,
    ) -> Result<()> {
        let ttl = Duration::from_secs(u64::try_from(ttl_seconds).unwrap_or(0));
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .with_context(|| format!("session ttl of {ttl_seconds}s is out of range"))?;

        let mut sessions = self.sessions.lock().await;
        // Drop expired records opportunistically.
        sessions.retain(|_, record| record.expires_at > now);
        sessions.insert(
            token_hash.to_vec(),
            SessionRecord {
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn lookup_session(&self, token_hash: &[u8]) -> Result<Option<Uuid>> {
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .get(token_hash)
            .filter(|record| record.expires_at > Instant::now())
            .map(|record| record.user_id))
    }

    async fn delete_session(&self, token_hash: &[u8]) -> Result<()> {
        self.sessions.lock().await.remove(token_hash);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_verify_login() -> Result<()> {
        let store = MemoryUserStore::new();
        let outcome = store.create_user(" Alice@Example.com", "hunter22hunter").await?;
        let CreateUserOutcome::Created(user) = outcome else {
            anyhow::bail!("expected user to be created");
        };
        assert_eq!(user.email, "alice@example.com");

        let verified = store
            .verify_login("alice@example.com", "hunter22hunter")
            .await?;
        assert_eq!(verified, Some(user.clone()));

        let wrong = store.verify_login("alice@example.com", "nope-nope-nope").await?;
        assert_eq!(wrong, None);

        let unknown = store.verify_login("bob@example.com", "hunter22hunter").await?;
        assert_eq!(unknown, None);

        assert_eq!(store.get_user_by_id(user.id).await?, Some(user));
        Ok(())
    }

    #[tokio::test]
    async fn create_user_conflicts_on_duplicate_email() -> Result<()> {
        let store = MemoryUserStore::new();
        store.create_user("carol@example.com", "password123").await?;
        let second = store.create_user("CAROL@example.com", "password456").await?;
        assert!(matches!(second, CreateUserOutcome::Conflict));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn lookups_do_not_wait_for_password_checks() -> Result<()> {
        let store = std::sync::Arc::new(MemoryUserStore::new());
        store.create_user("dave@example.com", "password123").await?;

        let verifier = {
            let store = store.clone();
            tokio::spawn(async move {
                for _ in 0..4 {
                    store.verify_login("dave@example.com", "password123").await?;
                }
                anyhow::Ok(())
            })
        };

        // The map lock is free while Argon2 runs, so plain lookups stay fast.
        for _ in 0..20 {
            let found = tokio::time::timeout(
                Duration::from_millis(200),
                store.get_user_by_email("dave@example.com"),
            )
            .await??;
            assert!(found.is_some());
        }

        verifier.await??;
        Ok(())
    }

    #[tokio::test]
    async fn session_round_trip_and_delete() -> Result<()> {
        let store = MemorySessionStore::new();
        let user_id = Uuid::new_v4();
        store.insert_session(user_id, b"hash", 60).await?;
        assert_eq!(store.lookup_session(b"hash").await?, Some(user_id));
        assert_eq!(store.lookup_session(b"other").await?, None);

        store.delete_session(b"hash").await?;
        assert_eq!(store.lookup_session(b"hash").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn expired_sessions_are_ignored() -> Result<()> {
        let store = MemorySessionStore::new();
        store.insert_session(Uuid::new_v4(), b"stale", 0).await?;
        assert_eq!(store.lookup_session(b"stale").await?, None);
        assert_eq!(store.active_sessions().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn out_of_range_ttl_is_an_error() -> Result<()> {
        let store = MemorySessionStore::new();
        let result = store.insert_session(Uuid::new_v4(), b"hash", i64::MAX).await;
        assert!(result.is_err());
        assert_eq!(store.lookup_session(b"hash").await?, None);
        Ok(())
    }
}
