use crate::{
    cli::telemetry,
    store::{
        MemorySessionStore, MemoryUserStore, PgSessionStore, PgUserStore, SessionStore, UserStore,
    },
    web::{self, AppState, WebConfig},
};
use anyhow::{Context, Result};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{fmt, sync::Arc, time::Duration};
use tracing::{error, info, warn};
use url::Url;

pub enum StoreBackend {
    Postgres { dsn: String },
    Memory,
}

impl fmt::Debug for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres { dsn } => f
                .debug_struct("Postgres")
                .field("dsn", &redact_dsn(dsn))
                .finish(),
            Self::Memory => f.write_str("Memory"),
        }
    }
}

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub store: StoreBackend,
    pub base_url: String,
    pub session_ttl_seconds: i64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let (users, sessions): (Arc<dyn UserStore>, Arc<dyn SessionStore>) = match args.store {
        StoreBackend::Postgres { dsn } => {
            let pool = connect(&dsn).await?;
            (
                Arc::new(PgUserStore::new(pool.clone())),
                Arc::new(PgSessionStore::new(pool)),
            )
        }
        StoreBackend::Memory => {
            warn!("Using in-memory stores, accounts and sessions are lost on restart");
            (
                Arc::new(MemoryUserStore::new()),
                Arc::new(MemorySessionStore::new()),
            )
        }
    };

    let config = WebConfig::new(args.base_url).with_session_ttl_seconds(args.session_ttl_seconds);
    let state = Arc::new(AppState::new(config, users, sessions));

    let result = web::new(args.port, state, shutdown_signal()).await;

    telemetry::shutdown_tracer();

    result
}

/// Open the connection pool used by the `PostgreSQL` stores.
///
/// # Errors
/// Returns an error if the DSN is invalid or the database cannot be reached.
pub async fn connect(dsn: &str) -> Result<PgPool> {
    info!("Connecting to database: {}", redact_dsn(dsn));

    PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(dsn)
        .await
        .context("Failed to connect to database")
}

/// Hide the password of a DSN so it can be logged.
fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut url) => {
            if url.password().is_some() && url.set_password(Some("****")).is_err() {
                return "<redacted>".to_string();
            }
            url.to_string()
        }
        Err(_) => "<invalid dsn>".to_string(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("Shutdown signal received, draining connections");
}
