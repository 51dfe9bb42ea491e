/// Database layer for Chirpy
///
/// Manages the SQLite connection pool, embedded migrations, and the typed
/// stores the rest of the server reads and writes through.

pub mod chirps;
pub mod models;
pub mod refresh_tokens;
pub mod users;

pub use chirps::ChirpStore;
pub use models::{Chirp, User};
pub use refresh_tokens::RefreshTokenStore;
pub use users::UserStore;

use crate::error::{ChirpError, ChirpResult};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Database connection options
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub max_connections: u32,
    pub enable_wal: bool,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            max_connections: 10,
            enable_wal: true,
        }
    }
}

/// Create a SQLite connection pool from a connection string
pub async fn create_pool(url: &str, options: DatabaseOptions) -> ChirpResult<SqlitePool> {
    let in_memory = url.contains(":memory:");

    let connect_options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(if options.enable_wal && !in_memory {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        })
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(5));

    // Every connection to ":memory:" is its own database
    let max_connections = if in_memory { 1 } else { options.max_connections };

    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    if in_memory {
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }

    let pool = pool_options.connect_with(connect_options).await?;

    Ok(pool)
}

/// Run migrations for a database
/// Migrations are embedded at compile time from ./migrations directory
pub async fn run_migrations(pool: &SqlitePool) -> ChirpResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| ChirpError::Internal(format!("Migration failed: {}", e)))?;

    Ok(())
}

/// Test database connection
pub async fn test_connection(pool: &SqlitePool) -> ChirpResult<()> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Map a unique-constraint violation to a conflict, anything else stays a database error
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> ChirpError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return ChirpError::Conflict(message.to_string());
        }
    }

    ChirpError::Database(err)
}

/// In-memory database with the schema applied
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = create_pool("sqlite::memory:", DatabaseOptions::default())
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
