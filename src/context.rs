/// Application context and dependency injection
use crate::{
    auth::AccessTokenCodec,
    config::ServerConfig,
    db::{self, ChirpStore, RefreshTokenStore, UserStore},
    error::ChirpResult,
    metrics::Metrics,
    session::SessionManager,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub users: UserStore,
    pub chirps: ChirpStore,
    pub sessions: Arc<SessionManager>,
    pub metrics: Arc<Metrics>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ChirpResult<Self> {
        config.validate()?;

        let pool = db::create_pool(&config.storage.database_url, db::DatabaseOptions::default()).await?;
        db::run_migrations(&pool).await?;
        db::test_connection(&pool).await?;

        tracing::info!("database ready");

        Self::with_pool(config, pool)
    }

    /// Wire services around an already migrated pool
    pub fn with_pool(config: ServerConfig, pool: SqlitePool) -> ChirpResult<Self> {
        let users = UserStore::new(pool.clone());
        let chirps = ChirpStore::new(pool.clone());

        let sessions = Arc::new(SessionManager::new(
            users.clone(),
            RefreshTokenStore::new(pool.clone()),
            AccessTokenCodec::new(&config.authentication.jwt_secret),
        ));

        let metrics = Arc::new(Metrics::new()?);

        Ok(Self {
            config: Arc::new(config),
            db: pool,
            users,
            chirps,
            sessions,
            metrics,
        })
    }

    /// Get service URL
    pub fn service_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
