use deadpool_postgres::Pool;
use redis::aio::ConnectionManager;
use std::time::Duration;
use crate::config::Config;
use crate::error::{AppError, Result};

/// The user agent sent with every outbound collaborator call.
/// Nominatim's usage policy requires an identifying agent.
pub const HTTP_USER_AGENT: &str = "hospital-finder";

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool.
    pub db: Pool,
    /// The Redis connection manager.
    pub redis: ConnectionManager,
    /// The shared HTTP client for outbound collaborator calls.
    pub http: reqwest::Client,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url)?;
        tracing::info!("✅ PostgreSQL pool initialized with deadpool-postgres");

        let redis_client = redis::Client::open(config.redis_url.as_str())?;
        let redis = ConnectionManager::new(redis_client).await?;
        tracing::info!("✅ Redis Connection Manager initialized (pooled)");

        let http = reqwest::Client::builder()
            .user_agent(HTTP_USER_AGENT)
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        tracing::info!("✅ Outbound HTTP client initialized");

        Ok(AppState {
            db,
            redis,
            http,
            config: config.clone(),
        })
    }
}
