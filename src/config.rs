use std::env;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The URL of the Redis server.
    pub redis_url: String,
    /// The duration of a session in days.
    pub session_duration_days: i64,
    /// Base URL of the hosted-model inference API.
    pub model_api_url: String,
    /// Repository id of the hosted model.
    pub model_repo_id: String,
    /// API token for the hosted model.
    pub model_api_token: Zeroizing<String>,
    /// Base URL of the Nominatim geocoder.
    pub nominatim_url: String,
    /// URL of the Overpass API interpreter.
    pub overpass_url: String,
    /// Default hospital search radius in meters.
    pub hospital_radius_m: u32,
    /// Default cap on returned hospitals.
    pub hospital_limit: usize,
    /// Timeout applied to every outbound collaborator call, in seconds.
    pub upstream_timeout_secs: u64,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            session_duration_days: env::var("SESSION_DURATION_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .context("Invalid SESSION_DURATION_DAYS")?,
            model_api_url: env::var("HF_API_URL")
                .unwrap_or_else(|_| "https://api-inference.huggingface.co/models".to_string()),
            model_repo_id: env::var("HF_MODEL")
                .unwrap_or_else(|_| "google/flan-t5-large".to_string()),
            model_api_token: Zeroizing::new(
                env::var("HF_API_TOKEN").context("HF_API_TOKEN must be set")?,
            ),
            nominatim_url: env::var("NOMINATIM_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            overpass_url: env::var("OVERPASS_URL")
                .unwrap_or_else(|_| "https://overpass-api.de/api/interpreter".to_string()),
            hospital_radius_m: env::var("HOSPITAL_RADIUS_M")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .context("Invalid HOSPITAL_RADIUS_M")?,
            hospital_limit: env::var("HOSPITAL_LIMIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid HOSPITAL_LIMIT")?,
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid UPSTREAM_TIMEOUT_SECS")?,
        })
    }
}
