use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub harness: HarnessConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

/// Endpoints and credentials the orchestration layer drives
#[derive(Debug, Clone, Deserialize)]
pub struct HarnessConfig {
    pub base_url: String,
    pub api_url: String,
    pub mock_conversion_url: String,
    pub test_user_email: String,
    pub test_api_key: String,
    pub request_timeout: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_url: "http://localhost:8000".to_string(),
            mock_conversion_url: "http://localhost:8080".to_string(),
            test_user_email: "test@example.com".to_string(),
            test_api_key: "test-api-key-123".to_string(),
            request_timeout: Duration::from_millis(10_000),
        }
    }
}

impl HarnessConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(HarnessConfig {
            base_url: env::var("HARNESS_BASE_URL").unwrap_or(defaults.base_url),
            api_url: env::var("HARNESS_API_URL").unwrap_or(defaults.api_url),
            mock_conversion_url: env::var("HARNESS_MOCK_URL")
                .unwrap_or(defaults.mock_conversion_url),
            test_user_email: env::var("TEST_USER_EMAIL").unwrap_or(defaults.test_user_email),
            test_api_key: env::var("TEST_API_KEY").unwrap_or(defaults.test_api_key),
            request_timeout: match env::var("HARNESS_REQUEST_TIMEOUT_MS") {
                Ok(ms) => Duration::from_millis(ms.parse().map_err(|_| {
                    AppError::Configuration("Invalid HARNESS_REQUEST_TIMEOUT_MS".to_string())
                })?),
                Err(_) => defaults.request_timeout,
            },
        })
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "test".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            harness: HarnessConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "Worker count must be greater than 0".to_string(),
            ));
        }

        if self.server.max_upload_bytes == 0 {
            return Err(AppError::Configuration(
                "Upload limit must be greater than 0".to_string(),
            ));
        }

        if self.harness.request_timeout.is_zero() {
            return Err(AppError::Configuration(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
