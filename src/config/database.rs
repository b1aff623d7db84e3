use crate::core::{AppError, Result};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::env;

/// Connection settings for the fixture store
///
/// Every field has a default so a bare `cargo test` talks to the local
/// test database started by the compose stack.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5433,
            database: "docling_test".to_string(),
            user: "test_user".to_string(),
            password: "test_pass".to_string(),
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(DatabaseConfig {
            host: env::var("POSTGRES_HOST").unwrap_or(defaults.host),
            port: match env::var("POSTGRES_PORT") {
                Ok(port) => port
                    .parse()
                    .map_err(|_| AppError::Configuration("Invalid POSTGRES_PORT".to_string()))?,
                Err(_) => defaults.port,
            },
            database: env::var("POSTGRES_DB").unwrap_or(defaults.database),
            user: env::var("POSTGRES_USER").unwrap_or(defaults.user),
            password: env::var("POSTGRES_PASSWORD").unwrap_or(defaults.password),
        })
    }

    /// Build connect options for a single, unpooled connection
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }

    /// Connection target without the password, for log lines and diagnostics
    pub fn describe(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}
