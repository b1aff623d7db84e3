use crate::core::{AppError, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// HTTP server configuration for the mock conversion service
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub default_delay_ms: u64,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            workers: default_workers(),
            upload_dir: env::temp_dir().join("uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            default_delay_ms: DEFAULT_DELAY_MS,
        }
    }

    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(
            env::var("MOCK_CONVERSION_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            parse_var("MOCK_CONVERSION_PORT", 8080)?,
        );

        config.workers = parse_var("MOCK_WORKERS", config.workers)?;
        config.max_upload_bytes = parse_var("MOCK_MAX_UPLOAD_BYTES", config.max_upload_bytes)?;
        config.default_delay_ms = parse_var("MOCK_DEFAULT_DELAY_MS", config.default_delay_ms)?;
        if let Ok(dir) = env::var("MOCK_UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", name))),
        Err(_) => Ok(default),
    }
}
