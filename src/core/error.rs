use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::time::Duration;

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Generic message returned for faults the caller cannot act on
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred in the mock API";

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Malformed or missing upload input (4xx, never retried)
    #[error("Validation error: {message}")]
    Validation { code: &'static str, message: String },

    /// Failure requested by the caller through `simulate_error`
    #[error("Injected failure: {message}")]
    InjectedFailure { message: String, details: String },

    /// Fixture seeding failed
    #[error("Seed failure during {step}: {source}")]
    SeedFailure {
        step: String,
        #[source]
        source: Box<AppError>,
    },

    /// Fixture cleanup failed
    #[error("Clean failure during {step}: {source}")]
    CleanFailure {
        step: String,
        #[source]
        source: Box<AppError>,
    },

    /// Polled condition never became true
    #[error("{message} (attempts: {attempts}, elapsed: {elapsed:?})")]
    PollTimeout {
        message: String,
        attempts: u32,
        elapsed: Duration,
    },

    /// The polled check itself failed
    #[error("Poll check failed after {attempts} attempt(s): {source}")]
    PredicateFailed {
        attempts: u32,
        #[source]
        source: Box<AppError>,
    },

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Unexpected response from the system under test
    #[error("Unexpected response from {endpoint}: {status}")]
    UnexpectedResponse { endpoint: String, status: u16 },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal faults
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        match self {
            AppError::Validation { code, message } => {
                HttpResponse::build(status_code).json(serde_json::json!({
                    "error": code,
                    "message": message,
                }))
            }
            AppError::InjectedFailure { message, details } => {
                HttpResponse::build(status_code).json(serde_json::json!({
                    "error": "processing_failed",
                    "message": message,
                    "details": details,
                }))
            }
            _ => internal_error_response(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Generic 500 body used for every unexpected fault
pub fn internal_error_response() -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "internal_error",
        "message": INTERNAL_ERROR_MESSAGE,
    }))
}

// Helper functions for common error scenarios
impl AppError {
    pub fn no_file() -> Self {
        AppError::Validation {
            code: "no_file",
            message: "No file was uploaded".to_string(),
        }
    }

    pub fn injected_failure() -> Self {
        AppError::InjectedFailure {
            message: "Failed to process the uploaded document".to_string(),
            details: "The document format is not supported or the file is corrupted".to_string(),
        }
    }

    pub fn seed(step: impl Into<String>, source: AppError) -> Self {
        AppError::SeedFailure {
            step: step.into(),
            source: Box::new(source),
        }
    }

    pub fn clean(step: impl Into<String>, source: AppError) -> Self {
        AppError::CleanFailure {
            step: step.into(),
            source: Box::new(source),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
