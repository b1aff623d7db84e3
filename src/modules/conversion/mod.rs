//! Mock document-conversion API
//!
//! Emulates the external service's response shape, latency, and failure
//! modes, driven entirely by request parameters.

pub mod controllers;
pub mod models;
pub mod services;

pub use controllers::configure;
pub use models::{ContentClass, ConversionRequest, ConversionResult, ConvertParams};
pub use services::ConversionService;
