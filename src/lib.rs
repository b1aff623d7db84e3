//! Integration-test harness for the document-processing stack
//!
//! Provides the mock conversion service, the fixture lifecycle manager, the
//! completion poller, and the orchestration glue that ties them together.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

use actix_web::web;

// Re-export commonly used types
pub use modules::conversion;
pub use modules::fixtures;
pub use modules::harness;
pub use modules::polling;

/// Register every route of the mock conversion service
pub fn configure(cfg: &mut web::ServiceConfig) {
    modules::health::configure(cfg);
    modules::conversion::configure(cfg);
}
