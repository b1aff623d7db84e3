//! Orchestration glue: drives the system under test around fixture setup and teardown

pub mod services;

pub use services::{ApiResponse, BackendClient, CreatedApiKey, CurrentUser, JobStatus, Scenario};
