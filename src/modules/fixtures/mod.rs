//! Test-data lifecycle: seeding and cleaning the fixture graph

pub mod models;
pub mod repositories;
pub mod services;

pub use models::{FixtureGraph, CLEANUP_ORDER, SEEDED_TABLES, TEST_API_KEY};
pub use repositories::{with_session, DataStore, PgStore, QueryParam, StoreSession};
pub use services::{CleanReport, LifecycleManager, SeedReport};
