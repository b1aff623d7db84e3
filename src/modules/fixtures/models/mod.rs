pub mod fixture;

pub use fixture::{
    ApiKeyFixture, FixtureGraph, UserFixture, WebhookConfigFixture, CLEANUP_ORDER, SEEDED_TABLES,
    TEST_API_KEY,
};
