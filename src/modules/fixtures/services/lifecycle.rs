use crate::config::DatabaseConfig;
use crate::core::{AppError, Result};
use crate::modules::fixtures::models::{FixtureGraph, CLEANUP_ORDER, SEEDED_TABLES};
use crate::modules::fixtures::repositories::{with_session, DataStore, PgStore, QueryParam};
use std::sync::Arc;
use tracing::{error, info};

const INSERT_USER: &str = r#"
    INSERT INTO users (id, email, created_at, updated_at)
    VALUES ($1, $2, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
    ON CONFLICT (email) DO NOTHING
"#;

const INSERT_API_KEY: &str = r#"
    INSERT INTO api_keys (id, user_id, name, key_hash, created_at, is_active)
    VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP, $5)
    ON CONFLICT (id) DO NOTHING
"#;

const INSERT_WEBHOOK_CONFIG: &str = r#"
    INSERT INTO webhook_configs (id, user_id, url, secret, is_active, created_at)
    VALUES ($1, $2, $3, $4, $5, CURRENT_TIMESTAMP)
    ON CONFLICT (id) DO NOTHING
"#;

/// Rows inserted by one `seed()` call; zero means the row already existed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: u64,
    pub api_keys: u64,
    pub webhook_configs: u64,
}

/// Rows deleted per table by one `clean()` call, in deletion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub deleted: Vec<(&'static str, u64)>,
}

impl CleanReport {
    pub fn total(&self) -> u64 {
        self.deleted.iter().map(|(_, rows)| rows).sum()
    }
}

/// Brings the store to the fixture state and back to empty
///
/// Each operation opens its own connection and releases it on every exit
/// path, so back-to-back calls never leak connections.
#[derive(Clone)]
pub struct LifecycleManager {
    store: Arc<dyn DataStore>,
    graph: FixtureGraph,
}

impl LifecycleManager {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            graph: FixtureGraph::default(),
        }
    }

    pub fn postgres(config: DatabaseConfig) -> Self {
        Self::new(Arc::new(PgStore::new(config)))
    }

    pub fn graph(&self) -> &FixtureGraph {
        &self.graph
    }

    /// Insert the user, then the API key and webhook config it owns
    ///
    /// Safe to repeat: rows that already exist are skipped. Partial inserts
    /// are not rolled back on failure.
    pub async fn seed(&self) -> Result<SeedReport> {
        let graph = self.graph.clone();
        info!(target_db = %self.store.describe(), "Seeding test database");

        let report = with_session(self.store.as_ref(), move |session| {
            Box::pin(async move {
                let mut report = SeedReport::default();

                report.users = session
                    .query(
                        INSERT_USER,
                        &[graph.user.id.into(), graph.user.email.into()],
                    )
                    .await
                    .map_err(|e| AppError::seed("insert into users", e))?;

                report.api_keys = session
                    .query(
                        INSERT_API_KEY,
                        &[
                            graph.api_key.id.into(),
                            graph.api_key.user_id.into(),
                            graph.api_key.name.into(),
                            graph.api_key.key_hash.into(),
                            graph.api_key.is_active.into(),
                        ],
                    )
                    .await
                    .map_err(|e| AppError::seed("insert into api_keys", e))?;

                report.webhook_configs = session
                    .query(
                        INSERT_WEBHOOK_CONFIG,
                        &[
                            graph.webhook.id.into(),
                            graph.webhook.user_id.into(),
                            graph.webhook.url.into(),
                            graph.webhook.secret.into(),
                            graph.webhook.is_active.into(),
                        ],
                    )
                    .await
                    .map_err(|e| AppError::seed("insert into webhook_configs", e))?;

                Ok(report)
            })
        })
        .await
        .map_err(|e| match e {
            AppError::SeedFailure { .. } => e,
            other => AppError::seed("store connection", other),
        });

        match &report {
            Ok(report) => info!(
                users = report.users,
                api_keys = report.api_keys,
                webhook_configs = report.webhook_configs,
                "Test database seeded successfully"
            ),
            Err(e) => error!(error = %e, "Error seeding database"),
        }

        report
    }

    /// Delete every fixture-owned row, dependents before owners
    ///
    /// A no-op on an already empty store.
    pub async fn clean(&self) -> Result<CleanReport> {
        info!(target_db = %self.store.describe(), "Cleaning test database");

        let report = with_session(self.store.as_ref(), |session| {
            Box::pin(async move {
                let mut report = CleanReport::default();
                for table in CLEANUP_ORDER {
                    let statement = format!("DELETE FROM {}", table);
                    let rows = session
                        .query(&statement, &[])
                        .await
                        .map_err(|e| AppError::clean(format!("delete from {}", table), e))?;
                    report.deleted.push((table, rows));
                }
                Ok(report)
            })
        })
        .await
        .map_err(|e| match e {
            AppError::CleanFailure { .. } => e,
            other => AppError::clean("store connection", other),
        });

        match &report {
            Ok(report) => info!(rows = report.total(), "Test database cleaned successfully"),
            Err(e) => error!(error = %e, "Error cleaning database"),
        }

        report
    }

    /// Row counts of the seeded tables
    pub async fn fixture_counts(&self) -> Result<Vec<(&'static str, i64)>> {
        with_session(self.store.as_ref(), |session| {
            Box::pin(async move {
                let mut counts = Vec::with_capacity(SEEDED_TABLES.len());
                for table in SEEDED_TABLES {
                    counts.push((table, session.count(table).await?));
                }
                Ok(counts)
            })
        })
        .await
    }
}
