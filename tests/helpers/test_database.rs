// Test Database Helpers
//
// Connection management for fixture lifecycle tests. Uses a real Postgres
// reached through the same POSTGRES_* variables the harness reads.

use docproc_harness::config::DatabaseConfig;
use docproc_harness::fixtures::LifecycleManager;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Database settings for tests
///
/// # Behavior
/// - Loads `.env` if present
/// - Reads POSTGRES_HOST / PORT / DB / USER / PASSWORD
/// - Falls back to localhost:5433/docling_test
pub fn test_database_config() -> DatabaseConfig {
    dotenvy::dotenv().ok();
    DatabaseConfig::from_env().unwrap_or_else(|e| panic!("Invalid test database config: {}", e))
}

/// Create a Postgres pool against the test database and apply migrations
///
/// # Behavior
/// - Panics with troubleshooting steps if the database is unreachable
/// - Runs `./migrations` so the fixture tables exist
///
/// # Example
/// ```no_run
/// #[tokio::test]
/// #[ignore]
/// async fn test_database() {
///     let pool = create_test_pool().await;
///     let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();
///     assert_eq!(one, 1);
/// }
/// ```
pub async fn create_test_pool() -> PgPool {
    let config = test_database_config();

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect_with(config.connect_options())
        .await
        .unwrap_or_else(|e| {
            panic!(
                "Failed to connect to test database at {}: {}\n\n\
                 Troubleshooting:\n\
                 1. Ensure Postgres is running (docker compose up postgres)\n\
                 2. Verify POSTGRES_HOST / POSTGRES_PORT / POSTGRES_DB are set correctly\n\
                 3. Check the test user's credentials and permissions",
                config.describe(),
                e
            )
        });

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .unwrap_or_else(|e| panic!("Failed to apply fixture migrations: {}", e));

    pool
}

/// Lifecycle manager bound to a migrated test database
pub async fn test_lifecycle() -> (LifecycleManager, PgPool) {
    let pool = create_test_pool().await;
    (LifecycleManager::postgres(test_database_config()), pool)
}

/// Count rows in one table through the pool, independent of the harness
pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| panic!("Failed to count rows in {}: {}", table, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires test database
    async fn test_create_test_pool_connection() {
        let pool = create_test_pool().await;
        let result: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(result, 1);
    }
}
