use crate::config::DatabaseConfig;
use crate::core::{AppError, Result};
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use sqlx::{Connection, PgConnection};
use uuid::Uuid;

/// Positional statement parameter (`$1`, `$2`, ...)
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Text(String),
    Uuid(Uuid),
    Bool(bool),
}

impl From<&str> for QueryParam {
    fn from(value: &str) -> Self {
        QueryParam::Text(value.to_string())
    }
}

impl From<Uuid> for QueryParam {
    fn from(value: Uuid) -> Self {
        QueryParam::Uuid(value)
    }
}

impl From<bool> for QueryParam {
    fn from(value: bool) -> Self {
        QueryParam::Bool(value)
    }
}

/// Opens one connection per call; no pooling, no retries
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn StoreSession>>;

    /// Human-readable target for diagnostics
    fn describe(&self) -> String;
}

/// A live connection, owned by exactly one lifecycle call
#[async_trait]
pub trait StoreSession: Send {
    /// Execute a statement, returning the number of affected rows
    async fn query(&mut self, statement: &str, params: &[QueryParam]) -> Result<u64>;

    /// `SELECT COUNT(*)` over a whole table
    async fn count(&mut self, table: &str) -> Result<i64>;

    async fn close(self: Box<Self>) -> Result<()>;
}

/// Run `body` against a fresh session and close it on every exit path
///
/// When both the body and the close fail, the body's error is returned.
pub async fn with_session<T, F>(store: &dyn DataStore, body: F) -> Result<T>
where
    T: Send,
    F: for<'a> FnOnce(&'a mut dyn StoreSession) -> BoxFuture<'a, Result<T>> + Send,
{
    let mut session = store.connect().await?;
    let outcome = body(session.as_mut()).await;
    let closed = session.close().await;

    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            tracing::warn!(error = %close_err, "Failed to close store connection after error");
            Err(err)
        }
    }
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    config: DatabaseConfig,
}

impl PgStore {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DataStore for PgStore {
    async fn connect(&self) -> Result<Box<dyn StoreSession>> {
        let conn = PgConnection::connect_with(&self.config.connect_options()).await?;
        tracing::debug!(target_db = %self.config.describe(), "Opened store connection");
        Ok(Box::new(PgSession { conn }))
    }

    fn describe(&self) -> String {
        self.config.describe()
    }
}

pub struct PgSession {
    conn: PgConnection,
}

#[async_trait]
impl StoreSession for PgSession {
    async fn query(&mut self, statement: &str, params: &[QueryParam]) -> Result<u64> {
        let mut query = sqlx::query(statement);
        for param in params {
            query = match param {
                QueryParam::Text(value) => query.bind(value.clone()),
                QueryParam::Uuid(value) => query.bind(*value),
                QueryParam::Bool(value) => query.bind(*value),
            };
        }

        let result = query.execute(&mut self.conn).await?;
        Ok(result.rows_affected())
    }

    async fn count(&mut self, table: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", checked_identifier(table)?);
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&mut self.conn)
            .await?;
        Ok(count)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.conn.close().await?;
        tracing::debug!("Closed store connection");
        Ok(())
    }
}

/// Table names are interpolated, so only plain identifiers pass
pub fn checked_identifier(name: &str) -> Result<&str> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());

    if valid {
        Ok(name)
    } else {
        Err(AppError::internal(format!("Invalid table name: {}", name)))
    }
}
