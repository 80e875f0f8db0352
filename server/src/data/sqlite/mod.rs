//! SQLite database service
//!
//! Embedded backend, mainly for local use and tests. An in-memory URL
//! (`sqlite::memory:`) gives each pooled connection its own database, so
//! pair it with `max_connections = 1`.

pub use sqlx::SqlitePool;

use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{ConnectOptions, FromRow};
use tracing::log::LevelFilter;

use crate::core::config::DatabaseConfig;
use crate::core::constants::SQLITE_BUSY_TIMEOUT_SECS;
use crate::data::bind_args;
use crate::data::error::DataError;
use crate::data::search::{ListQuery, Statement};

/// SQLite database service
pub struct SqliteService {
    pool: SqlitePool,
}

impl SqliteService {
    /// Open the database named by the configured URL
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DataError> {
        let url = config.url.as_str();
        if url.is_empty() {
            return Err(DataError::Config("SQLite URL is required".into()));
        }

        let options: SqliteConnectOptions = url
            .parse()
            .map_err(|e| DataError::Config(format!("Invalid SQLite URL: {}", e)))?;
        let options = options
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(SQLITE_BUSY_TIMEOUT_SECS))
            .log_statements(LevelFilter::Trace);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect_with(options)
            .await
            .map_err(DataError::from_sqlite)?;

        tracing::debug!(
            max_connections = config.max_connections,
            "SqliteService initialized"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create a SqliteService from an existing pool (primarily for testing)
    #[cfg(test)]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run a `SELECT COUNT(*)` statement
    pub async fn count(&self, statement: &Statement) -> Result<i64, DataError> {
        let query = bind_args!(
            sqlx::query_scalar::<_, i64>(&statement.sql),
            &statement.args
        );
        query
            .fetch_one(&self.pool)
            .await
            .map_err(DataError::from_sqlite)
    }

    /// Run a SELECT statement and map every row
    pub async fn fetch_all<T>(&self, statement: &Statement) -> Result<Vec<T>, DataError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let query = bind_args!(sqlx::query_as::<_, T>(&statement.sql), &statement.args);
        query
            .fetch_all(&self.pool)
            .await
            .map_err(DataError::from_sqlite)
    }

    /// Total match count and the rows of the requested page
    pub async fn fetch_page<T>(&self, query: &ListQuery) -> Result<(Vec<T>, i64), DataError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let total = self.count(&query.count).await?;
        if total == 0 {
            return Ok((Vec::new(), 0));
        }
        let rows = self.fetch_all(&query.select).await?;
        Ok((rows, total))
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("SQLite pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sql::Driver;
    use crate::domain::Entity;

    #[derive(Debug, FromRow)]
    struct UserRow {
        id: i64,
        username: String,
    }

    async fn seeded() -> SqliteService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        for sql in [
            "CREATE TABLE sys_users (id INTEGER PRIMARY KEY, username TEXT NOT NULL, \
             nickname TEXT NOT NULL, real_name TEXT NOT NULL, phone TEXT NOT NULL, \
             status INTEGER NOT NULL)",
            "CREATE TABLE sys_role_users (user_id INTEGER NOT NULL, role_id INTEGER NOT NULL)",
            "INSERT INTO sys_users VALUES \
             (1, 'alice', 'Ali', 'Alice A', '100', 1), \
             (2, 'bob', 'Bobby', 'Bob B', '200', 0), \
             (3, 'annie', 'Annie', 'Ann C', '300', 1), \
             (4, 'jo_anna', 'Jo', 'Joanna D', '400', 1)",
            "INSERT INTO sys_role_users VALUES (1, 5), (3, 5), (2, 6)",
        ] {
            sqlx::query(sql).execute(&pool).await.unwrap();
        }
        SqliteService::from_pool(pool)
    }

    async fn page(db: &SqliteService, body: &str) -> (Vec<i64>, i64) {
        let query = Entity::Users.select(Driver::Sqlite, body, false).unwrap();
        let (rows, total) = db.fetch_page::<UserRow>(&query).await.unwrap();
        (rows.into_iter().map(|r| r.id).collect(), total)
    }

    #[tokio::test]
    async fn test_keyword_within_role() {
        let db = seeded().await;
        assert_eq!(page(&db, r#"{"keyword": "ann", "roleId": "5"}"#).await, (vec![3], 1));
    }

    #[tokio::test]
    async fn test_exclude_role_with_paging() {
        let db = seeded().await;
        assert_eq!(page(&db, r#"{"excludeRoleId": "5"}"#).await, (vec![4, 2], 2));
        assert_eq!(
            page(&db, r#"{"excludeRoleId": "5", "pageIndex": 2, "pageSize": 1}"#).await,
            (vec![2], 2)
        );
    }

    #[tokio::test]
    async fn test_like_metacharacters_are_literal() {
        let db = seeded().await;
        assert_eq!(page(&db, r#"{"keyword": "_"}"#).await, (vec![4], 1));
        assert_eq!(page(&db, r#"{"keyword": "%"}"#).await, (vec![], 0));
    }

    #[tokio::test]
    async fn test_zero_status_is_not_filtered() {
        let db = seeded().await;
        let (ids, total) = page(&db, r#"{"status": 0, "idOrder": "asc"}"#).await;
        assert_eq!(total, 4);
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_rows_map_columns() {
        let db = seeded().await;
        let query = Entity::Users
            .select(Driver::Sqlite, r#"{"username": "bob"}"#, false)
            .unwrap();
        let rows: Vec<UserRow> = db.fetch_all(&query.select).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].username, "bob");
        db.close().await;
    }
}
