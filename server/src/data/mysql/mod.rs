//! MySQL database service
//!
//! The default backend. Arguments use `?` placeholders and identifiers are
//! quoted with backticks, matching the generic dialect.

pub use sqlx::MySqlPool;

use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlRow};
use sqlx::{ConnectOptions, FromRow};
use tracing::log::LevelFilter;

use crate::core::config::DatabaseConfig;
use crate::data::bind_args;
use crate::data::error::DataError;
use crate::data::search::{ListQuery, Statement};

/// MySQL database service
pub struct MysqlService {
    pool: MySqlPool,
}

impl MysqlService {
    /// Initialize the connection pool from configuration
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DataError> {
        let url = config.url.as_str();
        if url.is_empty() {
            return Err(DataError::Config("MySQL URL is required".into()));
        }

        let options: MySqlConnectOptions = url
            .parse()
            .map_err(|e| DataError::Config(format!("Invalid MySQL URL: {}", e)))?;
        let options = options.log_statements(LevelFilter::Trace);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect_with(options)
            .await
            .map_err(DataError::from_mysql)?;

        tracing::debug!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "MysqlService initialized"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
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
            .map_err(DataError::from_mysql)
    }

    /// Run a SELECT statement and map every row
    pub async fn fetch_all<T>(&self, statement: &Statement) -> Result<Vec<T>, DataError>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        let query = bind_args!(sqlx::query_as::<_, T>(&statement.sql), &statement.args);
        query
            .fetch_all(&self.pool)
            .await
            .map_err(DataError::from_mysql)
    }

    /// Total match count and the rows of the requested page
    pub async fn fetch_page<T>(&self, query: &ListQuery) -> Result<(Vec<T>, i64), DataError>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
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
        tracing::debug!("MySQL pool closed");
    }
}
