//! PostgreSQL database service
//!
//! Connection pooling with min/max bounds, idle connection cleanup and a
//! connection-level statement timeout.

pub use sqlx::PgPool;

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{ConnectOptions, FromRow};
use tracing::log::LevelFilter;

use crate::core::config::DatabaseConfig;
use crate::data::bind_args;
use crate::data::error::DataError;
use crate::data::search::{ListQuery, Statement};

/// PostgreSQL database service
pub struct PostgresService {
    pool: PgPool,
}

impl PostgresService {
    /// Initialize the connection pool from configuration
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DataError> {
        let url = config.url.as_str();
        if url.is_empty() {
            return Err(DataError::Config("PostgreSQL URL is required".into()));
        }

        let mut options: PgConnectOptions = url
            .parse()
            .map_err(|e| DataError::Config(format!("Invalid PostgreSQL URL: {}", e)))?;

        options = options.log_statements(LevelFilter::Trace);

        if config.statement_timeout_secs > 0 {
            options = options.options([(
                "statement_timeout",
                format!("{}s", config.statement_timeout_secs),
            )]);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect_with(options)
            .await
            .map_err(DataError::from_postgres)?;

        tracing::debug!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            statement_timeout_secs = config.statement_timeout_secs,
            "PostgresService initialized"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
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
            .map_err(DataError::from_postgres)
    }

    /// Run a SELECT statement and map every row
    pub async fn fetch_all<T>(&self, statement: &Statement) -> Result<Vec<T>, DataError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let query = bind_args!(sqlx::query_as::<_, T>(&statement.sql), &statement.args);
        query
            .fetch_all(&self.pool)
            .await
            .map_err(DataError::from_postgres)
    }

    /// Total match count and the rows of the requested page
    pub async fn fetch_page<T>(&self, query: &ListQuery) -> Result<(Vec<T>, i64), DataError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
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
        tracing::debug!("PostgreSQL pool closed");
    }
}
