//! Unified error type for data layer
//!
//! Wraps errors from every supported backend (MySQL, PostgreSQL, SQLite)
//! while preserving which backend produced them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("MySQL error: {0}")]
    Mysql(sqlx::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(sqlx::Error),

    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataError {
    pub fn from_mysql(e: sqlx::Error) -> Self {
        Self::Mysql(e)
    }

    pub fn from_postgres(e: sqlx::Error) -> Self {
        Self::Postgres(e)
    }

    pub fn from_sqlite(e: sqlx::Error) -> Self {
        Self::Sqlite(e)
    }
}
