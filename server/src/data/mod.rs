//! Data layer
//!
//! - `search` - Directive parsing, condition resolution and statement rendering
//! - `sql` - SQL dialects for the supported drivers
//! - `mysql` / `postgres` / `sqlite` - Connection pools that execute statements
//! - `error` - Unified error type for all backends

pub mod error;
pub mod mysql;
pub mod postgres;
pub mod search;
pub mod sql;
pub mod sqlite;

pub use error::DataError;
pub use mysql::MysqlService;
pub use postgres::PostgresService;
pub use sqlite::SqliteService;

use crate::core::config::DatabaseConfig;
use search::Statement;
use sql::Driver;

/// Bind statement arguments onto a sqlx query, in placeholder order
///
/// List arguments never reach this point: rendering expands them.
macro_rules! bind_args {
    ($query:expr, $args:expr) => {{
        let mut query = $query;
        for arg in $args {
            query = match arg {
                $crate::data::search::SqlValue::Null | $crate::data::search::SqlValue::List(_) => {
                    query.bind(None::<String>)
                }
                $crate::data::search::SqlValue::Bool(v) => query.bind(*v),
                $crate::data::search::SqlValue::Int(v) => query.bind(*v),
                $crate::data::search::SqlValue::Float(v) => query.bind(*v),
                $crate::data::search::SqlValue::Text(v) => query.bind(v.clone()),
                $crate::data::search::SqlValue::Timestamp(v) => query.bind(*v),
            };
        }
        query
    }};
}
pub(crate) use bind_args;

/// Database service enum
///
/// Wraps the backend-specific service selected by the configured driver.
pub enum DatabaseService {
    Mysql(MysqlService),
    Postgres(PostgresService),
    Sqlite(SqliteService),
}

impl DatabaseService {
    /// Connect to the database named by `config`
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DataError> {
        match config.driver {
            Driver::Mysql => Ok(Self::Mysql(MysqlService::init(config).await?)),
            Driver::Postgres => Ok(Self::Postgres(PostgresService::init(config).await?)),
            Driver::Sqlite => Ok(Self::Sqlite(SqliteService::init(config).await?)),
        }
    }

    pub fn driver(&self) -> Driver {
        match self {
            Self::Mysql(_) => Driver::Mysql,
            Self::Postgres(_) => Driver::Postgres,
            Self::Sqlite(_) => Driver::Sqlite,
        }
    }

    /// Run a `SELECT COUNT(*)` statement
    pub async fn count(&self, statement: &Statement) -> Result<i64, DataError> {
        match self {
            Self::Mysql(m) => m.count(statement).await,
            Self::Postgres(p) => p.count(statement).await,
            Self::Sqlite(s) => s.count(statement).await,
        }
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        match self {
            Self::Mysql(m) => m.close().await,
            Self::Postgres(p) => p.close().await,
            Self::Sqlite(s) => s.close().await,
        }
    }
}
