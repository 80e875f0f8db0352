//! SQL abstraction layer for multi-database support
//!
//! This module provides abstractions for generating SQL fragments that work
//! across the supported relational backends (MySQL, PostgreSQL, SQLite).

mod dialect;
mod mysql_dialect;
mod postgres_dialect;
mod sqlite_dialect;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use dialect::SqlDialect;
pub use mysql_dialect::MysqlDialect;
pub use postgres_dialect::PostgresDialect;
pub use sqlite_dialect::SqliteDialect;

/// Database driver identifier
///
/// MySQL is the generic dialect and the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    #[default]
    Mysql,
    #[serde(alias = "postgresql")]
    Postgres,
    Sqlite,
}

impl Driver {
    /// Get the SQL dialect for this driver
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Driver::Mysql => &MysqlDialect,
            Driver::Postgres => &PostgresDialect,
            Driver::Sqlite => &SqliteDialect,
        }
    }

    /// Get the driver name
    pub fn name(&self) -> &'static str {
        match self {
            Driver::Mysql => "mysql",
            Driver::Postgres => "postgres",
            Driver::Sqlite => "sqlite",
        }
    }

    /// Parse a driver name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Driver::Mysql),
            "postgres" | "postgresql" => Some(Driver::Postgres),
            "sqlite" => Some(Driver::Sqlite),
            _ => None,
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
