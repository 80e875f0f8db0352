// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Orderin";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "orderin";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".orderin";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "orderin.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "ORDERIN_CONFIG";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "ORDERIN_LOG";

/// Environment variable for the database driver (mysql, postgres, sqlite)
pub const ENV_DRIVER: &str = "ORDERIN_DRIVER";

/// Environment variable for the database connection URL
pub const ENV_DATABASE_URL: &str = "ORDERIN_DATABASE_URL";

/// Environment variable to reject malformed search directives
pub const ENV_STRICT: &str = "ORDERIN_STRICT";

// =============================================================================
// Database Defaults
// =============================================================================

/// Maximum number of pooled connections
pub const DB_DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Minimum number of connections kept warm
pub const DB_DEFAULT_MIN_CONNECTIONS: u32 = 0;

/// Connection acquire timeout in seconds
pub const DB_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Idle connection timeout in seconds
pub const DB_DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// PostgreSQL statement timeout in seconds (0 = disabled)
pub const DB_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Pagination
// =============================================================================

/// First page index (pages are 1-based)
pub const DEFAULT_PAGE_INDEX: i64 = 1;

/// Rows per page when the request omits `pageSize`
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest accepted `pageSize`
pub const MAX_PAGE_SIZE: i64 = 500;
