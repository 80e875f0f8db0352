use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::sql::Driver;
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DB_DEFAULT_ACQUIRE_TIMEOUT_SECS,
    DB_DEFAULT_IDLE_TIMEOUT_SECS, DB_DEFAULT_MAX_CONNECTIONS, DB_DEFAULT_MIN_CONNECTIONS,
    DB_DEFAULT_STATEMENT_TIMEOUT_SECS,
};

// =============================================================================
// File Config (JSON)
// =============================================================================

/// Database configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    /// Driver: mysql (default), postgres or sqlite
    pub driver: Option<Driver>,
    /// Connection URL (or use ORDERIN_DATABASE_URL env var)
    pub url: Option<String>,
    /// Maximum number of connections in the pool (default: 10)
    pub max_connections: Option<u32>,
    /// Minimum number of connections to keep warm (default: 0)
    pub min_connections: Option<u32>,
    /// Connection acquire timeout in seconds (default: 30)
    pub acquire_timeout_secs: Option<u64>,
    /// Idle connection timeout in seconds (default: 600)
    pub idle_timeout_secs: Option<u64>,
    /// PostgreSQL statement timeout in seconds, 0 to disable (default: 60)
    pub statement_timeout_secs: Option<u64>,
}

/// Search configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SearchFileConfig {
    /// Reject malformed directives instead of skipping them (default: false)
    pub strict: Option<bool>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub database: Option<DatabaseFileConfig>,
    pub search: Option<SearchFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(database) = other.database {
            let current = self
                .database
                .get_or_insert_with(DatabaseFileConfig::default);
            if database.driver.is_some() {
                tracing::trace!(driver = ?database.driver, "Merging database.driver");
                current.driver = database.driver;
            }
            if database.url.is_some() {
                current.url = database.url;
            }
            if database.max_connections.is_some() {
                current.max_connections = database.max_connections;
            }
            if database.min_connections.is_some() {
                current.min_connections = database.min_connections;
            }
            if database.acquire_timeout_secs.is_some() {
                current.acquire_timeout_secs = database.acquire_timeout_secs;
            }
            if database.idle_timeout_secs.is_some() {
                current.idle_timeout_secs = database.idle_timeout_secs;
            }
            if database.statement_timeout_secs.is_some() {
                current.statement_timeout_secs = database.statement_timeout_secs;
            }
        }

        if let Some(search) = other.search {
            let current = self.search.get_or_insert_with(SearchFileConfig::default);
            if search.strict.is_some() {
                tracing::trace!(strict = ?search.strict, "Merging search.strict");
                current.strict = search.strict;
            }
        }
    }
}

// =============================================================================
// Runtime Config
// =============================================================================

/// Database configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub driver: Driver,
    /// Connection URL; only required by commands that execute statements
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    /// Statement timeout in seconds (0 = disabled, PostgreSQL only)
    pub statement_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: Driver::default(),
            url: String::new(),
            max_connections: DB_DEFAULT_MAX_CONNECTIONS,
            min_connections: DB_DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DB_DEFAULT_ACQUIRE_TIMEOUT_SECS,
            idle_timeout_secs: DB_DEFAULT_IDLE_TIMEOUT_SECS,
            statement_timeout_secs: DB_DEFAULT_STATEMENT_TIMEOUT_SECS,
        }
    }
}

/// Search configuration (final/runtime)
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    pub strict: bool,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub search: SearchConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.orderin/orderin.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let file_database = file_config.database.unwrap_or_default();
        let file_search = file_config.search.unwrap_or_default();

        let database = DatabaseConfig {
            driver: cli.driver.or(file_database.driver).unwrap_or_default(),
            url: cli
                .database_url
                .clone()
                .or(file_database.url)
                .unwrap_or_default(),
            max_connections: file_database
                .max_connections
                .unwrap_or(DB_DEFAULT_MAX_CONNECTIONS),
            min_connections: file_database
                .min_connections
                .unwrap_or(DB_DEFAULT_MIN_CONNECTIONS),
            acquire_timeout_secs: file_database
                .acquire_timeout_secs
                .unwrap_or(DB_DEFAULT_ACQUIRE_TIMEOUT_SECS),
            idle_timeout_secs: file_database
                .idle_timeout_secs
                .unwrap_or(DB_DEFAULT_IDLE_TIMEOUT_SECS),
            statement_timeout_secs: file_database
                .statement_timeout_secs
                .unwrap_or(DB_DEFAULT_STATEMENT_TIMEOUT_SECS),
        };

        // --strict can only switch strict mode on
        let search = SearchConfig {
            strict: cli.strict || file_search.strict.unwrap_or(false),
        };

        let config = Self { database, search };
        config.validate()?;

        tracing::debug!(
            driver = %config.database.driver,
            url_set = !config.database.url.is_empty(),
            strict = config.search.strict,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        let db = &self.database;
        if db.max_connections == 0 {
            anyhow::bail!("Configuration error: database.max_connections must be greater than 0");
        }
        if db.min_connections > db.max_connections {
            anyhow::bail!(
                "Configuration error: database.min_connections ({}) exceeds max_connections ({})",
                db.min_connections,
                db.max_connections
            );
        }
        if !db.url.is_empty()
            && let Some(driver) = driver_from_url(&db.url)
            && driver != db.driver
        {
            anyhow::bail!(
                "Configuration error: database.url is a {} URL but the driver is {}",
                driver,
                db.driver
            );
        }
        Ok(())
    }
}

/// Driver implied by a connection URL scheme, if recognizable
fn driver_from_url(url: &str) -> Option<Driver> {
    let (scheme, _) = url.split_once(':')?;
    Driver::parse(scheme)
}

/// Get the profile config path (~/.orderin/orderin.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}
