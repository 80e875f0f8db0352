use clap::{Parser, Subcommand};

use std::path::PathBuf;

use crate::data::sql::Driver;

use super::constants::{ENV_CONFIG, ENV_DATABASE_URL, ENV_DRIVER, ENV_STRICT};

#[derive(Parser)]
#[command(name = "orderin")]
#[command(version, about = "Dynamic list queries for admin tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Database driver (mysql, postgres or sqlite)
    #[arg(long, short = 'd', global = true, env = ENV_DRIVER, value_parser = parse_driver)]
    pub driver: Option<Driver>,

    /// Database connection URL
    #[arg(long, global = true, env = ENV_DATABASE_URL)]
    pub database_url: Option<String>,

    /// Reject malformed search directives instead of skipping them
    #[arg(long, global = true, env = ENV_STRICT)]
    pub strict: bool,
}

/// Parse database driver from CLI/env string
fn parse_driver(s: &str) -> Result<Driver, String> {
    Driver::parse(s).ok_or_else(|| {
        format!(
            "Invalid driver '{}'. Valid options: mysql, postgres, sqlite",
            s
        )
    })
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Print the page and count statements for a list request
    Explain {
        /// Entity name (users, roles, dicts, ...) or table name
        #[arg(long, short = 'e')]
        entity: String,
        /// JSON request body, or @path to read it from a file
        #[arg(long, short = 'b', default_value = "{}")]
        body: String,
    },
    /// Run the count statement for a list request against the database
    Count {
        /// Entity name (users, roles, dicts, ...) or table name
        #[arg(long, short = 'e')]
        entity: String,
        /// JSON request body, or @path to read it from a file
        #[arg(long, short = 'b', default_value = "{}")]
        body: String,
    },
    /// Validate the search directives of every entity filter
    Check,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub driver: Option<Driver>,
    pub database_url: Option<String>,
    pub strict: bool,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        driver: cli.driver,
        database_url: cli.database_url,
        strict: cli.strict,
    };
    (config, cli.command)
}
