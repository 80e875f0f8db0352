//! Core application

use anyhow::{Context, Result};
use clap::CommandFactory;

use crate::core::cli::{self, Cli, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME, APP_NAME_LOWER, ENV_LOG};
use crate::data::DatabaseService;
use crate::domain::{Entity, RequestError};
use crate::utils::file::read_inline_or_file;

pub struct CoreApp {
    pub config: AppConfig,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!(app = APP_NAME, "Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let Some(command) = command else {
            Cli::command().print_help()?;
            return Ok(());
        };

        let app = Self {
            config: AppConfig::load(&cli_config)?,
        };
        match command {
            Commands::Explain { entity, body } => {
                println!("{}", app.explain(&entity, &body)?);
                Ok(())
            }
            Commands::Count { entity, body } => app.count(&entity, &body).await,
            Commands::Check => Self::check(),
        }
    }

    /// Page and count statements for a request, as pretty JSON
    pub fn explain(&self, entity: &str, body: &str) -> Result<String> {
        let entity = Entity::parse(entity).map_err(rejected)?;
        let body = read_inline_or_file(body)?;
        let query = entity
            .select(self.config.database.driver, &body, self.config.search.strict)
            .map_err(rejected)?;
        serde_json::to_string_pretty(&query).context("Failed to serialize statements")
    }

    async fn count(&self, entity: &str, body: &str) -> Result<()> {
        let entity = Entity::parse(entity).map_err(rejected)?;
        let body = read_inline_or_file(body)?;

        let db = DatabaseService::connect(&self.config.database)
            .await
            .context("Failed to connect to database")?;
        let query = match entity.select(db.driver(), &body, self.config.search.strict) {
            Ok(query) => query,
            Err(e) => {
                db.close().await;
                return Err(rejected(e));
            }
        };
        let total = db.count(&query.count).await;
        db.close().await;

        let total = total.with_context(|| format!("Failed to count {}", entity))?;
        tracing::debug!(entity = %entity, total, "Count finished");
        println!(
            "{}",
            serde_json::json!({ "entity": entity.name(), "table": entity.table(), "total": total })
        );
        Ok(())
    }

    fn check() -> Result<()> {
        let mut failed = 0;
        for entity in Entity::ALL {
            match entity.check() {
                Ok(()) => println!("ok    {}", entity),
                Err(e) => {
                    failed += 1;
                    println!("FAIL  {}", entity);
                    for site in e.sites() {
                        println!("      {}", site);
                    }
                }
            }
        }
        if failed > 0 {
            anyhow::bail!("{} entity filter(s) have invalid search directives", failed);
        }
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Request errors carry their stable code to the command line
fn rejected(e: RequestError) -> anyhow::Error {
    tracing::debug!(code = e.code(), "Request rejected");
    anyhow::anyhow!("{} [{}]", e, e.code())
}
