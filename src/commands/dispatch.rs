//! Command dispatch logic for marq

use std::time::Instant;

use crate::cli::{Cli, Commands};
use crate::commands;
use marq_core::config::MarqConfig;
use marq_core::error::{MarqError, Result};
use marq_core::store::HttpGradeStore;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let result = match &cli.command {
        None => Err(MarqError::UsageError(
            "no command given (see marq --help)".to_string(),
        )),

        Some(Commands::Grade {
            student,
            marker,
            course,
        }) => commands::grade::execute(cli, student.as_deref(), marker.as_deref(), *course),

        Some(Commands::List { course }) => commands::list::execute(cli, *course),

        Some(Commands::Show { index }) => commands::show::execute(cli, *index),

        Some(Commands::Delete { index }) => commands::delete::execute(cli, *index),

        Some(Commands::Export { output }) => commands::export::execute(cli, output.as_deref()),

        Some(Commands::Overview { course }) => commands::overview::execute(cli, *course),

        Some(Commands::Rubric) => commands::rubric::execute(cli),
    };

    tracing::debug!(elapsed = ?start.elapsed(), "dispatch_complete");
    result
}

/// Build the HTTP store from config file, environment, and CLI overrides
pub fn store(cli: &Cli) -> Result<HttpGradeStore> {
    let mut config = MarqConfig::resolve(cli.config.as_deref())?;
    if let Some(url) = &cli.store_url {
        config.store_url = url.clone();
    }
    if !config.is_configured() {
        return Err(MarqError::StoreNotConfigured);
    }
    tracing::debug!(url = %config.store_url, "store_configured");
    Ok(HttpGradeStore::new(config.store_url, config.timeout_seconds))
}
