//! Runs the task reminder sweep against `PostgreSQL`.
//!
//! Usage:
//!
//! ```text
//! reminder_sweep [--once] [--config <path>] [--database-url <url>]
//! ```
//!
//! Without `--once` the sweep repeats every `scheduler.interval_secs`
//! seconds. Notifications are written to the log; wire a mail transport by
//! implementing `Notifier`.

use chrono::Utc;
use clap::Parser;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::sync::Arc;
use taskhub::config::{CliArgs, ConfigError, TaskhubConfig};
use taskhub::identity::adapters::postgres::PostgresUserDirectory;
use taskhub::notification::{
    adapters::logging::TracingNotifier, services::NotificationDispatcher,
};
use taskhub::task::{adapters::postgres::PostgresTaskStore, services::ReminderSweepService};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no database URL configured; set DATABASE_URL or database_url")]
    MissingDatabaseUrl,
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
}

#[tokio::main]
async fn main() -> Result<(), SweepError> {
    let cli = CliArgs::parse();
    let config = TaskhubConfig::load(&cli)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let database_url = config
        .database_url
        .clone()
        .ok_or(SweepError::MissingDatabaseUrl)?;
    let pool = Pool::builder().build(ConnectionManager::<PgConnection>::new(database_url))?;

    let store = Arc::new(PostgresTaskStore::new(pool.clone()));
    let directory = Arc::new(PostgresUserDirectory::new(pool));
    let dispatcher = NotificationDispatcher::new(
        Arc::clone(&directory),
        Arc::new(TracingNotifier),
        config.notification_settings(),
    );
    let sweep = ReminderSweepService::new(store, directory, dispatcher)
        .with_policy(config.scheduler.policy);

    if config.once {
        sweep.run_sweep(Utc::now()).await;
        return Ok(());
    }

    tracing::info!(
        interval_secs = config.scheduler.interval.as_secs(),
        "starting reminder sweep loop"
    );
    let mut ticker = tokio::time::interval(config.scheduler.interval);
    loop {
        ticker.tick().await;
        sweep.run_sweep(Utc::now()).await;
    }
}
