//! Configuration for taskhub binaries.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/taskhub/config.toml`)
//! 4. Compiled defaults

use crate::notification::services::{DEFAULT_SEND_TIMEOUT, NotificationSettings};
use crate::task::domain::SweepPolicy;
use chrono::TimeDelta;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// A setting has an unusable value.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Setting name.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct TaskhubConfigFile {
    database_url: Option<String>,
    log_level: Option<String>,
    notifications: NotificationsFileConfig,
    scheduler: SchedulerFileConfig,
}

/// `[notifications]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct NotificationsFileConfig {
    frontend_url: Option<String>,
    send_timeout_secs: Option<u64>,
}

/// `[scheduler]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SchedulerFileConfig {
    interval_secs: Option<u64>,
    upcoming_window_hours: Option<u32>,
    reminder_cadence_hours: Option<u32>,
    cadence_tolerance_secs: Option<u32>,
    custom_reminder_buffer_secs: Option<u32>,
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// CLI arguments for the reminder sweep.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Task deadline reminder sweep")]
pub struct CliArgs {
    /// Path to config file (default: `~/.config/taskhub/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// `PostgreSQL` connection URL.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Base URL used for task links in notifications.
    #[arg(long, env = "TASKHUB_FRONTEND_URL")]
    pub frontend_url: Option<String>,

    /// Seconds to wait for the mail transport.
    #[arg(long)]
    pub send_timeout_secs: Option<u64>,

    /// Seconds between sweeps.
    #[arg(long, env = "TASKHUB_SWEEP_INTERVAL")]
    pub interval_secs: Option<u64>,

    /// Run a single sweep and exit.
    #[arg(long)]
    pub once: bool,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, env = "TASKHUB_LOG")]
    pub log_level: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Resolved scheduler settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Time between sweeps.
    pub interval: Duration,
    /// Reminder window policy.
    pub policy: SweepPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            policy: SweepPolicy::default(),
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskhubConfig {
    /// `PostgreSQL` connection URL, if configured.
    pub database_url: Option<String>,
    /// Log level filter string.
    pub log_level: String,
    /// Base URL used for task links.
    pub frontend_url: String,
    /// Mail transport timeout.
    pub send_timeout: Duration,
    /// Scheduler settings.
    pub scheduler: SchedulerConfig,
    /// Whether to run a single sweep.
    pub once: bool,
}

impl Default for TaskhubConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            log_level: "info".to_owned(),
            frontend_url: "http://localhost:3000".to_owned(),
            send_timeout: DEFAULT_SEND_TIMEOUT,
            scheduler: SchedulerConfig::default(),
            once: false,
        }
    }
}

impl TaskhubConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// If no `--config` is given, the default path is tried and a missing
    /// file is treated as empty config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed,
    /// or a resolved value is unusable.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Builds dispatcher settings from the notification values.
    #[must_use]
    pub fn notification_settings(&self) -> NotificationSettings {
        NotificationSettings::new(self.frontend_url.clone()).with_send_timeout(self.send_timeout)
    }

    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &TaskhubConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let default_policy = defaults.scheduler.policy;
        let scheduler_file = &file.scheduler;

        let interval_secs = cli
            .interval_secs
            .or(scheduler_file.interval_secs)
            .unwrap_or(defaults.scheduler.interval.as_secs());
        if interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scheduler.interval_secs",
                reason: "must be greater than zero",
            });
        }
        if scheduler_file.reminder_cadence_hours == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "scheduler.reminder_cadence_hours",
                reason: "must be greater than zero",
            });
        }

        let policy = SweepPolicy {
            upcoming_window: scheduler_file
                .upcoming_window_hours
                .map_or(default_policy.upcoming_window, |hours| {
                    TimeDelta::hours(i64::from(hours))
                }),
            reminder_cadence: scheduler_file
                .reminder_cadence_hours
                .map_or(default_policy.reminder_cadence, |hours| {
                    TimeDelta::hours(i64::from(hours))
                }),
            cadence_tolerance: scheduler_file
                .cadence_tolerance_secs
                .map_or(default_policy.cadence_tolerance, |secs| {
                    TimeDelta::seconds(i64::from(secs))
                }),
            custom_reminder_buffer: scheduler_file
                .custom_reminder_buffer_secs
                .map_or(default_policy.custom_reminder_buffer, |secs| {
                    TimeDelta::seconds(i64::from(secs))
                }),
        };

        Ok(Self {
            database_url: cli
                .database_url
                .clone()
                .or_else(|| file.database_url.clone()),
            log_level: cli
                .log_level
                .clone()
                .or_else(|| file.log_level.clone())
                .unwrap_or(defaults.log_level),
            frontend_url: cli
                .frontend_url
                .clone()
                .or_else(|| file.notifications.frontend_url.clone())
                .unwrap_or(defaults.frontend_url),
            send_timeout: cli
                .send_timeout_secs
                .or(file.notifications.send_timeout_secs)
                .map_or(defaults.send_timeout, Duration::from_secs),
            scheduler: SchedulerConfig {
                interval: Duration::from_secs(interval_secs),
                policy,
            },
            once: cli.once,
        })
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
fn load_config_file(explicit_path: Option<&Path>) -> Result<TaskhubConfigFile, ConfigError> {
    if let Some(explicit) = explicit_path {
        let contents =
            std::fs::read_to_string(explicit).map_err(|source| ConfigError::ReadFile {
                path: explicit.to_path_buf(),
                source,
            })?;
        return Ok(toml::from_str(&contents)?);
    }
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(TaskhubConfigFile::default());
    };
    let path = config_dir.join("taskhub").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TaskhubConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(toml_str: &str) -> TaskhubConfigFile {
        toml::from_str(toml_str).expect("config should parse")
    }

    #[rstest]
    fn empty_file_resolves_to_defaults() {
        let config =
            TaskhubConfig::resolve(&CliArgs::default(), &parse("")).expect("config should resolve");
        assert_eq!(config, TaskhubConfig::default());
        assert_eq!(config.send_timeout, Duration::from_secs(10));
        assert_eq!(config.scheduler.policy.cadence_tolerance, TimeDelta::seconds(360));
    }

    #[rstest]
    fn file_sections_override_defaults() {
        let file = parse(
            r#"
database_url = "postgres://localhost/taskhub"

[notifications]
frontend_url = "https://tasks.example.edu"
send_timeout_secs = 3

[scheduler]
interval_secs = 60
reminder_cadence_hours = 2
custom_reminder_buffer_secs = 120
"#,
        );
        let config =
            TaskhubConfig::resolve(&CliArgs::default(), &file).expect("config should resolve");

        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/taskhub"));
        assert_eq!(config.frontend_url, "https://tasks.example.edu");
        assert_eq!(config.send_timeout, Duration::from_secs(3));
        assert_eq!(config.scheduler.interval, Duration::from_secs(60));
        assert_eq!(config.scheduler.policy.reminder_cadence, TimeDelta::hours(2));
        assert_eq!(config.scheduler.policy.custom_reminder_buffer, TimeDelta::minutes(2));
        assert_eq!(config.scheduler.policy.upcoming_window, TimeDelta::hours(24));
    }

    #[rstest]
    fn cli_overrides_file() {
        let file = parse(
            r#"
log_level = "warn"

[notifications]
frontend_url = "https://tasks.example.edu"

[scheduler]
interval_secs = 60
"#,
        );
        let cli = CliArgs {
            interval_secs: Some(15),
            log_level: Some("debug".to_owned()),
            once: true,
            ..CliArgs::default()
        };
        let config = TaskhubConfig::resolve(&cli, &file).expect("config should resolve");

        assert_eq!(config.scheduler.interval, Duration::from_secs(15));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.frontend_url, "https://tasks.example.edu");
        assert!(config.once);
    }

    #[rstest]
    #[case::interval("[scheduler]\ninterval_secs = 0\n", "scheduler.interval_secs")]
    #[case::cadence("[scheduler]\nreminder_cadence_hours = 0\n", "scheduler.reminder_cadence_hours")]
    fn zero_durations_are_rejected(#[case] toml_str: &str, #[case] expected: &str) {
        let err = TaskhubConfig::resolve(&CliArgs::default(), &parse(toml_str))
            .expect_err("config should be rejected");
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == expected));
    }

    #[rstest]
    fn notification_settings_trim_trailing_slash() {
        let config = TaskhubConfig {
            frontend_url: "https://tasks.example.edu/".to_owned(),
            ..TaskhubConfig::default()
        };
        assert_eq!(
            config.notification_settings().frontend_url(),
            "https://tasks.example.edu"
        );
    }

    #[rstest]
    fn explicit_missing_config_file_returns_error() {
        let result = load_config_file(Some(Path::new("/nonexistent/taskhub.toml")));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
