//! Shared world state for reminder sweep BDD scenarios.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rstest::fixture;
use taskhub::{
    identity::adapters::memory::InMemoryUserDirectory,
    notification::{
        adapters::memory::RecordingNotifier,
        services::{NotificationDispatcher, NotificationSettings},
    },
    task::{
        adapters::memory::InMemoryTaskStore,
        domain::TaskId,
        services::{ReminderSweepService, SweepReport},
    },
};

/// Sweep type used by the BDD world.
pub type TestSweep =
    ReminderSweepService<InMemoryTaskStore, InMemoryUserDirectory, RecordingNotifier>;

/// Scenario world for reminder sweep behaviour tests.
///
/// `now` is captured once so every step measures deadlines from the same
/// instant the sweep runs at.
pub struct SweepWorld {
    pub store: Arc<InMemoryTaskStore>,
    pub directory: Arc<InMemoryUserDirectory>,
    pub notifier: Arc<RecordingNotifier>,
    pub sweep: TestSweep,
    pub now: DateTime<Utc>,
    pub task_id: Option<TaskId>,
    pub report: Option<SweepReport>,
}

impl SweepWorld {
    /// Creates a world with an empty directory and store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryTaskStore::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let dispatcher = NotificationDispatcher::new(
            Arc::clone(&directory),
            Arc::clone(&notifier),
            NotificationSettings::default(),
        );
        let sweep =
            ReminderSweepService::new(Arc::clone(&store), Arc::clone(&directory), dispatcher);

        Self {
            store,
            directory,
            notifier,
            sweep,
            now: Utc::now(),
            task_id: None,
            report: None,
        }
    }

    /// Returns the report of the latest sweep.
    pub fn report(&self) -> Result<&SweepReport, eyre::Report> {
        self.report
            .as_ref()
            .ok_or_else(|| eyre::eyre!("the reminder sweep has not run"))
    }
}

impl Default for SweepWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SweepWorld {
    SweepWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Splits a comma-separated email list.
pub fn email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
