//! Shared world state for task lifecycle BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskhub::{
    identity::{
        adapters::memory::InMemoryUserDirectory,
        domain::{EmailAddress, User},
        ports::UserDirectory,
    },
    notification::{
        adapters::memory::RecordingNotifier,
        services::{NotificationDispatcher, NotificationSettings},
    },
    task::{
        adapters::memory::InMemoryTaskStore,
        services::{TaskDetails, TaskLifecycleService, TaskServiceError},
    },
};

/// Service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<
    InMemoryTaskStore,
    InMemoryUserDirectory,
    RecordingNotifier,
    DefaultClock,
>;

/// Scenario world for task lifecycle behaviour tests.
pub struct LifecycleWorld {
    pub directory: Arc<InMemoryUserDirectory>,
    pub notifier: Arc<RecordingNotifier>,
    pub service: TestTaskService,
    pub current: Option<TaskDetails>,
    pub last_error: Option<TaskServiceError>,
}

impl LifecycleWorld {
    /// Creates a world with an empty directory and store.
    #[must_use]
    pub fn new() -> Self {
        let directory = Arc::new(InMemoryUserDirectory::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let dispatcher = NotificationDispatcher::new(
            Arc::clone(&directory),
            Arc::clone(&notifier),
            NotificationSettings::default(),
        );
        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskStore::new()),
            Arc::clone(&directory),
            dispatcher,
            Arc::new(DefaultClock),
        );

        Self {
            directory,
            notifier,
            service,
            current: None,
            last_error: None,
        }
    }

    /// Looks up a seeded user by email.
    pub fn user(&self, email: &str) -> Result<User, eyre::Report> {
        let address = EmailAddress::new(email)?;
        run_async(self.directory.find_by_email(&address))?
            .ok_or_else(|| eyre::eyre!("no user seeded for {email}"))
    }

    /// Returns the task the scenario is working on.
    pub fn current(&self) -> Result<&TaskDetails, eyre::Report> {
        self.current
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing current task in scenario world"))
    }

    /// Records the outcome of a service call.
    pub fn record(&mut self, result: Result<TaskDetails, TaskServiceError>) {
        match result {
            Ok(details) => {
                self.current = Some(details);
                self.last_error = None;
            }
            Err(err) => self.last_error = Some(err),
        }
    }
}

impl Default for LifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> LifecycleWorld {
    LifecycleWorld::default()
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
