//! Fixtures shared by unit tests across contexts.

use crate::identity::{
    adapters::memory::InMemoryUserDirectory,
    domain::{Department, EmailAddress, Role, User, UserId},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};
use crate::notification::{
    adapters::memory::RecordingNotifier,
    services::{NotificationDispatcher, NotificationSettings},
};
use crate::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{
        Assignment, Attachment, CreatedBy, HistoryEntry, NewTask, Task, TaskId, TaskPriority,
        TaskStatus,
    },
    ports::{
        AssignmentRepository, AttachmentRepository, HistoryRepository, TaskRepository,
        TaskRepositoryError, TaskRepositoryResult,
    },
    services::{ReminderSweepService, TaskLifecycleService},
};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Clock pinned to an instant that tests move by hand.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut current = self.now.write().expect("clock lock");
        *current += by;
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.read().expect("clock lock")
    }
}

/// 2026-03-02 09:00 UTC, a Monday.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .expect("valid instant")
}

pub fn user(email: &str, name: &str, role: Role, department: Option<&str>) -> User {
    let base = User::new(EmailAddress::new(email).expect("valid email"), name, role);
    match department {
        Some(code) => base.with_department(Department::new(code).expect("valid department")),
        None => base,
    }
}

/// Builds a task directly, bypassing the lifecycle service.
pub fn bare_task(clock: &FixedClock, due_date: DateTime<Utc>, status: TaskStatus) -> Task {
    Task::new(
        NewTask {
            title: "Prepare lab report".to_owned(),
            description: String::new(),
            priority: TaskPriority::Medium,
            status,
            due_date,
            created_by: CreatedBy::Label("Registrar".to_owned()),
            reminder1: None,
            reminder2: None,
            parent_task: None,
        },
        clock,
    )
    .expect("valid task")
}

pub type TestDispatcher = NotificationDispatcher<InMemoryUserDirectory, RecordingNotifier>;
pub type TestService =
    TaskLifecycleService<InMemoryTaskStore, InMemoryUserDirectory, RecordingNotifier, FixedClock>;
pub type TestSweep =
    ReminderSweepService<InMemoryTaskStore, InMemoryUserDirectory, RecordingNotifier>;

/// In-memory wiring with a small seeded faculty.
///
/// CS has a head and one faculty member, EE likewise, plus one admin and
/// one staff account.
pub struct Harness {
    pub store: Arc<InMemoryTaskStore>,
    pub directory: Arc<InMemoryUserDirectory>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<FixedClock>,
    pub admin: User,
    pub staff: User,
    pub hod_cs: User,
    pub hod_ee: User,
    pub alice: User,
    pub bob: User,
}

impl Harness {
    pub fn new() -> Self {
        let directory = InMemoryUserDirectory::new();
        let admin = user("admin@uni.edu", "Ada Admin", Role::Admin, None);
        let staff = user("office@uni.edu", "Office", Role::Staff, None);
        let hod_cs = user("hod.cs@uni.edu", "Head CS", Role::Hod, Some("CS"));
        let hod_ee = user("hod.ee@uni.edu", "Head EE", Role::Hod, Some("EE"));
        let alice = user("alice@uni.edu", "Alice", Role::Faculty, Some("CS"));
        let bob = user("bob@uni.edu", "Bob", Role::Faculty, Some("EE"));
        for seeded in [&admin, &staff, &hod_cs, &hod_ee, &alice, &bob] {
            directory.insert(seeded.clone()).expect("seed user");
        }
        Self {
            store: Arc::new(InMemoryTaskStore::new()),
            directory: Arc::new(directory),
            notifier: Arc::new(RecordingNotifier::new()),
            clock: Arc::new(FixedClock::at(epoch())),
            admin,
            staff,
            hod_cs,
            hod_ee,
            alice,
            bob,
        }
    }

    pub fn dispatcher(&self) -> TestDispatcher {
        NotificationDispatcher::new(
            Arc::clone(&self.directory),
            Arc::clone(&self.notifier),
            NotificationSettings::new("https://tasks.uni.edu/"),
        )
    }

    pub fn service(&self) -> TestService {
        TaskLifecycleService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.directory),
            self.dispatcher(),
            Arc::clone(&self.clock),
        )
    }

    pub fn sweep(&self) -> TestSweep {
        ReminderSweepService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.directory),
            self.dispatcher(),
        )
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

/// Directory whose backend is unreachable.
pub struct OfflineDirectory;

fn offline() -> UserDirectoryError {
    UserDirectoryError::persistence(std::io::Error::other("directory offline"))
}

#[async_trait]
impl UserDirectory for OfflineDirectory {
    async fn find_by_email(&self, _email: &EmailAddress) -> UserDirectoryResult<Option<User>> {
        Err(offline())
    }

    async fn find_by_id(&self, _id: UserId) -> UserDirectoryResult<Option<User>> {
        Err(offline())
    }

    async fn find_department_head(
        &self,
        _department: &Department,
    ) -> UserDirectoryResult<Option<User>> {
        Err(offline())
    }

    async fn list_admins(&self) -> UserDirectoryResult<Vec<User>> {
        Err(offline())
    }
}

fn store_offline() -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other("store offline"))
}

/// In-memory store with switchable faults.
///
/// Every call is delegated to `inner` unless a fault is armed.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: InMemoryTaskStore,
    unreadable_rows: AtomicUsize,
    fail_assignment_writes: AtomicBool,
    assignment_reads_left: RwLock<Option<usize>>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `count` undecodable records to every scan.
    pub fn add_unreadable_rows(&self, count: usize) {
        self.unreadable_rows.fetch_add(count, Ordering::SeqCst);
    }

    pub fn fail_assignment_writes(&self) {
        self.fail_assignment_writes.store(true, Ordering::SeqCst);
    }

    /// Lets `reads` more assignment lookups through, then fails the rest.
    pub fn fail_assignment_reads_after(&self, reads: usize) {
        *self.assignment_reads_left.write().expect("fault lock") = Some(reads);
    }

    fn take_assignment_read(&self) -> bool {
        let mut left = self.assignment_reads_left.write().expect("fault lock");
        match left.as_mut() {
            None => true,
            Some(0) => false,
            Some(remaining) => {
                *remaining -= 1;
                true
            }
        }
    }
}

#[async_trait]
impl TaskRepository for FaultyStore {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        self.inner.store(task).await
    }

    async fn save_with_history(
        &self,
        task: &Task,
        entry: &HistoryEntry,
    ) -> TaskRepositoryResult<()> {
        self.inner.save_with_history(task, entry).await
    }

    async fn update_status_if(
        &self,
        id: TaskId,
        expected: TaskStatus,
        status: TaskStatus,
    ) -> TaskRepositoryResult<bool> {
        self.inner.update_status_if(id, expected, status).await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.inner.find_by_id(id).await
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.inner.list_all().await
    }

    async fn scan_all(&self) -> TaskRepositoryResult<Vec<TaskRepositoryResult<Task>>> {
        let mut records = self.inner.scan_all().await?;
        for _ in 0..self.unreadable_rows.load(Ordering::SeqCst) {
            records.insert(
                0,
                Err(TaskRepositoryError::invalid_persisted_data(
                    std::io::Error::other("unknown task status: archived"),
                )),
            );
        }
        Ok(records)
    }

    async fn find_subtasks(&self, parent: TaskId) -> TaskRepositoryResult<Vec<Task>> {
        self.inner.find_subtasks(parent).await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.inner.delete(id).await
    }
}

#[async_trait]
impl AssignmentRepository for FaultyStore {
    async fn replace_for_task(
        &self,
        task_id: TaskId,
        assignments: &[Assignment],
    ) -> TaskRepositoryResult<()> {
        if self.fail_assignment_writes.load(Ordering::SeqCst) {
            return Err(store_offline());
        }
        self.inner.replace_for_task(task_id, assignments).await
    }

    async fn assignments_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Assignment>> {
        if !self.take_assignment_read() {
            return Err(store_offline());
        }
        self.inner.assignments_for(task_id).await
    }
}

#[async_trait]
impl HistoryRepository for FaultyStore {
    async fn append(&self, entry: &HistoryEntry) -> TaskRepositoryResult<()> {
        self.inner.append(entry).await
    }

    async fn history_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<HistoryEntry>> {
        self.inner.history_for(task_id).await
    }

    async fn list_recent(&self, limit: usize) -> TaskRepositoryResult<Vec<HistoryEntry>> {
        self.inner.list_recent(limit).await
    }
}

#[async_trait]
impl AttachmentRepository for FaultyStore {
    async fn store_attachment(&self, attachment: &Attachment) -> TaskRepositoryResult<()> {
        self.inner.store_attachment(attachment).await
    }

    async fn attachments_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Attachment>> {
        self.inner.attachments_for(task_id).await
    }
}
