//! Repository ports for tasks and the records they own.

use crate::identity::domain::UserId;
use crate::task::domain::{Assignment, Attachment, HistoryEntry, Task, TaskId, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists or [`TaskRepositoryError::NotFound`] when the parent task does
    /// not exist.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Overwrites an existing task and appends a history entry in one
    /// atomic step.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn save_with_history(
        &self,
        task: &Task,
        entry: &HistoryEntry,
    ) -> TaskRepositoryResult<()>;

    /// Writes only the status column of a task, and only while the stored
    /// status still equals `expected`.
    ///
    /// Used by deadline evaluation so concurrent edits are not overwritten.
    /// Returns `false` when the stored status had already moved on and
    /// nothing was written.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update_status_if(
        &self,
        id: TaskId,
        expected: TaskStatus,
        status: TaskStatus,
    ) -> TaskRepositoryResult<bool>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every readable task, newest first.
    ///
    /// Records that cannot be reconstructed are left out.
    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns every task record, newest first, each decoded on its own.
    ///
    /// The outer error means the listing itself failed; an inner error marks
    /// one record that cannot be reconstructed without hiding the others.
    async fn scan_all(&self) -> TaskRepositoryResult<Vec<TaskRepositoryResult<Task>>>;

    /// Returns the direct subtasks of a task, newest first.
    async fn find_subtasks(&self, parent: TaskId) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes a task together with its subtasks, assignments, history, and
    /// attachments.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;
}

/// Assignment persistence contract.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Replaces every assignment of a task in one atomic step.
    ///
    /// Either the full new set is stored or the previous set is kept.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or [`TaskRepositoryError::DuplicateAssignment`] when the new set names
    /// an assignee twice.
    async fn replace_for_task(
        &self,
        task_id: TaskId,
        assignments: &[Assignment],
    ) -> TaskRepositoryResult<()>;

    /// Returns the assignments of a task in assignment order.
    async fn assignments_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Assignment>>;
}

/// History persistence contract.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Appends a history entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn append(&self, entry: &HistoryEntry) -> TaskRepositoryResult<()>;

    /// Returns the history of a task, newest first.
    async fn history_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<HistoryEntry>>;

    /// Returns the newest entries across all tasks, newest first.
    async fn list_recent(&self, limit: usize) -> TaskRepositoryResult<Vec<HistoryEntry>>;
}

/// Attachment persistence contract.
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    /// Stores an attachment record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn store_attachment(&self, attachment: &Attachment) -> TaskRepositoryResult<()>;

    /// Returns the attachments of a task in upload order.
    async fn attachments_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Attachment>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The same assignee appears twice for one task.
    #[error("user {assignee} is already assigned to task {task_id}")]
    DuplicateAssignment {
        /// Task being assigned.
        task_id: TaskId,
        /// Repeated assignee.
        assignee: UserId,
    },

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Every task port implemented by one backing store.
///
/// Services that write a task and its owned records together depend on
/// this so a single adapter instance serves all four ports.
pub trait TaskStore:
    TaskRepository + AssignmentRepository + HistoryRepository + AttachmentRepository
{
}

impl<T> TaskStore for T where
    T: TaskRepository + AssignmentRepository + HistoryRepository + AttachmentRepository
{
}
