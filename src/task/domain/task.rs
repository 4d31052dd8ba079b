//! Task aggregate root and its status/priority types.

use super::{FieldChanges, ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError, TaskId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Task lifecycle status.
///
/// Any status may move to any other; re-opening a completed task is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    #[default]
    Pending,
    /// Work is under way.
    Ongoing,
    /// Work is finished.
    Completed,
    /// The due date passed before completion.
    Overdue,
}

impl TaskStatus {
    /// Every status value, in declaration order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Ongoing, Self::Completed, Self::Overdue];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        }
    }

    /// Returns whether the status is `completed`.
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            "overdue" => Ok(Self::Overdue),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Needs immediate attention.
    Urgent,
    /// Above normal.
    High,
    /// Normal priority.
    #[default]
    Medium,
    /// Below normal.
    Low,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "urgent" => Ok(Self::Urgent),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

/// Who issued a task.
///
/// Requesters are either known accounts or free-text names typed by whoever
/// entered the task; consumers must handle both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CreatedBy {
    /// A user account.
    Identity(UserId),
    /// An opaque requester name.
    Label(String),
}

impl CreatedBy {
    /// Returns the account identifier when the creator is a known user.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Identity(id) => Some(*id),
            Self::Label(_) => None,
        }
    }
}

/// Parameter object for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Initial priority.
    pub priority: TaskPriority,
    /// Initial status.
    pub status: TaskStatus,
    /// Deadline.
    pub due_date: DateTime<Utc>,
    /// Requester.
    pub created_by: CreatedBy,
    /// First custom reminder.
    pub reminder1: Option<DateTime<Utc>>,
    /// Second custom reminder.
    pub reminder2: Option<DateTime<Utc>>,
    /// Parent task when this task is delegated work.
    pub parent_task: Option<TaskId>,
}

/// Parsed edit to apply to a task.
///
/// `None` leaves a field untouched. Reminder fields use a nested option so
/// an edit can clear a reminder (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New status.
    pub status: Option<TaskStatus>,
    /// New first reminder.
    pub reminder1: Option<Option<DateTime<Utc>>>,
    /// New second reminder.
    pub reminder2: Option<Option<DateTime<Utc>>>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    priority: TaskPriority,
    status: TaskStatus,
    due_date: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    created_by: CreatedBy,
    reminder1: Option<DateTime<Utc>>,
    reminder2: Option<DateTime<Utc>>,
    parent_task: Option<TaskId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted deadline.
    pub due_date: DateTime<Utc>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted requester.
    pub created_by: CreatedBy,
    /// Persisted first reminder.
    pub reminder1: Option<DateTime<Utc>>,
    /// Persisted second reminder.
    pub reminder2: Option<DateTime<Utc>>,
    /// Persisted parent task.
    pub parent_task: Option<TaskId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task.
    ///
    /// A task created directly in `completed` gets its completion timestamp
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(data: NewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = validated_title(&data.title)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            title,
            description: data.description,
            priority: data.priority,
            status: data.status,
            due_date: data.due_date,
            completed_at: data.status.is_completed().then_some(timestamp),
            created_by: data.created_by,
            reminder1: data.reminder1,
            reminder2: data.reminder2,
            parent_task: data.parent_task,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// Rows that break the completion invariant are repaired on load: a
    /// completed task without a timestamp takes its last update time, and a
    /// stale timestamp on any other status is dropped.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        let completed_at = if data.status.is_completed() {
            data.completed_at.or(Some(data.updated_at))
        } else {
            None
        };
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: data.status,
            due_date: data.due_date,
            completed_at,
            created_by: data.created_by,
            reminder1: data.reminder1,
            reminder2: data.reminder2,
            parent_task: data.parent_task,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns when the task was completed, if it is completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the requester.
    #[must_use]
    pub const fn created_by(&self) -> &CreatedBy {
        &self.created_by
    }

    /// Returns the first custom reminder.
    #[must_use]
    pub const fn reminder1(&self) -> Option<DateTime<Utc>> {
        self.reminder1
    }

    /// Returns the second custom reminder.
    #[must_use]
    pub const fn reminder2(&self) -> Option<DateTime<Utc>> {
        self.reminder2
    }

    /// Returns the parent task, if this is a subtask.
    #[must_use]
    pub const fn parent_task(&self) -> Option<TaskId> {
        self.parent_task
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks the task overdue when its deadline has passed.
    ///
    /// Completed and already-overdue tasks are left alone. Returns the
    /// previous status when the status changed, so a caller whose write
    /// fails can put it back with [`Task::replace_status`].
    pub fn evaluate_due(&mut self, now: DateTime<Utc>) -> Option<TaskStatus> {
        let is_open = !matches!(self.status, TaskStatus::Completed | TaskStatus::Overdue);
        if !is_open || self.due_date > now {
            return None;
        }
        let previous = self.status;
        self.status = TaskStatus::Overdue;
        Some(previous)
    }

    /// Overwrites the status without touching `updated_at`.
    ///
    /// Used to put back a status replaced by [`Task::evaluate_due`] and by
    /// stores that persist status-only writes. The completion timestamp is
    /// kept consistent with the new status.
    pub(crate) fn replace_status(&mut self, status: TaskStatus) {
        self.completed_at = if status.is_completed() {
            self.completed_at.or(Some(self.updated_at))
        } else {
            None
        };
        self.status = status;
    }

    /// Sets the status and keeps the completion timestamp consistent.
    ///
    /// Returns the fields that actually changed; setting the current status
    /// again yields an empty diff.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) -> FieldChanges {
        let mut changes = FieldChanges::new();
        self.apply_status(status, clock, &mut changes);
        if !changes.is_empty() {
            self.touch(clock);
        }
        changes
    }

    /// Applies a parsed edit, recording only fields whose value changes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the edit supplies a blank
    /// title. The task is left unchanged in that case.
    pub fn apply_edit(
        &mut self,
        edit: &TaskEdit,
        clock: &impl Clock,
    ) -> Result<FieldChanges, TaskDomainError> {
        let title = edit.title.as_deref().map(validated_title).transpose()?;
        let mut changes = FieldChanges::new();

        if let Some(new_title) = title {
            changes.record("title", text(&self.title), text(&new_title));
            self.title = new_title;
        }
        if let Some(description) = &edit.description {
            changes.record("description", text(&self.description), text(description));
            self.description.clone_from(description);
        }
        if let Some(due_date) = edit.due_date {
            changes.record("due_date", instant(self.due_date), instant(due_date));
            self.due_date = due_date;
        }
        if let Some(priority) = edit.priority {
            changes.record(
                "priority",
                text(self.priority.as_str()),
                text(priority.as_str()),
            );
            self.priority = priority;
        }
        if let Some(status) = edit.status {
            self.apply_status(status, clock, &mut changes);
        }
        if let Some(reminder) = edit.reminder1 {
            changes.record("reminder1", optional_instant(self.reminder1), optional_instant(reminder));
            self.reminder1 = reminder;
        }
        if let Some(reminder) = edit.reminder2 {
            changes.record("reminder2", optional_instant(self.reminder2), optional_instant(reminder));
            self.reminder2 = reminder;
        }

        if !changes.is_empty() {
            self.touch(clock);
        }
        Ok(changes)
    }

    fn apply_status(&mut self, status: TaskStatus, clock: &impl Clock, changes: &mut FieldChanges) {
        if status == self.status {
            return;
        }
        changes.record("status", text(self.status.as_str()), text(status.as_str()));
        let completed_at = if status.is_completed() {
            self.completed_at.or_else(|| Some(clock.utc()))
        } else {
            None
        };
        changes.record(
            "completed_at",
            optional_instant(self.completed_at),
            optional_instant(completed_at),
        );
        self.status = status;
        self.completed_at = completed_at;
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn validated_title(raw: &str) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

fn text(value: &str) -> Value {
    Value::String(value.to_owned())
}

fn instant(value: DateTime<Utc>) -> Value {
    Value::String(value.to_rfc3339())
}

fn optional_instant(value: Option<DateTime<Utc>>) -> Value {
    value.map_or(Value::Null, instant)
}
