//! Append-only audit trail for tasks.

use super::{FieldChange, FieldChanges, HistoryEntryId, ParseHistoryActionError, TaskId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of action recorded in a task's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    /// The task was created.
    Created,
    /// Assignees were attached.
    Assigned,
    /// One or more task fields were edited.
    Updated,
    /// Only the status changed.
    StatusChanged,
    /// The status moved into `completed`.
    Completed,
    /// A subtask was delegated from this task.
    Delegated,
}

impl HistoryAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Assigned => "assigned",
            Self::Updated => "updated",
            Self::StatusChanged => "status_changed",
            Self::Completed => "completed",
            Self::Delegated => "delegated",
        }
    }
}

impl TryFrom<&str> for HistoryAction {
    type Error = ParseHistoryActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "created" => Ok(Self::Created),
            "assigned" => Ok(Self::Assigned),
            "updated" => Ok(Self::Updated),
            "status_changed" => Ok(Self::StatusChanged),
            "completed" => Ok(Self::Completed),
            "delegated" => Ok(Self::Delegated),
            _ => Err(ParseHistoryActionError(value.to_owned())),
        }
    }
}

/// Structured payload stored with a history entry.
///
/// Serialized without a tag; the persisted JSON shapes are
/// `{changes, updated_fields}`, `{departments, assignees}`, and
/// `{subtask_id, assignees}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryDetails {
    /// Field-level diff of an edit or status change.
    Changes {
        /// Old and new value per changed field.
        changes: BTreeMap<String, FieldChange>,
        /// Changed field names in edit order.
        updated_fields: Vec<String>,
    },
    /// Departments and assignee emails given at creation.
    Created {
        /// Departments named by the creator.
        departments: Vec<String>,
        /// Assignee emails.
        assignees: Vec<String>,
    },
    /// Subtask delegated from the task.
    Delegated {
        /// The new subtask.
        subtask_id: TaskId,
        /// Subtask assignee emails.
        assignees: Vec<String>,
    },
}

impl From<&FieldChanges> for HistoryDetails {
    fn from(changes: &FieldChanges) -> Self {
        Self::Changes {
            changes: changes.to_map(),
            updated_fields: changes.field_names(),
        }
    }
}

/// Immutable audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    id: HistoryEntryId,
    task_id: TaskId,
    action: HistoryAction,
    performed_by: Option<UserId>,
    timestamp: DateTime<Utc>,
    details: HistoryDetails,
}

/// Parameter object for reconstructing a persisted history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedHistoryData {
    /// Persisted identifier.
    pub id: HistoryEntryId,
    /// Owning task.
    pub task_id: TaskId,
    /// Recorded action.
    pub action: HistoryAction,
    /// Acting user; `None` for system actions.
    pub performed_by: Option<UserId>,
    /// Recording time.
    pub timestamp: DateTime<Utc>,
    /// Structured payload.
    pub details: HistoryDetails,
}

impl HistoryEntry {
    /// Records an action on a task at the current clock time.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        action: HistoryAction,
        performed_by: Option<UserId>,
        details: HistoryDetails,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: HistoryEntryId::new(),
            task_id,
            action,
            performed_by,
            timestamp: clock.utc(),
            details,
        }
    }

    /// Reconstructs a history entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedHistoryData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            action: data.action,
            performed_by: data.performed_by,
            timestamp: data.timestamp,
            details: data.details,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryEntryId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the recorded action.
    #[must_use]
    pub const fn action(&self) -> HistoryAction {
        self.action
    }

    /// Returns the acting user, or `None` for system actions.
    #[must_use]
    pub const fn performed_by(&self) -> Option<UserId> {
        self.performed_by
    }

    /// Returns the recording time.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the structured payload.
    #[must_use]
    pub const fn details(&self) -> &HistoryDetails {
        &self.details
    }
}
