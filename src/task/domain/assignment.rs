//! Links between tasks and their assignees.

use super::TaskId;
use crate::identity::domain::{Department, User, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One assignee on a task.
///
/// The department is a copy of the assignee's home department taken when
/// the assignment was made, so department-scoped access keeps working after
/// the assignee moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    task_id: TaskId,
    assignee: UserId,
    department: Department,
    assigned_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAssignmentData {
    /// Owning task.
    pub task_id: TaskId,
    /// Assigned user.
    pub assignee: UserId,
    /// Department snapshot.
    pub department: Department,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
    /// Per-assignee completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Assignment {
    /// Assigns `assignee` to a task, snapshotting their department.
    ///
    /// Assignees without a department are recorded under
    /// [`Department::GENERAL`].
    #[must_use]
    pub fn new(task_id: TaskId, assignee: &User, clock: &impl Clock) -> Self {
        let department = assignee
            .department()
            .cloned()
            .unwrap_or_else(Department::general);
        Self {
            task_id,
            assignee: assignee.id(),
            department,
            assigned_at: clock.utc(),
            completed_at: None,
        }
    }

    /// Reconstructs an assignment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAssignmentData) -> Self {
        Self {
            task_id: data.task_id,
            assignee: data.assignee,
            department: data.department,
            assigned_at: data.assigned_at,
            completed_at: data.completed_at,
        }
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the assigned user.
    #[must_use]
    pub const fn assignee(&self) -> UserId {
        self.assignee
    }

    /// Returns the department snapshot.
    #[must_use]
    pub const fn department(&self) -> &Department {
        &self.department
    }

    /// Returns when the assignment was made.
    #[must_use]
    pub const fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }

    /// Returns when this assignee finished, if tracked.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}
