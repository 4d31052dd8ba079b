//! Service-level errors for task operations.

use crate::identity::ports::UserDirectoryError;
use crate::task::{
    domain::{AccessRule, TaskDomainError, TaskId, TaskOperation},
    ports::TaskRepositoryError,
};
use std::fmt;
use thiserror::Error;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Input field name.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found while validating a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed: {}", join_violations(.violations))]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Records a violation.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    /// Returns whether nothing was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the recorded violations in discovery order.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns whether any violation names `field`.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|violation| violation.field == field)
    }

    /// Returns `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the collection itself when it holds any violation.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors returned by task services.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Request input was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// A status string is not one of the four task statuses.
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// Assignee emails that do not belong to any user.
    #[error("unknown assignee(s): {}", .0.join(", "))]
    UnknownAssignee(Vec<String>),

    /// The actor may not perform the operation.
    #[error("permission denied for {operation}: {rule}")]
    PermissionDenied {
        /// Operation that was refused.
        operation: TaskOperation,
        /// Decision-table rule that refused it.
        rule: AccessRule,
    },

    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),

    /// User directory lookup failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),
}

impl From<TaskRepositoryError> for TaskServiceError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;
