//! Diesel row models for task persistence.

use super::schema::{task_assignments, task_attachments, task_history, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Task row used for reads, inserts, and full overwrites.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Priority name.
    pub priority: String,
    /// Status name.
    pub status: String,
    /// Deadline.
    pub due_date: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Requester JSON payload.
    pub created_by: Value,
    /// First custom reminder.
    pub reminder1: Option<DateTime<Utc>>,
    /// Second custom reminder.
    pub reminder2: Option<DateTime<Utc>>,
    /// Parent task identifier.
    pub parent_task: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Assignment row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AssignmentRow {
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Assigned user.
    pub assignee: uuid::Uuid,
    /// Department snapshot.
    pub department: String,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
    /// Per-assignee completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Position within the set.
    pub position: i32,
}

/// History row as read back, including the insertion sequence.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Action name.
    pub action: String,
    /// Acting user.
    pub performed_by: Option<uuid::Uuid>,
    /// Action timestamp.
    pub timestamp: DateTime<Utc>,
    /// Details payload.
    pub details: Value,
}

/// Insert model for history rows; the sequence is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_history)]
pub struct NewHistoryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Action name.
    pub action: String,
    /// Acting user.
    pub performed_by: Option<uuid::Uuid>,
    /// Action timestamp.
    pub timestamp: DateTime<Utc>,
    /// Details payload.
    pub details: Value,
}

/// Attachment row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_attachments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttachmentRow {
    /// Attachment identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Storage reference.
    pub file_ref: String,
    /// File name.
    pub file_name: String,
    /// File size in bytes.
    pub file_size: i64,
    /// Uploading user.
    pub uploaded_by: uuid::Uuid,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}
