//! `PostgreSQL` store implementing every task port.

use super::{
    models::{AssignmentRow, AttachmentRow, HistoryRow, NewHistoryRow, TaskRow},
    schema::{task_assignments, task_attachments, task_history, tasks},
};
use crate::identity::domain::{Department, UserId};
use crate::task::{
    domain::{
        Assignment, Attachment, AttachmentId, CreatedBy, HistoryAction, HistoryDetails,
        HistoryEntry, HistoryEntryId, PersistedAssignmentData, PersistedAttachmentData,
        PersistedHistoryData, PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus,
    },
    ports::{
        AssignmentRepository, AttachmentRepository, HistoryRepository, TaskRepository,
        TaskRepositoryError, TaskRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashSet;
use tracing::warn;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed store for tasks and the records they own.
///
/// Child tables reference `tasks` with `ON DELETE CASCADE`, and subtasks
/// reference their parent the same way, so deleting a task removes its
/// whole subtree.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskStore {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let parent = task.parent_task();
        let row = to_task_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        parent.map_or_else(
                            || TaskRepositoryError::persistence(err),
                            TaskRepositoryError::NotFound,
                        )
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn save_with_history(
        &self,
        task: &Task,
        entry: &HistoryEntry,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_task_row(task)?;
        let history_row = to_history_row(entry)?;

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    let updated = diesel::update(tasks::table.find(row.id))
                        .set(&row)
                        .execute(tx)?;
                    if updated == 0 {
                        return Err(DieselError::NotFound);
                    }
                    diesel::insert_into(task_history::table)
                        .values(&history_row)
                        .execute(tx)?;
                    Ok(())
                })
                .map_err(|err| not_found_or_persistence(err, task_id))
        })
        .await
    }

    async fn update_status_if(
        &self,
        id: TaskId,
        expected: TaskStatus,
        status: TaskStatus,
    ) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                tasks::table
                    .find(id.into_inner())
                    .filter(tasks::status.eq(expected.as_str())),
            )
            .set(tasks::status.eq(status.as_str()))
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            if updated > 0 {
                return Ok(true);
            }
            let exists = diesel::select(diesel::dsl::exists(tasks::table.find(id.into_inner())))
                .get_result::<bool>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if exists {
                Ok(false)
            } else {
                Err(TaskRepositoryError::NotFound(id))
            }
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(|connection| {
            let rows = tasks::table
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(readable(decode_rows(rows)))
        })
        .await
    }

    async fn scan_all(&self) -> TaskRepositoryResult<Vec<TaskRepositoryResult<Task>>> {
        self.run_blocking(|connection| {
            let rows = tasks::table
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(decode_rows(rows))
        })
        .await
    }

    async fn find_subtasks(&self, parent: TaskId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::parent_task.eq(parent.into_inner()))
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(readable(decode_rows(rows)))
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl AssignmentRepository for PostgresTaskStore {
    async fn replace_for_task(
        &self,
        task_id: TaskId,
        assignments: &[Assignment],
    ) -> TaskRepositoryResult<()> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = assignments
            .iter()
            .find(|assignment| !seen.insert(assignment.assignee()))
        {
            return Err(TaskRepositoryError::DuplicateAssignment {
                task_id,
                assignee: duplicate.assignee(),
            });
        }
        let rows = assignments
            .iter()
            .enumerate()
            .map(|(position, assignment)| to_assignment_row(assignment, position))
            .collect::<TaskRepositoryResult<Vec<_>>>()?;

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    let exists = tasks::table
                        .find(task_id.into_inner())
                        .select(tasks::id)
                        .for_update()
                        .first::<uuid::Uuid>(tx)
                        .optional()?;
                    if exists.is_none() {
                        return Err(DieselError::NotFound);
                    }
                    diesel::delete(
                        task_assignments::table
                            .filter(task_assignments::task_id.eq(task_id.into_inner())),
                    )
                    .execute(tx)?;
                    diesel::insert_into(task_assignments::table)
                        .values(&rows)
                        .execute(tx)?;
                    Ok(())
                })
                .map_err(|err| not_found_or_persistence(err, task_id))
        })
        .await
    }

    async fn assignments_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Assignment>> {
        self.run_blocking(move |connection| {
            let rows = task_assignments::table
                .filter(task_assignments::task_id.eq(task_id.into_inner()))
                .order(task_assignments::position.asc())
                .select(AssignmentRow::as_select())
                .load::<AssignmentRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_assignment).collect()
        })
        .await
    }
}

#[async_trait]
impl HistoryRepository for PostgresTaskStore {
    async fn append(&self, entry: &HistoryEntry) -> TaskRepositoryResult<()> {
        let task_id = entry.task_id();
        let row = to_history_row(entry)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(task_history::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| foreign_key_or_persistence(err, task_id))?;
            Ok(())
        })
        .await
    }

    async fn history_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<HistoryEntry>> {
        self.run_blocking(move |connection| {
            let rows = task_history::table
                .filter(task_history::task_id.eq(task_id.into_inner()))
                .order(task_history::seq.desc())
                .select(HistoryRow::as_select())
                .load::<HistoryRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_history).collect()
        })
        .await
    }

    async fn list_recent(&self, limit: usize) -> TaskRepositoryResult<Vec<HistoryEntry>> {
        let row_limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.run_blocking(move |connection| {
            let rows = task_history::table
                .order(task_history::seq.desc())
                .limit(row_limit)
                .select(HistoryRow::as_select())
                .load::<HistoryRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_history).collect()
        })
        .await
    }
}

#[async_trait]
impl AttachmentRepository for PostgresTaskStore {
    async fn store_attachment(&self, attachment: &Attachment) -> TaskRepositoryResult<()> {
        let task_id = attachment.task_id();
        let row = to_attachment_row(attachment)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(task_attachments::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| foreign_key_or_persistence(err, task_id))?;
            Ok(())
        })
        .await
    }

    async fn attachments_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Attachment>> {
        self.run_blocking(move |connection| {
            let rows = task_attachments::table
                .filter(task_attachments::task_id.eq(task_id.into_inner()))
                .order((task_attachments::uploaded_at.asc(), task_attachments::id.asc()))
                .select(AttachmentRow::as_select())
                .load::<AttachmentRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_attachment).collect()
        })
        .await
    }
}

fn not_found_or_persistence(err: DieselError, task_id: TaskId) -> TaskRepositoryError {
    match err {
        DieselError::NotFound => TaskRepositoryError::NotFound(task_id),
        other => TaskRepositoryError::persistence(other),
    }
}

fn foreign_key_or_persistence(err: DieselError, task_id: TaskId) -> TaskRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            TaskRepositoryError::NotFound(task_id)
        }
        other => TaskRepositoryError::persistence(other),
    }
}

fn to_task_row(task: &Task) -> TaskRepositoryResult<TaskRow> {
    let created_by =
        serde_json::to_value(task.created_by()).map_err(TaskRepositoryError::persistence)?;
    Ok(TaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        due_date: task.due_date(),
        completed_at: task.completed_at(),
        created_by,
        reminder1: task.reminder1(),
        reminder2: task.reminder2(),
        parent_task: task.parent_task().map(TaskId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let status = TaskStatus::try_from(row.status.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let priority = TaskPriority::try_from(row.priority.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let created_by = serde_json::from_value::<CreatedBy>(row.created_by)
        .map_err(TaskRepositoryError::invalid_persisted_data)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        priority,
        status,
        due_date: row.due_date,
        completed_at: row.completed_at,
        created_by,
        reminder1: row.reminder1,
        reminder2: row.reminder2,
        parent_task: row.parent_task.map(TaskId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn to_assignment_row(assignment: &Assignment, index: usize) -> TaskRepositoryResult<AssignmentRow> {
    let position = i32::try_from(index).map_err(TaskRepositoryError::persistence)?;
    Ok(AssignmentRow {
        task_id: assignment.task_id().into_inner(),
        assignee: assignment.assignee().into_inner(),
        department: assignment.department().as_str().to_owned(),
        assigned_at: assignment.assigned_at(),
        completed_at: assignment.completed_at(),
        position,
    })
}

/// Decodes each row independently.
fn decode_rows(rows: Vec<TaskRow>) -> Vec<TaskRepositoryResult<Task>> {
    rows.into_iter().map(row_to_task).collect()
}

/// Keeps the decoded tasks, logging every row that could not be read.
fn readable(decoded: Vec<TaskRepositoryResult<Task>>) -> Vec<Task> {
    decoded
        .into_iter()
        .filter_map(|record| match record {
            Ok(task) => Some(task),
            Err(err) => {
                warn!(error = %err, "skipping unreadable task row");
                None
            }
        })
        .collect()
}

fn row_to_assignment(row: AssignmentRow) -> TaskRepositoryResult<Assignment> {
    let department =
        Department::new(&row.department).map_err(TaskRepositoryError::invalid_persisted_data)?;
    Ok(Assignment::from_persisted(PersistedAssignmentData {
        task_id: TaskId::from_uuid(row.task_id),
        assignee: UserId::from_uuid(row.assignee),
        department,
        assigned_at: row.assigned_at,
        completed_at: row.completed_at,
    }))
}

fn to_history_row(entry: &HistoryEntry) -> TaskRepositoryResult<NewHistoryRow> {
    let details = serde_json::to_value(entry.details()).map_err(TaskRepositoryError::persistence)?;
    Ok(NewHistoryRow {
        id: entry.id().into_inner(),
        task_id: entry.task_id().into_inner(),
        action: entry.action().as_str().to_owned(),
        performed_by: entry.performed_by().map(UserId::into_inner),
        timestamp: entry.timestamp(),
        details,
    })
}

fn row_to_history(row: HistoryRow) -> TaskRepositoryResult<HistoryEntry> {
    let action = HistoryAction::try_from(row.action.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let details = serde_json::from_value::<HistoryDetails>(row.details)
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    Ok(HistoryEntry::from_persisted(PersistedHistoryData {
        id: HistoryEntryId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        action,
        performed_by: row.performed_by.map(UserId::from_uuid),
        timestamp: row.timestamp,
        details,
    }))
}

fn to_attachment_row(attachment: &Attachment) -> TaskRepositoryResult<AttachmentRow> {
    let file_size = i64::try_from(attachment.file_size()).map_err(TaskRepositoryError::persistence)?;
    Ok(AttachmentRow {
        id: attachment.id().into_inner(),
        task_id: attachment.task_id().into_inner(),
        file_ref: attachment.file_ref().to_owned(),
        file_name: attachment.file_name().to_owned(),
        file_size,
        uploaded_by: attachment.uploaded_by().into_inner(),
        uploaded_at: attachment.uploaded_at(),
    })
}

fn row_to_attachment(row: AttachmentRow) -> TaskRepositoryResult<Attachment> {
    let file_size =
        u64::try_from(row.file_size).map_err(TaskRepositoryError::invalid_persisted_data)?;
    Ok(Attachment::from_persisted(PersistedAttachmentData {
        id: AttachmentId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        file_ref: row.file_ref,
        file_name: row.file_name,
        file_size,
        uploaded_by: UserId::from_uuid(row.uploaded_by),
        uploaded_at: row.uploaded_at,
    }))
}
