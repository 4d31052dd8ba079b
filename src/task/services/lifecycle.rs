//! Service layer for task creation, edits, deletion, and queries.

use super::{
    AssignmentSetService, ResolvedAssignees, TaskServiceError, TaskServiceResult,
    ValidationErrors,
};
use crate::identity::{
    domain::{Department, User},
    ports::UserDirectory,
};
use crate::notification::{
    domain::NotificationKind, ports::Notifier, services::NotificationDispatcher,
};
use crate::task::{
    domain::{
        AccessDecision, Assignment, Attachment, CreatedBy, HistoryAction, HistoryDetails,
        HistoryEntry, NewAttachment, NewTask, Task, TaskDomainError, TaskEdit, TaskId,
        TaskOperation, TaskPriority, TaskStatus, permission,
        timestamp::{parse_optional_timestamp, parse_timestamp},
    },
    ports::TaskStore,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request payload for creating a task.
///
/// Dates, priority, and status arrive as raw strings and are validated
/// together so every problem is reported at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    priority: Option<String>,
    status: Option<String>,
    due_date: String,
    reminder1: Option<String>,
    reminder2: Option<String>,
    created_by: CreatedBy,
    assignees: Vec<String>,
    departments: Option<Vec<String>>,
    parent_task: Option<TaskId>,
    attachment: Option<NewAttachment>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        due_date: impl Into<String>,
        created_by: CreatedBy,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: None,
            status: None,
            due_date: due_date.into(),
            reminder1: None,
            reminder2: None,
            created_by,
            assignees: Vec::new(),
            departments: None,
            parent_task: None,
            attachment: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the raw priority name.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the raw initial status name.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the raw first reminder time.
    #[must_use]
    pub fn with_reminder1(mut self, reminder: impl Into<String>) -> Self {
        self.reminder1 = Some(reminder.into());
        self
    }

    /// Sets the raw second reminder time.
    #[must_use]
    pub fn with_reminder2(mut self, reminder: impl Into<String>) -> Self {
        self.reminder2 = Some(reminder.into());
        self
    }

    /// Sets the assignee emails.
    #[must_use]
    pub fn with_assignees<I, S>(mut self, assignees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignees = assignees.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts assignees to the given departments.
    #[must_use]
    pub fn with_departments<I, S>(mut self, departments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.departments = Some(departments.into_iter().map(Into::into).collect());
        self
    }

    /// Makes the new task a subtask of `parent`.
    #[must_use]
    pub const fn with_parent(mut self, parent: TaskId) -> Self {
        self.parent_task = Some(parent);
        self
    }

    /// Attaches a file record to the new task.
    #[must_use]
    pub fn with_attachment(mut self, attachment: NewAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Partial update of a task.
///
/// Absent fields are left alone. A blank reminder clears it. A present
/// assignee list replaces the whole assignment set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<String>,
    description: Option<String>,
    due_date: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    reminder1: Option<String>,
    reminder2: Option<String>,
    assignees: Option<Vec<String>>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a new raw deadline.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Sets a new raw priority name.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets a new raw status name.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets or, when blank, clears the first reminder.
    #[must_use]
    pub fn with_reminder1(mut self, reminder: impl Into<String>) -> Self {
        self.reminder1 = Some(reminder.into());
        self
    }

    /// Sets or, when blank, clears the second reminder.
    #[must_use]
    pub fn with_reminder2(mut self, reminder: impl Into<String>) -> Self {
        self.reminder2 = Some(reminder.into());
        self
    }

    /// Replaces the assignee list.
    #[must_use]
    pub fn with_assignees<I, S>(mut self, assignees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignees = Some(assignees.into_iter().map(Into::into).collect());
        self
    }

    fn to_edit(&self) -> Result<TaskEdit, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
            errors.push("title", "must not be empty");
        }
        let due_date = collect(
            &mut errors,
            "due_date",
            self.due_date.as_deref().map(parse_timestamp).transpose(),
        );
        let priority = collect(
            &mut errors,
            "priority",
            self.priority.as_deref().map(TaskPriority::try_from).transpose(),
        );
        let status = collect(
            &mut errors,
            "status",
            self.status.as_deref().map(TaskStatus::try_from).transpose(),
        );
        let reminder1 = collect(
            &mut errors,
            "reminder1",
            self.reminder1.as_deref().map(parse_optional_timestamp).transpose(),
        );
        let reminder2 = collect(
            &mut errors,
            "reminder2",
            self.reminder2.as_deref().map(parse_optional_timestamp).transpose(),
        );
        errors.into_result()?;

        Ok(TaskEdit {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: due_date.flatten(),
            priority: priority.flatten(),
            status: status.flatten(),
            reminder1: reminder1.flatten(),
            reminder2: reminder2.flatten(),
        })
    }
}

/// A task with everything it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    /// The task itself.
    pub task: Task,
    /// Current assignments in assignment order.
    pub assignments: Vec<Assignment>,
    /// History, newest first.
    pub history: Vec<HistoryEntry>,
    /// Attachments in upload order.
    pub attachments: Vec<Attachment>,
    /// Direct subtasks, newest first.
    pub subtasks: Vec<TaskId>,
}

/// Task counts shown on a user's dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Tasks the user can see.
    pub total: usize,
    /// Visible tasks in `completed`.
    pub completed: usize,
    /// Visible tasks in `pending`.
    pub pending: usize,
}

struct PreparedTask {
    new_task: NewTask,
    assignees: ResolvedAssignees,
    departments: Vec<String>,
    attachment: Option<NewAttachment>,
}

/// Task mutation orchestration service.
///
/// Authorizes through the permission decision table, writes the task and
/// its audit trail, and fires notifications last. Notification failures
/// never undo a committed change.
#[derive(Clone)]
pub struct TaskLifecycleService<S, D, N, C>
where
    S: TaskStore,
    D: UserDirectory,
    N: Notifier,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    directory: Arc<D>,
    assignments: AssignmentSetService<S, D, C>,
    dispatcher: NotificationDispatcher<D, N>,
    clock: Arc<C>,
}

impl<S, D, N, C> TaskLifecycleService<S, D, N, C>
where
    S: TaskStore,
    D: UserDirectory,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        directory: Arc<D>,
        dispatcher: NotificationDispatcher<D, N>,
        clock: Arc<C>,
    ) -> Self {
        let assignments = AssignmentSetService::new(
            Arc::clone(&store),
            Arc::clone(&directory),
            Arc::clone(&clock),
        );
        Self {
            store,
            directory,
            assignments,
            dispatcher,
            clock,
        }
    }

    /// Returns the assignment set service sharing this service's store.
    #[must_use]
    pub const fn assignment_service(&self) -> &AssignmentSetService<S, D, C> {
        &self.assignments
    }

    /// Creates a task with its assignments, audit entries, and optional
    /// attachment, then notifies each assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] listing every rejected field
    /// when the request is invalid; nothing is written in that case.
    /// Returns [`TaskServiceError::Repository`] or
    /// [`TaskServiceError::Directory`] when infrastructure fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskServiceResult<TaskDetails> {
        let PreparedTask {
            new_task,
            assignees,
            departments,
            attachment,
        } = self.prepare(request).await?;

        let task = Task::new(new_task, &*self.clock)?;
        let performed_by = task.created_by().user_id();
        self.store.store(&task).await?;

        let assignments = self
            .assignments
            .assign_resolved(task.id(), &assignees.users)
            .await?;
        let assignee_emails = assignees.emails();
        let created = HistoryEntry::new(
            task.id(),
            HistoryAction::Created,
            performed_by,
            HistoryDetails::Created {
                departments,
                assignees: assignee_emails.clone(),
            },
            &*self.clock,
        );
        self.store.append(&created).await?;

        if let Some(upload) = attachment {
            let record = Attachment::new(task.id(), upload, &*self.clock)?;
            self.store.store_attachment(&record).await?;
        }
        if let Some(parent) = task.parent_task() {
            let delegated = HistoryEntry::new(
                parent,
                HistoryAction::Delegated,
                performed_by,
                HistoryDetails::Delegated {
                    subtask_id: task.id(),
                    assignees: assignee_emails,
                },
                &*self.clock,
            );
            self.store.append(&delegated).await?;
        }

        info!(
            task_id = %task.id(),
            assignees = assignments.len(),
            "task created"
        );
        for user in &assignees.users {
            self.dispatcher
                .dispatch(NotificationKind::Assignment, &task, user)
                .await;
        }
        self.load_details(task).await
    }

    /// Applies a partial update on behalf of `actor`.
    ///
    /// Changed fields are written together with exactly one `updated`
    /// history entry; an update that changes nothing writes no history. A
    /// new assignee list replaces the assignment set without being diffed.
    /// The replacement is written before the field changes, so a failed
    /// replacement leaves the task and its history untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`],
    /// [`TaskServiceError::PermissionDenied`],
    /// [`TaskServiceError::Validation`], or
    /// [`TaskServiceError::UnknownAssignee`] before anything is written.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        patch: TaskPatch,
        actor: &User,
    ) -> TaskServiceResult<TaskDetails> {
        let mut task = self.require_task(task_id).await?;
        let current = self.store.assignments_for(task_id).await?;
        authorize(actor, &current, TaskOperation::Edit)?;

        let edit = patch.to_edit()?;
        if edit.status.is_some_and(TaskStatus::is_completed) && !task.status().is_completed() {
            authorize(actor, &current, TaskOperation::MarkComplete)?;
        }
        let replacement = match &patch.assignees {
            Some(emails) => {
                let resolved = self.assignments.resolve(emails).await?;
                if !resolved.is_complete() {
                    return Err(TaskServiceError::UnknownAssignee(resolved.unresolved));
                }
                Some(resolved.users)
            }
            None => None,
        };

        let previous_status = task.status();
        let changes = task.apply_edit(&edit, &*self.clock)?;
        let assignments = match replacement {
            Some(users) => self.assignments.assign_resolved(task_id, &users).await?,
            None => current,
        };
        if !changes.is_empty() {
            let entry = HistoryEntry::new(
                task_id,
                HistoryAction::Updated,
                Some(actor.id()),
                HistoryDetails::from(&changes),
                &*self.clock,
            );
            self.store.save_with_history(&task, &entry).await?;
            info!(task_id = %task_id, fields = ?changes.field_names(), "task updated");
        }
        if task.status() != previous_status {
            self.notify_status_change(&task, previous_status, &assignments)
                .await;
        }
        self.details_with(task, assignments).await
    }

    /// Sets a task's status from a raw status name.
    ///
    /// Entering `completed` is recorded as a `completed` action, every other
    /// change as `status_changed`. Setting the current status writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::InvalidStatus`] for unknown names,
    /// [`TaskServiceError::NotFound`], or
    /// [`TaskServiceError::PermissionDenied`].
    pub async fn set_status(
        &self,
        task_id: TaskId,
        raw_status: &str,
        actor: &User,
    ) -> TaskServiceResult<TaskDetails> {
        let status = TaskStatus::try_from(raw_status)
            .map_err(|err| TaskServiceError::InvalidStatus(err.0))?;
        let mut task = self.require_task(task_id).await?;
        let current = self.store.assignments_for(task_id).await?;
        authorize(actor, &current, TaskOperation::Edit)?;
        if status.is_completed() && !task.status().is_completed() {
            authorize(actor, &current, TaskOperation::MarkComplete)?;
        }

        let previous_status = task.status();
        let changes = task.set_status(status, &*self.clock);
        if changes.is_empty() {
            return self.details_with(task, current).await;
        }
        let action = if status.is_completed() {
            HistoryAction::Completed
        } else {
            HistoryAction::StatusChanged
        };
        let entry = HistoryEntry::new(
            task_id,
            action,
            Some(actor.id()),
            HistoryDetails::from(&changes),
            &*self.clock,
        );
        self.store.save_with_history(&task, &entry).await?;
        info!(
            task_id = %task_id,
            from = previous_status.as_str(),
            to = status.as_str(),
            "task status changed"
        );
        self.notify_status_change(&task, previous_status, &current)
            .await;
        self.details_with(task, current).await
    }

    /// Deletes a task and everything it owns, subtasks included.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] or
    /// [`TaskServiceError::PermissionDenied`].
    pub async fn delete_task(&self, task_id: TaskId, actor: &User) -> TaskServiceResult<()> {
        self.require_task(task_id).await?;
        let current = self.store.assignments_for(task_id).await?;
        authorize(actor, &current, TaskOperation::Delete)?;
        self.store.delete(task_id).await?;
        info!(task_id = %task_id, actor = %actor.id(), "task deleted");
        Ok(())
    }

    /// Loads a task with everything it owns, refreshing its overdue status
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn get_task(&self, task_id: TaskId) -> TaskServiceResult<TaskDetails> {
        let mut task = self.require_task(task_id).await?;
        self.evaluate_due(&mut task, self.clock.utc()).await;
        self.load_details(task).await
    }

    /// Loads a task after checking that `actor` may view it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] or
    /// [`TaskServiceError::PermissionDenied`].
    pub async fn view_task(&self, task_id: TaskId, actor: &User) -> TaskServiceResult<TaskDetails> {
        let mut task = self.require_task(task_id).await?;
        let current = self.store.assignments_for(task_id).await?;
        authorize(actor, &current, TaskOperation::View)?;
        self.evaluate_due(&mut task, self.clock.utc()).await;
        self.load_details(task).await
    }

    /// Returns every task `actor` may view, newest first, each refreshed by
    /// [`Self::evaluate_due`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when loading fails.
    pub async fn list_tasks(&self, actor: &User) -> TaskServiceResult<Vec<Task>> {
        let now = self.clock.utc();
        let mut visible = Vec::new();
        for mut task in self.store.list_all().await? {
            let assignments = self.store.assignments_for(task.id()).await?;
            if !permission::can(actor, &assignments, TaskOperation::View) {
                continue;
            }
            self.evaluate_due(&mut task, now).await;
            visible.push(task);
        }
        Ok(visible)
    }

    /// Counts the tasks `actor` may view by status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when loading fails.
    pub async fn dashboard(&self, actor: &User) -> TaskServiceResult<DashboardStats> {
        let tasks = self.list_tasks(actor).await?;
        Ok(DashboardStats {
            total: tasks.len(),
            completed: tasks
                .iter()
                .filter(|task| task.status() == TaskStatus::Completed)
                .count(),
            pending: tasks
                .iter()
                .filter(|task| task.status() == TaskStatus::Pending)
                .count(),
        })
    }

    /// Returns the newest history entries on tasks `actor` may view.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when loading fails.
    pub async fn recent_activity(
        &self,
        actor: &User,
        limit: usize,
    ) -> TaskServiceResult<Vec<HistoryEntry>> {
        if permission::can(actor, &[], TaskOperation::View) {
            return Ok(self.store.list_recent(limit).await?);
        }
        let mut entries = Vec::new();
        for task in self.store.list_all().await? {
            let assignments = self.store.assignments_for(task.id()).await?;
            if permission::can(actor, &assignments, TaskOperation::View) {
                entries.extend(self.store.history_for(task.id()).await?);
            }
        }
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.timestamp()));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Marks `task` overdue when its deadline has passed and writes only the
    /// status column.
    ///
    /// The write only lands while the stored status is still the one `task`
    /// was read with. When another change got there first, `task` is
    /// reloaded from the store and nothing is written. Returns whether the
    /// status changed. A failed write puts the previous status back and is
    /// logged rather than returned.
    pub async fn evaluate_due(&self, task: &mut Task, now: DateTime<Utc>) -> bool {
        let Some(previous) = task.evaluate_due(now) else {
            return false;
        };
        match self
            .store
            .update_status_if(task.id(), previous, task.status())
            .await
        {
            Ok(true) => {
                info!(task_id = %task.id(), from = previous.as_str(), "task marked overdue");
                true
            }
            Ok(false) => {
                debug!(task_id = %task.id(), "status changed concurrently; overdue write skipped");
                match self.store.find_by_id(task.id()).await {
                    Ok(Some(current)) => *task = current,
                    Ok(None) | Err(_) => task.replace_status(previous),
                }
                false
            }
            Err(err) => {
                task.replace_status(previous);
                warn!(task_id = %task.id(), error = %err, "failed to persist overdue status");
                false
            }
        }
    }

    async fn prepare(&self, request: CreateTaskRequest) -> TaskServiceResult<PreparedTask> {
        let mut errors = ValidationErrors::new();
        if request.title.trim().is_empty() {
            errors.push("title", "must not be empty");
        }
        let parsed_due = collect(&mut errors, "due_date", parse_timestamp(&request.due_date));
        let priority = collect(
            &mut errors,
            "priority",
            request.priority.as_deref().map(TaskPriority::try_from).transpose(),
        );
        let status = collect(
            &mut errors,
            "status",
            request.status.as_deref().map(TaskStatus::try_from).transpose(),
        );
        let reminder1 = collect(
            &mut errors,
            "reminder1",
            request.reminder1.as_deref().map(parse_optional_timestamp).transpose(),
        );
        let reminder2 = collect(
            &mut errors,
            "reminder2",
            request.reminder2.as_deref().map(parse_optional_timestamp).transpose(),
        );

        let assignees = self.assignments.resolve(&request.assignees).await?;
        for email in &assignees.unresolved {
            errors.push("assignees", format!("unknown assignee: {email}"));
        }
        let departments = check_departments(&mut errors, request.departments.as_deref(), &assignees);

        if let Some(parent) = request.parent_task {
            if self.store.find_by_id(parent).await?.is_none() {
                errors.push("parent_task", format!("task {parent} does not exist"));
            }
        }
        if request
            .attachment
            .as_ref()
            .is_some_and(|upload| upload.file_name.trim().is_empty())
        {
            errors.push("attachment", "file name must not be empty");
        }
        errors.into_result()?;

        let due_date = parsed_due
            .ok_or_else(|| TaskDomainError::InvalidTimestamp(request.due_date.clone()))?;
        Ok(PreparedTask {
            new_task: NewTask {
                title: request.title,
                description: request.description,
                priority: priority.flatten().unwrap_or_default(),
                status: status.flatten().unwrap_or_default(),
                due_date,
                created_by: request.created_by,
                reminder1: reminder1.flatten().flatten(),
                reminder2: reminder2.flatten().flatten(),
                parent_task: request.parent_task,
            },
            assignees,
            departments,
            attachment: request.attachment,
        })
    }

    async fn require_task(&self, task_id: TaskId) -> TaskServiceResult<Task> {
        self.store
            .find_by_id(task_id)
            .await?
            .ok_or(TaskServiceError::NotFound(task_id))
    }

    async fn load_details(&self, task: Task) -> TaskServiceResult<TaskDetails> {
        let assignments = self.store.assignments_for(task.id()).await?;
        self.details_with(task, assignments).await
    }

    /// Builds the detail view around assignments the caller already holds.
    async fn details_with(
        &self,
        task: Task,
        assignments: Vec<Assignment>,
    ) -> TaskServiceResult<TaskDetails> {
        let task_id = task.id();
        let history = self.store.history_for(task_id).await?;
        let attachments = self.store.attachments_for(task_id).await?;
        let subtasks = self
            .store
            .find_subtasks(task_id)
            .await?
            .iter()
            .map(Task::id)
            .collect();
        Ok(TaskDetails {
            task,
            assignments,
            history,
            attachments,
            subtasks,
        })
    }

    /// Tells every current assignee about a status change.
    ///
    /// Assignees whose account cannot be loaded are skipped with a warning.
    async fn notify_status_change(
        &self,
        task: &Task,
        previous: TaskStatus,
        assignments: &[Assignment],
    ) {
        let kind = NotificationKind::StatusChanged {
            old: previous,
            new: task.status(),
        };
        for assignment in assignments {
            match self.directory.find_by_id(assignment.assignee()).await {
                Ok(Some(user)) => {
                    self.dispatcher.dispatch(kind, task, &user).await;
                }
                Ok(None) => warn!(
                    task_id = %task.id(),
                    assignee = %assignment.assignee(),
                    "assignee account missing; status notification skipped"
                ),
                Err(err) => warn!(
                    task_id = %task.id(),
                    assignee = %assignment.assignee(),
                    error = %err,
                    "assignee lookup failed; status notification skipped"
                ),
            }
        }
    }
}

fn authorize(
    actor: &User,
    assignments: &[Assignment],
    operation: TaskOperation,
) -> TaskServiceResult<()> {
    match permission::decide(actor, assignments, operation) {
        AccessDecision::Allow(_) => Ok(()),
        AccessDecision::Deny(rule) => Err(TaskServiceError::PermissionDenied { operation, rule }),
    }
}

/// Records a parse failure under `field` and returns the parsed value, if
/// any.
fn collect<T, E: Display>(
    errors: &mut ValidationErrors,
    field: &'static str,
    result: Result<T, E>,
) -> Option<T> {
    result.map_err(|err| errors.push(field, err.to_string())).ok()
}

/// Checks assignee departments against an explicit department list and
/// returns the normalized names for the audit trail.
fn check_departments(
    errors: &mut ValidationErrors,
    requested: Option<&[String]>,
    assignees: &ResolvedAssignees,
) -> Vec<String> {
    let Some(names) = requested else {
        return Vec::new();
    };
    let mut allowed: Vec<Department> = Vec::new();
    for name in names {
        match Department::new(name.as_str()) {
            Ok(department) if !allowed.contains(&department) => allowed.push(department),
            Ok(_) => {}
            Err(err) => errors.push("departments", err.to_string()),
        }
    }
    if allowed.is_empty() {
        return Vec::new();
    }
    for user in &assignees.users {
        let department = user.department().cloned().unwrap_or_else(Department::general);
        if !allowed.contains(&department) {
            errors.push(
                "assignees",
                format!(
                    "{} belongs to {department}, which is not a selected department",
                    user.email()
                ),
            );
        }
    }
    allowed.into_iter().map(String::from).collect()
}
