//! Periodic reminder sweep over all tasks.

use super::TaskServiceResult;
use crate::identity::{domain::User, ports::UserDirectory};
use crate::notification::{
    domain::NotificationKind, ports::Notifier, services::NotificationDispatcher,
};
use crate::task::{
    domain::{
        ReminderSlot, SweepPolicy, Task,
        reminder::{hours_until_due, is_custom_reminder_due, is_overdue_notice_due, is_upcoming},
    },
    ports::{AssignmentRepository, TaskRepository},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Notification attempts made by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Upcoming-deadline notifications attempted.
    pub upcoming: usize,
    /// Overdue notifications attempted.
    pub overdue: usize,
    /// First custom reminders attempted.
    pub reminder1: usize,
    /// Second custom reminders attempted.
    pub reminder2: usize,
    /// Tasks skipped because the record or its assignees could not be loaded.
    pub failed_tasks: usize,
}

impl SweepReport {
    /// Returns the total number of notification attempts.
    #[must_use]
    pub const fn attempts(&self) -> usize {
        self.upcoming + self.overdue + self.reminder1 + self.reminder2
    }

    const fn record(&mut self, kind: NotificationKind) {
        match kind {
            NotificationKind::UpcomingDeadline { .. } => self.upcoming += 1,
            NotificationKind::Overdue => self.overdue += 1,
            NotificationKind::CustomReminder {
                slot: ReminderSlot::First,
            } => self.reminder1 += 1,
            NotificationKind::CustomReminder {
                slot: ReminderSlot::Second,
            } => self.reminder2 += 1,
            NotificationKind::Assignment | NotificationKind::StatusChanged { .. } => {}
        }
    }
}

/// Finds tasks needing reminders and notifies their assignees.
///
/// The sweep keeps no state between runs, so a task can qualify again on a
/// later sweep that lands in the same window. A task whose assignees cannot
/// be loaded is logged, counted in [`SweepReport::failed_tasks`], and
/// skipped.
#[derive(Clone)]
pub struct ReminderSweepService<S, D, N>
where
    S: TaskRepository + AssignmentRepository,
    D: UserDirectory,
    N: Notifier,
{
    store: Arc<S>,
    directory: Arc<D>,
    dispatcher: NotificationDispatcher<D, N>,
    policy: SweepPolicy,
}

impl<S, D, N> ReminderSweepService<S, D, N>
where
    S: TaskRepository + AssignmentRepository,
    D: UserDirectory,
    N: Notifier,
{
    /// Creates a sweep service with the default policy.
    #[must_use]
    pub fn new(store: Arc<S>, directory: Arc<D>, dispatcher: NotificationDispatcher<D, N>) -> Self {
        Self {
            store,
            directory,
            dispatcher,
            policy: SweepPolicy::default(),
        }
    }

    /// Replaces the window policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: SweepPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the window policy.
    #[must_use]
    pub const fn policy(&self) -> &SweepPolicy {
        &self.policy
    }

    /// Runs one sweep at `now`.
    ///
    /// Never fails; a task list that cannot be loaded yields an empty
    /// report. A task record that cannot be read is logged, counted in
    /// [`SweepReport::failed_tasks`], and the sweep moves on.
    pub async fn run_sweep(&self, now: DateTime<Utc>) -> SweepReport {
        let mut report = SweepReport::default();
        let records = match self.store.scan_all().await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "reminder sweep could not load tasks");
                return report;
            }
        };
        let scanned = records.len();

        for record in records {
            let task = match record {
                Ok(task) => task,
                Err(err) => {
                    warn!(error = %err, "reminder sweep skipped unreadable task");
                    report.failed_tasks += 1;
                    continue;
                }
            };
            let due = self.due_notifications(&task, now);
            if due.is_empty() {
                continue;
            }
            let assignees = match self.assignees_of(&task).await {
                Ok(assignees) => assignees,
                Err(err) => {
                    warn!(task_id = %task.id(), error = %err, "reminder sweep skipped task");
                    report.failed_tasks += 1;
                    continue;
                }
            };
            for kind in due {
                for assignee in &assignees {
                    self.dispatcher.dispatch(kind, &task, assignee).await;
                    report.record(kind);
                }
            }
        }

        info!(
            tasks = scanned,
            upcoming = report.upcoming,
            overdue = report.overdue,
            reminder1 = report.reminder1,
            reminder2 = report.reminder2,
            failed_tasks = report.failed_tasks,
            "reminder sweep finished"
        );
        report
    }

    fn due_notifications(&self, task: &Task, now: DateTime<Utc>) -> Vec<NotificationKind> {
        let mut due = Vec::new();
        if is_upcoming(task, now, &self.policy) {
            due.push(NotificationKind::UpcomingDeadline {
                hours_left: hours_until_due(task, now),
            });
        }
        if is_overdue_notice_due(task, now) {
            due.push(NotificationKind::Overdue);
        }
        for slot in ReminderSlot::ALL {
            if is_custom_reminder_due(task, slot, now, &self.policy) {
                due.push(NotificationKind::CustomReminder { slot });
            }
        }
        due
    }

    /// Loads the accounts of every assignee; missing accounts are skipped.
    async fn assignees_of(&self, task: &Task) -> TaskServiceResult<Vec<User>> {
        let mut users = Vec::new();
        for assignment in self.store.assignments_for(task.id()).await? {
            match self.directory.find_by_id(assignment.assignee()).await? {
                Some(user) => users.push(user),
                None => warn!(
                    task_id = %task.id(),
                    assignee = %assignment.assignee(),
                    "assignee account missing; reminder skipped"
                ),
            }
        }
        Ok(users)
    }
}
