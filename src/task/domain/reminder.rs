//! Reminder window predicates used by the periodic sweep.
//!
//! Each predicate looks at one task at one instant and holds no state. The
//! sweep runs on an external cadence that is not aligned with these
//! windows, so a task may qualify on more than one sweep; notifications are
//! at-least-once.

use super::{Task, TaskStatus};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Tunables for reminder windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPolicy {
    /// How far ahead of the deadline upcoming reminders start.
    pub upcoming_window: TimeDelta,
    /// Spacing between upcoming reminders.
    pub reminder_cadence: TimeDelta,
    /// How far past a cadence boundary a sweep may land and still fire.
    pub cadence_tolerance: TimeDelta,
    /// Half-width of the window around a custom reminder time.
    pub custom_reminder_buffer: TimeDelta,
}

impl Default for SweepPolicy {
    fn default() -> Self {
        Self {
            upcoming_window: TimeDelta::hours(24),
            reminder_cadence: TimeDelta::hours(4),
            cadence_tolerance: TimeDelta::seconds(360),
            custom_reminder_buffer: TimeDelta::minutes(5),
        }
    }
}

/// Which of the two custom reminder fields fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderSlot {
    /// The `reminder1` field.
    First,
    /// The `reminder2` field.
    Second,
}

impl ReminderSlot {
    /// Both slots, in field order.
    pub const ALL: [Self; 2] = [Self::First, Self::Second];

    /// Returns the task field name for the slot.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::First => "reminder1",
            Self::Second => "reminder2",
        }
    }

    /// Reads the slot's reminder time from a task.
    #[must_use]
    pub const fn read(self, task: &Task) -> Option<DateTime<Utc>> {
        match self {
            Self::First => task.reminder1(),
            Self::Second => task.reminder2(),
        }
    }
}

/// Returns whether a pending task is due soon and `now` sits on a cadence
/// boundary.
///
/// The deadline must fall in `(now, now + upcoming_window]` and the time left
/// modulo the cadence must be below the tolerance, which fires roughly
/// every cadence period as the deadline approaches.
#[must_use]
pub fn is_upcoming(task: &Task, now: DateTime<Utc>, policy: &SweepPolicy) -> bool {
    if task.status() != TaskStatus::Pending {
        return false;
    }
    let due = task.due_date();
    if due <= now || due > now + policy.upcoming_window {
        return false;
    }
    let cadence = policy.reminder_cadence.num_seconds();
    if cadence <= 0 {
        return false;
    }
    let remaining = (due - now).num_seconds();
    remaining.rem_euclid(cadence) < policy.cadence_tolerance.num_seconds()
}

/// Returns whether a pending task's deadline has passed.
#[must_use]
pub fn is_overdue_notice_due(task: &Task, now: DateTime<Utc>) -> bool {
    task.status() == TaskStatus::Pending && task.due_date() < now
}

/// Returns whether `now` lies within the buffer around a custom reminder.
///
/// Status plays no part: a reminder fires whatever state the task is in.
#[must_use]
pub fn is_custom_reminder_due(
    task: &Task,
    slot: ReminderSlot,
    now: DateTime<Utc>,
    policy: &SweepPolicy,
) -> bool {
    slot.read(task)
        .is_some_and(|at| (now - at).abs() <= policy.custom_reminder_buffer)
}

/// Whole hours left until the deadline, rounded down and never negative.
#[must_use]
pub fn hours_until_due(task: &Task, now: DateTime<Utc>) -> i64 {
    (task.due_date() - now).num_hours().max(0)
}
