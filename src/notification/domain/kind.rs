//! The five notification variants.

use crate::task::domain::{ReminderSlot, TaskStatus};
use serde::{Deserialize, Serialize};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationKind {
    /// The recipient was assigned to a task.
    Assignment,
    /// The deadline is approaching.
    UpcomingDeadline {
        /// Whole hours left until the deadline.
        hours_left: i64,
    },
    /// The deadline has passed.
    Overdue,
    /// A custom reminder time was reached.
    CustomReminder {
        /// Reminder field that fired.
        slot: ReminderSlot,
    },
    /// The task status changed.
    StatusChanged {
        /// Status before the change.
        old: TaskStatus,
        /// Status after the change.
        new: TaskStatus,
    },
}

impl NotificationKind {
    /// Returns the template name for this variant.
    #[must_use]
    pub const fn template_name(self) -> &'static str {
        match self {
            Self::Assignment => "assignment",
            Self::UpcomingDeadline { .. } => "upcoming_deadline",
            Self::Overdue => "overdue",
            Self::CustomReminder { .. } => "custom_reminder",
            Self::StatusChanged { .. } => "status_changed",
        }
    }

    /// Returns whether administrators are copied in.
    ///
    /// Admins hear about assignments, overdue tasks, and status changes into
    /// `overdue` or `completed`.
    #[must_use]
    pub const fn copies_admins(self) -> bool {
        match self {
            Self::Assignment | Self::Overdue => true,
            Self::StatusChanged { new, .. } => {
                matches!(new, TaskStatus::Overdue | TaskStatus::Completed)
            }
            Self::UpcomingDeadline { .. } | Self::CustomReminder { .. } => false,
        }
    }
}
