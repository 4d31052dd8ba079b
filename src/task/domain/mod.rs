//! Domain model for task lifecycle management.
//!
//! The task domain models the status state machine, assignments with
//! department snapshots, the audit trail, and the pure rules (permissions,
//! reminder windows) that services apply, while keeping all infrastructure
//! concerns outside of the domain boundary.

mod assignment;
mod attachment;
mod changes;
mod error;
mod history;
mod ids;
pub mod permission;
pub mod reminder;
mod task;
pub mod timestamp;

pub use assignment::{Assignment, PersistedAssignmentData};
pub use attachment::{Attachment, NewAttachment, PersistedAttachmentData};
pub use changes::{FieldChange, FieldChanges};
pub use error::{
    ParseHistoryActionError, ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError,
};
pub use history::{HistoryAction, HistoryDetails, HistoryEntry, PersistedHistoryData};
pub use ids::{AttachmentId, HistoryEntryId, TaskId};
pub use permission::{AccessDecision, AccessRule, TaskOperation};
pub use reminder::{ReminderSlot, SweepPolicy};
pub use task::{CreatedBy, NewTask, PersistedTaskData, Task, TaskEdit, TaskPriority, TaskStatus};
