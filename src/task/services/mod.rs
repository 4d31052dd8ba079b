//! Application services for task lifecycle orchestration.

mod assignment;
mod error;
mod lifecycle;
mod reminder;

pub use assignment::{AssignmentSetService, ResolvedAssignees};
pub use error::{FieldViolation, TaskServiceError, TaskServiceResult, ValidationErrors};
pub use lifecycle::{
    CreateTaskRequest, DashboardStats, TaskDetails, TaskLifecycleService, TaskPatch,
};
pub use reminder::{ReminderSweepService, SweepReport};
