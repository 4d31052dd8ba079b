//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.
//! A task exclusively owns its assignments, history, attachments, and
//! subtasks; implementations must remove all of them when the task is
//! deleted.

pub mod repository;

pub use repository::{
    AssignmentRepository, AttachmentRepository, HistoryRepository, TaskRepository,
    TaskRepositoryError, TaskRepositoryResult, TaskStore,
};
