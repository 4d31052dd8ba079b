//! Taskhub: role-based task tracking core.
//!
//! This crate implements the task lifecycle and notification engine for a
//! departmental task tracker: the status state machine, deadline-driven
//! reminders, multi-assignee delegation, and the audit trail.
//!
//! # Architecture
//!
//! Taskhub follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, mail, etc.)
//!
//! # Modules
//!
//! - [`identity`]: Users, roles, and the read-only user directory
//! - [`task`]: Tasks, assignments, history, permissions, and reminders
//! - [`notification`]: Templated notifications and best-effort dispatch
//! - [`config`]: Layered configuration for the sweep binary

pub mod config;
pub mod identity;
pub mod notification;
pub mod task;

#[cfg(test)]
mod test_support;
