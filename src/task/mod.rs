//! Task lifecycle and reminder engine for taskhub.
//!
//! Tasks move freely between `pending`, `ongoing`, `completed`, and
//! `overdue`; only entering `completed` stamps a completion time. Each task
//! owns its assignments, its append-only history, its attachments, and its
//! subtasks. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`], including the permission decision table and
//!   reminder window predicates
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
