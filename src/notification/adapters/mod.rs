//! Notifier implementations.

pub mod logging;
pub mod memory;
