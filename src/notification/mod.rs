//! Notification rendering and best-effort fan-out.
//!
//! Messages are rendered from `minijinja` templates and handed to a
//! [`ports::Notifier`] transport. Dispatch never fails the caller; every
//! attempt resolves to a [`services::DispatchOutcome`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
