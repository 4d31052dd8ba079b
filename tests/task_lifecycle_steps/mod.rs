//! Step definitions for task lifecycle behaviour scenarios.

pub mod world;

mod given;
mod then;
mod when;
