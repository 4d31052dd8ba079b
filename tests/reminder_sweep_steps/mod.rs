//! Step definitions for reminder sweep behaviour scenarios.

pub mod world;

mod given;
mod then;
mod when;
