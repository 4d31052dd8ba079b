//! Port contracts for the identity context.

pub mod directory;

pub use directory::{UserDirectory, UserDirectoryError, UserDirectoryResult};
