//! In-memory adapters for the identity context.

mod directory;

pub use directory::InMemoryUserDirectory;
