//! `PostgreSQL` adapters for the identity context.

mod directory;
mod models;
mod schema;

pub use directory::{PostgresUserDirectory, UserPgPool};
