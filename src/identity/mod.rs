//! Identity and role model for taskhub.
//!
//! Users are created and administered outside this crate. The identity
//! context only reads them: it resolves assignee emails, finds department
//! heads for notification fan-out, and supplies the role predicates the
//! permission table is built on.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
