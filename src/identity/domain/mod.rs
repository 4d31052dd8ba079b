//! Domain model for users, roles, and departments.

mod department;
mod email;
mod error;
mod ids;
mod user;

pub use department::Department;
pub use email::EmailAddress;
pub use error::{IdentityDomainError, ParseRoleError};
pub use ids::UserId;
pub use user::{Role, User};
