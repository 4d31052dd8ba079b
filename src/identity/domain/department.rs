//! Department names.

use super::IdentityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Department code such as `CS` or `EE`.
///
/// Departments are compared by exact (trimmed) name. Assignment rows keep a
/// copy of the assignee's department taken at assignment time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Department(String);

impl Department {
    /// Department recorded for assignees without a home department.
    pub const GENERAL: &'static str = "GENERAL";

    /// Creates a validated department name.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyDepartment`] when the trimmed name
    /// is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityDomainError::EmptyDepartment);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the fallback department used when an assignee has none.
    #[must_use]
    pub fn general() -> Self {
        Self(Self::GENERAL.to_owned())
    }

    /// Returns the department name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Department {
    type Error = IdentityDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Department> for String {
    fn from(value: Department) -> Self {
        value.0
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
