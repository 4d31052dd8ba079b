//! User accounts and roles.

use super::{Department, EmailAddress, ParseRoleError, UserId};
use serde::{Deserialize, Serialize};

/// Role held by a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Office staff; same task rights as administrators.
    Staff,
    /// Head of department; sees tasks assigned into their department.
    Hod,
    /// Faculty member; sees tasks assigned to them.
    Faculty,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Hod => "hod",
            Self::Faculty => "faculty",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "hod" => Ok(Self::Hod),
            "faculty" => Ok(Self::Faculty),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// A user account as seen by the task core.
///
/// Users are read-only here: role and department changes happen through
/// external administration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    display_name: String,
    role: Role,
    department: Option<Department>,
    is_superuser: bool,
}

impl User {
    /// Creates a user with a fresh identifier and no department.
    #[must_use]
    pub fn new(email: EmailAddress, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(),
            email,
            display_name: display_name.into(),
            role,
            department: None,
            is_superuser: false,
        }
    }

    /// Sets the identifier, for users loaded from storage.
    #[must_use]
    pub const fn with_id(mut self, id: UserId) -> Self {
        self.id = id;
        self
    }

    /// Sets the home department.
    #[must_use]
    pub fn with_department(mut self, department: Department) -> Self {
        self.department = Some(department);
        self
    }

    /// Marks the account as a superuser.
    #[must_use]
    pub const fn with_superuser(mut self, is_superuser: bool) -> Self {
        self.is_superuser = is_superuser;
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the display name, falling back to the email when blank.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            self.email.as_str()
        } else {
            &self.display_name
        }
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the home department, if any.
    #[must_use]
    pub const fn department(&self) -> Option<&Department> {
        self.department.as_ref()
    }

    /// Returns whether the account carries the superuser flag.
    #[must_use]
    pub const fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    /// Returns whether the user is an administrator or superuser.
    #[must_use]
    pub const fn is_admin_like(&self) -> bool {
        self.is_superuser || matches!(self.role, Role::Admin)
    }

    /// Returns whether the user heads the given department.
    #[must_use]
    pub fn heads(&self, department: &Department) -> bool {
        matches!(self.role, Role::Hod) && self.department.as_ref() == Some(department)
    }
}
