//! Task access decision table.
//!
//! Every role check on tasks goes through [`decide`]. Rules are evaluated in
//! order and the first one that applies settles the outcome:
//!
//! | # | Rule | Outcome |
//! |---|------|---------|
//! | 1 | actor is a superuser | allow |
//! | 2 | actor is an admin | allow |
//! | 3 | actor is staff | allow |
//! | 4 | operation is `mark_complete` | deny |
//! | 5 | actor is a head of department | allow iff an assignment is in their department |
//! | 6 | actor is faculty | `view` iff assigned, otherwise deny |
//! | 7 | anything else | deny |

use super::Assignment;
use crate::identity::domain::{Role, User};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation an actor wants to perform on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOperation {
    /// Read the task and its history.
    View,
    /// Change task fields or assignees.
    Edit,
    /// Remove the task.
    Delete,
    /// Move the task into `completed`.
    MarkComplete,
}

impl TaskOperation {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::MarkComplete => "mark_complete",
        }
    }
}

impl fmt::Display for TaskOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row of the decision table that settled an access decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRule {
    /// Rule 1: superusers may do anything.
    Superuser,
    /// Rule 2: administrators may do anything.
    Admin,
    /// Rule 3: staff may do anything.
    Staff,
    /// Rule 4: only administrators and staff may complete tasks.
    CompletionRestricted,
    /// Rule 5: heads of department act on tasks assigned into their
    /// department.
    DepartmentHead,
    /// Rule 6: faculty may view tasks assigned to them.
    FacultyAssignee,
    /// Rule 7: nothing else matched.
    NoMatchingRule,
}

impl AccessRule {
    /// Returns a short description of the rule.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Superuser => "superusers have full access",
            Self::Admin => "administrators have full access",
            Self::Staff => "staff have full access",
            Self::CompletionRestricted => "only administrators and staff may complete tasks",
            Self::DepartmentHead => {
                "heads of department may act only on tasks assigned into their department"
            }
            Self::FacultyAssignee => "faculty may only view tasks assigned to them",
            Self::NoMatchingRule => "no rule grants access",
        }
    }
}

impl fmt::Display for AccessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Outcome of evaluating the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access granted by the given rule.
    Allow(AccessRule),
    /// Access refused by the given rule.
    Deny(AccessRule),
}

impl AccessDecision {
    /// Returns whether access is granted.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow(_))
    }

    /// Returns the rule that settled the decision.
    #[must_use]
    pub const fn rule(self) -> AccessRule {
        match self {
            Self::Allow(rule) | Self::Deny(rule) => rule,
        }
    }
}

/// Evaluates the decision table for `actor` on a task with the given
/// assignments.
#[must_use]
pub fn decide(actor: &User, assignments: &[Assignment], operation: TaskOperation) -> AccessDecision {
    if actor.is_superuser() {
        return AccessDecision::Allow(AccessRule::Superuser);
    }
    match actor.role() {
        Role::Admin => return AccessDecision::Allow(AccessRule::Admin),
        Role::Staff => return AccessDecision::Allow(AccessRule::Staff),
        Role::Hod | Role::Faculty => {}
    }
    if operation == TaskOperation::MarkComplete {
        return AccessDecision::Deny(AccessRule::CompletionRestricted);
    }
    match actor.role() {
        Role::Hod => {
            let in_department = actor.department().is_some_and(|department| {
                assignments
                    .iter()
                    .any(|assignment| assignment.department() == department)
            });
            grant_if(in_department, AccessRule::DepartmentHead)
        }
        Role::Faculty => {
            let is_assignee = assignments
                .iter()
                .any(|assignment| assignment.assignee() == actor.id());
            grant_if(
                operation == TaskOperation::View && is_assignee,
                AccessRule::FacultyAssignee,
            )
        }
        Role::Admin | Role::Staff => AccessDecision::Deny(AccessRule::NoMatchingRule),
    }
}

/// Returns whether `actor` may perform `operation`.
#[must_use]
pub fn can(actor: &User, assignments: &[Assignment], operation: TaskOperation) -> bool {
    decide(actor, assignments, operation).is_allowed()
}

const fn grant_if(condition: bool, rule: AccessRule) -> AccessDecision {
    if condition {
        AccessDecision::Allow(rule)
    } else {
        AccessDecision::Deny(rule)
    }
}
