//! All-or-nothing replacement of a task's assignee set.

use super::{TaskServiceError, TaskServiceResult};
use crate::identity::{
    domain::{EmailAddress, User},
    ports::{UserDirectory, UserDirectoryResult},
};
use crate::task::{
    domain::{Assignment, TaskId},
    ports::{AssignmentRepository, TaskRepositoryResult},
};
use mockable::Clock;
use std::sync::Arc;

/// Outcome of resolving assignee emails against the user directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAssignees {
    /// Users found, in first-mention order and without repeats.
    pub users: Vec<User>,
    /// Inputs that are malformed or match no account, as given.
    pub unresolved: Vec<String>,
}

impl ResolvedAssignees {
    /// Returns whether every input resolved.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Returns the normalized emails of the resolved users.
    #[must_use]
    pub fn emails(&self) -> Vec<String> {
        self.users
            .iter()
            .map(|user| user.email().as_str().to_owned())
            .collect()
    }
}

/// Resolves assignee emails and swaps the stored assignment set.
#[derive(Clone)]
pub struct AssignmentSetService<A, D, C>
where
    A: AssignmentRepository,
    D: UserDirectory,
    C: Clock + Send + Sync,
{
    repository: Arc<A>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<A, D, C> AssignmentSetService<A, D, C>
where
    A: AssignmentRepository,
    D: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new assignment set service.
    #[must_use]
    pub const fn new(repository: Arc<A>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            repository,
            directory,
            clock,
        }
    }

    /// Replaces every assignment of `task_id` with one per resolved email.
    ///
    /// Duplicate emails collapse to a single assignment. Each assignment
    /// snapshots the assignee's own department, or `GENERAL` when they have
    /// none.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::UnknownAssignee`] listing every email that
    /// did not resolve; the stored set is untouched in that case. Returns
    /// [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn replace_assignments<S>(
        &self,
        task_id: TaskId,
        emails: &[S],
    ) -> TaskServiceResult<Vec<Assignment>>
    where
        S: AsRef<str> + Sync,
    {
        let resolved = self.resolve(emails).await?;
        if !resolved.is_complete() {
            return Err(TaskServiceError::UnknownAssignee(resolved.unresolved));
        }
        Ok(self.assign_resolved(task_id, &resolved.users).await?)
    }

    /// Looks up every email, collecting the ones that match no account.
    ///
    /// Blank entries are ignored and repeats (after normalization) are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns the directory error when a lookup fails.
    pub async fn resolve<S>(&self, emails: &[S]) -> UserDirectoryResult<ResolvedAssignees>
    where
        S: AsRef<str> + Sync,
    {
        let mut resolved = ResolvedAssignees::default();
        let mut seen: Vec<EmailAddress> = Vec::new();
        for candidate in emails {
            let raw = candidate.as_ref();
            if raw.trim().is_empty() {
                continue;
            }
            let Ok(email) = EmailAddress::new(raw) else {
                resolved.unresolved.push(raw.trim().to_owned());
                continue;
            };
            if seen.contains(&email) {
                continue;
            }
            match self.directory.find_by_email(&email).await? {
                Some(user) => resolved.users.push(user),
                None => resolved.unresolved.push(email.as_str().to_owned()),
            }
            seen.push(email);
        }
        Ok(resolved)
    }

    /// Stores one assignment per user as the task's complete set.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the replacement fails.
    pub async fn assign_resolved(
        &self,
        task_id: TaskId,
        users: &[User],
    ) -> TaskRepositoryResult<Vec<Assignment>> {
        let assignments: Vec<Assignment> = users
            .iter()
            .map(|user| Assignment::new(task_id, user, &*self.clock))
            .collect();
        self.repository
            .replace_for_task(task_id, &assignments)
            .await?;
        Ok(assignments)
    }
}
