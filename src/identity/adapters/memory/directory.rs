//! In-memory user directory for tests and local tooling.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{Department, EmailAddress, User, UserId},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};

/// Thread-safe in-memory user directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<UserId, User>,
    email_index: HashMap<EmailAddress, UserId>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a user account.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Persistence`] when the lock is poisoned.
    pub fn insert(&self, user: User) -> UserDirectoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            UserDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if let Some(previous) = state.users.get(&user.id()).cloned() {
            state.email_index.remove(previous.email());
        }
        state.email_index.insert(user.email().clone(), user.id());
        state.users.insert(user.id(), user);
        Ok(())
    }

    fn read_state(
        &self,
    ) -> UserDirectoryResult<std::sync::RwLockReadGuard<'_, DirectoryState>> {
        self.state.read().map_err(|err| {
            UserDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &EmailAddress) -> UserDirectoryResult<Option<User>> {
        let state = self.read_state()?;
        Ok(state
            .email_index
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        let state = self.read_state()?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_department_head(
        &self,
        department: &Department,
    ) -> UserDirectoryResult<Option<User>> {
        let state = self.read_state()?;
        let mut heads: Vec<&User> = state
            .users
            .values()
            .filter(|user| user.heads(department))
            .collect();
        // Deterministic pick when a department has several heads on record.
        heads.sort_by(|a, b| a.email().cmp(b.email()));
        Ok(heads.first().map(|user| (*user).clone()))
    }

    async fn list_admins(&self) -> UserDirectoryResult<Vec<User>> {
        let state = self.read_state()?;
        let mut admins: Vec<User> = state
            .users
            .values()
            .filter(|user| user.is_admin_like())
            .cloned()
            .collect();
        admins.sort_by(|a, b| a.email().cmp(b.email()));
        Ok(admins)
    }
}
