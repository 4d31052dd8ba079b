//! `PostgreSQL` user directory.

use super::{models::UserRow, schema::users};
use crate::identity::{
    domain::{Department, EmailAddress, Role, User, UserId},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by identity adapters.
pub type UserPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed user directory.
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: UserPgPool,
}

impl PostgresUserDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: UserPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserDirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserDirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserDirectoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserDirectoryError::persistence)?
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_email(&self, email: &EmailAddress) -> UserDirectoryResult<Option<User>> {
        let lookup = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::email.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserDirectoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserDirectoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_department_head(
        &self,
        department: &Department,
    ) -> UserDirectoryResult<Option<User>> {
        let lookup = department.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::role.eq(Role::Hod.as_str()))
                .filter(users::department.eq(lookup))
                .order(users::email.asc())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserDirectoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list_admins(&self) -> UserDirectoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(
                    users::role
                        .eq(Role::Admin.as_str())
                        .or(users::is_superuser.eq(true)),
                )
                .order(users::email.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserDirectoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }
}

fn row_to_user(row: UserRow) -> UserDirectoryResult<User> {
    let UserRow {
        id,
        email,
        display_name,
        role,
        department,
        is_superuser,
    } = row;

    let email = EmailAddress::new(email).map_err(UserDirectoryError::invalid_persisted_data)?;
    let role = Role::try_from(role.as_str()).map_err(UserDirectoryError::invalid_persisted_data)?;
    let mut user = User::new(email, display_name, role)
        .with_id(UserId::from_uuid(id))
        .with_superuser(is_superuser);
    if let Some(name) = department.filter(|name| !name.trim().is_empty()) {
        let department =
            Department::new(name).map_err(UserDirectoryError::invalid_persisted_data)?;
        user = user.with_department(department);
    }
    Ok(user)
}
