//! SQLite-backed `UserRepository` implementation using Diesel ORM.
//!
//! Inserts rely on the `UNIQUE(username)` constraint; a conflicting insert is
//! reported as `UniqueViolation` rather than pre-checked.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    NewUser, PasswordDigest, StoredCredentials, User, UserId, Username,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{CredentialRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::user;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let username = Username::new(row.username)
        .map_err(|err| UserPersistenceError::query(format!("stored username invalid: {err}")))?;
    Ok(User::new(UserId::new(row.id), username))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, new_user: &NewUser) -> Result<UserId, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            username: new_user.username.as_ref(),
            password_hash: new_user.password_hash.as_ref(),
        };

        diesel::insert_into(user::table)
            .values(&row)
            .returning(user::id)
            .get_result::<i64>(&mut conn)
            .await
            .map(UserId::new)
            .map_err(|error| {
                if is_unique_violation(&error) {
                    UserPersistenceError::unique_violation(new_user.username.as_ref())
                } else {
                    map_diesel_error(error)
                }
            })
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = user::table
            .filter(user::id.eq(id.as_i64()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = user::table
            .filter(user::username.eq(username.as_ref()))
            .select(CredentialRow::as_select())
            .first::<CredentialRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(|row| StoredCredentials {
            user_id: UserId::new(row.id),
            password_hash: PasswordDigest::new(row.password_hash),
        }))
    }
}
